use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use services::{AppServices, Clock};
use ui::build_app_context;

mod cli;
mod commands;
mod db;
mod logging;
mod terminal;

use crate::cli::{Cli, Command, ExamCommand};
use crate::db::{normalize_sqlite_url, prepare_sqlite_file};

async fn run(cli: Cli) -> anyhow::Result<()> {
    logging::init_logging(&cli.log_filter)?;

    // Open + migrate SQLite here so core/services stay free of filesystem concerns.
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url, Clock::system(), cli.timeout_policy.into())
        .await
        .with_context(|| format!("opening {db_url}"))?;
    tracing::debug!(%db_url, tick_ms = cli.tick_ms, "storage ready");

    let ctx = build_app_context(&services, Duration::from_millis(cli.tick_ms.max(1)));

    match &cli.command {
        Command::Login { auth, role } => commands::login(&ctx, auth, (*role).into()).await,
        Command::Exam { command } => match command {
            ExamCommand::Create { file, auth } => commands::create_exam(&ctx, auth, file).await,
            ExamCommand::List { auth } => commands::list_exams(&ctx, auth).await,
        },
        Command::Dashboard { auth } => commands::dashboard(&ctx, auth).await,
        Command::Take { exam_id, auth } => commands::take(&ctx, auth, exam_id).await,
        Command::Results { exam_id, auth } => commands::results(&ctx, auth, exam_id).await,
        Command::Seed => commands::seed(&services).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        // Binary glue: print once, with the cause chain.
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
