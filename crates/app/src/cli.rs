use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use exam_core::model::Role;
use services::TimeoutPolicy;

#[derive(Debug, Parser)]
#[command(name = "exam-rooms", version, about = "Timed multiple-choice exams")]
pub struct Cli {
    /// SQLite database (path or sqlite:// URL); created if missing.
    #[arg(
        long = "db",
        env = "EXAM_DB_URL",
        default_value = "sqlite://exams.sqlite3",
        global = true
    )]
    pub db_url: String,

    /// What to record when time runs out on a selected but unconfirmed answer.
    #[arg(
        long,
        env = "EXAM_TIMEOUT_POLICY",
        value_enum,
        default_value = "discard",
        global = true
    )]
    pub timeout_policy: TimeoutPolicyArg,

    /// Timer tick period in milliseconds.
    #[arg(long, env = "EXAM_TICK_MS", default_value_t = 1000, global = true)]
    pub tick_ms: u64,

    /// Log filter directives, e.g. `info` or `services=debug`.
    #[arg(long = "log", env = "EXAM_LOG", default_value = "info", global = true)]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in (registering on first use) and show the landing page.
    Login {
        #[command(flatten)]
        auth: AuthArgs,

        /// Role for a new account. Existing accounts keep their stored role.
        #[arg(long, value_enum, default_value = "student")]
        role: RoleArg,
    },

    /// Author and inspect exams (teachers).
    Exam {
        #[command(subcommand)]
        command: ExamCommand,
    },

    /// Show the dashboard for the signed-in account.
    Dashboard {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Take an exam in the terminal (students).
    Take {
        exam_id: String,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Show the latest result for an exam (students).
    Results {
        exam_id: String,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Insert the bundled sample exams.
    Seed,
}

#[derive(Debug, Subcommand)]
pub enum ExamCommand {
    /// Validate and save an exam draft from a TOML file.
    Create {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// List exams, most recent first.
    List {
        #[command(flatten)]
        auth: AuthArgs,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AuthArgs {
    #[arg(long, env = "EXAM_EMAIL")]
    pub email: String,

    #[arg(long, env = "EXAM_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeoutPolicyArg {
    Discard,
    Keep,
}

impl From<TimeoutPolicyArg> for TimeoutPolicy {
    fn from(arg: TimeoutPolicyArg) -> Self {
        match arg {
            TimeoutPolicyArg::Discard => TimeoutPolicy::DiscardSelection,
            TimeoutPolicyArg::Keep => TimeoutPolicy::KeepSelection,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Teacher,
    Student,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Teacher => Role::Teacher,
            RoleArg::Student => Role::Student,
        }
    }
}
