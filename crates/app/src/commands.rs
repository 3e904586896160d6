use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use exam_core::model::{ExamDraft, ExamId, Role};
use services::AppServices;
use tokio::io::BufReader;
use ui::vm::{
    ResultVm, StudentExamCardVm, TeacherExamRowVm, format_datetime, load_student_dashboard,
    map_teacher_dashboard, start_exam, submit_draft,
};
use ui::{AppContext, Route, ViewError};

use crate::cli::AuthArgs;
use crate::terminal::{ExamOutcome, render_result, run_exam};

fn view_error(err: &ViewError) -> anyhow::Error {
    anyhow::anyhow!(err.message())
}

fn parse_exam_id(raw: &str) -> anyhow::Result<ExamId> {
    ExamId::new(raw).with_context(|| format!("invalid exam id: {raw}"))
}

async fn sign_in(ctx: &AppContext, auth: &AuthArgs, requested: Role) -> anyhow::Result<Route> {
    let signed = ctx
        .auth()
        .sign_in_or_register(&auth.email, &auth.password, requested)
        .await?;
    if signed.registered {
        println!("Registered {} as a {}.", signed.account.email(), signed.role());
    }
    Ok(ctx.sign_in(signed.account))
}

/// Sign in and make sure the account may open `route`.
async fn open(ctx: &AppContext, auth: &AuthArgs, route: Route) -> anyhow::Result<()> {
    let requested = route.required_role().unwrap_or(Role::Student);
    sign_in(ctx, auth, requested).await?;
    let resolved = ctx.resolve(route.clone());
    if resolved != route {
        bail!("{route} is not available to this account; try {resolved}");
    }
    Ok(())
}

//
// ─── LOGIN / DASHBOARD ─────────────────────────────────────────────────────────
//

pub async fn login(ctx: &AppContext, auth: &AuthArgs, role: Role) -> anyhow::Result<()> {
    let landing = sign_in(ctx, auth, role).await?;
    println!("Signed in. Landing page: {landing}");
    show_dashboard(ctx, &landing).await
}

pub async fn dashboard(ctx: &AppContext, auth: &AuthArgs) -> anyhow::Result<()> {
    let landing = sign_in(ctx, auth, Role::Student).await?;
    show_dashboard(ctx, &landing).await
}

async fn show_dashboard(ctx: &AppContext, landing: &Route) -> anyhow::Result<()> {
    match landing {
        Route::TeacherDashboard => {
            let exams = ctx.exams().list_exams().await?;
            print_teacher_rows(&map_teacher_dashboard(&exams));
        }
        _ => {
            let cards =
                load_student_dashboard(&ctx.exams(), &ctx.results(), ctx.clock().now())
                    .await
                    .map_err(|err| view_error(&err))?;
            print_student_cards(&cards);
        }
    }
    Ok(())
}

fn print_teacher_rows(rows: &[TeacherExamRowVm]) {
    if rows.is_empty() {
        println!("No exams yet. Create one with `exam create --file <draft.toml>`.");
        return;
    }
    for row in rows {
        println!(
            "{}  {} | {} | {}s per question | {} | created {}",
            row.exam_id,
            row.title,
            row.questions_label,
            row.seconds_per_question,
            row.window_label,
            row.created_at_str
        );
    }
}

fn print_student_cards(cards: &[StudentExamCardVm]) {
    if cards.is_empty() {
        println!("No exams available.");
        return;
    }
    for card in cards {
        let mut line = format!(
            "{}  {} | {} | {} | {}",
            card.exam_id,
            card.title,
            card.created_by,
            card.questions_label,
            card.status.label()
        );
        if let Some(score) = &card.score_label {
            line.push_str(&format!(" | {score}"));
        }
        if let Some(action) = &card.action {
            line.push_str(&format!(" -> {action}"));
        }
        println!("{line}");
    }
}

//
// ─── EXAMS ─────────────────────────────────────────────────────────────────────
//

pub fn read_draft(path: &Path) -> anyhow::Result<ExamDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub async fn create_exam(ctx: &AppContext, auth: &AuthArgs, file: &Path) -> anyhow::Result<()> {
    open(ctx, auth, Route::NewExam).await?;
    let draft = read_draft(file)?;
    match submit_draft(&ctx.builder(), &draft).await {
        Ok(id) => {
            println!("Saved exam {id}.");
            Ok(())
        }
        Err(failure) => {
            for field in &failure.fields {
                eprintln!("  {}: {}", field.label, field.message);
            }
            Err(view_error(&failure.error))
        }
    }
}

pub async fn list_exams(ctx: &AppContext, auth: &AuthArgs) -> anyhow::Result<()> {
    open(ctx, auth, Route::TeacherDashboard).await?;
    let exams = ctx.exams().list_exams().await?;
    print_teacher_rows(&map_teacher_dashboard(&exams));
    Ok(())
}

//
// ─── TAKING / RESULTS ──────────────────────────────────────────────────────────
//

pub async fn take(ctx: &AppContext, auth: &AuthArgs, exam_id: &str) -> anyhow::Result<()> {
    let exam_id = parse_exam_id(exam_id)?;
    open(ctx, auth, Route::TakeExam {
        exam_id: exam_id.clone(),
    })
    .await?;

    let attempts = ctx.attempts();
    let mut vm = start_exam(&attempts, &exam_id, ctx.tick_period())
        .await
        .map_err(|err| view_error(&err))?;
    println!("Pick an option number, then press Enter to confirm. `q` quits.");

    let mut stdout = std::io::stdout();
    let outcome = run_exam(&mut vm, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
    match outcome {
        ExamOutcome::Finished => {
            let submitted = vm.submit(&attempts).await.map_err(|err| view_error(&err))?;
            print!("{}", render_result(&ResultVm::from(&submitted.result)));
            println!("See it again with: results {}", submitted.result.exam_id());
        }
        ExamOutcome::Abandoned => println!("Exam abandoned; nothing was saved."),
    }
    stdout.flush()?;
    Ok(())
}

pub async fn results(ctx: &AppContext, auth: &AuthArgs, exam_id: &str) -> anyhow::Result<()> {
    let exam_id = parse_exam_id(exam_id)?;
    open(ctx, auth, Route::Results {
        exam_id: exam_id.clone(),
    })
    .await?;

    let Some(stored) = ctx.results().latest_for_exam(&exam_id).await? else {
        println!("No result for {exam_id} yet.");
        return Ok(());
    };
    print!("{}", render_result(&ResultVm::from(&stored.result)));
    println!("Submitted {}", format_datetime(stored.result.submitted_at()));
    Ok(())
}

//
// ─── SEED ──────────────────────────────────────────────────────────────────────
//

pub async fn seed(services: &AppServices) -> anyhow::Result<()> {
    let seeded = services.seed_samples().await?;
    for (id, draft) in &seeded {
        println!("Seeded {id}  {}", draft.title);
    }
    Ok(())
}
