use std::io::Write;

use anyhow::Context;
use services::Transition;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use ui::vm::{ExamIntent, ExamScreenVm, ExamVm, OptionState, ResultVm};

/// How the interactive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamOutcome {
    Finished,
    /// The student quit before the last question; nothing is saved.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Intent(ExamIntent),
    /// Bare Enter: whatever the primary button says.
    Primary,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "" => Input::Primary,
        "c" | "confirm" => Input::Intent(ExamIntent::Confirm),
        "n" | "next" | "f" | "finish" => Input::Intent(ExamIntent::Continue),
        "q" | "quit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Intent(ExamIntent::Select(n - 1)),
            _ => Input::Unknown,
        },
    }
}

fn option_marker(state: OptionState) -> &'static str {
    match state {
        OptionState::Idle => "  ",
        OptionState::Selected => "> ",
        OptionState::Correct => "✓ ",
        OptionState::Wrong => "✗ ",
    }
}

#[must_use]
pub fn render_screen(screen: &ExamScreenVm) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n== {} ==\n{}\n", screen.title, screen.created_by));
    out.push_str(&format!(
        "{}   [{}]\n\n{}\n",
        screen.question_label, screen.time_label, screen.question_text
    ));
    for option in &screen.options {
        out.push_str(&format!(
            "{}{}. {}\n",
            option_marker(option.state),
            option.index + 1,
            option.text
        ));
    }
    if let Some(feedback) = &screen.feedback {
        out.push_str(&format!("\n{feedback}\n"));
    }
    let disabled = if screen.primary.enabled() {
        ""
    } else {
        " (pick an option first)"
    };
    out.push_str(&format!("\n[Enter] {}{disabled}\n", screen.primary.label()));
    out
}

#[must_use]
pub fn render_result(result: &ResultVm) -> String {
    let mut out = format!(
        "\n{}\nScore: {} ({:.0}%)\n{}\n",
        result.exam_title, result.score_label, result.percentage, result.message
    );
    if result.unanswered > 0 {
        out.push_str(&format!("Unanswered: {}\n", result.unanswered));
    }
    out
}

fn show_screen(vm: &ExamVm, out: &mut impl Write) -> anyhow::Result<()> {
    if let Some(screen) = vm.screen() {
        out.write_all(render_screen(&screen).as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn report(vm: &ExamVm, transition: Transition, out: &mut impl Write) -> anyhow::Result<()> {
    match transition {
        Transition::Ignored => writeln!(out, "That isn't available right now.")?,
        Transition::Ticked { time_left } => {
            if time_left % 10 == 0 || time_left <= 5 {
                writeln!(out, "  {time_left}s left")?;
            }
        }
        Transition::TimedOut { .. } => {
            writeln!(out, "Time's up!")?;
            show_screen(vm, out)?;
        }
        Transition::Selected { .. } | Transition::Locked { .. } | Transition::Advanced { .. } => {
            show_screen(vm, out)?;
        }
        Transition::Finished => {}
    }
    out.flush()?;
    Ok(())
}

/// Run one exam against line input, with the timer ticking alongside.
///
/// Once `input` is exhausted the remaining questions run out on their own.
///
/// # Errors
///
/// Fails only on I/O errors.
pub async fn run_exam<R, W>(vm: &mut ExamVm, input: R, out: &mut W) -> anyhow::Result<ExamOutcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut input_open = true;
    show_screen(vm, out)?;

    while !vm.is_finished() {
        let timer_running = vm.is_timer_running();
        if !input_open && !timer_running {
            let transition = vm.apply(ExamIntent::Continue);
            report(vm, transition, out)?;
            continue;
        }

        tokio::select! {
            tick = vm.next_tick(), if timer_running => {
                if let Some(transition) = tick {
                    report(vm, transition, out)?;
                }
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line.context("reading input")? else {
                    input_open = false;
                    continue;
                };
                let intent = match parse_input(&line) {
                    Input::Intent(intent) => intent,
                    Input::Primary => match vm.screen() {
                        Some(screen) => screen.primary.intent(),
                        None => continue,
                    },
                    Input::Quit => return Ok(ExamOutcome::Abandoned),
                    Input::Unknown => {
                        writeln!(out, "Type an option number, Enter to continue, or q to quit.")?;
                        continue;
                    }
                };
                let transition = vm.apply(intent);
                report(vm, transition, out)?;
            }
        }
    }

    Ok(ExamOutcome::Finished)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use exam_core::model::{Exam, ExamId, ExamSchedule, Question};
    use exam_core::time::fixed_now;
    use services::{ExamSession, TimeoutPolicy};

    fn vm() -> ExamVm {
        let q = |text: &str, correct| {
            Question::new(text, vec!["1".into(), "2".into(), "3".into(), "4".into()], correct)
                .unwrap()
        };
        let exam = Exam::new(
            ExamId::new("math-1").unwrap(),
            "Math Basics - Chapter 1",
            "Mr. Davison",
            ExamSchedule::new("", ""),
            5,
            vec![q("2 - 1?", 0), q("1 + 1?", 1), q("1 + 2?", 2)],
            fixed_now(),
        )
        .unwrap();
        let session = ExamSession::new(exam, TimeoutPolicy::default()).unwrap();
        ExamVm::new(session, Duration::from_secs(1))
    }

    #[test]
    fn parses_inputs() {
        assert_eq!(parse_input("2"), Input::Intent(ExamIntent::Select(1)));
        assert_eq!(parse_input(" C "), Input::Intent(ExamIntent::Confirm));
        assert_eq!(parse_input(""), Input::Primary);
        assert_eq!(parse_input("0"), Input::Unknown);
        assert_eq!(parse_input("q"), Input::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_questions_time_out_after_input_ends() {
        let mut vm = vm();
        let mut out = Vec::new();
        let outcome = run_exam(&mut vm, &b"1\n\n\n"[..], &mut out).await.unwrap();

        assert_eq!(outcome, ExamOutcome::Finished);
        assert_eq!(vm.session().answers(), &[Some(0), None, None]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Correct!"));
        assert!(text.contains("Time's up!"));
        assert!(text.contains("Question 3 / 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn quitting_abandons_the_attempt() {
        let mut vm = vm();
        let mut out = Vec::new();
        let outcome = run_exam(&mut vm, &b"2\nq\n"[..], &mut out).await.unwrap();
        assert_eq!(outcome, ExamOutcome::Abandoned);
        assert!(!vm.is_finished());
    }
}
