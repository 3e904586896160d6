use exam_core::model::ExamResult;

pub const EXCELLENT_MESSAGE: &str = "Excellent work! You're a superstar!";
pub const GREAT_MESSAGE: &str = "Great job! Keep it up!";
pub const GOOD_EFFORT_MESSAGE: &str = "Good effort!";

/// Encouragement for a score, by integer threshold so 9/10 counts as 90 %.
#[must_use]
pub fn score_message(correct: u32, total: u32) -> &'static str {
    let scaled = u64::from(correct) * 100;
    let total = u64::from(total);
    if total > 0 && scaled >= 90 * total {
        EXCELLENT_MESSAGE
    } else if total > 0 && scaled >= 75 * total {
        GREAT_MESSAGE
    } else {
        GOOD_EFFORT_MESSAGE
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultVm {
    pub exam_title: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: f64,
    pub score_label: String,
    pub message: &'static str,
    pub unanswered: usize,
}

impl From<&ExamResult> for ResultVm {
    fn from(result: &ExamResult) -> Self {
        Self {
            exam_title: result.exam_title().to_owned(),
            correct: result.correct(),
            total: result.total(),
            percentage: result.percentage(),
            score_label: format!("{} / {}", result.correct(), result.total()),
            message: score_message(result.correct(), result.total()),
            unanswered: result.unanswered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Exam, ExamId, ExamSchedule, Question};
    use exam_core::time::fixed_now;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(score_message(9, 10), EXCELLENT_MESSAGE);
        assert_eq!(score_message(8, 10), GREAT_MESSAGE);
        assert_eq!(score_message(3, 4), GREAT_MESSAGE);
        assert_eq!(score_message(7, 10), GOOD_EFFORT_MESSAGE);
        assert_eq!(score_message(0, 0), GOOD_EFFORT_MESSAGE);
    }

    #[test]
    fn maps_graded_result() {
        let q = |c| Question::new("Q", vec!["a".into(), "b".into()], c).unwrap();
        let exam = Exam::new(
            ExamId::new("x").unwrap(),
            "Math",
            "Mr. Davison",
            ExamSchedule::new("", ""),
            30,
            vec![q(1), q(1), q(0)],
            fixed_now(),
        )
        .unwrap();
        let result = ExamResult::grade(&exam, &[Some(1), None, Some(1)], fixed_now()).unwrap();
        let vm = ResultVm::from(&result);
        assert_eq!(vm.score_label, "1 / 3");
        assert_eq!(vm.message, GOOD_EFFORT_MESSAGE);
        assert_eq!(vm.unanswered, 1);
    }
}
