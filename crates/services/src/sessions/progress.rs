/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of questions already recorded, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.answered as f64 / self.total as f64;
        ratio.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_handles_empty_and_partial() {
        let empty = SessionProgress {
            total: 0,
            answered: 0,
            remaining: 0,
            is_complete: false,
        };
        assert!(empty.fraction().abs() < f64::EPSILON);

        let half = SessionProgress {
            total: 4,
            answered: 2,
            remaining: 2,
            is_complete: false,
        };
        assert!((half.fraction() - 0.5).abs() < f64::EPSILON);
    }
}
