// Utility functions shared across the scoring layers.

pub mod clock;
pub mod ids;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};

/// Clamp a score into the [0, 1] range every public surface guarantees.
pub fn clamp01(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Exponential time decay for age-based scoring: `exp(-age / scale)`.
pub fn time_decay(age_days: f64, scale_days: f64) -> f64 {
    if scale_days <= 0.0 {
        return 1.0;
    }
    (-age_days.max(0.0) / scale_days).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(0.42), 0.42);
    }

    #[test]
    fn test_time_decay() {
        assert!((time_decay(0.0, 30.0) - 1.0).abs() < 1e-9);
        // One scale period decays to 1/e.
        assert!((time_decay(30.0, 30.0) - (-1.0f64).exp()).abs() < 1e-9);
        // Future timestamps are treated as fresh, not amplified.
        assert_eq!(time_decay(-5.0, 30.0), 1.0);
    }
}
