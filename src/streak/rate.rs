//! Stage-weighted "success rate".
//!
//! A presentational score derived from the current streak alone, not a
//! probability. Each stage contributes its weight in proportion to how far the
//! streak has progressed through it.

struct Stage {
    max: u32,
    weight: f64,
}

const STAGES: [Stage; 5] = [
    Stage { max: 7, weight: 0.10 },
    Stage { max: 21, weight: 0.20 },
    Stage { max: 45, weight: 0.30 },
    Stage { max: 90, weight: 0.25 },
    Stage { max: 180, weight: 0.15 },
];

/// Success rate as a whole percentage in `0..=100`.
pub fn calculate_success_rate(streak: u32) -> u32 {
    let mut rate = 0.0;
    let mut previous_max = 0;

    for stage in &STAGES {
        if streak >= stage.max {
            rate += stage.weight;
            previous_max = stage.max;
        } else {
            let progress = f64::from(streak - previous_max) / f64::from(stage.max - previous_max);
            rate += stage.weight * progress;
            break;
        }
    }

    ((rate * 100.0).round() as u32).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_streak_is_zero() {
        assert_eq!(calculate_success_rate(0), 0);
    }

    #[test]
    fn stage_boundaries() {
        assert_eq!(calculate_success_rate(7), 10);
        assert_eq!(calculate_success_rate(21), 30);
        assert_eq!(calculate_success_rate(45), 60);
        assert_eq!(calculate_success_rate(90), 85);
        assert_eq!(calculate_success_rate(180), 100);
    }

    #[test]
    fn partial_stage_is_proportional() {
        // 10 + 20 + 30 * (22 - 21) / (45 - 21) = 31.25
        assert_eq!(calculate_success_rate(22), 31);
        // 10 * 3 / 7 = 4.28
        assert_eq!(calculate_success_rate(3), 4);
    }

    #[test]
    fn saturates_at_one_hundred() {
        for streak in [180, 181, 365, 1000, u32::MAX] {
            assert_eq!(calculate_success_rate(streak), 100);
        }
    }

    #[test]
    fn monotonically_non_decreasing() {
        let mut last = 0;
        for streak in 0..=400 {
            let rate = calculate_success_rate(streak);
            assert!(rate >= last, "rate dropped at streak {streak}: {rate} < {last}");
            assert!(rate <= 100);
            last = rate;
        }
    }
}
