//! Count-up counters for the "our impact" figures.

use std::time::Duration;

use crate::config::ImpactConfig;

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactCounter {
    pub id: &'static str,
    pub label: &'static str,
    pub target: u64,
}

impl ImpactCounter {
    pub fn frames(&self, duration: Duration) -> Vec<u64> {
        count_up_frames(self.target, duration)
    }
}

pub fn impact_counters(impact: &ImpactConfig) -> [ImpactCounter; 3] {
    [
        ImpactCounter {
            id: "cleanup-count",
            label: "Cleanups organised",
            target: impact.cleanups,
        },
        ImpactCounter {
            id: "volunteer-count",
            label: "Volunteers joined",
            target: impact.volunteers,
        },
        ImpactCounter {
            id: "trash-collected",
            label: "Kg of trash collected",
            target: impact.trash_kg,
        },
    ]
}

/// Values shown on each frame while counting from zero up to `target`.
///
/// Every frame adds `target / (duration / 16ms)`; the last frame is exactly
/// `target`.
pub fn count_up_frames(target: u64, duration: Duration) -> Vec<u64> {
    let steps = (duration.as_millis() / FRAME_INTERVAL.as_millis()) as f64;
    if target == 0 || steps == 0.0 {
        return vec![target];
    }
    let increment = target as f64 / steps;

    let mut frames = Vec::new();
    let mut current = 0.0_f64;
    loop {
        current += increment;
        if current >= target as f64 {
            frames.push(target);
            return frames;
        }
        frames.push(current.round() as u64);
    }
}

/// Group digits in threes, e.g. `5000` -> `"5,000"`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_end_exactly_on_target() {
        let frames = count_up_frames(150, DEFAULT_DURATION);

        assert_eq!(frames.last(), Some(&150));
        // 2000ms / 16ms = 125 steps, give or take float drift.
        let len = frames.len();
        assert!((124..=126).contains(&len), "got {len} frames");
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn zero_target_is_a_single_frame() {
        assert_eq!(count_up_frames(0, DEFAULT_DURATION), vec![0]);
    }

    #[test]
    fn duration_shorter_than_a_frame_jumps_to_target() {
        assert_eq!(count_up_frames(1200, Duration::from_millis(5)), vec![1200]);
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(150), "150");
        assert_eq!(format_count(1200), "1,200");
        assert_eq!(format_count(5000), "5,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn counters_follow_config() {
        let counters = impact_counters(&ImpactConfig::default());

        let targets: Vec<u64> = counters.iter().map(|c| c.target).collect();
        assert_eq!(targets, [150, 1200, 5000]);
        assert_eq!(counters[1].id, "volunteer-count");
    }
}
