use std::time::{Duration, Instant};

use log::info;

/// Formats a stage duration: seconds under two minutes, then minutes
/// under two hours, then hours.
pub fn format_human_elapsed(elapsed: Duration) -> String {
    let elapsed_secs = elapsed.as_secs();
    if elapsed_secs < 120 {
        format!("{}.{:03} seconds", elapsed_secs, elapsed.subsec_millis())
    } else if elapsed_secs < 2 * 60 * 60 {
        format!("{:.2} minutes", elapsed_secs as f64 / 60.0)
    } else {
        format!("{:.2} hours", elapsed_secs as f64 / 3600.0)
    }
}

/// Logs how long a pipeline stage took when dropped.
pub struct StageTimer {
    label: &'static str,
    started: Instant,
}

impl StageTimer {
    pub fn start(label: &'static str) -> Self {
        info!("{label}...");
        Self {
            label,
            started: Instant::now(),
        }
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        info!(
            "  {} completed in {}",
            self.label,
            format_human_elapsed(self.started.elapsed())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_durations_in_seconds() {
        assert_eq!(format_human_elapsed(Duration::from_millis(1_250)), "1.250 seconds");
        assert_eq!(format_human_elapsed(Duration::from_secs(119)), "119.000 seconds");
    }

    #[test]
    fn medium_durations_in_minutes() {
        assert_eq!(format_human_elapsed(Duration::from_secs(120)), "2.00 minutes");
        assert_eq!(format_human_elapsed(Duration::from_secs(90 * 60)), "90.00 minutes");
    }

    #[test]
    fn long_durations_in_hours() {
        assert_eq!(format_human_elapsed(Duration::from_secs(2 * 3600)), "2.00 hours");
        assert_eq!(format_human_elapsed(Duration::from_secs(9_000)), "2.50 hours");
    }
}
