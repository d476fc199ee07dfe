use chrono::{Duration, NaiveTime};

/// Remaining time as "Xj Ym" (jam/menit). Seconds are dropped, never rounded.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{}j {}m", hours, minutes)
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Volume as a ten-step bar, e.g. "███████░░░".
pub fn volume_bar(volume: f32, width: usize) -> String {
    let filled = ((volume.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_floors() {
        assert_eq!(format_countdown(Duration::seconds(7 * 3600 + 59 * 60 + 59)), "7j 59m");
        assert_eq!(format_countdown(Duration::seconds(59)), "0j 0m");
        assert_eq!(format_countdown(Duration::minutes(61)), "1j 1m");
        assert_eq!(format_countdown(Duration::seconds(-5)), "0j 0m");
    }

    #[test]
    fn time_is_zero_padded() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(4, 5, 59).unwrap()), "04:05");
    }

    #[test]
    fn volume_bar_widths() {
        assert_eq!(volume_bar(0.7, 10), "███████░░░");
        assert_eq!(volume_bar(1.5, 4), "████");
        assert_eq!(volume_bar(0.0, 3), "░░░");
    }
}
