/// Render a signed second count as `[-]HH:MM:SS`.
///
/// Hours are padded to two digits but never truncated, so 100 hours renders
/// as `100:00:00`.
pub fn format_hms(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{sign}{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(rendered: &str) -> (bool, u64) {
        let negative = rendered.starts_with('-');
        let body = rendered.trim_start_matches('-');
        let parts: Vec<u64> = body.split(':').map(|p| p.parse().unwrap()).collect();
        assert_eq!(parts.len(), 3);
        (negative, parts[0] * 3600 + parts[1] * 60 + parts[2])
    }

    #[test]
    fn pads_small_values() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(5), "00:00:05");
        assert_eq!(format_hms(95), "00:01:35");
        assert_eq!(format_hms(3661), "01:01:01");
    }

    #[test]
    fn negative_values_carry_sign() {
        assert_eq!(format_hms(-2), "-00:00:02");
        assert_eq!(format_hms(-3600), "-01:00:00");
    }

    #[test]
    fn hours_widen_past_two_digits() {
        assert_eq!(format_hms(360_000), "100:00:00");
        assert_eq!(format_hms(359_999), "99:59:59");
    }

    #[test]
    fn sign_and_magnitude_reconstruct_input() {
        for s in [-359_999, -86_400, -61, -1, 0, 1, 59, 60, 3599, 3600, 86_399, 1_000_000] {
            let rendered = format_hms(s);
            let (negative, magnitude) = split(&rendered);
            assert_eq!(negative, s < 0, "sign of {s}");
            assert_eq!(magnitude, s.unsigned_abs(), "magnitude of {s}");
        }
    }

    #[test]
    fn handles_extreme_values() {
        assert!(format_hms(i64::MIN).starts_with('-'));
        assert!(!format_hms(i64::MAX).starts_with('-'));
    }
}
