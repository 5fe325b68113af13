//! Small arithmetic helpers shared by the comparison and indicator code.

/// Arithmetic mean. Returns 0.0 if the slice is empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// (current − previous) / previous × 100, or exactly 0.0 when previous is 0.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// part / whole × 100, or 0.0 when whole is 0.
pub fn share_pct(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_known() {
        // (2 + 4 + 6) / 3 = 4.0
        assert!((mean(&[2.0, 4.0, 6.0]) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_percent_change_zero_previous() {
        assert_eq!(percent_change(123.0, 0.0), 0.0);
        assert_eq!(percent_change(-5.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_percent_change_known() {
        assert_eq!(percent_change(200.0, 100.0), 100.0);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
        // 4.2 vs 4.1 ≈ 2.439%
        assert!((percent_change(4.2, 4.1) - 2.439).abs() < 1e-3);
    }

    #[test]
    fn test_share_pct() {
        assert_eq!(share_pct(1.0, 4.0), 25.0);
        assert_eq!(share_pct(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(86.04), 86.0);
        assert_eq!(round1(2.449), 2.4);
    }
}
