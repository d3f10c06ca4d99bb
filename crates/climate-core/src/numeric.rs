//! Decimal rounding helpers shared by the scoring stages

/// Round to `places` decimal places, ties to even.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round_ties_even() / factor;
    // Collapse -0.0 so output stays stable
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Render an already-rounded value the way it appears in report text:
/// whole numbers keep one trailing decimal (`32.0`), others print shortest.
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(57.14, 0), 57.0);
        assert_eq!(round_to(12.345, 1), 12.3);
    }

    #[test]
    fn test_round_ties_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
    }

    #[test]
    fn test_negative_zero_collapses() {
        let value = round_to(-0.00001, 1);
        assert!(value.is_sign_positive());
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(32.0), "32.0");
        assert_eq!(format_decimal(31.4), "31.4");
        assert_eq!(format_decimal(450.0), "450.0");
    }
}
