/// Format a number for display: rounded to the nearest integer with
/// thousands separators.
pub fn format_number(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    if rounded < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_small_numbers() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(999.0), "999");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(47_450_795.0), "47,450,795");
        assert_eq!(format_number(1_400_000_000.0), "1,400,000,000");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(format_number(1234.4), "1,234");
        assert_eq!(format_number(1234.5), "1,235");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_number(-1234.0), "-1,234");
        assert_eq!(format_number(-12.0), "-12");
    }
}
