/// Format a float as a currency amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    // Absurdly long digit runs in OCR text can overflow the parse to
    // infinity; non-finite values have no cents to format.
    if !val.is_finite() {
        return format!("${val}");
    }

    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    format!("{sign}${with_commas}.{dec_part}")
}

/// Human-readable byte size for the status display.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(116.0), "$116.00");
        assert_eq!(money(1800.5), "$1,800.50");
        assert_eq!(money(2543870.99), "$2,543,870.99");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(-450.0), "-$450.00");
    }

    #[test]
    fn test_money_handles_non_finite_values() {
        assert_eq!(money(f64::INFINITY), "$inf");
        assert_eq!(money(f64::NEG_INFINITY), "$-inf");
    }

    #[test]
    fn test_money_formats_overflowed_extracted_total() {
        // A money-shaped token too long for f64 parses to infinity in the
        // unlabeled-total fallback; formatting it must not panic.
        let text = format!("{}.99", "9".repeat(400));
        let total = crate::extractor::extract(&text).total.unwrap();
        assert!(total.is_infinite());
        assert_eq!(money(total), "$inf");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
