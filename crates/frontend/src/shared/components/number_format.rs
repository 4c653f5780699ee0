//! Number formatting for amounts and counters

/// Amount with two decimals and the euro sign, as used across the tables
///
/// ```
/// # use frontend::shared::components::number_format::format_euro;
/// assert_eq!(format_euro(15.0), "€15.00");
/// ```
pub fn format_euro(value: f64) -> String {
    format!("€{:.2}", value)
}

/// Amount in the row's own currency (`EUR` -> `€`, unknown codes are appended)
pub fn format_amount(value: f64, currency: &str) -> String {
    match currency {
        "EUR" => format_euro(value),
        "USD" => format!("${:.2}", value),
        "GBP" => format!("£{:.2}", value),
        other => format!("{:.2} {}", value, other),
    }
}

/// Integer with a non-breaking space every three digits
pub fn format_thousands(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('\u{00a0}');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Share of `value` in `total` with one decimal ("33.3%"); "0.0%" for an empty total
pub fn format_share(value: f64, total: f64) -> String {
    if total <= 0.0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", value / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amounts() {
        assert_eq!(format_euro(15.0), "€15.00");
        assert_eq!(format_euro(7.005), "€7.00");
        assert_eq!(format_amount(3.5, "USD"), "$3.50");
        assert_eq!(format_amount(3.5, "CHF"), "3.50 CHF");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1234567), "1\u{00a0}234\u{00a0}567");
        assert_eq!(format_thousands(-1000), "-1\u{00a0}000");
        assert_eq!(format_thousands(12), "12");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(5.0, 15.0), "33.3%");
        assert_eq!(format_share(5.0, 0.0), "0.0%");
    }
}
