//! Date and time formatting for tables and cards
//!
//! Sale instants are stored in UTC and always shown in the viewer's zone.

use chrono::{DateTime, TimeZone, Utc};

/// Format an instant as DD/MM/YYYY in `tz`
/// Example: 2024-06-15T22:30:00Z in UTC+2 -> "16/06/2024"
pub fn format_date<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%d/%m/%Y").to_string()
}

/// Format an instant as HH:MM in `tz`
pub fn format_time<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%H:%M").to_string()
}

/// Format an instant as DD/MM/YYYY HH:MM in `tz`
pub fn format_datetime<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%d/%m/%Y %H:%M").to_string()
}

/// Format an ISO date string coming from a summary view to DD/MM/YYYY
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15/03/2024"
pub fn format_iso_date(date_str: &str) -> String {
    let date_part = date_str.split(['T', ' ']).next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}/{}/{}", day, month, year);
        }
    }
    date_str.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_in_viewer_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 15, 22, 30, 0).unwrap();
        let rome = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_date(&instant, &rome), "16/06/2024");
        assert_eq!(format_time(&instant, &rome), "00:30");
        assert_eq!(format_datetime(&instant, &Utc), "15/06/2024 22:30");
    }

    #[test]
    fn test_format_iso_date() {
        assert_eq!(format_iso_date("2024-03-15"), "15/03/2024");
        assert_eq!(format_iso_date("2024-03-15T14:02:26.123Z"), "15/03/2024");
        assert_eq!(format_iso_date("invalid"), "invalid");
    }
}
