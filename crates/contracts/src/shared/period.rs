//! Period tokens and local-calendar date ranges.
//!
//! All dates here are calendar dates on the viewer's wall clock. Instants
//! coming from the store are UTC and are converted with [`local_date`]
//! before any bucketing, so a sale made at 23:30 local time lands on the
//! local day even when UTC has already rolled over.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

const MONTHS_IT: [&str; 12] = [
    "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Periodo sconosciuto: {0}")]
    UnknownToken(String),
    #[error("Il numero di giorni deve essere maggiore di zero")]
    EmptyLastDays,
    #[error("Seleziona data di inizio e di fine")]
    MissingBound,
    #[error("Data non valida: {0}")]
    InvalidDate(String),
    #[error("La data di inizio {start} è successiva alla data di fine {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Kind of period selected in a filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodKind {
    Today,
    Yesterday,
    LastDays { days: u32 },
    MonthToDate,
    YearToDate,
    /// Bounds as typed by the user (`YYYY-MM-DD`), validated on resolve
    Custom { start: String, end: String },
}

impl PeriodKind {
    pub fn last_days(days: u32) -> Self {
        PeriodKind::LastDays { days }
    }

    pub fn custom(start: impl Into<String>, end: impl Into<String>) -> Self {
        PeriodKind::Custom {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Value used by `<select>` controls
    pub fn token(&self) -> String {
        match self {
            PeriodKind::Today => "today".to_string(),
            PeriodKind::Yesterday => "yesterday".to_string(),
            PeriodKind::LastDays { days } => days.to_string(),
            PeriodKind::MonthToDate => "month".to_string(),
            PeriodKind::YearToDate => "year".to_string(),
            PeriodKind::Custom { .. } => "custom".to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            PeriodKind::Today => "Oggi".to_string(),
            PeriodKind::Yesterday => "Ieri".to_string(),
            PeriodKind::LastDays { days } => format!("Ultimi {} giorni", days),
            PeriodKind::MonthToDate => "Questo mese".to_string(),
            PeriodKind::YearToDate => "Quest'anno".to_string(),
            PeriodKind::Custom { .. } => "Personalizzato".to_string(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PeriodKind::Custom { .. })
    }
}

impl FromStr for PeriodKind {
    type Err = PeriodError;

    /// Parses every token except `custom`, which needs its bounds
    /// (see [`PeriodKind::custom`]).
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim() {
            "today" => Ok(PeriodKind::Today),
            "yesterday" => Ok(PeriodKind::Yesterday),
            "month" => Ok(PeriodKind::MonthToDate),
            "year" => Ok(PeriodKind::YearToDate),
            other => match other.parse::<u32>() {
                Ok(0) => Err(PeriodError::EmptyLastDays),
                Ok(days) => Ok(PeriodKind::LastDays { days }),
                Err(_) => Err(PeriodError::UnknownToken(other.to_string())),
            },
        }
    }
}

/// Inclusive range of local calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Number of calendar days in the range (both ends included)
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every calendar date in the range, oldest first
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        let count = self.len_days().max(0);
        (0..count).map(move |offset| start + Duration::days(offset))
    }

    /// Half-open UTC window `[start 00:00 local, (end + 1) 00:00 local)`
    pub fn utc_bounds<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            local_midnight_utc(self.start, tz),
            local_midnight_utc(self.end + Duration::days(1), tz),
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", day_key(self.start))
        } else {
            write!(f, "{} → {}", day_key(self.start), day_key(self.end))
        }
    }
}

/// A period selection together with its resolved date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    pub kind: PeriodKind,
    pub range: DateRange,
}

impl PeriodFilter {
    /// Resolve a period kind against the viewer's current local date
    pub fn resolve(kind: PeriodKind, today: NaiveDate) -> Result<Self, PeriodError> {
        let range = match &kind {
            PeriodKind::Today => DateRange::single(today),
            PeriodKind::Yesterday => DateRange::single(today - Duration::days(1)),
            PeriodKind::LastDays { days } => {
                if *days == 0 {
                    return Err(PeriodError::EmptyLastDays);
                }
                DateRange {
                    start: today - Duration::days(i64::from(*days) - 1),
                    end: today,
                }
            }
            PeriodKind::MonthToDate => DateRange {
                start: first_day_of_month(today),
                end: today,
            },
            PeriodKind::YearToDate => DateRange {
                start: first_day_of_year(today),
                end: today,
            },
            PeriodKind::Custom { start, end } => {
                if start.trim().is_empty() || end.trim().is_empty() {
                    return Err(PeriodError::MissingBound);
                }
                DateRange::new(parse_day(start)?, parse_day(end)?)?
            }
        };
        Ok(Self { kind, range })
    }
}

/// Wall-clock calendar date of a UTC instant in the given zone
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// UTC instant of local midnight on `day`.
///
/// When midnight does not exist locally (DST gap) the day is treated as UTC.
pub fn local_midnight_utc<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let naive = day.and_hms_opt(0, 0, 0).unwrap_or_default();
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

pub fn first_day_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub fn first_day_of_year(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day)
}

pub fn parse_day(s: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| PeriodError::InvalidDate(s.to_string()))
}

/// Bucket key for a day: `YYYY-MM-DD`
pub fn day_key(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Chart axis label: `01 giu`
pub fn short_label(day: NaiveDate) -> String {
    format!("{:02} {}", day.day(), MONTHS_IT[day.month0() as usize])
}

/// Timestamp literal used in store filters: `2024-06-01T04:00:00Z`
pub fn timestamp_value(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
