use crate::shared::period::PeriodKind;
use serde::{Deserialize, Serialize};

/// Row counts offered by the "recent sales" selector
pub const RECENT_SALES_LIMITS: [u64; 3] = [5, 10, 20];
pub const MAX_RECENT_SALES: u64 = 20;

/// How a KPI card formats its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueFormat {
    Money { currency: String },
    Percent { decimals: u8 },
    Integer,
}

impl ValueFormat {
    pub fn euro() -> Self {
        ValueFormat::Money {
            currency: "€".to_string(),
        }
    }
}

/// Visual status of a KPI card (drives colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorStatus {
    Good,
    Bad,
    Neutral,
}

impl IndicatorStatus {
    /// More than ±5% counts as a real move
    pub fn by_change(change: Option<f64>) -> Self {
        match change {
            Some(c) if c > 5.0 => IndicatorStatus::Good,
            Some(c) if c < -5.0 => IndicatorStatus::Bad,
            _ => IndicatorStatus::Neutral,
        }
    }
}

/// Filters of the overview page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewFilter {
    /// Platform id; `None` = all platforms
    pub platform_id: Option<String>,
    /// Period of the trend chart
    pub trend_period: PeriodKind,
    pub recent_limit: u64,
}

impl Default for OverviewFilter {
    fn default() -> Self {
        Self {
            platform_id: None,
            trend_period: PeriodKind::last_days(7),
            recent_limit: RECENT_SALES_LIMITS[0],
        }
    }
}

impl OverviewFilter {
    pub fn with_recent_limit(mut self, limit: u64) -> Self {
        self.recent_limit = clamp_recent_limit(limit);
        self
    }
}

pub fn clamp_recent_limit(limit: u64) -> u64 {
    limit.clamp(1, MAX_RECENT_SALES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_limit_is_capped() {
        assert_eq!(OverviewFilter::default().recent_limit, 5);
        assert_eq!(OverviewFilter::default().with_recent_limit(50).recent_limit, 20);
        assert_eq!(clamp_recent_limit(0), 1);
    }

    #[test]
    fn test_status_threshold() {
        assert_eq!(IndicatorStatus::by_change(Some(12.0)), IndicatorStatus::Good);
        assert_eq!(IndicatorStatus::by_change(Some(-3.0)), IndicatorStatus::Neutral);
        assert_eq!(IndicatorStatus::by_change(None), IndicatorStatus::Neutral);
    }
}
