use crate::domain::a001_platform::{PlatformId, PlatformRef};
use crate::shared::period::local_date;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bucket name used when a row has no platform (or product) attached
pub const UNKNOWN_KEY: &str = "Unknown";

/// Sale id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(pub Uuid);

impl SaleId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
    pub fn value(&self) -> Uuid {
        self.0
    }
}

/// One row of the `sales` table
///
/// Rows are immutable once inserted; the client only ever holds copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,

    /// Platform reference (platforms.id)
    #[serde(default)]
    pub platform_id: Option<PlatformId>,

    #[serde(default)]
    pub product_name: Option<String>,

    /// Sale amount, two decimal places
    pub amount: f64,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Time of sale (UTC)
    pub sale_date: DateTime<Utc>,

    /// Embedded `platforms(name)` join, absent when not requested
    #[serde(default, rename = "platforms", skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformRef>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Sale {
    /// Platform name from the embedded join, or `Unknown`
    pub fn platform_name(&self) -> &str {
        self.platform
            .as_ref()
            .map(|p| p.name.as_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_KEY)
    }

    pub fn product_label(&self) -> &str {
        self.product_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_KEY)
    }

    /// Calendar day of the sale as seen on the viewer's wall clock
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        local_date(&self.sale_date, tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_with_embedded_platform() {
        let json = r#"{
            "id": "0b7d0f38-6f0e-4a52-9e55-3f2b5d1b7c01",
            "platform_id": "6f1c1c8e-7a43-4d4c-9d1c-0d3f1f6b2a11",
            "product_name": "Dragon Miniature",
            "amount": 12.5,
            "currency": "EUR",
            "sale_date": "2024-06-01T21:30:00+00:00",
            "platforms": { "name": "Cults3D" }
        }"#;
        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.platform_name(), "Cults3D");
        assert_eq!(sale.product_label(), "Dragon Miniature");
        assert_eq!(sale.amount, 12.5);
    }

    #[test]
    fn test_sale_without_join_falls_back_to_unknown() {
        let json = r#"{
            "id": "0b7d0f38-6f0e-4a52-9e55-3f2b5d1b7c01",
            "platform_id": null,
            "product_name": null,
            "amount": 3.0,
            "sale_date": "2024-06-01T10:00:00Z"
        }"#;
        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.platform_name(), UNKNOWN_KEY);
        assert_eq!(sale.product_label(), UNKNOWN_KEY);
        assert_eq!(sale.currency, "EUR");
    }
}
