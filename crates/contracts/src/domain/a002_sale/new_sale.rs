use crate::domain::a001_platform::PlatformId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currencies offered by the manual entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }

    pub fn all() -> Vec<Currency> {
        vec![Currency::Eur, Currency::Usd, Currency::Gbp]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EUR" => Some(Currency::Eur),
            "USD" => Some(Currency::Usd),
            "GBP" => Some(Currency::Gbp),
            _ => None,
        }
    }
}

/// Insert payload for the `sales` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub platform_id: PlatformId,
    pub product_name: String,
    pub amount: f64,
    pub currency: Currency,
    pub sale_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleValidationError {
    #[error("Seleziona una piattaforma")]
    MissingPlatform,
    #[error("Piattaforma non valida: {0}")]
    InvalidPlatform(String),
    #[error("Inserisci il nome del prodotto")]
    MissingProduct,
    #[error("Importo non valido: {0}")]
    InvalidAmount(String),
}

/// Raw values of the "add sale" form, as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSaleForm {
    pub platform_id: String,
    pub product_name: String,
    pub amount: String,
    pub currency: Currency,
}

impl NewSaleForm {
    /// Required-field validation; runs before any network call.
    ///
    /// Accepts both `12.50` and `12,50`. Zero, negative and non-numeric
    /// amounts are rejected.
    pub fn validate(&self, sale_date: DateTime<Utc>) -> Result<NewSale, SaleValidationError> {
        let platform_raw = self.platform_id.trim();
        if platform_raw.is_empty() {
            return Err(SaleValidationError::MissingPlatform);
        }
        let platform_id = PlatformId::parse(platform_raw)
            .map_err(|_| SaleValidationError::InvalidPlatform(platform_raw.to_string()))?;

        let product_name = self.product_name.trim();
        if product_name.is_empty() {
            return Err(SaleValidationError::MissingProduct);
        }

        let amount_raw = self.amount.trim().replace(',', ".");
        let amount: f64 = amount_raw
            .parse()
            .map_err(|_| SaleValidationError::InvalidAmount(self.amount.clone()))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SaleValidationError::InvalidAmount(self.amount.clone()));
        }

        Ok(NewSale {
            platform_id,
            product_name: product_name.to_string(),
            amount: (amount * 100.0).round() / 100.0,
            currency: self.currency,
            sale_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form() -> NewSaleForm {
        NewSaleForm {
            platform_id: "6f1c1c8e-7a43-4d4c-9d1c-0d3f1f6b2a11".to_string(),
            product_name: "  Benchy Deluxe ".to_string(),
            amount: "12,50".to_string(),
            currency: Currency::Eur,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_form() {
        let sale = form().validate(now()).unwrap();
        assert_eq!(sale.product_name, "Benchy Deluxe");
        assert_eq!(sale.amount, 12.5);
        assert_eq!(sale.sale_date, now());
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut f = form();
        f.platform_id = String::new();
        assert_eq!(f.validate(now()), Err(SaleValidationError::MissingPlatform));

        let mut f = form();
        f.product_name = "   ".to_string();
        assert_eq!(f.validate(now()), Err(SaleValidationError::MissingProduct));

        let mut f = form();
        f.amount = "0".to_string();
        assert!(matches!(
            f.validate(now()),
            Err(SaleValidationError::InvalidAmount(_))
        ));

        let mut f = form();
        f.amount = "abc".to_string();
        assert!(matches!(
            f.validate(now()),
            Err(SaleValidationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_currency_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
        assert_eq!(Currency::from_code("GBP"), Some(Currency::Gbp));
    }
}
