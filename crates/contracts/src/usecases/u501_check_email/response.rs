use serde::{Deserialize, Serialize};

/// Body returned by the mail ingestion function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckEmailResponse {
    /// Sales inserted by this run
    #[serde(rename = "newSales", default)]
    pub new_sales: u64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl CheckEmailResponse {
    /// Toast text shown after a manual check
    pub fn summary(&self) -> String {
        format!(
            "Email controllate! {} nuove vendite trovate.",
            self.new_sales
        )
    }

    pub fn found_new_sales(&self) -> bool {
        self.new_sales > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_count_defaults_to_zero() {
        let r: CheckEmailResponse = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert_eq!(r.new_sales, 0);
        assert!(!r.found_new_sales());

        let r: CheckEmailResponse =
            serde_json::from_str(r#"{"newSales":3,"details":{"checked":12}}"#).unwrap();
        assert_eq!(r.new_sales, 3);
        assert_eq!(r.summary(), "Email controllate! 3 nuove vendite trovate.");
    }
}
