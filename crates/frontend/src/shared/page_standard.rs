//! Page category constants for tab pages.
//!
//! Every page rendered inside a tab declares:
//!   - HTML `id` in the format `{entity}--{category}` (e.g. `"p900_sales_history--list"`)
//!   - `data-page-category` with one of the constants below
//!
//! The `--` separator keeps the entity name searchable: the id copied from
//! the DOM inspector leads straight to the `projections/p900_sales_history/`
//! directory.

/// Table with filters and pagination.
pub const PAGE_CAT_LIST: &str = "list";

/// KPI cards and charts.
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

/// Validate that a page id matches the `{entity}--{category}` format.
pub fn is_valid_page_id(id: &str) -> bool {
    let parts: Vec<&str> = id.splitn(2, "--").collect();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ids() {
        assert!(is_valid_page_id("p900_sales_history--list"));
        assert!(is_valid_page_id("d400_sales_overview--dashboard"));
        assert!(!is_valid_page_id("d400_sales_overview"));
        assert!(!is_valid_page_id("--list"));
    }
}
