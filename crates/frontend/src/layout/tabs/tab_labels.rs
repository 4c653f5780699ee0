//! Tab titles, one place for every tab key.

pub const D400_SALES_OVERVIEW: &str = "d400_sales_overview";
pub const D401_PLATFORM_ANALYTICS: &str = "d401_platform_analytics";
pub const P900_SALES_HISTORY: &str = "p900_sales_history";

/// Readable title of a tab; unknown keys fall back to the key itself
pub fn tab_label_for_key(key: &str) -> &str {
    match key {
        D400_SALES_OVERVIEW => "Dashboard",
        D401_PLATFORM_ANALYTICS => "Analisi piattaforme",
        P900_SALES_HISTORY => "Storico vendite",
        _ => key,
    }
}
