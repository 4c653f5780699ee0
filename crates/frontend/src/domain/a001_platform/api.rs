use crate::shared::supabase::{fetch, SalesStore, StoreError};
use contracts::domain::a001_platform::Platform;
use contracts::shared::store_query::{Collection, StoreQuery};

/// Every platform ordered by name; inactive ones are kept for filters over old sales
pub async fn load_platforms<S>(store: &S) -> Result<Vec<Platform>, StoreError>
where
    S: SalesStore + ?Sized,
{
    let query = StoreQuery::table(Collection::Platforms).order_by("name", true);
    let result = fetch::<Platform, _>(store, &query).await?;
    log::debug!("Loaded {} platforms", result.rows.len());
    Ok(result.rows)
}

/// Platforms offered in the add-sale form
pub fn active_platforms(platforms: &[Platform]) -> Vec<Platform> {
    platforms.iter().filter(|p| p.active).cloned().collect()
}
