use crate::shared::notifications::{NotificationSink, ToastKind};
use crate::shared::refresh::{DashboardView, RefreshOrchestrator};
use crate::shared::supabase::{SalesStore, StoreError};
use chrono::TimeZone;
use contracts::domain::a002_sale::{NewSaleForm, Sale, SaleValidationError};
use thiserror::Error;

pub const SALE_SAVED: &str = "Vendita salvata con successo!";
pub const SALE_SAVE_FAILED: &str = "Errore nel salvare la vendita!";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(#[from] SaleValidationError),
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Validate and insert a manually entered sale.
///
/// Validation runs before any network call. On success the cash sound
/// plays, the whole dashboard is refreshed and a success toast is shown.
pub async fn submit_sale<S, V, N, Tz>(
    orchestrator: &RefreshOrchestrator<S, V, N, Tz>,
    form: &NewSaleForm,
) -> Result<Sale, SubmitError>
where
    S: SalesStore + ?Sized,
    V: DashboardView + ?Sized,
    N: NotificationSink + ?Sized,
    Tz: TimeZone,
{
    let new_sale = form.validate(orchestrator.now())?;

    let stored = match orchestrator.store().insert_sale(&new_sale).await {
        Ok(sale) => sale,
        Err(e) => {
            log::error!("Error saving sale: {}", e);
            orchestrator.sink().toast(ToastKind::Error, SALE_SAVE_FAILED);
            return Err(e.into());
        }
    };
    log::info!(
        "Sale saved: {} {:.2} on {}",
        stored.product_label(),
        stored.amount,
        stored.platform_name()
    );

    orchestrator.sink().play_sound();
    orchestrator.refresh_all().await;
    orchestrator.sink().toast(ToastKind::Success, SALE_SAVED);
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::notifications::Feedback;
    use crate::shared::refresh::testing::{last, setup};
    use crate::shared::supabase::memory::MemoryStore;
    use contracts::domain::a001_platform::{Platform, PlatformId};
    use contracts::domain::a002_sale::Currency;
    use contracts::shared::store_query::Collection;

    fn cults() -> Platform {
        Platform {
            id: PlatformId::new_v4(),
            name: "Cults3D".to_string(),
            active: true,
        }
    }

    fn form(platform: &Platform, amount: &str) -> NewSaleForm {
        NewSaleForm {
            platform_id: platform.id.value().to_string(),
            product_name: "Dragon".to_string(),
            amount: amount.to_string(),
            currency: Currency::Eur,
        }
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_store() {
        let platform = cults();
        let (orchestrator, store, _view, sink) = setup(MemoryStore::with_platforms(vec![platform.clone()]));

        let err = submit_sale(&orchestrator, &form(&platform, "0")).await.unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(SaleValidationError::InvalidAmount(_))));
        assert_eq!(store.reads.get(), 0);
        assert!(sink.take().is_empty());
    }

    #[tokio::test]
    async fn test_saved_sale_refreshes_the_dashboard() {
        let platform = cults();
        let (orchestrator, _store, view, sink) = setup(MemoryStore::with_platforms(vec![platform.clone()]));

        let sale = submit_sale(&orchestrator, &form(&platform, "12,50")).await.unwrap();
        assert_eq!(sale.amount, 12.5);
        assert_eq!(sale.platform_name(), "Cults3D");

        let kpi = last(&view.kpis).ready().cloned().unwrap();
        assert_eq!(kpi.today_count, 1);
        assert_eq!(last(&view.recent).ready().map(|r| r.len()), Some(1));

        let events = sink.take();
        assert_eq!(events.first(), Some(&Feedback::Sound));
        assert_eq!(
            events.last(),
            Some(&Feedback::Toast(ToastKind::Success, SALE_SAVED.to_string()))
        );
    }

    #[tokio::test]
    async fn test_store_failure_shows_error_toast() {
        let platform = cults();
        let store = MemoryStore::with_platforms(vec![platform.clone()]);
        store.fail(Collection::Sales);
        let (orchestrator, _store, _view, sink) = setup(store);

        let err = submit_sale(&orchestrator, &form(&platform, "5")).await.unwrap_err();
        assert!(matches!(err, SubmitError::Store(_)));
        assert_eq!(
            sink.take(),
            vec![Feedback::Toast(ToastKind::Error, SALE_SAVE_FAILED.to_string())]
        );
    }
}
