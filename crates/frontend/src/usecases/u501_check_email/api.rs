use crate::shared::notifications::{NotificationSink, ToastKind};
use crate::shared::refresh::{DashboardView, RefreshOrchestrator};
use crate::shared::supabase::{MailIngestion, SalesStore, StoreError};
use chrono::TimeZone;
use contracts::usecases::u501_check_email::CheckEmailResponse;

pub const CHECK_FAILED: &str = "Errore nel controllo email. Riprova più tardi.";

/// Ask the ingestion function to read the mailbox now.
///
/// On success the dashboard is refreshed before the summary toast so the
/// new rows are already visible; the cash sound follows the sound toggle.
pub async fn check_email<S, V, N, Tz>(
    orchestrator: &RefreshOrchestrator<S, V, N, Tz>,
) -> Result<CheckEmailResponse, StoreError>
where
    S: SalesStore + MailIngestion + ?Sized,
    V: DashboardView + ?Sized,
    N: NotificationSink + ?Sized,
    Tz: TimeZone,
{
    let response = match orchestrator.store().check_email().await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Email check failed: {}", e);
            orchestrator.sink().toast(ToastKind::Error, CHECK_FAILED);
            return Err(e);
        }
    };
    log::info!("Email check result: {:?}", response);

    orchestrator.refresh_all().await;
    orchestrator.sink().toast(ToastKind::Success, &response.summary());
    if response.found_new_sales() && orchestrator.state().settings.get().sound {
        orchestrator.sink().play_sound();
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::notifications::{Feedback, NotificationSettings};
    use crate::shared::refresh::testing::setup;
    use crate::shared::supabase::memory::MemoryStore;

    #[tokio::test]
    async fn test_new_sales_refresh_and_sound() {
        let (orchestrator, store, _view, sink) = setup(MemoryStore::new());
        store.new_sales.set(3);

        let response = check_email(&orchestrator).await.unwrap();
        assert_eq!(response.new_sales, 3);
        // overview (4 reads) and history (1 read)
        assert_eq!(store.reads.get(), 5);
        assert_eq!(
            sink.take(),
            vec![
                Feedback::Toast(ToastKind::Success, response.summary()),
                Feedback::Sound
            ]
        );
    }

    #[tokio::test]
    async fn test_nothing_new_is_silent_and_sound_toggle_is_respected() {
        let (orchestrator, store, _view, sink) = setup(MemoryStore::new());
        check_email(&orchestrator).await.unwrap();
        assert!(!sink.take().contains(&Feedback::Sound));

        store.new_sales.set(2);
        orchestrator.state().settings.set(NotificationSettings {
            sound: false,
            push: true,
        });
        check_email(&orchestrator).await.unwrap();
        assert!(!sink.take().contains(&Feedback::Sound));
    }

    #[tokio::test]
    async fn test_failure_shows_error_toast_without_refresh() {
        let (orchestrator, store, view, sink) = setup(MemoryStore::new());
        store.fail_ingestion();

        assert!(check_email(&orchestrator).await.is_err());
        assert!(view.kpis.borrow().is_empty());
        assert_eq!(store.reads.get(), 0);
        assert_eq!(
            sink.take(),
            vec![Feedback::Toast(ToastKind::Error, CHECK_FAILED.to_string())]
        );
    }
}
