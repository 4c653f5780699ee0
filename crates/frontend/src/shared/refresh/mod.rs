//! Dashboard refresh pipeline
//!
//! user action / timer -> [`RefreshOrchestrator`] -> store -> aggregation ->
//! [`DashboardView`] -> notification sink.

pub mod handle;
pub mod orchestrator;
pub mod sequencer;
pub mod state;
#[cfg(test)]
pub mod testing;
pub mod timer;
pub mod view;

pub use handle::{use_refresh, AppOrchestrator, RefreshHandle};
pub use orchestrator::RefreshOrchestrator;
pub use sequencer::{RefreshSequencer, Ticket, Widget};
pub use state::DashboardState;
pub use timer::AutoRefresh;
pub use view::{DashboardSignals, DashboardView, WidgetState};
