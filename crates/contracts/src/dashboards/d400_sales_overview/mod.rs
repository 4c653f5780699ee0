pub mod dto;
pub mod kpi;
pub mod query;

pub use dto::{IndicatorStatus, OverviewFilter, ValueFormat};
pub use kpi::KpiSnapshot;
