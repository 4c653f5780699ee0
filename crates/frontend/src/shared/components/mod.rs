pub mod chart;
pub mod number_format;
pub mod period_selector;
pub mod search_input;
pub mod stat_card;
pub mod toast_host;
pub mod widget_status;

pub use chart::Chart;
pub use period_selector::PeriodSelector;
pub use search_input::SearchInput;
pub use stat_card::StatCard;
pub use toast_host::ToastHost;
pub use widget_status::widget_view;
