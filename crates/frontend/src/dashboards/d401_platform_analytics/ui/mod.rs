pub mod page;

pub use page::PlatformAnalyticsPage;
