pub mod dto;

pub use dto::{HistoryFilter, HistoryPage, HistoryPaging, PAGE_SIZE_OPTIONS};
