pub mod list;

pub use list::SalesHistoryList;
