pub mod aggregation;
pub mod period;
pub mod store_query;
