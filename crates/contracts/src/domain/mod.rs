pub mod a001_platform;
pub mod a002_sale;
