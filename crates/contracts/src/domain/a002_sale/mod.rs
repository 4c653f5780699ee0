pub mod aggregate;
pub mod new_sale;

pub use aggregate::{Sale, SaleId, UNKNOWN_KEY};
pub use new_sale::{Currency, NewSale, NewSaleForm, SaleValidationError};
