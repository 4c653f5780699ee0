pub mod new_sale_dialog;

pub use new_sale_dialog::NewSaleDialog;
