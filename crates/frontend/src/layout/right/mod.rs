pub mod right;
pub mod settings;

pub use right::Right;
pub use settings::SettingsPanel;
