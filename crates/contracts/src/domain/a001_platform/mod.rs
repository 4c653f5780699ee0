pub mod aggregate;

pub use aggregate::{Platform, PlatformId, PlatformRef};
