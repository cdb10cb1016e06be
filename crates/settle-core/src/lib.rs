pub mod config;
pub mod error;
pub mod types;

pub use config::SettleConfig;
pub use error::{Result, SettleError};
pub use types::*;
