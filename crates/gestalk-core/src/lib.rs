pub mod config;
pub mod error;
pub mod pose;
pub mod types;

pub use config::GestalkConfig;
pub use error::{GestalkError, Result};
pub use types::*;
