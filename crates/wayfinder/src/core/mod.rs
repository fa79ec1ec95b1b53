//! Core types shared by every routing component
//!
//! The data model, error type, configuration and logging setup live here;
//! the store, engine and dispatcher build on top of them.

mod config;
mod error;
pub mod logging;
mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
