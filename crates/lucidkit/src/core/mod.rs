//! Core building blocks shared by every other module
//!
//! Error types, identifier generation, enumerated wire tags and logging setup.

mod error;
mod ids;
pub mod logging;
mod types;

pub use error::*;
pub use ids::*;
pub use logging::*;
pub use types::*;

pub(crate) use types::validate_fraction;
