//! the structural model built by parsing scenario scripts

mod error;
mod types;

pub use error::*;
pub use types::*;
