//! rendering of parse diagnostics

mod display;

pub use display::*;
