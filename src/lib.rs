//! Pacer parses scenario scripts describing sequences of web-navigation
//! actions used for load testing and performance profiling. The parser
//! produces a fully resolved, immutable [`language::ScenarioSet`];
//! issuing requests and evaluating the expressions carried on each step
//! belong to the execution engine built on top of this crate.

pub mod error;
pub mod language;
pub mod parsing;
