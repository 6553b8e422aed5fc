//! Property-based tests using proptest
//!
//! Invariants of the CSP model, the parser and the header renderers.

pub mod config_tests;
pub mod csp_tests;
pub mod html_tests;
