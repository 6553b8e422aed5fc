//! Integration test module
//!
//! End-to-end tests of the middleware stack, the demo server and the CSP API.

pub mod common;
pub mod config_tests;
pub mod csp_tests;
pub mod headers_tests;
pub mod integrity_tests;
pub mod redirect_tests;
