//! Integration tests for Rupshari.
//!
//! Cross-crate scenario tests that exercise the storefront library in
//! memory: cart flows, checkout assembly, and catalog payload parsing
//! against realistic backend responses.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rupshari-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
