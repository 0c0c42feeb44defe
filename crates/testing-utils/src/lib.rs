//! # TSD Metrics Testing Utils
//!
//! Test doubles shared across the workspace crates.
//!
//! - **RecordingSink**: keeps every event it receives, stamped with a
//!   global arrival order so tests can assert on sink ordering
//! - **MockSink**: mockall double for expectation-style tests
//! - **Helpers**: assertions over recorded events
//!
//! ## Usage
//!
//! ```toml
//! [dev-dependencies]
//! tsd-metrics-testing-utils = { path = "../testing-utils" }
//! ```

pub mod helpers;
pub mod mocks;

pub use helpers::*;
pub use mocks::*;
