//! End-to-end and API tests for automationexercise.com.
//!
//! # Running Tests
//!
//! ```bash
//! # Unit tests for the harness (no browser, no network)
//! cargo test -p automation-exercise-integration-tests --lib
//!
//! # Browser scenarios against the live site (needs Chrome)
//! cargo test -p automation-exercise-integration-tests -- --include-ignored
//!
//! # Or through the runner
//! ae-cli test --project e2e --pattern cart
//! ```
//!
//! # Layout
//!
//! - [`driver`] - The browser seam: selectors, the `Driver` trait, Chromium
//! - [`page`] - Page handle and strict, lazily evaluated locators
//! - [`expect`] - Retrying assertions
//! - [`step`] - Named steps with tracing spans
//! - [`helpers`] - Navigation, auth, cart, checkout, contact and subscription flows
//! - [`api`] - Client for the JSON API
//! - [`fixture`] - Per-test browser context
//!
//! Scenarios live in `tests/`, grouped by feature area.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod driver;
pub mod error;
pub mod expect;
pub mod fixture;
pub mod helpers;
pub mod page;
pub mod step;
pub mod telemetry;

pub use config::SuiteConfig;
pub use error::{HarnessError, Result};
pub use expect::{expect, expect_page};
pub use fixture::TestContext;
pub use page::{Locator, Page};
pub use step::step;
