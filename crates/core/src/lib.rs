//! Automation Exercise Core - Shared types and synthetic data.
//!
//! This crate provides the data the end-to-end suite passes around:
//! - [`types`] - Profiles, credentials, cart items, prices and flow states
//! - [`generator`] - Randomized, internally consistent shopper profiles
//!
//! # Architecture
//!
//! The core crate contains only types and pure construction - no browser,
//! no HTTP clients. The integration-tests crate and the CLI both build on it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod generator;
pub mod types;

pub use generator::generate_user_profile;
pub use types::*;
