//! Reusable flows composed from locators, actions and expectations.
//!
//! Every helper is generic over [`crate::driver::Driver`] so the same code
//! runs against Chromium in scenarios and against the in-memory driver in
//! unit tests.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod navigation;
pub mod subscription;
