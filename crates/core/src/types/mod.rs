//! Core types for the Automation Exercise suite.
//!
//! This module provides type-safe wrappers for the data the scenarios pass
//! around.

pub mod cart;
pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod profile;
pub mod status;

pub use cart::CartItem;
pub use credential::Credentials;
pub use email::{Email, EmailError};
pub use id::CartPosition;
pub use price::{CurrencyCode, Price, PriceError};
pub use profile::{DateOfBirth, PaymentCard, Sex, UserProfile};
pub use status::FlowState;
