//! Core types for Courtside.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod conference;
pub mod id;
pub mod price;
pub mod user;

pub use conference::{Conference, ConferenceError};
pub use id::*;
pub use price::{Price, PriceError};
pub use user::{UserId, UserIdError};
