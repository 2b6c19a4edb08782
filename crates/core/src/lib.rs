//! Courtside Core - Shared types library.
//!
//! This crate provides common types used across all Courtside components:
//! - `admin` - Store-owner dashboard API (catalog, orders, overview)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, user ids and conferences

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
