//! Business logic for the dashboard API.
//!
//! Handlers take the persistence gateway and an optional principal
//! explicitly, so the same code runs behind the HTTP router and in tests.
//!
//! # Services
//!
//! - `identity` - Bearer token verification (principal extraction)
//! - `validation` - Field presence and format checks
//! - `guard` - Authentication and store ownership checks
//! - `stores`, `billboards`, `categories`, `sizes`, `colors`, `teams`,
//!   `products` - Entity handlers
//! - `orders` - Order table for the store owner
//! - `dashboard` - Revenue, sales and stock aggregates

pub mod billboards;
pub mod categories;
pub mod colors;
pub mod dashboard;
pub mod guard;
pub mod identity;
pub mod orders;
pub mod products;
pub mod sizes;
pub mod stores;
pub mod teams;
pub mod validation;

pub use identity::{IdentityError, IdentityVerifier};
pub use validation::{Field, ValidationError};
