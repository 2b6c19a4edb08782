//! Domain models for the dashboard.
//!
//! Entity types serialize with camelCase field names, which is the JSON
//! shape the dashboard frontend and storefront consume. `*Input` types are
//! the validated payloads the service layer hands to the persistence
//! gateway.

pub mod billboard;
pub mod category;
pub mod color;
pub mod order;
pub mod principal;
pub mod product;
pub mod size;
pub mod store;
pub mod team;

pub use billboard::{Billboard, BillboardInput};
pub use category::{Category, CategoryInput, CategoryWithBillboard};
pub use color::{Color, ColorInput};
pub use order::{NewOrder, Order, OrderItem};
pub use principal::Principal;
pub use product::{Image, Product, ProductDetail, ProductFilter, ProductInput};
pub use size::{Size, SizeInput};
pub use store::Store;
pub use team::{Team, TeamInput};
