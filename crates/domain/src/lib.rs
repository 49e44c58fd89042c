//! Domain model for the marketplace checkout engine.
//!
//! This crate provides the pure, storage-free pieces of the system:
//! - Cart lines, add-ons, and cart-level total arithmetic
//! - The order record and its status state machine
//! - Delivery address validation and flattening
//!
//! Everything here is deterministic and synchronous; persistence and
//! orchestration live in the `snapshot-store` and `checkout` crates.

pub mod address;
pub mod cart;
pub mod error;
pub mod order;

pub use address::DeliveryAddress;
pub use cart::{AddOn, CartItem, CartItemPatch, CartTotals, GST_RATE_BPS, ServiceType, item_count};
pub use error::ValidationError;
pub use order::{Order, OrderAddOn, OrderStatus};
