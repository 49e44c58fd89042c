//! Shared value types for the marketplace checkout engine.
//!
//! This crate provides the primitives every other crate builds on:
//! - [`Money`] for integer currency arithmetic (no floats anywhere)
//! - String-backed id newtypes for products, users, orders, and transactions

pub mod ids;
pub mod money;

pub use ids::{ArtistId, CustomerId, OrderId, ProductId, TransactionId, UserId};
pub use money::Money;
