//! The commerce checkout engine.
//!
//! Composes the pieces of a checkout flow:
//! - [`CartStore`] — the buyer's pending selections, persisted on every
//!   mutation
//! - [`PaymentSimulator`] — a cancellable payment state machine standing
//!   in for a real gateway behind the [`PaymentGateway`] seam
//! - [`OrderLedger`] — durable order records and status transitions
//! - [`CheckoutCoordinator`] — validation, payment, and the success
//!   fan-out to orders, earnings, and cart clearing
//!
//! Services are explicit instances wired together by the caller; there
//! are no globals, so tests construct isolated engines per case.

pub mod cart;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod orders;
pub mod payment;

pub use cart::CartStore;
pub use config::CheckoutConfig;
pub use coordinator::CheckoutCoordinator;
pub use error::CheckoutError;
pub use orders::OrderLedger;
pub use payment::{
    PaymentAttempt, PaymentError, PaymentGateway, PaymentMethod, PaymentOutcome, PaymentPhase,
    PaymentSimulator,
};
