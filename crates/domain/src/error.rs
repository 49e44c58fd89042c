//! Validation errors raised before payment may start.

use common::ProductId;
use thiserror::Error;

/// A checkout precondition the buyer can fix and retry.
///
/// Validation blocks the payment from starting; it never mutates the
/// cart or any ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// No authenticated identity for this session.
    #[error("checkout requires a logged-in identity")]
    NotLoggedIn,

    /// A required delivery address field is blank.
    #[error("missing address field: {0}")]
    MissingAddressField(&'static str),

    /// A home-visit line has no scheduled date and time.
    #[error("product {0} requires a scheduled date and time")]
    MissingSchedule(ProductId),
}
