//! Checkout error taxonomy.

use domain::ValidationError;
use session::SessionError;
use snapshot_store::StoreError;
use thiserror::Error;

use crate::payment::PaymentError;

/// Errors surfaced by the checkout flow.
///
/// Validation failures block payment from starting and are fixed by the
/// buyer; a declined transaction leaves the cart and all ledgers
/// untouched and allows retry. Neither is fatal.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A checkout precondition failed; payment was never started.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The gateway declined the payment; cart and ledgers unchanged.
    #[error("payment declined")]
    TransactionFailed,

    /// A non-decline payment fault (cancelled mid-flight, bad state).
    #[error("payment error: {0}")]
    Payment(PaymentError),

    /// Persistence failure while writing a snapshot.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Session failure while crediting earnings.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
