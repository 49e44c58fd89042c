//! The checkout flow: validate, charge, then fan out on success.

use common::{CustomerId, TransactionId};
use domain::{DeliveryAddress, ValidationError};
use metrics::{counter, histogram};
use session::Session;
use snapshot_store::SnapshotStore;

use crate::cart::CartStore;
use crate::error::{CheckoutError, Result};
use crate::orders::OrderLedger;
use crate::payment::{PaymentError, PaymentGateway, PaymentMethod};

/// Drives one checkout from validation through payment to the
/// success fan-out.
///
/// On a successful charge, and only then: orders are created for every
/// cart line, self-purchased lines are credited to the acting artist,
/// and the cart is cleared. A validation failure or a declined payment
/// leaves every collaborator exactly as it was.
pub struct CheckoutCoordinator<S: SnapshotStore, P: PaymentGateway> {
    cart: CartStore<S>,
    orders: OrderLedger<S>,
    session: Session<S>,
    gateway: P,
}

impl<S: SnapshotStore + Clone, P: PaymentGateway> CheckoutCoordinator<S, P> {
    /// Wires a coordinator over explicit collaborator instances.
    pub fn new(cart: CartStore<S>, orders: OrderLedger<S>, session: Session<S>, gateway: P) -> Self {
        Self {
            cart,
            orders,
            session,
            gateway,
        }
    }

    /// The cart this coordinator reads and clears.
    pub fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// The ledger orders land in.
    pub fn orders(&self) -> &OrderLedger<S> {
        &self.orders
    }

    /// The session whose identity places the order.
    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// The gateway charged for the cart total.
    pub fn gateway(&self) -> &P {
        &self.gateway
    }

    /// Runs a full checkout for the current identity.
    ///
    /// Validates the cart, identity, address, and home-visit schedules,
    /// then charges the cart total. Success creates one confirmed order
    /// per cart line under a shared transaction id, credits any
    /// self-purchased lines to the acting artist, and clears the cart.
    #[tracing::instrument(skip_all, fields(method = %method))]
    pub async fn checkout(
        &self,
        address: &DeliveryAddress,
        method: PaymentMethod,
    ) -> Result<TransactionId> {
        counter!("checkout_attempts_total").increment(1);
        let started = std::time::Instant::now();

        let user = self
            .session
            .current()
            .ok_or(ValidationError::NotLoggedIn)?;

        let lines = self.cart.items();
        if lines.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        address.validate()?;
        for line in &lines {
            if line.service_type.requires_schedule() && !line.is_scheduled() {
                return Err(ValidationError::MissingSchedule(line.product_id.clone()).into());
            }
        }

        let totals = self.cart.totals();
        let transaction_id = match self.gateway.charge(method, totals.total).await {
            Ok(id) => id,
            Err(PaymentError::Declined) => {
                counter!("checkout_declined_total").increment(1);
                tracing::warn!(total = %totals.total, "checkout declined, nothing recorded");
                return Err(CheckoutError::TransactionFailed);
            }
            Err(e) => return Err(CheckoutError::Payment(e)),
        };

        let customer_id = CustomerId::from(&user.id);
        let orders =
            self.orders
                .create_orders_for_checkout(&lines, &transaction_id, &customer_id, address)?;

        // An artist buying their own work earns from the sale like any
        // other: one credit of the line price per matching line.
        if user.is_artist() {
            for line in &lines {
                if line.artist_id.as_str() == user.id.as_str() {
                    self.session.credit(line.price)?;
                }
            }
        }

        self.cart.clear()?;

        counter!("checkout_completed_total").increment(1);
        histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        tracing::info!(
            %transaction_id,
            orders = orders.len(),
            total = %totals.total,
            "checkout completed"
        );
        Ok(transaction_id)
    }
}
