//! Order records and their status lifecycle.

use chrono::{DateTime, Utc};
use common::{ArtistId, CustomerId, Money, OrderId, ProductId, TransactionId};
use serde::{Deserialize, Serialize};

use crate::address::DeliveryAddress;
use crate::cart::{CartItem, ServiceType};

/// The status of an order in its lifecycle.
///
/// Orders are always created as `Confirmed`. The seller then either
/// accepts (`Confirmed → Scheduled`) or declines (`Confirmed → Cancelled`).
/// No operation currently produces `Pending` or `Completed`; both exist
/// only in persisted seed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Scheduled,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the seller can accept the order in this status.
    pub fn can_accept(&self) -> bool {
        matches!(self, OrderStatus::Confirmed)
    }

    /// Returns true if the seller can decline the order in this status.
    pub fn can_decline(&self) -> bool {
        matches!(self, OrderStatus::Confirmed)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Returns the status name as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Scheduled => "scheduled",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Name/price snapshot of an add-on at the moment of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddOn {
    pub name: String,
    pub price: Money,
}

/// A persisted record of one fulfilled cart line.
///
/// Orders are created once per cart line at checkout success, mutated only
/// through explicit status transitions, and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// Shared by every order created from the same successful payment.
    pub transaction_id: TransactionId,

    pub customer_id: CustomerId,
    pub artist_id: ArtistId,

    pub product_id: ProductId,
    pub product_title: String,
    pub product_image: String,

    pub service_type: ServiceType,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,

    pub status: OrderStatus,

    /// Unit price snapshot from the cart line.
    pub price: Money,

    /// Add-on snapshots (name and price only).
    pub add_ons: Vec<OrderAddOn>,

    /// Per-line tax: `round(price × 0.05)`. Computed from the unit price
    /// alone, so the sum over a multi-line cart can diverge from the
    /// cart-level aggregate tax under rounding.
    pub tax: Money,

    /// Per-line total: `price + tax + Σ add-ons`.
    pub total: Money,

    /// Flattened delivery address.
    pub address: String,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds a confirmed order from one cart line of a successful payment.
    pub fn from_cart_line(
        item: &CartItem,
        transaction_id: &TransactionId,
        customer_id: &CustomerId,
        address: &DeliveryAddress,
        tax_rate_bps: u32,
    ) -> Self {
        let tax = item.price.tax_portion(tax_rate_bps);
        let total = item.price + tax + item.add_ons_total();

        Self {
            id: OrderId::generate(),
            transaction_id: transaction_id.clone(),
            customer_id: customer_id.clone(),
            artist_id: item.artist_id.clone(),
            product_id: item.product_id.clone(),
            product_title: item.title.clone(),
            product_image: item.image.clone(),
            service_type: item.service_type,
            scheduled_date: item.scheduled_date.clone(),
            scheduled_time: item.scheduled_time.clone(),
            status: OrderStatus::Confirmed,
            price: item.price,
            add_ons: item
                .add_ons
                .iter()
                .map(|a| OrderAddOn {
                    name: a.name.clone(),
                    price: a.price,
                })
                .collect(),
            tax,
            total,
            address: address.flatten(),
            created_at: Utc::now(),
        }
    }
}
