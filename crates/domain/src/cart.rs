//! Cart lines and cart-level pricing.

use common::{ArtistId, Money, ProductId};
use serde::{Deserialize, Serialize};

/// Tax rate applied at checkout (GST), in basis points.
pub const GST_RATE_BPS: u32 = 500;

/// How a purchased service is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    /// The artist travels to the buyer; requires a scheduled date and time.
    HomeVisit,

    /// Shipped or delivered digitally; no scheduling.
    Digital,
}

impl ServiceType {
    /// Returns true if lines of this type need a scheduled date and time
    /// before checkout may proceed.
    pub fn requires_schedule(&self) -> bool {
        matches!(self, ServiceType::HomeVisit)
    }
}

/// An optional priced extra attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    /// Catalog identifier of the add-on.
    pub id: String,

    /// Human-readable add-on name.
    pub name: String,

    /// Add-on price, non-negative.
    pub price: Money,
}

impl AddOn {
    /// Creates a new add-on.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// One buyer selection in the cart, keyed by product ID.
///
/// A cart holds at most one line per product; inserting a line whose
/// product ID already exists replaces the old line wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product this line refers to; unique key within the cart.
    pub product_id: ProductId,

    /// Product title snapshot.
    pub title: String,

    /// Product image reference snapshot.
    pub image: String,

    /// Unit price, non-negative.
    pub price: Money,

    /// The seller who fulfills this line.
    pub artist_id: ArtistId,

    /// Seller display name snapshot.
    pub artist_name: String,

    /// Delivery mode for this line.
    pub service_type: ServiceType,

    /// Scheduled date, required for home-visit lines.
    pub scheduled_date: Option<String>,

    /// Scheduled time, required for home-visit lines.
    pub scheduled_time: Option<String>,

    /// Quantity ordered, at least 1.
    pub quantity: u32,

    /// Priced extras attached to this line.
    pub add_ons: Vec<AddOn>,
}

impl CartItem {
    /// Sum of this line's add-on prices.
    pub fn add_ons_total(&self) -> Money {
        self.add_ons.iter().map(|a| a.price).sum()
    }

    /// Gross line amount: `(price + Σ add-ons) × quantity`.
    pub fn line_total(&self) -> Money {
        (self.price + self.add_ons_total()).multiply(self.quantity)
    }

    /// Returns true if the line carries both a scheduled date and time.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_date.is_some() && self.scheduled_time.is_some()
    }
}

/// Partial update merged into an existing cart line.
///
/// Only the fields a buyer can change after adding a line are patchable;
/// identity fields (product, artist) never change in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemPatch {
    pub price: Option<Money>,
    pub quantity: Option<u32>,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub add_ons: Option<Vec<AddOn>>,
}

impl CartItemPatch {
    /// Merges the set fields of this patch into `item`.
    pub fn apply_to(&self, item: &mut CartItem) {
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(ref date) = self.scheduled_date {
            item.scheduled_date = Some(date.clone());
        }
        if let Some(ref time) = self.scheduled_time {
            item.scheduled_time = Some(time.clone());
        }
        if let Some(ref add_ons) = self.add_ons {
            item.add_ons = add_ons.clone();
        }
    }
}

/// Cart-level totals, recomputed from the lines on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// `Σ (price + Σ add-ons) × quantity` over all lines.
    pub subtotal: Money,

    /// `round(subtotal × rate)`, half-up.
    pub tax: Money,

    /// `subtotal + tax`.
    pub total: Money,
}

impl CartTotals {
    /// Computes totals over the given lines at the given tax rate.
    pub fn compute(items: &[CartItem], rate_bps: u32) -> Self {
        let subtotal: Money = items.iter().map(CartItem::line_total).sum();
        let tax = subtotal.tax_portion(rate_bps);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Total quantity across all lines.
pub fn item_count(items: &[CartItem]) -> u32 {
    items.iter().map(|i| i.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: &str, price: i64, quantity: u32, add_ons: Vec<AddOn>) -> CartItem {
        CartItem {
            product_id: product.into(),
            title: format!("Item {product}"),
            image: "/img/test.jpg".to_string(),
            price: Money::from_units(price),
            artist_id: "artist-1".into(),
            artist_name: "Meera".to_string(),
            service_type: ServiceType::Digital,
            scheduled_date: None,
            scheduled_time: None,
            quantity,
            add_ons,
        }
    }

    #[test]
    fn test_single_line_totals() {
        // price 1000, qty 1, no add-ons => subtotal 1000, tax 50, total 1050
        let items = vec![line("p1", 1000, 1, vec![])];
        let totals = CartTotals::compute(&items, GST_RATE_BPS);
        assert_eq!(totals.subtotal, Money::from_units(1000));
        assert_eq!(totals.tax, Money::from_units(50));
        assert_eq!(totals.total, Money::from_units(1050));
    }

    #[test]
    fn test_two_line_totals() {
        // 500 + 700 => subtotal 1200, tax 60, total 1260
        let items = vec![line("p1", 500, 1, vec![]), line("p2", 700, 1, vec![])];
        let totals = CartTotals::compute(&items, GST_RATE_BPS);
        assert_eq!(totals.subtotal, Money::from_units(1200));
        assert_eq!(totals.tax, Money::from_units(60));
        assert_eq!(totals.total, Money::from_units(1260));
    }

    #[test]
    fn test_totals_include_add_ons_and_quantity() {
        let add_on = AddOn::new("a1", "Gift wrap", Money::from_units(100));
        let items = vec![line("p1", 400, 3, vec![add_on])];
        let totals = CartTotals::compute(&items, GST_RATE_BPS);
        // (400 + 100) * 3 = 1500
        assert_eq!(totals.subtotal, Money::from_units(1500));
        assert_eq!(totals.tax, Money::from_units(75));
        assert_eq!(totals.total, Money::from_units(1575));
    }

    #[test]
    fn test_tax_equals_rounded_subtotal_rate() {
        for units in [0, 1, 9, 10, 11, 499, 500, 777, 12345] {
            let items = vec![line("p1", units, 1, vec![])];
            let totals = CartTotals::compute(&items, GST_RATE_BPS);
            assert_eq!(totals.tax, totals.subtotal.tax_portion(GST_RATE_BPS));
            assert_eq!(totals.total, totals.subtotal + totals.tax);
        }
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let items = vec![line("p1", 100, 2, vec![]), line("p2", 100, 3, vec![])];
        assert_eq!(item_count(&items), 5);
        assert_eq!(item_count(&[]), 0);
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let mut item = line("p1", 100, 1, vec![]);
        let patch = CartItemPatch {
            quantity: Some(4),
            scheduled_date: Some("2026-09-01".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut item);

        assert_eq!(item.quantity, 4);
        assert_eq!(item.scheduled_date.as_deref(), Some("2026-09-01"));
        // Untouched fields keep their values.
        assert_eq!(item.price, Money::from_units(100));
        assert!(item.add_ons.is_empty());
    }

    #[test]
    fn test_is_scheduled_requires_both_fields() {
        let mut item = line("p1", 100, 1, vec![]);
        assert!(!item.is_scheduled());
        item.scheduled_date = Some("2026-09-01".to_string());
        assert!(!item.is_scheduled());
        item.scheduled_time = Some("10:00".to_string());
        assert!(item.is_scheduled());
    }

    #[test]
    fn test_service_type_schedule_requirement() {
        assert!(ServiceType::HomeVisit.requires_schedule());
        assert!(!ServiceType::Digital.requires_schedule());
    }

    #[test]
    fn test_service_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&ServiceType::HomeVisit).unwrap(),
            "\"home-visit\""
        );
        assert_eq!(
            serde_json::to_string(&ServiceType::Digital).unwrap(),
            "\"digital\""
        );
    }
}
