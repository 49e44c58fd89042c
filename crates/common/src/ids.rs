//! String-backed identifier newtypes.
//!
//! Catalog and identity ids are externally supplied strings; order and
//! transaction ids are generated here. Wrapping them prevents mixing up
//! the different id spaces at compile time.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product identifier, supplied by the catalog collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of any registered identity, buyer or seller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh user ID for a newly registered identity.
    pub fn generate() -> Self {
        Self(format!("user-{}", Utc::now().timestamp_millis()))
    }

    /// Returns the user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of the buyer an order belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Creates a customer ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the customer ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&UserId> for CustomerId {
    fn from(id: &UserId) -> Self {
        Self(id.as_str().to_string())
    }
}

/// Identifier of the seller who fulfills an order line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
    /// Creates an artist ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the artist ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArtistId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates an order ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh order ID: a timestamp plus a random suffix so
    /// orders created within the same millisecond stay distinct.
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string()[..4].to_uppercase();
        Self(format!("ORD-{}-{}", Utc::now().timestamp_millis(), suffix))
    }

    /// Returns the order ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of one successful payment, shared by every order it spawned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Creates a transaction ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh transaction ID. Time-based, with a random
    /// suffix so two resolutions in the same millisecond cannot collide.
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "TXN-DEMO-{}-{}",
            Utc::now().timestamp_millis(),
            &random[..6]
        ))
    }

    /// Returns the transaction ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_string_conversion() {
        let id = ProductId::new("prod-001");
        assert_eq!(id.as_str(), "prod-001");

        let id2: ProductId = "prod-002".into();
        assert_eq!(id2.as_str(), "prod-002");
    }

    #[test]
    fn test_order_id_generate_has_prefix() {
        let id = OrderId::generate();
        assert!(id.as_str().starts_with("ORD-"));
    }

    #[test]
    fn test_order_ids_are_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_transaction_id_generate_has_prefix() {
        let id = TransactionId::generate();
        assert!(id.as_str().starts_with("TXN-DEMO-"));
    }

    #[test]
    fn test_transaction_ids_unique_within_one_millisecond() {
        // Generate a burst; even ids sharing a timestamp must differ.
        let ids: Vec<_> = (0..64).map(|_| TransactionId::generate()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_customer_id_from_user_id() {
        let user = UserId::new("user-42");
        let customer = CustomerId::from(&user);
        assert_eq!(customer.as_str(), "user-42");
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let id = ProductId::new("prod-007");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"prod-007\"");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
