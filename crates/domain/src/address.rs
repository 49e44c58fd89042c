//! Delivery address validation and flattening.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A delivery address captured at checkout.
///
/// `line2` is optional in practice; everything else must be present
/// before payment may start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

impl DeliveryAddress {
    /// Checks that every required field is non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingAddressField(field));
            }
        }
        Ok(())
    }

    /// Flattens the address into the single string persisted on orders.
    pub fn flatten(&self) -> String {
        format!(
            "{}, {}, {}, {} - {}",
            self.line1, self.line2, self.city, self.state, self.pincode
        )
    }
}
