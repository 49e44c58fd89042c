//! User records and role-dependent fields.

use common::{Money, UserId};
use domain::DeliveryAddress;
use serde::{Deserialize, Serialize};

/// The role an identity acts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A buyer assembling carts and placing orders.
    Customer,

    /// A seller accruing earnings from fulfilled orders.
    Artist,
}

/// A registered identity.
///
/// The optional block at the end is role-dependent: buyers carry an
/// address, artists carry profile and earnings fields. Earnings are
/// mutated only through the session's credit/payout operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub avatar: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<DeliveryAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earnings: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_payout: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl User {
    /// Returns true if this identity acts as an artist.
    pub fn is_artist(&self) -> bool {
        self.role == Role::Artist
    }

    /// Cumulative earnings, zero when never credited.
    pub fn earnings(&self) -> Money {
        self.earnings.unwrap_or_default()
    }

    /// Withdrawable balance, zero when never credited or fully paid out.
    pub fn pending_payout(&self) -> Money {
        self.pending_payout.unwrap_or_default()
    }

    /// Number of credited orders.
    pub fn total_orders(&self) -> u32 {
        self.total_orders.unwrap_or_default()
    }
}

/// Data required to register a new identity.
#[derive(Debug, Clone)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub bio: Option<String>,
}

impl Signup {
    /// Builds the user record for this signup.
    pub(crate) fn into_user(self) -> User {
        let avatar = format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", self.email);
        User {
            id: UserId::generate(),
            email: self.email,
            name: self.name,
            phone: self.phone,
            role: self.role,
            avatar,
            address: None,
            bio: self.bio,
            verified: Some(false),
            rating: Some(0.0),
            total_orders: Some(0),
            earnings: Some(Money::zero()),
            pending_payout: Some(Money::zero()),
            languages: Some(Vec::new()),
            location: None,
        }
    }
}

/// Partial profile update merged into the current user.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<DeliveryAddress>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub languages: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// Merges the set fields of this update into `user`.
    pub(crate) fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
        if let Some(address) = self.address {
            user.address = Some(address);
        }
        if let Some(bio) = self.bio {
            user.bio = Some(bio);
        }
        if let Some(location) = self.location {
            user.location = Some(location);
        }
        if let Some(languages) = self.languages {
            user.languages = Some(languages);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_builds_zeroed_artist_fields() {
        let signup = Signup {
            email: "meera@example.com".to_string(),
            password: "hunter2".to_string(),
            name: "Meera".to_string(),
            phone: "+91 90000 00000".to_string(),
            role: Role::Artist,
            bio: Some("Blue pottery".to_string()),
        };
        let user = signup.into_user();

        assert!(user.is_artist());
        assert_eq!(user.earnings(), Money::zero());
        assert_eq!(user.pending_payout(), Money::zero());
        assert_eq!(user.total_orders(), 0);
        assert_eq!(user.verified, Some(false));
    }

    #[test]
    fn test_accessors_default_when_fields_absent() {
        let signup = Signup {
            email: "ravi@example.com".to_string(),
            password: "pw".to_string(),
            name: "Ravi".to_string(),
            phone: "+91 90000 00001".to_string(),
            role: Role::Customer,
            bio: None,
        };
        let mut user = signup.into_user();
        user.earnings = None;
        user.pending_payout = None;
        user.total_orders = None;

        assert_eq!(user.earnings(), Money::zero());
        assert_eq!(user.pending_payout(), Money::zero());
        assert_eq!(user.total_orders(), 0);
    }

    #[test]
    fn test_profile_update_merges_partially() {
        let signup = Signup {
            email: "ravi@example.com".to_string(),
            password: "pw".to_string(),
            name: "Ravi".to_string(),
            phone: "+91 90000 00001".to_string(),
            role: Role::Customer,
            bio: None,
        };
        let mut user = signup.into_user();

        ProfileUpdate {
            name: Some("Ravi K.".to_string()),
            location: Some("Jaipur".to_string()),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.name, "Ravi K.");
        assert_eq!(user.location.as_deref(), Some("Jaipur"));
        assert_eq!(user.phone, "+91 90000 00001");
    }
}
