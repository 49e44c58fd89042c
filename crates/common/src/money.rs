//! Money represented in whole currency units.

use serde::{Deserialize, Serialize};

/// Money amount represented in whole currency units (rupees).
///
/// Catalog prices are integral, so no fractional representation is
/// needed; tax rounding happens at the unit level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    units: i64,
}

impl Money {
    /// Creates a new Money amount from whole units.
    pub fn from_units(units: i64) -> Self {
        Self { units }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { units: 0 }
    }

    /// Returns the amount in whole units.
    pub fn units(&self) -> i64 {
        self.units
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.units < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            units: self.units * quantity as i64,
        }
    }

    /// Computes a tax portion at the given rate in basis points,
    /// rounded half-up (`round(amount * rate)`).
    ///
    /// A 5% rate is 500 basis points: `Money::from_units(1000)`
    /// yields `Money::from_units(50)`.
    pub fn tax_portion(&self, rate_bps: u32) -> Money {
        debug_assert!(!self.is_negative(), "tax on a negative amount");
        Money {
            units: (self.units * rate_bps as i64 + 5_000) / 10_000,
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}", self.units)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            units: self.units + rhs.units,
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            units: self.units - rhs.units,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.units += rhs.units;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}
