//! Checkout engine configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use domain::GST_RATE_BPS;

use crate::payment::PaymentConfig;

/// Engine configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `KALAKART_DATA_DIR` — snapshot directory (default: `"./data"`)
/// - `KALAKART_TAX_RATE_BPS` — tax rate in basis points (default: `500`)
/// - `KALAKART_PAYMENT_DELAY_MS` — simulated processing delay (default: `2000`)
/// - `KALAKART_CONFIRM_DELAY_MS` — success confirmation delay (default: `1500`)
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub data_dir: PathBuf,
    pub tax_rate_bps: u32,
    pub processing_delay: Duration,
    pub confirmation_delay: Duration,
}

impl CheckoutConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("KALAKART_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            tax_rate_bps: std::env::var("KALAKART_TAX_RATE_BPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tax_rate_bps),
            processing_delay: std::env::var("KALAKART_PAYMENT_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.processing_delay),
            confirmation_delay: std::env::var("KALAKART_CONFIRM_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.confirmation_delay),
        }
    }

    /// Returns the payment simulator configuration slice of this config.
    pub fn payment(&self) -> PaymentConfig {
        PaymentConfig {
            processing_delay: self.processing_delay,
            confirmation_delay: self.confirmation_delay,
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            tax_rate_bps: GST_RATE_BPS,
            processing_delay: Duration::from_millis(2000),
            confirmation_delay: Duration::from_millis(1500),
        }
    }
}
