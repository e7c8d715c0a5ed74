//! Currency codes and money formatting for remote payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes the store sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

/// Convert a decimal amount to the `f64` Mailchimp expects for totals and prices.
///
/// Amounts are rounded to two places first so that values like `19.999`
/// do not leak float noise into the payload.
#[must_use]
pub fn to_remote_amount(amount: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    amount.round_dp(2).to_f64().unwrap_or_default()
}
