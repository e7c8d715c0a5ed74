//! Checkout states for local orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown order state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid order state: {0}")]
pub struct OrderStateError(pub String);

/// Checkout state machine position of a local order.
///
/// Orders move from `Cart` through the checkout steps to `Complete`.
/// `Canceled`, `AwaitingReturn` and `Returned` only occur after completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    #[default]
    Cart,
    Address,
    Delivery,
    Payment,
    Confirm,
    Complete,
    Canceled,
    AwaitingReturn,
    Returned,
}

impl OrderState {
    /// The state name as stored locally.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Address => "address",
            Self::Delivery => "delivery",
            Self::Payment => "payment",
            Self::Confirm => "confirm",
            Self::Complete => "complete",
            Self::Canceled => "canceled",
            Self::AwaitingReturn => "awaiting_return",
            Self::Returned => "returned",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderState {
    type Err = OrderStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart" => Ok(Self::Cart),
            "address" => Ok(Self::Address),
            "delivery" => Ok(Self::Delivery),
            "payment" => Ok(Self::Payment),
            "confirm" => Ok(Self::Confirm),
            "complete" => Ok(Self::Complete),
            "canceled" => Ok(Self::Canceled),
            "awaiting_return" => Ok(Self::AwaitingReturn),
            "returned" => Ok(Self::Returned),
            _ => Err(OrderStateError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_from_str() {
        for state in [
            OrderState::Cart,
            OrderState::Confirm,
            OrderState::Complete,
            OrderState::AwaitingReturn,
        ] {
            assert_eq!(state.to_string().parse::<OrderState>().unwrap(), state);
        }
    }

    #[test]
    fn test_unknown_state() {
        let err = "shipped".parse::<OrderState>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order state: shipped");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OrderState::AwaitingReturn).unwrap();
        assert_eq!(json, "\"awaiting_return\"");
    }
}
