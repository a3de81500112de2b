//! Order enums: side, type and server-reported status.

use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(CoreError::InvalidSide(other.to_string())),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Market,
    Limit,
    Stop,
}

impl OrderKind {
    /// Whether orders of this type are flagged post-only.
    ///
    /// Everything except market orders is sent post-only so it cannot
    /// immediately match as a taker.
    pub fn post_only(&self) -> bool {
        !matches!(self, Self::Market)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "market"),
            Self::Limit => write!(f, "limit"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

impl FromStr for OrderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market" => Ok(Self::Market),
            "limit" => Ok(Self::Limit),
            "stop" => Ok(Self::Stop),
            other => Err(CoreError::InvalidKind(other.to_string())),
        }
    }
}

/// Server-reported order status.
///
/// `done` and `settled` are terminal success, `rejected` is terminal
/// failure, `pending` and `open` are still working. Anything else the
/// server may invent is kept verbatim in `Other` and treated as terminal,
/// so a poll loop can never spin on a status it does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Open,
    Done,
    Settled,
    Rejected,
    Other(String),
}

impl OrderStatus {
    /// Parse the status string reported by the exchange.
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "open" => Self::Open,
            "done" => Self::Done,
            "settled" => Self::Settled,
            "rejected" => Self::Rejected,
            other => Self::Other(other.to_string()),
        }
    }

    /// True once no further transition is expected.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Open)
    }

    /// True for a terminal status that means the order traded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done | Self::Settled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Open => write!(f, "open"),
            Self::Done => write!(f, "done"),
            Self::Settled => write!(f, "settled"),
            Self::Rejected => write!(f, "rejected"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_round_trip() {
        assert_eq!("buy".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!(OrderSide::Sell.to_string(), "sell");
        assert!("hold".parse::<OrderSide>().is_err());
    }

    #[test]
    fn test_kind_post_only() {
        assert!(!OrderKind::Market.post_only());
        assert!(OrderKind::Limit.post_only());
        assert!(OrderKind::Stop.post_only());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OrderKind::Limit).unwrap(), "\"limit\"");
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), "\"buy\"");
    }

    #[test]
    fn test_status_classification() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Open.is_terminal());

        assert!(OrderStatus::Done.is_terminal());
        assert!(OrderStatus::Settled.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());

        assert!(OrderStatus::Done.is_success());
        assert!(OrderStatus::Settled.is_success());
        assert!(!OrderStatus::Rejected.is_success());
    }

    #[test]
    fn test_unknown_status_is_terminal_but_not_success() {
        let status = OrderStatus::parse("haunted");
        assert_eq!(status, OrderStatus::Other("haunted".to_string()));
        assert!(status.is_terminal());
        assert!(!status.is_success());
    }

    #[test]
    fn test_status_deserializes_from_string() {
        let status: OrderStatus = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(status, OrderStatus::Open);
    }
}
