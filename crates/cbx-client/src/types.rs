//! Typed wire models for the exchange REST API.
//!
//! Responses are parsed into these types at the API boundary; a payload
//! that does not match surfaces as a parse error instead of a silent
//! missing-key fault. Numeric fields arrive as decimal strings and map
//! onto [`Money`].

use cbx_core::{Money, OrderKind, OrderSide, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order snapshot as reported by the exchange.
///
/// Market orders carry no price and fresh orders carry no fills, so the
/// numeric fields default to zero when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: String,
    pub product_id: String,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    pub side: OrderSide,
    #[serde(default)]
    pub size: Money,
    #[serde(default)]
    pub price: Money,
    pub status: OrderStatus,
    #[serde(default)]
    pub filled_size: Money,
    #[serde(default)]
    pub funds: Money,
}

/// Account balance snapshot. Read-only; owned by the exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub currency: String,
    pub balance: Money,
    #[serde(default)]
    pub available: Money,
    #[serde(default)]
    pub hold: Money,
}

/// Market ticker snapshot. Only the price is guaranteed.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    pub price: Money,
    #[serde(default)]
    pub bid: Option<Money>,
    #[serde(default)]
    pub ask: Option<Money>,
    #[serde(default)]
    pub volume: Option<Money>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// One price level of the level-2 book: price, size, order count.
#[derive(Debug, Clone, Deserialize)]
pub struct BookLevel(pub Money, pub Money, pub u32);

/// Level-2 order book snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSnapshot {
    #[serde(default)]
    pub sequence: u64,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

/// Outbound new-order request.
///
/// Field order matches the JSON body that gets signed, byte for byte.
/// Amounts are pre-rendered strings so the body never contains a binary
/// float.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub product_id: String,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    pub side: OrderSide,
    pub size: String,
    pub price: String,
    pub post_only: bool,
}

impl OrderRequest {
    /// Build the wire request: amounts rendered with exactly 8 fractional
    /// digits, post-only for everything but market orders.
    pub fn new(
        product_id: &str,
        kind: OrderKind,
        side: OrderSide,
        size: Money,
        price: Money,
    ) -> Self {
        Self {
            product_id: product_id.to_string(),
            kind,
            side,
            size: size.to_wire(),
            price: price.to_wire(),
            post_only: kind.post_only(),
        }
    }
}
