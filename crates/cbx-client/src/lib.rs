//! Authenticated REST client for the exchange.
//!
//! This crate provides the request pipeline and the order lifecycle:
//! - `Credential`: per-request HMAC-SHA256 signing
//! - `ExchangeClient`: signed GET/POST/DELETE with normalized outcomes
//! - `OrderLifecycle`: place, look up, cancel and poll orders to a
//!   terminal status
//! - `TickerFeed`: single ticker fetch and continuous trend-classified
//!   polling

pub mod auth;
pub mod error;
pub mod orders;
pub mod rest;
pub mod ticker;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthHeaders, Credential};
pub use error::{ApiError, ClientError, ClientResult};
pub use orders::{CancelOutcome, OrderLifecycle};
pub use rest::{ExchangeApi, ExchangeClient};
pub use ticker::{TickerFeed, Trend};
pub use types::{Account, BookLevel, BookSnapshot, Order, OrderRequest, Ticker};
