//! Order lifecycle: place, look up, cancel and watch.
//!
//! Orders live on the exchange; this module only observes snapshots. A
//! missing order is a normal outcome (`None` / `CancelOutcome::NotFound`),
//! never an error.

use crate::error::{ClientError, ClientResult};
use crate::rest::ExchangeApi;
use crate::types::{Order, OrderRequest};
use cbx_core::{Money, OrderKind, OrderSide};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default delay between polls while watching an order.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of a cancel request.
#[derive(Debug, Clone)]
pub enum CancelOutcome {
    /// The exchange confirmed the cancellation; carries the snapshot
    /// fetched just before the delete was issued.
    Cancelled(Box<Order>),
    /// No such order; no delete was issued.
    NotFound,
}

/// Place/query/cancel/watch operations for a single trading pair.
pub struct OrderLifecycle<C> {
    api: C,
    product_id: String,
    poll_interval: Duration,
}

impl<C: ExchangeApi> OrderLifecycle<C> {
    pub fn new(api: C, product_id: impl Into<String>) -> Self {
        Self {
            api,
            product_id: product_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the delay between watch polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Submit a new order.
    ///
    /// Sizes and prices go out with exactly 8 fractional digits; every
    /// non-market order is flagged post-only.
    pub async fn place(
        &self,
        kind: OrderKind,
        side: OrderSide,
        size: Money,
        price: Money,
    ) -> ClientResult<Order> {
        let request = OrderRequest::new(&self.product_id, kind, side, size, price);
        let body = serde_json::to_value(&request).map_err(|e| ClientError::Parse {
            endpoint: "orders".to_string(),
            message: format!("request serialization: {e}"),
        })?;

        let value = self.api.call("orders", Some(&body), Method::POST, false).await?;
        parse_order("orders", value)
    }

    /// Fetch the current snapshot of an order.
    ///
    /// A 404 (with or without a body) and a 200 carrying
    /// `{"message":"NotFound"}` all resolve to `None`; the two shapes are
    /// deliberately equivalent.
    pub async fn get(&self, order_id: &str) -> ClientResult<Option<Order>> {
        let endpoint = format!("orders/{order_id}");
        let value = self.api.call(&endpoint, None, Method::GET, true).await?;
        if is_not_found(&value) {
            return Ok(None);
        }
        parse_order(&endpoint, value).map(Some)
    }

    /// Cancel an order.
    ///
    /// Fetches the order first so the caller can describe what was
    /// cancelled; a missing order short-circuits without issuing a delete.
    /// The exchange acknowledges a cancel with an empty body; anything
    /// else is a failure.
    pub async fn cancel(&self, order_id: &str) -> ClientResult<CancelOutcome> {
        let Some(order) = self.get(order_id).await? else {
            return Ok(CancelOutcome::NotFound);
        };

        let endpoint = format!("orders/{order_id}");
        let value = self.api.call(&endpoint, None, Method::DELETE, true).await?;

        if value.as_object().is_some_and(|o| o.is_empty()) {
            Ok(CancelOutcome::Cancelled(Box::new(order)))
        } else {
            Err(ClientError::UnexpectedResponse {
                endpoint,
                body: value.to_string(),
            })
        }
    }

    /// Poll an order until it reaches a terminal status.
    ///
    /// Sleeps `poll_interval` between polls while the status is still
    /// `pending` or `open`. Returns the first terminal snapshot, or `None`
    /// if the order disappears. The loop is unbounded; it ends only on a
    /// terminal status, an error, or process interruption.
    pub async fn watch(&self, order_id: &str) -> ClientResult<Option<Order>> {
        loop {
            let Some(order) = self.get(order_id).await? else {
                return Ok(None);
            };
            if order.status.is_terminal() {
                return Ok(Some(order));
            }
            debug!(id = %order.id, status = %order.status, "order still working");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn is_not_found(value: &Value) -> bool {
    value.get("message").and_then(Value::as_str) == Some("NotFound")
        || value.as_object().is_some_and(|o| o.is_empty())
}

fn parse_order(endpoint: &str, value: Value) -> ClientResult<Order> {
    serde_json::from_value(value).map_err(|e| ClientError::Parse {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}
