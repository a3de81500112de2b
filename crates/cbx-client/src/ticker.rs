//! Market ticker: single fetch and continuous watch.

use crate::error::{ClientError, ClientResult};
use crate::rest::ExchangeApi;
use crate::types::Ticker;
use cbx_core::Money;
use reqwest::Method;
use std::cmp::Ordering;
use std::time::Duration;

/// Price movement between two consecutive ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Classify the current price against the previous one.
    pub fn classify(current: Money, previous: Money) -> Self {
        match current.cmp(&previous) {
            Ordering::Greater => Self::Up,
            Ordering::Less => Self::Down,
            Ordering::Equal => Self::Flat,
        }
    }
}

/// Ticker polling for a single trading pair.
pub struct TickerFeed<C> {
    api: C,
    product_id: String,
    poll_interval: Duration,
}

impl<C: ExchangeApi> TickerFeed<C> {
    /// Create a feed that polls with no delay between ticks. That hammers
    /// the endpoint and will run into rate limits; set a real interval
    /// with [`with_poll_interval`](Self::with_poll_interval) for anything
    /// long-running.
    pub fn new(api: C, product_id: impl Into<String>) -> Self {
        Self {
            api,
            product_id: product_id.into(),
            poll_interval: Duration::ZERO,
        }
    }

    /// Override the delay between polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Fetch the current ticker.
    pub async fn fetch(&self) -> ClientResult<Ticker> {
        let endpoint = format!("products/{}/ticker", self.product_id);
        let value = self.api.call(&endpoint, None, Method::GET, false).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Parse {
            endpoint,
            message: e.to_string(),
        })
    }

    /// Poll the ticker until interrupted, reporting each tick and its
    /// trend relative to the previous price (which starts at zero).
    ///
    /// Never returns `Ok`; it runs until the process is interrupted or a
    /// fetch fails, and the failure is handed back to the caller.
    pub async fn watch(&self, mut on_tick: impl FnMut(&Ticker, Trend)) -> ClientResult<()> {
        let mut last = Money::ZERO;
        loop {
            let ticker = self.fetch().await?;
            on_tick(&ticker, Trend::classify(ticker.price, last));
            last = ticker.price;

            if !self.poll_interval.is_zero() {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
    }
}
