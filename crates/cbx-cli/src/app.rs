//! Command execution and console presentation.
//!
//! Results go to stdout. API failures print their full diagnostic block
//! and leave the exit code at zero; only startup errors are fatal.

use crate::config::Settings;
use anyhow::Result;
use cbx_client::{
    Account, CancelOutcome, ClientError, ExchangeClient, Order, OrderLifecycle, TickerFeed, Trend,
};
use cbx_core::{Money, OrderKind, OrderSide, OrderStatus};
use std::time::Duration;

// ANSI palette for the live ticker.
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

pub struct App {
    client: ExchangeClient,
    settings: Settings,
}

impl App {
    pub fn new(client: ExchangeClient, settings: Settings) -> Self {
        Self { client, settings }
    }

    fn lifecycle(&self) -> OrderLifecycle<ExchangeClient> {
        OrderLifecycle::new(self.client.clone(), self.settings.product_id.clone())
            .with_poll_interval(Duration::from_secs(self.settings.order_poll_secs))
    }

    fn feed(&self) -> TickerFeed<ExchangeClient> {
        TickerFeed::new(self.client.clone(), self.settings.product_id.clone())
            .with_poll_interval(Duration::from_millis(self.settings.ticker_poll_ms))
    }

    /// `ticker`: print the current market price.
    pub async fn ticker(&self) -> Result<()> {
        match self.feed().fetch().await {
            Ok(ticker) => println!("Market price: {}", ticker.price.display_usd()),
            Err(err) => report(err),
        }
        Ok(())
    }

    /// `balance`: print BTC and USD account balances.
    pub async fn balance(&self) -> Result<()> {
        match self.client.accounts().await {
            Ok(accounts) => {
                for account in accounts
                    .iter()
                    .filter(|a| a.currency == "BTC" || a.currency == "USD")
                {
                    println!("{}", balance_line(account));
                }
            }
            Err(err) => report(err),
        }
        Ok(())
    }

    /// `orders`: list open orders.
    pub async fn open_orders(&self) -> Result<()> {
        match self.client.open_orders().await {
            Ok(orders) => {
                for order in &orders {
                    println!("{}", order_line(order));
                }
            }
            Err(err) => report(err),
        }
        Ok(())
    }

    /// `order <id>`: print the current snapshot of one order.
    pub async fn order_detail(&self, id: &str) -> Result<()> {
        match self.lifecycle().get(id).await {
            Ok(Some(order)) => println!("{}", describe_order(&order)),
            Ok(None) => println!("Order not found"),
            Err(err) => report(err),
        }
        Ok(())
    }

    /// `watch <id>`: poll the order until it reaches a terminal status.
    pub async fn watch_order(&self, id: &str) -> Result<()> {
        let lifecycle = self.lifecycle();
        match lifecycle.get(id).await {
            Ok(Some(order)) => {
                println!("{}", describe_order(&order));
                if order.status.is_terminal() {
                    return Ok(());
                }
                match lifecycle.watch(id).await {
                    Ok(Some(order)) => println!("{}", describe_order(&order)),
                    Ok(None) => println!("Order not found"),
                    Err(err) => report(err),
                }
            }
            Ok(None) => println!("Order not found"),
            Err(err) => report(err),
        }
        Ok(())
    }

    /// Place an order after the caller-supplied confirmation.
    ///
    /// The three failure shapes stay distinguishable: declined (nothing
    /// sent), failed to send (transport), rejected by the exchange.
    pub async fn place_order(
        &self,
        kind: OrderKind,
        side: OrderSide,
        size: Money,
        price: Money,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<()> {
        let prompt = format!(
            "Place {kind} {side} order for {} BTC at ${}/coin (y/N)? ",
            size.display_btc(),
            price.display_usd()
        );
        if !confirm(&prompt) {
            println!("Order not placed (declined)");
            return Ok(());
        }

        match self.lifecycle().place(kind, side, size, price).await {
            Ok(order) if order.status == OrderStatus::Rejected => {
                println!("Order was rejected by the exchange (ID {})", order.id);
            }
            Ok(order) => println!("Order placed successfully (ID {})", order.id),
            Err(err @ ClientError::Transport { .. }) => {
                println!("Failed to send order: {err}");
            }
            Err(err) => {
                println!("Failed to place order!");
                report(err);
            }
        }
        Ok(())
    }

    /// `cancel <id>`: cancel an order, describing what was cancelled.
    pub async fn cancel_order(&self, id: &str) -> Result<()> {
        match self.lifecycle().cancel(id).await {
            Ok(CancelOutcome::Cancelled(order)) => {
                println!(
                    "Cancelled {} {} order for {} BTC at ${}/coin",
                    order.kind,
                    order.side,
                    order.size.display_btc(),
                    order.price.display_usd()
                );
            }
            Ok(CancelOutcome::NotFound) => println!("Order does not exist"),
            Err(err) => {
                println!("Failed to cancel order!");
                report(err);
            }
        }
        Ok(())
    }

    /// `live`: stream the ticker until interrupted.
    pub async fn live(&self) -> Result<()> {
        let result = self
            .feed()
            .watch(|ticker, trend| println!("{}", ticker_line(ticker.price, trend)))
            .await;
        if let Err(err) = result {
            report(err);
        }
        Ok(())
    }

    /// `orderbook`: fetch the level-2 book and print the top of it.
    pub async fn orderbook(&self) -> Result<()> {
        match self.client.book(&self.settings.product_id, 2).await {
            Ok(book) => {
                match (book.bids.first(), book.asks.first()) {
                    (Some(bid), Some(ask)) => {
                        println!(
                            "Best bid: {} BTC at ${} ({} orders)",
                            bid.1.display_btc(),
                            bid.0.display_usd(),
                            bid.2
                        );
                        println!(
                            "Best ask: {} BTC at ${} ({} orders)",
                            ask.1.display_btc(),
                            ask.0.display_usd(),
                            ask.2
                        );
                    }
                    _ => println!("Order book is empty"),
                }
                println!(
                    "{} bid levels, {} ask levels",
                    book.bids.len(),
                    book.asks.len()
                );
            }
            Err(err) => report(err),
        }
        Ok(())
    }
}

/// Print a client failure with its full diagnostic context.
fn report(err: ClientError) {
    println!("{err}");
}

fn balance_line(account: &Account) -> String {
    let amount = if account.currency == "USD" {
        account.balance.display_usd()
    } else {
        account.balance.display_btc()
    };
    format!("{}: {}", account.currency, amount)
}

fn order_line(order: &Order) -> String {
    format!(
        "{} ({}): {} {} {}BTC at ${}",
        order.id,
        order.status,
        order.kind,
        order.side,
        order.size.display_btc(),
        order.price.display_usd()
    )
}

fn describe_order(order: &Order) -> String {
    match &order.status {
        status if status.is_success() => {
            let verb = if order.side == OrderSide::Sell {
                "Sold"
            } else {
                "Bought"
            };
            format!(
                "{verb} {} BTC for ${}",
                order.filled_size.display_btc(),
                order.funds.display_usd()
            )
        }
        OrderStatus::Rejected => "Order was rejected".to_string(),
        OrderStatus::Other(status) => format!("Error processing order (status: {status})"),
        status => format!(
            "{} {} {}BTC at ${} ({status})",
            order.kind,
            order.side,
            order.size.display_btc(),
            order.price.display_usd()
        ),
    }
}

fn ticker_line(price: Money, trend: Trend) -> String {
    let price = price.display_usd();
    match trend {
        Trend::Up => format!("Market price: {GREEN}{price}{RESET}"),
        Trend::Down => format!("Market price: {RED}{price}{RESET}"),
        Trend::Flat => format!("Market price: {price}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn order(status: &str, side: &str) -> Order {
        serde_json::from_value(json!({
            "id": "68e6a28f",
            "product_id": "BTC-USD",
            "type": "limit",
            "side": side,
            "size": "0.50000000",
            "price": "30000.00000000",
            "status": status,
            "filled_size": "0.50000000",
            "funds": "15000.00"
        }))
        .unwrap()
    }

    #[test]
    fn test_describe_filled_order_uses_side_verb() {
        assert_eq!(
            describe_order(&order("done", "buy")),
            "Bought 0.50000000 BTC for $15000.00"
        );
        assert_eq!(
            describe_order(&order("settled", "sell")),
            "Sold 0.50000000 BTC for $15000.00"
        );
    }

    #[test]
    fn test_describe_rejected_and_unknown() {
        assert_eq!(describe_order(&order("rejected", "buy")), "Order was rejected");
        assert_eq!(
            describe_order(&order("haunted", "buy")),
            "Error processing order (status: haunted)"
        );
    }

    #[test]
    fn test_describe_working_order() {
        assert_eq!(
            describe_order(&order("open", "buy")),
            "limit buy 0.50000000BTC at $30000.00 (open)"
        );
    }

    #[test]
    fn test_order_line() {
        assert_eq!(
            order_line(&order("open", "sell")),
            "68e6a28f (open): limit sell 0.50000000BTC at $30000.00"
        );
    }

    #[test]
    fn test_balance_line_precision_per_currency() {
        let btc: Account = serde_json::from_value(json!({
            "currency": "BTC", "balance": "1.23456789"
        }))
        .unwrap();
        let usd: Account = serde_json::from_value(json!({
            "currency": "USD", "balance": "5000.505"
        }))
        .unwrap();

        assert_eq!(balance_line(&btc), "BTC: 1.23456789");
        assert_eq!(balance_line(&usd), "USD: 5000.50");
    }

    #[test]
    fn test_ticker_line_colors_trends() {
        let price = Money::new(dec!(30000));
        assert_eq!(
            ticker_line(price, Trend::Up),
            "Market price: \x1b[32m30000.00\x1b[0m"
        );
        assert_eq!(
            ticker_line(price, Trend::Down),
            "Market price: \x1b[31m30000.00\x1b[0m"
        );
        assert_eq!(ticker_line(price, Trend::Flat), "Market price: 30000.00");
    }
}
