//! cbx - command-line client for the exchange's authenticated trading API.
//!
//! Signs requests, places/queries/cancels orders, reports balances and
//! polls market and order state for a single trading pair.

mod app;
mod config;
mod error;

use anyhow::Result;
use app::App;
use cbx_client::{Credential, ExchangeClient};
use cbx_core::{Money, OrderKind, OrderSide};
use clap::{Parser, Subcommand};
use config::Settings;
use std::io::Write as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cbx", version, about = "Trade a single pair from the command line")]
struct Args {
    /// Settings file path (can also be set via CBX_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get the current market ticker
    Ticker,
    /// Get current account balances
    Balance,
    /// Get the list of open orders
    Orders,
    /// Get details of an existing order
    Order { id: String },
    /// Watch an order for completion
    Watch { id: String },
    /// Market buy (shorthand for `market buy`)
    Buy { size: String, price: String },
    /// Market sell (shorthand for `market sell`)
    Sell { size: String, price: String },
    /// Place a market order
    Market {
        side: String,
        size: String,
        price: String,
    },
    /// Place a limit order
    Limit {
        side: String,
        size: String,
        price: String,
    },
    /// Place a stop order
    Stop {
        side: String,
        size: String,
        price: String,
    },
    /// Cancel an existing order
    Cancel { id: String },
    /// Live stream of ticker data
    Live,
    /// Show the top of the level-2 order book
    Orderbook,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };

    let credential = Credential::from_file(&settings.auth_file)?;
    let client = ExchangeClient::new(settings.api_url.clone(), credential)?;
    let app = App::new(client, settings);

    // The whole command races Ctrl-C so an interrupt at any suspension
    // point is a clean, silent exit.
    tokio::select! {
        result = run(&app, args.command) => result,
        _ = tokio::signal::ctrl_c() => std::process::exit(0),
    }
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Ticker => app.ticker().await,
        Command::Balance => app.balance().await,
        Command::Orders => app.open_orders().await,
        Command::Order { id } => app.order_detail(&id).await,
        Command::Watch { id } => app.watch_order(&id).await,
        Command::Buy { size, price } => {
            place(app, OrderKind::Market, OrderSide::Buy, &size, &price).await
        }
        Command::Sell { size, price } => {
            place(app, OrderKind::Market, OrderSide::Sell, &size, &price).await
        }
        Command::Market { side, size, price } => {
            place(app, OrderKind::Market, side.parse()?, &size, &price).await
        }
        Command::Limit { side, size, price } => {
            place(app, OrderKind::Limit, side.parse()?, &size, &price).await
        }
        Command::Stop { side, size, price } => {
            place(app, OrderKind::Stop, side.parse()?, &size, &price).await
        }
        Command::Cancel { id } => app.cancel_order(&id).await,
        Command::Live => app.live().await,
        Command::Orderbook => app.orderbook().await,
    }
}

async fn place(
    app: &App,
    kind: OrderKind,
    side: OrderSide,
    size: &str,
    price: &str,
) -> Result<()> {
    let size: Money = size.parse()?;
    let price: Money = price.parse()?;
    app.place_order(kind, side, size, price, prompt_confirm).await
}

/// Interactive y/N confirmation on stdin.
fn prompt_confirm(prompt: &str) -> bool {
    print!("{prompt}");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
