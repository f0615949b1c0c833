//! Command line client for the 100x perpetual exchange.
//!
//! Reads the account key and deployment from the environment, runs a single
//! command and prints the response as JSON.

mod config;
mod error;

use std::process::exit;

use clap::Parser;
use hundredx_sdk::{
    Client, Response,
    types::{CancelOrderArgs, KlineQuery, OrderArgs, OrderBookQuery, OrderType, ProductRef},
};
use serde::Serialize;
use tracing::{error, info};

use config::{CliConfig, Command, EnvConfig, Side, parse_amount, parse_interval};
use error::Result;

#[tokio::main]
async fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to parse environment configuration: {}", e);
            exit(1);
        }
    };

    let cli_config = CliConfig::parse();

    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", if cli_config.debug { "debug" } else { "info" });
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(env_config, cli_config).await {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            error!(%e, "Command failed");
            exit(1);
        }
    }
}

/// Runs the command, returns whether the exchange reported success.
async fn run(env_config: EnvConfig, cli_config: CliConfig) -> Result<bool> {
    let config = env_config.client_config(&cli_config)?;
    let client = Client::new(&env_config.private_key, config)?;
    info!(
        address = %client.address(),
        environment = %client.environment(),
        sub_account_id = client.sub_account_id(),
        "Client ready"
    );

    match cli_config.command {
        Command::Products => render(&client.get_products().await),
        Command::Product { product } => {
            let product = match product.parse() {
                Ok(id) => ProductRef::Id(id),
                Err(_) => ProductRef::Symbol(product),
            };
            render(&client.get_product(product).await)
        }
        Command::Time => render(&client.get_server_time().await),
        Command::Tickers { symbol } => render(&client.get_tickers(symbol.as_deref()).await),
        Command::Klines {
            symbol,
            interval,
            limit,
            start_time,
            end_time,
        } => {
            let query = KlineQuery {
                start_time,
                end_time,
                interval: interval.as_deref().map(parse_interval).transpose()?,
                limit,
            };
            render(&client.get_klines(&symbol, query).await)
        }
        Command::Book {
            symbol,
            limit,
            granularity,
        } => {
            let query = OrderBookQuery { limit, granularity };
            render(&client.get_order_book(&symbol, query).await)
        }
        Command::Trades { symbol, lookback } => {
            render(&client.get_trade_history(&symbol, lookback).await)
        }
        Command::Balances => render(&client.list_balances().await),
        Command::Positions { symbol } => render(&client.list_positions(symbol.as_deref()).await),
        Command::OpenOrders { symbol } => {
            render(&client.list_open_orders(symbol.as_deref()).await)
        }
        Command::Order {
            product_id,
            side,
            price,
            quantity,
            order_type,
            time_in_force,
            slippage,
        } => {
            let price = parse_amount("price", &price)?;
            let quantity = parse_amount("quantity", &quantity)?;
            let is_buy = matches!(side, Side::Buy);
            let mut args = match OrderType::from(order_type) {
                OrderType::Market => OrderArgs::new(product_id, is_buy, price, quantity),
                other => OrderArgs::limit(product_id, is_buy, price, quantity).with_order_type(other),
            };
            if let Some(time_in_force) = time_in_force {
                args = args.with_time_in_force(time_in_force.into());
            }
            if let Some(slippage) = slippage {
                args = args.with_slippage(parse_amount("slippage", &slippage)?);
            }
            if args.order_type == OrderType::Market {
                // Slippage price is rounded down to the product increment.
                if let Some(product) = client.get_product(product_id).await.into_result()? {
                    args = args.with_price_increment(product.increment_wei()?);
                }
            }
            render(&client.place_order(args).await)
        }
        Command::Cancel {
            product_id,
            order_id,
        } => render(
            &client
                .cancel_order(CancelOrderArgs::new(product_id, order_id))
                .await,
        ),
        Command::CancelAll { product_id } => render(&client.cancel_all_orders(product_id).await),
        Command::Deposit { quantity } => {
            let quantity = parse_amount("quantity", &quantity)?;
            render(&client.deposit(quantity, None).await)
        }
        Command::Withdraw { quantity } => {
            let quantity = parse_amount("quantity", &quantity)?;
            render(&client.withdraw(quantity, None).await)
        }
    }
}

fn render<T: Serialize>(response: &Response<T>) -> Result<bool> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(response.is_success())
}
