//! Configuration for the command line client.
//!
//! Configuration comes from two sources:
//! - Environment variables (via .env file or shell): key, deployment, endpoints
//! - CLI arguments: the command to run and its parameters

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use fastnum::{UD128, decimal::Context};
use hundredx_sdk::{
    Config, Environment,
    types::{Interval, OrderType, ProductId, SubAccountId, TimeInForce},
};
use itertools::Itertools;
use url::Url;

/// Environment configuration (credentials, deployment).
#[derive(Debug, serde::Deserialize)]
pub struct EnvConfig {
    /// Private key of the trading account
    pub private_key: String,

    /// `mainnet` or `testnet` (default)
    #[serde(default)]
    pub environment: Environment,

    /// Optional RPC endpoint override
    pub rpc_url: Option<String>,

    /// Optional sub-account (default: 1)
    pub sub_account_id: Option<SubAccountId>,

    /// Optional referral code registered on mainnet
    pub referral_code: Option<String>,

    /// Optional API request timeout, none by default
    pub timeout_seconds: Option<u64>,
}

impl EnvConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Client configuration, CLI arguments take precedence.
    pub fn client_config(&self, cli: &CliConfig) -> Result<Config, ConfigError> {
        let mut config = Config::new(self.environment).with_debug(cli.debug);
        if let Some(rpc_url) = &self.rpc_url {
            Url::parse(rpc_url).map_err(|_| ConfigError::InvalidRpcUrl(rpc_url.clone()))?;
            config = config.with_rpc(rpc_url.clone());
        }
        if let Some(sub_account_id) = cli.sub_account_id.or(self.sub_account_id) {
            config = config.with_sub_account_id(sub_account_id);
        }
        if let Some(code) = &self.referral_code {
            config = config.with_referral_code(code.clone());
        }
        if let Some(seconds) = self.timeout_seconds {
            config = config.with_request_timeout(Duration::from_secs(seconds));
        }
        Ok(config)
    }
}

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "hundredx")]
#[command(about = "Command line client for the 100x perpetual exchange")]
pub struct CliConfig {
    /// Log at debug level and report unknown errors in full
    #[arg(long)]
    pub debug: bool,

    /// Sub-account to act on, overrides SUB_ACCOUNT_ID
    #[arg(long)]
    pub sub_account_id: Option<SubAccountId>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all products
    Products,
    /// Show a product by ID or symbol
    Product { product: String },
    /// Show server time
    Time,
    /// Show 24h tickers
    Tickers {
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Show klines of a product
    Klines {
        symbol: String,
        #[arg(long)]
        interval: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        start_time: Option<u64>,
        #[arg(long)]
        end_time: Option<u64>,
    },
    /// Show the order book of a product
    Book {
        symbol: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        granularity: Option<u32>,
    },
    /// Show own trade history on a product
    Trades {
        symbol: String,
        #[arg(long, default_value_t = 100)]
        lookback: u32,
    },
    /// List margin balances
    Balances,
    /// List open positions
    Positions {
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List open orders
    OpenOrders {
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Place an order
    Order {
        product_id: ProductId,
        #[arg(value_enum)]
        side: Side,
        price: String,
        quantity: String,
        #[arg(long, value_enum, default_value_t = CliOrderType::Market)]
        order_type: CliOrderType,
        #[arg(long, value_enum)]
        time_in_force: Option<CliTimeInForce>,
        /// Market order slippage tolerance, e.g. 0.01 for 1%
        #[arg(long)]
        slippage: Option<String>,
    },
    /// Cancel an order
    Cancel { product_id: ProductId, order_id: String },
    /// Cancel all open orders of a product
    CancelAll { product_id: ProductId },
    /// Deposit USDB collateral
    Deposit { quantity: String },
    /// Withdraw USDB collateral
    Withdraw { quantity: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliOrderType {
    Limit,
    LimitMaker,
    Market,
}

impl From<CliOrderType> for OrderType {
    fn from(value: CliOrderType) -> Self {
        match value {
            CliOrderType::Limit => OrderType::Limit,
            CliOrderType::LimitMaker => OrderType::LimitMaker,
            CliOrderType::Market => OrderType::Market,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliTimeInForce {
    Gtc,
    Fok,
    Ioc,
}

impl From<CliTimeInForce> for TimeInForce {
    fn from(value: CliTimeInForce) -> Self {
        match value {
            CliTimeInForce::Gtc => TimeInForce::Gtc,
            CliTimeInForce::Fok => TimeInForce::Fok,
            CliTimeInForce::Ioc => TimeInForce::Ioc,
        }
    }
}

/// Parses a positive decimal amount argument.
pub fn parse_amount(name: &str, value: &str) -> Result<UD128, ConfigError> {
    UD128::from_str(value, Context::default())
        .map_err(|_| ConfigError::InvalidAmount(name.to_string(), value.to_string()))
}

pub fn parse_interval(value: &str) -> Result<Interval, ConfigError> {
    value.parse().map_err(|_| {
        ConfigError::InvalidInterval(
            value.to_string(),
            Interval::ALL.iter().map(Interval::as_str).join(", "),
        )
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {0} value: {1}")]
    InvalidAmount(String, String),

    #[error("Invalid interval {0}, expected one of: {1}")]
    InvalidInterval(String, String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),
}

#[cfg(test)]
mod tests {
    use fastnum::udec128;

    use super::*;

    fn env_config() -> EnvConfig {
        EnvConfig {
            private_key: "0xa608cd43cbc3d59bc51443f475b96a4654e956d6cc91783598a8e76a34000174"
                .to_string(),
            environment: Environment::Mainnet,
            rpc_url: Some("https://rpc.blast.io".to_string()),
            sub_account_id: Some(2),
            referral_code: None,
            timeout_seconds: Some(10),
        }
    }

    #[test]
    fn test_client_config_precedence() {
        let cli = CliConfig::parse_from(["hundredx", "--sub-account-id", "5", "balances"]);
        let config = env_config().client_config(&cli).unwrap();
        assert_eq!(config.environment, Environment::Mainnet);
        assert_eq!(config.sub_account_id, 5);
        assert_eq!(config.rpc.as_deref(), Some("https://rpc.blast.io"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.referral_code, "eaglesx");

        let cli = CliConfig::parse_from(["hundredx", "--debug", "balances"]);
        let config = env_config().client_config(&cli).unwrap();
        assert_eq!(config.sub_account_id, 2);
        assert!(config.debug);
    }

    #[test]
    fn test_invalid_rpc_url() {
        let cli = CliConfig::parse_from(["hundredx", "time"]);
        let env = EnvConfig {
            rpc_url: Some("not a url".to_string()),
            ..env_config()
        };
        assert!(matches!(
            env.client_config(&cli),
            Err(ConfigError::InvalidRpcUrl(_))
        ));
    }

    #[test]
    fn test_parse_order_command() {
        let cli = CliConfig::parse_from([
            "hundredx",
            "order",
            "1002",
            "buy",
            "3450",
            "0.001",
            "--order-type",
            "limit",
            "--time-in-force",
            "ioc",
        ]);
        let Command::Order {
            product_id,
            order_type,
            time_in_force,
            ..
        } = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(product_id, 1002);
        assert_eq!(OrderType::from(order_type), OrderType::Limit);
        assert_eq!(time_in_force.map(TimeInForce::from), Some(TimeInForce::Ioc));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_amount("price", "3450.5").unwrap(), udec128!(3450.5));
        assert!(parse_amount("price", "-1").is_err());
        assert_eq!(parse_interval("4h").unwrap(), Interval::H4);
        let err = parse_interval("2d").unwrap_err();
        assert!(err.to_string().contains("1m, 5m, 15m"));
    }
}
