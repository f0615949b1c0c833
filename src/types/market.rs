use std::fmt;

use alloy::primitives::{Address, U256};
use fastnum::UD128;
use serde::{Deserialize, Serialize};

use super::ProductId;
use crate::error::Error;

/// Tradable perpetual product.
///
/// Amounts are 18-decimal scaled integers in decimal string form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: ProductId,
    pub r#type: String,
    pub symbol: String,
    pub active: bool,
    pub base_asset: String,
    pub quote_asset: String,
    pub min_quantity: String,
    pub max_quantity: String,
    pub increment: String,
    pub taker_fee: String,
    pub maker_fee: String,
    pub is_maker_rebate: bool,
    pub initial_long_weight: String,
    pub initial_short_weight: String,
    pub maintenance_long_weight: String,
    pub maintenance_short_weight: String,
    pub base_asset_address: Address,
    pub quote_asset_address: Address,
    pub mark_price: String,
}

impl Product {
    /// Price tick as a scaled integer, as expected by market orders.
    pub fn increment_wei(&self) -> Result<U256, Error> {
        parse_scaled(&self.increment, "increment")
    }

    pub fn mark_price_wei(&self) -> Result<U256, Error> {
        parse_scaled(&self.mark_price, "markPrice")
    }
}

pub(crate) fn parse_scaled(value: &str, field: &str) -> Result<U256, Error> {
    U256::from_str_radix(value, 10)
        .map_err(|e| Error::Validation(format!("invalid {field} {value:?}: {e}")))
}

/// 24 hour rolling window statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticker {
    pub product_id: ProductId,
    pub product_symbol: String,
    pub price_change: String,
    pub price_change_percent: String,
    pub high_price: String,
    pub low_price: String,
    pub last_price: String,
    pub open_price: String,
    pub volume: String,
    pub quote_volume: String,
    pub open_time: u64,
    pub close_time: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kline {
    pub product_id: ProductId,
    pub interval: String,
    pub open_time: u64,
    pub close_time: u64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub quote_volume: String,
}

/// Aggregated depth: `(price, quantity)` levels, best first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderBook {
    pub bids: Vec<(String, String)>,
    pub asks: Vec<(String, String)>,
    pub last_update_id: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trade {
    pub id: String,
    pub product_id: ProductId,
    pub product_symbol: String,
    pub price: String,
    pub quantity: String,
    pub is_buyer_maker: bool,
    pub created_at: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub server_time: u64,
}

/// Kline bucket width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[default]
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "2h")]
    H2,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "8h")]
    H8,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "3d")]
    D3,
    #[serde(rename = "1w")]
    W1,
}

impl Interval {
    pub const ALL: [Interval; 11] = [
        Interval::M1,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H2,
        Interval::H4,
        Interval::H8,
        Interval::D1,
        Interval::D3,
        Interval::W1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H2 => "2h",
            Interval::H4 => "4h",
            Interval::H8 => "8h",
            Interval::D1 => "1d",
            Interval::D3 => "3d",
            Interval::W1 => "1w",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("unknown interval: {s}")))
    }
}

/// Optional kline window filters, all times in unix ms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KlineQuery {
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub interval: Option<Interval>,
    pub limit: Option<u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderBookQuery {
    pub limit: Option<u32>,
    /// Price bucket size of the aggregated levels.
    pub granularity: Option<u32>,
}

/// Hypothetical order for the margin requirement calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MarginQuery {
    pub product_id: ProductId,
    pub is_buy: bool,
    pub price: UD128,
    pub quantity: UD128,
}
