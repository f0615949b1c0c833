use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::{OrderStatus, ProductId, SubAccountId};

/// Margin balance of a single collateral asset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Balance {
    pub address: Address,
    pub asset: String,
    pub pending_withdrawal: String,
    pub quantity: String,
}

/// Open position with risk figures, amounts are scaled signed integers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    pub account: Address,
    pub sub_account_id: SubAccountId,
    pub product_id: ProductId,
    pub product_symbol: String,
    pub quantity: String,
    pub avg_entry_price: String,
    pub init_cum_funding: String,
    pub pnl: String,
    pub margin: String,
    pub return_on_margin: String,
    pub liquidation_price: String,
    pub accrued_funding: String,
    pub mark_price: String,
    pub current_cum_funding: String,
}

/// Order as reported by the exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    pub id: String,
    pub account: Address,
    pub sender: Address,
    pub sub_account_id: SubAccountId,
    pub product_id: ProductId,
    pub product_symbol: String,
    pub is_buy: bool,
    pub order_type: u8,
    pub time_in_force: u8,
    pub price: String,
    pub quantity: String,
    pub residual_quantity: String,
    pub status: OrderStatus,
    pub nonce: u64,
    pub expiry: u64,
    pub created_at: u64,
    pub signature: String,
}
