use alloy::primitives::{Address, U256};
use fastnum::{UD128, udec128};

use super::*;
use crate::{abi::eip712, error::Error, nonce, num};

/// Default slippage tolerance of market orders, 2.5%.
pub const DEFAULT_SLIPPAGE: UD128 = udec128!(0.025);

/// Type of the placed order.
///
/// * [`OrderType::Limit`] rests on the book at the given price.
/// * [`OrderType::LimitMaker`] is a post-only limit order, rejected if it would match immediately.
/// * [`OrderType::Market`] matches immediately, the signed price caps the execution price
///   with the slippage tolerance applied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum OrderType {
    Limit = 0,
    LimitMaker = 1,
    #[default]
    Market = 2,
}

/// Time in force of the placed order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TimeInForce {
    /// Good till cancelled.
    Gtc = 0,
    /// Fill or kill.
    #[default]
    Fok = 1,
    /// Immediate or cancel.
    Ioc = 2,
}

/// Lifecycle status reported by the API.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Cancelled,
    Expired,
    Filled,
    Open,
    #[default]
    Pending,
    Rejected,
}

impl TryFrom<u8> for OrderType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderType::Limit),
            1 => Ok(OrderType::LimitMaker),
            2 => Ok(OrderType::Market),
            _ => Err(Error::Validation(format!("unknown order type: {value}"))),
        }
    }
}

impl TryFrom<u8> for TimeInForce {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TimeInForce::Gtc),
            1 => Ok(TimeInForce::Fok),
            2 => Ok(TimeInForce::Ioc),
            _ => Err(Error::Validation(format!("unknown time in force: {value}"))),
        }
    }
}

/// Caller-side description of an order to place.
///
/// Price and quantity are human-readable decimals, they get scaled to
/// 18-decimal integers when the order is signed.
#[derive(Clone, derive_more::Debug)]
pub struct OrderArgs {
    pub product_id: ProductId,
    pub is_buy: bool,
    #[debug("{price}")]
    pub price: UD128,
    #[debug("{quantity}")]
    pub quantity: UD128,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Unix ms, defaults to 30 days from signing.
    pub expiration: Option<u64>,
    /// Defaults to the signing time in ms.
    pub nonce: Option<u64>,
    /// Product price tick as a scaled integer, required for market orders.
    pub price_increment: Option<U256>,
    /// Market order slippage tolerance, defaults to [`DEFAULT_SLIPPAGE`].
    pub slippage: Option<UD128>,
}

impl OrderArgs {
    /// Market fill-or-kill order.
    pub fn new(product_id: ProductId, is_buy: bool, price: UD128, quantity: UD128) -> Self {
        Self {
            product_id,
            is_buy,
            price,
            quantity,
            order_type: OrderType::default(),
            time_in_force: TimeInForce::default(),
            expiration: None,
            nonce: None,
            price_increment: None,
            slippage: None,
        }
    }

    /// Good-till-cancelled limit order.
    pub fn limit(product_id: ProductId, is_buy: bool, price: UD128, quantity: UD128) -> Self {
        Self::new(product_id, is_buy, price, quantity)
            .with_order_type(OrderType::Limit)
            .with_time_in_force(TimeInForce::Gtc)
    }

    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    pub fn with_expiration(mut self, expiration: u64) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_price_increment(mut self, price_increment: U256) -> Self {
        self.price_increment = Some(price_increment);
        self
    }

    pub fn with_slippage(mut self, slippage: UD128) -> Self {
        self.slippage = Some(slippage);
        self
    }

    /// Scaled price to sign.
    ///
    /// Market orders get the slippage tolerance applied in the unfavourable
    /// direction and are floored to a multiple of the price increment.
    pub fn signed_price(&self) -> Result<U256, Error> {
        if self.order_type != OrderType::Market {
            return Ok(num::to_wei(self.price));
        }
        let increment = self.price_increment.ok_or_else(|| {
            Error::Validation("A price increment is required for market orders.".to_string())
        })?;
        if increment.is_zero() {
            return Err(Error::Validation(
                "Price increment must be greater than zero.".to_string(),
            ));
        }
        let slippage = self.slippage.unwrap_or(DEFAULT_SLIPPAGE);
        if slippage >= UD128::ONE {
            return Err(Error::Validation(
                "Slippage must be lower than 100%.".to_string(),
            ));
        }
        let adjusted = if self.is_buy {
            self.price * (UD128::ONE + slippage)
        } else {
            self.price * (UD128::ONE - slippage)
        };
        let scaled = num::to_wei(adjusted);
        Ok(scaled - scaled % increment)
    }

    /// Builds the EIP-712 message for the given signer identity.
    pub fn to_message(
        &self,
        account: Address,
        sub_account_id: SubAccountId,
    ) -> Result<eip712::Order, Error> {
        if self.quantity == UD128::ZERO {
            return Err(Error::Validation(
                "Quantity must be greater than zero.".to_string(),
            ));
        }
        Ok(eip712::Order {
            account,
            subAccountId: sub_account_id,
            productId: self.product_id,
            isBuy: self.is_buy,
            orderType: self.order_type as u8,
            timeInForce: self.time_in_force as u8,
            expiration: self.expiration.unwrap_or_else(nonce::default_expiration),
            price: to_u128(self.signed_price()?, "price")?,
            quantity: to_u128(num::to_wei(self.quantity), "quantity")?,
            nonce: self.nonce.unwrap_or_else(nonce::now_ms),
        })
    }
}

/// Order to cancel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancelOrderArgs {
    pub product_id: ProductId,
    pub order_id: OrderId,
}

impl CancelOrderArgs {
    pub fn new(product_id: ProductId, order_id: impl Into<OrderId>) -> Self {
        Self {
            product_id,
            order_id: order_id.into(),
        }
    }

    pub fn to_message(
        &self,
        account: Address,
        sub_account_id: SubAccountId,
    ) -> Result<eip712::CancelOrder, Error> {
        if self.order_id.is_empty() {
            return Err(Error::Validation("Order ID must not be empty.".to_string()));
        }
        Ok(eip712::CancelOrder {
            account,
            subAccountId: sub_account_id,
            productId: self.product_id,
            orderId: self.order_id.clone(),
        })
    }
}

pub(crate) fn to_u128(value: U256, field: &str) -> Result<u128, Error> {
    u128::try_from(value)
        .map_err(|_| Error::Validation(format!("{field} exceeds the uint128 range")))
}
