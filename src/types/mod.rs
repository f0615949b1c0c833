mod account;
mod market;
mod order;
mod request;

pub use account::*;
pub use market::*;
pub use order::{CancelOrderArgs, OrderArgs, OrderStatus, OrderType, TimeInForce, DEFAULT_SLIPPAGE};
pub use request::*;

pub(crate) use market::parse_scaled;
pub(crate) use order::to_u128;

/// ID of the exchange product (perpetual contract).
pub type ProductId = u32;

/// Sub-account index of the trading account.
pub type SubAccountId = u8;

/// Exchange-assigned order ID (hex digest).
pub type OrderId = String;

/// Product lookup key: numeric ID or symbol, e.g. `ethperp`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProductRef {
    Id(ProductId),
    Symbol(String),
}

impl From<ProductId> for ProductRef {
    fn from(value: ProductId) -> Self {
        ProductRef::Id(value)
    }
}

impl From<&str> for ProductRef {
    fn from(value: &str) -> Self {
        ProductRef::Symbol(value.to_string())
    }
}

impl From<String> for ProductRef {
    fn from(value: String) -> Self {
        ProductRef::Symbol(value)
    }
}

/// Collateral assets accepted by the exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarginAsset {
    #[default]
    Usdb,
}

impl MarginAsset {
    pub fn symbol(&self) -> &'static str {
        match self {
            MarginAsset::Usdb => "USDB",
        }
    }
}
