use alloy::primitives::U256;
use fastnum::UD128;
use serde::Deserialize;
use serde_json::Value;

use super::{Client, check_limit};
use crate::{
    deposit::Gateway,
    error::Error,
    http::{ApiRequest, Transport},
    nonce, num,
    response::Response,
    types::{
        Kline, KlineQuery, MarginQuery, OrderBook, OrderBookQuery, Product, ProductRef,
        ServerTime, Ticker, Trade, parse_scaled,
    },
};

/// Upper bound of the kline, depth and trade history page sizes.
pub const MAX_LIMIT: u32 = 1000;

/// Endpoints answering with a bare object for a single match and a list otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl<T: Transport, G: Gateway> Client<T, G> {
    pub async fn get_products(&self) -> Response<Vec<Product>> {
        let result = self.fetch(ApiRequest::get("products")).await;
        self.respond(result)
    }

    /// Looks the product up by numeric ID or symbol.
    pub async fn get_product(&self, product: impl Into<ProductRef>) -> Response<Option<Product>> {
        let request = match product.into() {
            ProductRef::Id(id) => ApiRequest::get(format!("products/product-by-id/{id}")),
            ProductRef::Symbol(symbol) => ApiRequest::get("products").segment(&symbol),
        };
        let result = self.fetch(request).await.map(Some);
        self.respond(result)
    }

    /// Exchange server time in unix ms.
    pub async fn get_server_time(&self) -> Response<Option<u64>> {
        let result = self
            .fetch::<ServerTime>(ApiRequest::get("time"))
            .await
            .map(|time| Some(time.server_time));
        self.respond(result)
    }

    /// 24 hour statistics of all products, or of the given one.
    pub async fn get_tickers(&self, symbol: Option<&str>) -> Response<Vec<Ticker>> {
        let request = ApiRequest::get("ticker/24hr").query_opt("symbol", symbol);
        let result = self
            .fetch::<OneOrMany<Ticker>>(request)
            .await
            .map(Vec::from);
        self.respond(result)
    }

    pub async fn get_klines(&self, symbol: &str, query: KlineQuery) -> Response<Vec<Kline>> {
        let result = match validate_kline_query(&query, nonce::now_ms()) {
            Ok(()) => {
                let request = ApiRequest::get("uiKlines")
                    .query("symbol", symbol)
                    .query_opt("endTime", query.end_time)
                    .query_opt("interval", query.interval)
                    .query_opt("limit", query.limit)
                    .query_opt("startTime", query.start_time);
                self.fetch(request).await
            }
            Err(err) => Err(err),
        };
        self.respond(result)
    }

    pub async fn get_order_book(
        &self,
        symbol: &str,
        query: OrderBookQuery,
    ) -> Response<Option<OrderBook>> {
        let result = match validate_order_book_query(&query) {
            Ok(()) => {
                let request = ApiRequest::get("depth")
                    .query("symbol", symbol)
                    .query_opt("limit", query.limit)
                    .query_opt("granularity", query.granularity);
                self.fetch(request).await.map(Some)
            }
            Err(err) => Err(err),
        };
        self.respond(result)
    }

    /// Recent trades of the current sub-account on the product.
    pub async fn get_trade_history(&self, symbol: &str, lookback: u32) -> Response<Vec<Trade>> {
        let result = match check_limit("Lookback", Some(lookback), MAX_LIMIT) {
            Ok(()) => {
                let request = ApiRequest::get("trade-history")
                    .query("symbol", symbol)
                    .query("lookback", lookback)
                    .query("account", self.address)
                    .query("subAccountId", self.sub_account_id());
                self.fetch(request).await
            }
            Err(err) => Err(err),
        };
        self.respond(result)
    }

    /// Initial margin the hypothetical order would require, as a scaled integer.
    pub async fn calculate_margin_requirement(&self, query: MarginQuery) -> Response<Option<U256>> {
        let result = self.fetch_margin_requirement(query).await.map(Some);
        self.respond(result)
    }

    async fn fetch_margin_requirement(&self, query: MarginQuery) -> Result<U256, Error> {
        if query.price == UD128::ZERO || query.quantity == UD128::ZERO {
            return Err(Error::Validation(
                "Price and quantity must be greater than zero.".to_string(),
            ));
        }
        let request = ApiRequest::get("new-order-margin")
            .query("isBuy", query.is_buy)
            .query("price", num::to_wei(query.price))
            .query("productId", query.product_id)
            .query("quantity", num::to_wei(query.quantity));
        parse_margin(&self.send(request).await?)
    }
}

fn validate_kline_query(query: &KlineQuery, now: u64) -> Result<(), Error> {
    check_limit("Limit", query.limit, MAX_LIMIT)?;
    if let Some(start) = query.start_time {
        if query.end_time.is_some_and(|end| start > end) {
            return Err(Error::Validation(
                "Start time must be before end time.".to_string(),
            ));
        }
        if start > now {
            return Err(Error::Validation(
                "Start time must not be in the future.".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_order_book_query(query: &OrderBookQuery) -> Result<(), Error> {
    check_limit("Limit", query.limit, MAX_LIMIT)?;
    if query.granularity == Some(0) {
        return Err(Error::Validation(
            "Granularity must be greater than 0.".to_string(),
        ));
    }
    Ok(())
}

/// Accepts `{"margin": "<scaled>"}` or the bare scaled amount.
fn parse_margin(value: &Value) -> Result<U256, Error> {
    let margin = match value {
        Value::Object(object) => object.get("margin"),
        other => Some(other),
    };
    match margin {
        Some(Value::String(s)) => parse_scaled(s, "margin"),
        Some(Value::Number(n)) => parse_scaled(&n.to_string(), "margin"),
        _ => Err(Error::UnexpectedResponse(value.to_string())),
    }
}
