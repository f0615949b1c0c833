use serde::de::DeserializeOwned;

use super::Client;
use crate::{
    deposit::Gateway,
    error::Error,
    http::{ApiRequest, Transport},
    response::Response,
    types::{Balance, Order, Position},
};

impl<T: Transport, G: Gateway> Client<T, G> {
    /// Margin balances of the current sub-account.
    pub async fn list_balances(&self) -> Response<Vec<Balance>> {
        let result = self.fetch_authenticated("balances", None).await;
        self.respond(result)
    }

    /// Open positions, optionally filtered by product symbol.
    pub async fn list_positions(&self, symbol: Option<&str>) -> Response<Vec<Position>> {
        let result = self.fetch_authenticated("positionRisk", symbol).await;
        self.respond(result)
    }

    /// Resting orders, optionally filtered by product symbol.
    pub async fn list_open_orders(&self, symbol: Option<&str>) -> Response<Vec<Order>> {
        let result = self.fetch_authenticated("openOrders", symbol).await;
        self.respond(result)
    }

    async fn fetch_authenticated<D: DeserializeOwned>(
        &self,
        path: &str,
        symbol: Option<&str>,
    ) -> Result<D, Error> {
        let request = self
            .authenticate(ApiRequest::get(path))?
            .query_opt("symbol", symbol);
        self.fetch(request).await
    }
}
