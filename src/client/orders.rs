use futures::future::join_all;
use tracing::debug;

use super::Client;
use crate::{
    abi::eip712,
    deposit::Gateway,
    error::Error,
    http::{ApiRequest, Transport},
    response::Response,
    types::{
        CancelAndReplaceBody, CancelOrderArgs, CancelOrderBody, CancelOrdersBody, Order,
        OrderArgs, OrderId, ProductId, SignedOrder,
    },
};

impl<T: Transport, G: Gateway> Client<T, G> {
    /// Signs and places a single order.
    pub async fn place_order(&self, args: OrderArgs) -> Response<Option<Order>> {
        let result = self.submit_order(&args).await.map(Some);
        self.respond(result)
    }

    /// Places the orders concurrently.
    ///
    /// Results are returned in input order, a failed order does not affect
    /// the others.
    pub async fn place_orders(&self, orders: Vec<OrderArgs>) -> Vec<Response<Option<Order>>> {
        join_all(orders.into_iter().map(|args| self.place_order(args))).await
    }

    pub async fn cancel_order(&self, args: CancelOrderArgs) -> Response<()> {
        let result = self.submit_cancel(&args).await;
        self.respond(result)
    }

    /// Cancels the orders concurrently, results are returned in input order.
    pub async fn cancel_orders(&self, orders: Vec<CancelOrderArgs>) -> Vec<Response<()>> {
        join_all(orders.into_iter().map(|args| self.cancel_order(args))).await
    }

    /// Cancels every open order of the product in the current sub-account.
    pub async fn cancel_all_orders(&self, product_id: ProductId) -> Response<()> {
        let result = self.submit_cancel_all(product_id).await;
        self.respond(result)
    }

    /// Atomically cancels `order_id` and places the new order.
    pub async fn cancel_and_replace_order(
        &self,
        order_id: impl Into<OrderId>,
        args: OrderArgs,
    ) -> Response<Option<Order>> {
        let result = self
            .submit_cancel_and_replace(order_id.into(), &args)
            .await
            .map(Some);
        self.respond(result)
    }

    fn signed_order(&self, args: &OrderArgs) -> Result<SignedOrder, Error> {
        let message = args.to_message(self.address, self.sub_account_id())?;
        let signature = self.sign(&message)?;
        debug!(
            product_id = message.productId,
            sub_account_id = message.subAccountId,
            is_buy = message.isBuy,
            price = %message.price,
            quantity = %message.quantity,
            nonce = message.nonce,
            "Signed order"
        );
        Ok(SignedOrder::new(&message, signature))
    }

    async fn submit_order(&self, args: &OrderArgs) -> Result<Order, Error> {
        let body = serde_json::to_value(self.signed_order(args)?)?;
        self.fetch(ApiRequest::post("order", body)).await
    }

    async fn submit_cancel(&self, args: &CancelOrderArgs) -> Result<(), Error> {
        let message = args.to_message(self.address, self.sub_account_id())?;
        let signature = self.sign(&message)?;
        let body = serde_json::to_value(CancelOrderBody::new(&message, signature))?;
        self.send(ApiRequest::delete("order", body)).await?;
        Ok(())
    }

    async fn submit_cancel_all(&self, product_id: ProductId) -> Result<(), Error> {
        let message = eip712::CancelOrders {
            account: self.address,
            subAccountId: self.sub_account_id(),
            productId: product_id,
        };
        let signature = self.sign(&message)?;
        let body = serde_json::to_value(CancelOrdersBody::new(&message, signature))?;
        self.send(ApiRequest::delete("openOrders", body)).await?;
        Ok(())
    }

    async fn submit_cancel_and_replace(
        &self,
        order_id: OrderId,
        args: &OrderArgs,
    ) -> Result<Order, Error> {
        if order_id.is_empty() {
            return Err(Error::Validation(
                "Order ID to cancel must not be empty.".to_string(),
            ));
        }
        let body = serde_json::to_value(CancelAndReplaceBody {
            id_to_cancel: order_id,
            new_order: self.signed_order(args)?,
        })?;
        self.fetch(ApiRequest::post("order/cancel-and-replace", body))
            .await
    }
}
