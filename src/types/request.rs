//! JSON bodies of the signed API requests.
//!
//! Scaled 18-decimal amounts travel as decimal strings, timestamps and
//! nonces as plain numbers.

use alloy::primitives::Address;
use serde::Serialize;

use super::{ProductId, SubAccountId};
use crate::abi::eip712;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrder {
    pub account: Address,
    pub sub_account_id: SubAccountId,
    pub product_id: ProductId,
    pub is_buy: bool,
    pub order_type: u8,
    pub time_in_force: u8,
    pub expiration: u64,
    pub price: String,
    pub quantity: String,
    pub nonce: u64,
    pub signature: String,
}

impl SignedOrder {
    pub fn new(message: &eip712::Order, signature: String) -> Self {
        Self {
            account: message.account,
            sub_account_id: message.subAccountId,
            product_id: message.productId,
            is_buy: message.isBuy,
            order_type: message.orderType,
            time_in_force: message.timeInForce,
            expiration: message.expiration,
            price: message.price.to_string(),
            quantity: message.quantity.to_string(),
            nonce: message.nonce,
            signature,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderBody {
    pub account: Address,
    pub sub_account_id: SubAccountId,
    pub product_id: ProductId,
    pub order_id: String,
    pub signature: String,
}

impl CancelOrderBody {
    pub fn new(message: &eip712::CancelOrder, signature: String) -> Self {
        Self {
            account: message.account,
            sub_account_id: message.subAccountId,
            product_id: message.productId,
            order_id: message.orderId.clone(),
            signature,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrdersBody {
    pub account: Address,
    pub sub_account_id: SubAccountId,
    pub product_id: ProductId,
    pub signature: String,
}

impl CancelOrdersBody {
    pub fn new(message: &eip712::CancelOrders, signature: String) -> Self {
        Self {
            account: message.account,
            sub_account_id: message.subAccountId,
            product_id: message.productId,
            signature,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAndReplaceBody {
    pub id_to_cancel: String,
    pub new_order: SignedOrder,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawBody {
    pub account: Address,
    pub asset: Address,
    pub sub_account_id: SubAccountId,
    pub nonce: u64,
    pub quantity: String,
    pub signature: String,
}

impl WithdrawBody {
    pub fn new(message: &eip712::Withdraw, signature: String) -> Self {
        Self {
            account: message.account,
            asset: message.asset,
            sub_account_id: message.subAccountId,
            nonce: message.nonce,
            quantity: message.quantity.to_string(),
            signature,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReferralBody {
    pub account: Address,
    pub code: String,
    pub signature: String,
}

impl ReferralBody {
    pub fn new(message: &eip712::Referral, signature: String) -> Self {
        Self {
            account: message.account,
            code: message.code.clone(),
            signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_signed_order_wire_form() {
        let account = address!("0xb47B0b1e44B932Ae9Bb01817E7010A553A965Ea8");
        let message = eip712::Order {
            account,
            subAccountId: 1,
            productId: 1002,
            isBuy: true,
            orderType: 2,
            timeInForce: 1,
            expiration: 1712421760000,
            price: 3_450_000_000_000_000_000_000,
            quantity: 1_000_000_000_000_000,
            nonce: 1709829760000,
        };
        let body = serde_json::to_value(SignedOrder::new(&message, "0xsig".to_string())).unwrap();
        assert_eq!(
            body,
            json!({
                "account": account,
                "subAccountId": 1,
                "productId": 1002,
                "isBuy": true,
                "orderType": 2,
                "timeInForce": 1,
                "expiration": 1712421760000u64,
                "price": "3450000000000000000000",
                "quantity": "1000000000000000",
                "nonce": 1709829760000u64,
                "signature": "0xsig",
            })
        );
    }

    #[test]
    fn test_cancel_and_replace_wire_form() {
        let message = eip712::Order {
            account: address!("0xb47B0b1e44B932Ae9Bb01817E7010A553A965Ea8"),
            subAccountId: 1,
            productId: 1002,
            isBuy: false,
            orderType: 0,
            timeInForce: 0,
            expiration: 1800000000000,
            price: 1,
            quantity: 2,
            nonce: 3,
        };
        let body = serde_json::to_value(CancelAndReplaceBody {
            id_to_cancel: "0x08d4".to_string(),
            new_order: SignedOrder::new(&message, "0xsig".to_string()),
        })
        .unwrap();
        assert_eq!(body["idToCancel"], "0x08d4");
        assert_eq!(body["newOrder"]["price"], "1");
        assert_eq!(body["newOrder"]["isBuy"], false);
    }
}
