use alloy::primitives::TxHash;
use fastnum::UD128;
use tracing::info;

use super::{Client, register_referral};
use crate::{
    abi::eip712,
    deposit::{self, DepositRequest, Gateway},
    error::Error,
    http::{ApiRequest, Transport},
    nonce, num,
    response::Response,
    types::{MarginAsset, WithdrawBody, to_u128},
};

impl<T: Transport, G: Gateway> Client<T, G> {
    /// Deposits collateral into the current sub-account.
    ///
    /// Approves the exchange contract for exactly `quantity` first when the
    /// current allowance is insufficient. Resolves once the deposit
    /// transaction is confirmed and returns its hash.
    pub async fn deposit(
        &self,
        quantity: UD128,
        asset: Option<MarginAsset>,
    ) -> Response<Option<TxHash>> {
        let asset = asset.unwrap_or_default();
        info!("Depositing {quantity} {}...", asset.symbol());

        let request = DepositRequest {
            account: self.address,
            sub_account_id: self.sub_account_id(),
            quantity: num::to_wei(quantity),
            asset: self.asset_address(asset),
        };
        let result = deposit::run_deposit(
            &self.gateway,
            self.chain.exchange(),
            request,
            self.receipt_policy,
            tokio::time::sleep,
        )
        .await
        .map(Some)
        .map_err(Error::from);
        self.respond(result)
    }

    /// Requests a withdrawal from the current sub-account.
    pub async fn withdraw(&self, quantity: UD128, asset: Option<MarginAsset>) -> Response<()> {
        let result = self
            .submit_withdraw(quantity, asset.unwrap_or_default())
            .await;
        self.respond(result)
    }

    /// Registers the account under the referral code.
    pub async fn add_referee(&self, code: impl Into<String>) -> Response<()> {
        let code = code.into();
        let result = if code.is_empty() {
            Err(Error::Validation(
                "Referral code must not be empty.".to_string(),
            ))
        } else {
            register_referral(&self.transport, &self.signer, &self.domain, code).await
        };
        self.respond(result)
    }

    async fn submit_withdraw(&self, quantity: UD128, asset: MarginAsset) -> Result<(), Error> {
        let message = eip712::Withdraw {
            account: self.address,
            subAccountId: self.sub_account_id(),
            asset: self.asset_address(asset),
            quantity: to_u128(num::to_wei(quantity), "quantity")?,
            nonce: nonce::precise(),
        };
        let signature = self.sign(&message)?;
        let body = serde_json::to_value(WithdrawBody::new(&message, signature))?;
        self.send(ApiRequest::post("withdraw", body)).await?;
        Ok(())
    }
}
