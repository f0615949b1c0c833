//! On-chain collateral deposit flow.
//!
//! The deposit is a two step sequence: ERC-20 allowance top-up for the
//! exchange contract (only when the current allowance is insufficient),
//! followed by the exchange `deposit` call. Each submitted transaction is
//! awaited by polling for its receipt.

use std::{future::Future, time::Duration};

use alloy::{
    network::EthereumWallet,
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::client::RpcClient,
    signers::local::PrivateKeySigner,
};
use tracing::{debug, info};
use url::Url;

use crate::{
    abi::{ciao::Ciao, erc20::IERC20},
    error::{ChainError, ProviderError, RevertReason},
    types::SubAccountId,
};

/// Chain access needed by the deposit flow.
///
/// State-changing calls are simulated first, so contract reverts surface
/// as decoded [`RevertReason`]s before anything is broadcast.
pub trait Gateway: Clone + Send + Sync + 'static {
    fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = Result<U256, ChainError>> + Send;

    fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = Result<TxHash, ChainError>> + Send;

    fn deposit(
        &self,
        exchange: Address,
        request: DepositRequest,
    ) -> impl Future<Output = Result<TxHash, ChainError>> + Send;

    /// `None` while the transaction is not mined, otherwise its success flag.
    fn receipt_status(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = Result<Option<bool>, ChainError>> + Send;
}

/// Arguments of the exchange `deposit` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositRequest {
    pub account: Address,
    pub sub_account_id: SubAccountId,
    /// Scaled 18-decimal amount.
    pub quantity: U256,
    pub asset: Address,
}

/// [`Gateway`] over a JSON-RPC node, signing with the client key.
#[derive(Clone, Debug)]
pub struct RpcGateway {
    provider: DynProvider,
    owner: Address,
}

impl RpcGateway {
    pub fn new(rpc_url: Url, signer: PrivateKeySigner) -> Self {
        let owner = signer.address();
        let provider = DynProvider::new(
            ProviderBuilder::new()
                .wallet(EthereumWallet::new(signer))
                .connect_client(RpcClient::new_http(rpc_url)),
        );
        Self { provider, owner }
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

impl Gateway for RpcGateway {
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError> {
        let token = IERC20::new(token, self.provider.clone());
        Ok(token.allowance(owner, spender).call().await?)
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, ChainError> {
        let token = IERC20::new(token, self.provider.clone());
        let call = token.approve(spender, amount).from(self.owner);
        call.call().await?;
        let pending = call.send().await?;
        debug!(tx_hash = %pending.tx_hash(), %spender, %amount, "Approval submitted");
        Ok(*pending.tx_hash())
    }

    async fn deposit(
        &self,
        exchange: Address,
        request: DepositRequest,
    ) -> Result<TxHash, ChainError> {
        let exchange = Ciao::new(exchange, self.provider.clone());
        let call = exchange
            .deposit(
                request.account,
                request.sub_account_id,
                request.quantity,
                request.asset,
            )
            .from(self.owner);
        call.call().await?;
        let pending = call.send().await?;
        debug!(tx_hash = %pending.tx_hash(), ?request, "Deposit submitted");
        Ok(*pending.tx_hash())
    }

    async fn receipt_status(&self, hash: TxHash) -> Result<Option<bool>, ChainError> {
        let receipt = self.provider.get_transaction_receipt(hash).await?;
        Ok(receipt.map(|r| r.status()))
    }
}

/// How transaction receipts are awaited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiptPolicy {
    /// Delay between receipt lookups.
    pub interval: Duration,
    /// Lookups before giving up with [`ProviderError::Timeout`], unbounded if `None`.
    pub max_attempts: Option<u32>,
}

impl ReceiptPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn unbounded() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: None,
        }
    }

    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: Some(max_attempts),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Polls until the transaction receipt is available.
///
/// Lookup errors and missing receipts are retried after `policy.interval`.
/// A receipt with failed status is reported as a revert with unknown reason.
pub async fn await_receipt<G, F, Fut>(
    gateway: &G,
    hash: TxHash,
    policy: ReceiptPolicy,
    sleep: F,
) -> Result<(), ChainError>
where
    G: Gateway,
    F: Fn(Duration) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match gateway.receipt_status(hash).await {
            Ok(Some(true)) => return Ok(()),
            Ok(Some(false)) => {
                return Err(ProviderError::Reverted(Box::new(RevertReason::Unknown)));
            }
            Ok(None) => debug!(%hash, attempt, "Receipt not available yet"),
            Err(err) => debug!(%hash, attempt, %err, "Receipt lookup failed"),
        }
        if policy.max_attempts.is_some_and(|max| attempt >= max) {
            return Err(ProviderError::Timeout);
        }
        sleep(policy.interval).await;
    }
}

/// Runs the approve-then-deposit sequence and returns the deposit transaction hash.
///
/// Approval is requested for exactly the deposited amount and only when the
/// current allowance of `exchange` falls short of it.
pub async fn run_deposit<G, F, Fut>(
    gateway: &G,
    exchange: Address,
    request: DepositRequest,
    policy: ReceiptPolicy,
    sleep: F,
) -> Result<TxHash, ChainError>
where
    G: Gateway,
    F: Fn(Duration) -> Fut,
    Fut: Future<Output = ()>,
{
    let allowance = gateway
        .allowance(request.asset, request.account, exchange)
        .await?;
    if allowance < request.quantity {
        debug!(%allowance, quantity = %request.quantity, "Allowance insufficient, approving");
        let hash = gateway
            .approve(request.asset, exchange, request.quantity)
            .await?;
        info!("Waiting for approval confirmation...");
        await_receipt(gateway, hash, policy, &sleep).await?;
    }

    let hash = gateway.deposit(exchange, request).await?;
    info!("Waiting for deposit confirmation...");
    await_receipt(gateway, hash, policy, &sleep).await?;
    info!(tx_hash = %hash, "Deposit completed!");
    Ok(hash)
}
