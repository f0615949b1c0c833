//! Exchange client: request builders over the signing, transport and
//! on-chain layers.
//!
//! Operations are grouped by surface:
//! * `orders`: placement and cancellation.
//! * `funds`: deposits, withdrawals and referrals.
//! * `account`: authenticated account queries.
//! * `market`: public market data.

mod account;
mod funds;
mod market;
mod orders;

use std::{
    sync::atomic::{AtomicU8, Ordering},
    time::Duration,
};

use alloy::{
    primitives::Address,
    signers::local::PrivateKeySigner,
    sol_types::{Eip712Domain, SolStruct},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    Chain, Environment,
    abi::eip712,
    deposit::{Gateway, ReceiptPolicy, RpcGateway},
    error::Error,
    http::{self, ApiRequest, HttpTransport, Transport},
    response::Response,
    signing::{self, TypedDataSigner},
    types::{MarginAsset, ReferralBody, SubAccountId},
};

/// Sub-account used unless configured otherwise.
pub const DEFAULT_SUB_ACCOUNT_ID: SubAccountId = 1;

/// Referral code registered by mainnet clients unless configured otherwise.
pub const DEFAULT_REFERRAL_CODE: &str = "eaglesx";

/// Client construction options.
#[derive(Clone, Debug)]
pub struct Config {
    /// Log unknown failures at error level with full detail.
    pub debug: bool,
    pub environment: Environment,
    /// RPC endpoint override, defaults to the environment node.
    pub rpc: Option<String>,
    pub sub_account_id: SubAccountId,
    /// Referral code registered for the account on mainnet construction.
    pub referral_code: String,
    /// Register [`Config::referral_code`] in the background when a mainnet client
    /// is constructed inside a Tokio runtime.
    pub auto_referral: bool,
    pub receipt_policy: ReceiptPolicy,
    /// Per-request API timeout, the HTTP client default applies if `None`.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            environment: Environment::default(),
            rpc: None,
            sub_account_id: DEFAULT_SUB_ACCOUNT_ID,
            referral_code: DEFAULT_REFERRAL_CODE.to_string(),
            auto_referral: true,
            receipt_policy: ReceiptPolicy::default(),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Default::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_rpc(mut self, rpc: impl Into<String>) -> Self {
        self.rpc = Some(rpc.into());
        self
    }

    pub fn with_sub_account_id(mut self, sub_account_id: SubAccountId) -> Self {
        self.sub_account_id = sub_account_id;
        self
    }

    pub fn with_referral_code(mut self, code: impl Into<String>) -> Self {
        self.referral_code = code.into();
        self
    }

    pub fn with_receipt_policy(mut self, policy: ReceiptPolicy) -> Self {
        self.receipt_policy = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// Exchange client bound to a single account key.
///
/// Everything but the sub-account ID is fixed at construction. The sub-account
/// ID is read when each message is signed, so a change applies to requests
/// built afterwards only.
#[derive(derive_more::Debug)]
pub struct Client<T = HttpTransport, G = RpcGateway> {
    #[debug(skip)]
    signer: PrivateKeySigner,
    address: Address,
    chain: Chain,
    environment: Environment,
    domain: Eip712Domain,
    sub_account_id: AtomicU8,
    debug: bool,
    receipt_policy: ReceiptPolicy,
    transport: T,
    gateway: G,
}

impl Client {
    /// Creates the client for the configured environment.
    ///
    /// Fails on a malformed private key or endpoint URL only, no network
    /// access happens here apart from the optional background referral.
    pub fn new(private_key: &str, config: Config) -> Result<Self, Error> {
        let signer: PrivateKeySigner = private_key.parse()?;
        let mut chain = Chain::for_environment(config.environment);
        if let Some(rpc) = &config.rpc {
            chain = chain.with_rpc_url(rpc.clone());
        }
        let transport = HttpTransport::new(chain.api_url(), config.request_timeout)?;
        let gateway = RpcGateway::new(Url::parse(chain.rpc_url())?, signer.clone());

        Ok(Self::with_parts(signer, chain, &config, transport, gateway))
    }
}

impl<T: Transport, G: Gateway> Client<T, G> {
    /// Assembles the client from explicit parts, e.g. test doubles.
    ///
    /// Mainnet clients with [`Config::auto_referral`] set register
    /// [`Config::referral_code`] in the background.
    pub fn with_parts(
        signer: PrivateKeySigner,
        chain: Chain,
        config: &Config,
        transport: T,
        gateway: G,
    ) -> Self {
        let client = Self {
            address: TypedDataSigner::address(&signer),
            domain: signing::domain(&chain),
            signer,
            chain,
            environment: config.environment,
            sub_account_id: AtomicU8::new(config.sub_account_id),
            debug: config.debug,
            receipt_policy: config.receipt_policy,
            transport,
            gateway,
        };
        info!(
            address = %client.address,
            environment = %client.environment,
            sub_account_id = config.sub_account_id,
            "Client initialized"
        );

        if client.environment == Environment::Mainnet && config.auto_referral {
            client.spawn_referral(config.referral_code.clone());
        }
        client
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub fn sub_account_id(&self) -> SubAccountId {
        self.sub_account_id.load(Ordering::Relaxed)
    }

    /// Switches the sub-account used by requests built from now on.
    pub fn set_sub_account_id(&self, sub_account_id: SubAccountId) {
        self.sub_account_id.store(sub_account_id, Ordering::Relaxed);
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Contract address of the margin asset.
    pub fn asset_address(&self, asset: MarginAsset) -> Address {
        match asset {
            MarginAsset::Usdb => self.chain.usdb(),
        }
    }

    fn sign<S: SolStruct>(&self, message: &S) -> Result<String, Error> {
        signing::sign_hex(&self.signer, message, &self.domain)
    }

    /// Appends the account identity proof to a query request.
    fn authenticate(&self, request: ApiRequest) -> Result<ApiRequest, Error> {
        let message = eip712::SignedAuthentication {
            account: self.address,
            subAccountId: self.sub_account_id(),
        };
        let signature = self.sign(&message)?;
        Ok(request
            .query("account", self.address)
            .query("signature", signature)
            .query("subAccountId", message.subAccountId))
    }

    /// Executes the request, failing on an API reported error.
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, Error> {
        http::check(self.transport.execute(request).await?)
    }

    async fn fetch<D: DeserializeOwned>(&self, request: ApiRequest) -> Result<D, Error> {
        Ok(serde_json::from_value(self.send(request).await?)?)
    }

    fn respond<D: Default>(&self, result: Result<D, Error>) -> Response<D> {
        Response::from_result(result, self.debug)
    }

    fn spawn_referral(&self, code: String) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No Tokio runtime, skipping referral registration");
            return;
        };
        let transport = self.transport.clone();
        let signer = self.signer.clone();
        let domain = self.domain.clone();
        handle.spawn(async move {
            if let Err(err) = register_referral(&transport, &signer, &domain, code).await {
                warn!(%err, "Referral registration failed");
            }
        });
    }
}

async fn register_referral<T: Transport>(
    transport: &T,
    signer: &PrivateKeySigner,
    domain: &Eip712Domain,
    code: String,
) -> Result<(), Error> {
    let message = eip712::Referral {
        account: TypedDataSigner::address(signer),
        code,
    };
    let signature = signing::sign_hex(signer, &message, domain)?;
    let body = serde_json::to_value(ReferralBody::new(&message, signature))?;
    http::check(
        transport
            .execute(ApiRequest::post("referral/add-referee", body))
            .await?,
    )?;
    Ok(())
}

/// Validates that an optional bound falls into `(0, max]`.
fn check_limit(name: &str, value: Option<u32>, max: u32) -> Result<(), Error> {
    match value {
        Some(value) if value == 0 || value > max => Err(Error::Validation(format!(
            "{name} must be greater than 0 and less than or equal to {max}."
        ))),
        _ => Ok(()),
    }
}
