//! Scripted test doubles and fixtures.
//!
//! [`MockTransport`] answers API requests from a queue of scripted responses
//! and records every request it receives, [`MockGateway`] plays the chain side
//! of the deposit flow.
//!
//! [`client`] wires both into a testnet [`Client`] signing with the well-known
//! test key [`PRIVATE_KEY`] under the [`chain`] fixture domain.
//!

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use alloy::{
    primitives::{Address, B256, Bytes, TxHash, U256, address, b256},
    signers::local::PrivateKeySigner,
};
use serde_json::Value;

use crate::{
    Chain, Client, Config, Environment,
    deposit::{DepositRequest, Gateway},
    error::{ChainError, Error, ProviderError, RevertReason},
    http::{ApiRequest, Transport},
};

/// Test account key, holds no funds on any network.
pub const PRIVATE_KEY: &str = "0xa608cd43cbc3d59bc51443f475b96a4654e956d6cc91783598a8e76a34000174";

/// Address derived from [`PRIVATE_KEY`].
pub const ADDRESS: Address = address!("0xb47B0b1e44B932Ae9Bb01817E7010A553A965Ea8");

pub const APPROVE_TX_HASH: TxHash =
    b256!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

pub const DEPOSIT_TX_HASH: TxHash =
    b256!("0xdddddddddddddddddddddddddddddddddddddddddddddddddddddddddddddddd");

/// Verifying contract the known signature vectors were produced with.
pub const FIXTURE_VERIFIER: Address = address!("0x65CbB566D1A6E60107c0c7888761de1AdFa1ccC0");

/// Testnet deployment with the signing domain of the known signature vectors.
pub fn chain() -> Chain {
    let testnet = Chain::testnet();
    Chain::custom(
        testnet.chain_id(),
        testnet.api_url().to_string(),
        testnet.rpc_url().to_string(),
        testnet.exchange(),
        FIXTURE_VERIFIER,
        testnet.usdb(),
    )
}

pub fn signer() -> PrivateKeySigner {
    PRIVATE_KEY.parse().unwrap()
}

/// Testnet client over the given doubles with the default configuration.
pub fn client<T: Transport, G: Gateway>(transport: T, gateway: G) -> Client<T, G> {
    client_with_config(transport, gateway, &Config::default())
}

pub fn client_with_config<T: Transport, G: Gateway>(
    transport: T,
    gateway: G,
    config: &Config,
) -> Client<T, G> {
    let chain = match config.environment {
        Environment::Testnet => chain(),
        Environment::Mainnet => Chain::mainnet(),
    };
    Client::with_parts(
        signer(),
        chain,
        config,
        transport,
        gateway,
    )
}

/// [`Transport`] replaying scripted responses in request order.
///
/// Once the queue is drained every request gets the fallback response, or a
/// transport failure if none is set.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

#[derive(Debug, Default)]
struct TransportState {
    responses: VecDeque<Result<Value, String>>,
    fallback: Option<Value>,
    requests: Vec<ApiRequest>,
}

impl MockTransport {
    pub fn with_fallback(self, response: Value) -> Self {
        self.state.lock().unwrap().fallback = Some(response);
        self
    }

    pub fn push_response(&self, response: Value) -> &Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Ok(response));
        self
    }

    /// Scripts a connection level failure.
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Err(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, Error> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        match state.responses.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(Error::Transport(message)),
            None => state
                .fallback
                .clone()
                .ok_or_else(|| Error::Transport("no scripted response".to_string())),
        }
    }
}

/// Calls received by [`MockGateway`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    Allowance {
        token: Address,
        owner: Address,
        spender: Address,
    },
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Deposit {
        exchange: Address,
        request: DepositRequest,
    },
    Receipt(TxHash),
}

/// [`Gateway`] with a fixed allowance and scripted receipt lookups.
///
/// Approvals and deposits succeed with [`APPROVE_TX_HASH`] and
/// [`DEPOSIT_TX_HASH`] unless a deposit revert is set. Receipt lookups
/// report success once the scripted ones are drained.
#[derive(Clone, Debug, Default)]
pub struct MockGateway {
    state: Arc<Mutex<GatewayState>>,
}

#[derive(Debug, Default)]
struct GatewayState {
    allowance: U256,
    deposit_revert: Option<Bytes>,
    deposit_failure: Option<String>,
    receipts: VecDeque<Result<Option<bool>, String>>,
    calls: Vec<GatewayCall>,
}

impl MockGateway {
    pub fn with_allowance(self, allowance: U256) -> Self {
        self.state.lock().unwrap().allowance = allowance;
        self
    }

    /// Makes the deposit simulation revert with the given data.
    pub fn with_deposit_revert(self, data: Bytes) -> Self {
        self.state.lock().unwrap().deposit_revert = Some(data);
        self
    }

    /// Makes the deposit fail with a non-revert RPC error.
    pub fn with_deposit_failure(self, message: impl Into<String>) -> Self {
        self.state.lock().unwrap().deposit_failure = Some(message.into());
        self
    }

    pub fn push_receipt(&self, status: Option<bool>) -> &Self {
        self.state.lock().unwrap().receipts.push_back(Ok(status));
        self
    }

    pub fn push_receipt_error(&self, message: impl Into<String>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .receipts
            .push_back(Err(message.into()));
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: GatewayCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl Gateway for MockGateway {
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError> {
        self.record(GatewayCall::Allowance {
            token,
            owner,
            spender,
        });
        Ok(self.state.lock().unwrap().allowance)
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, ChainError> {
        self.record(GatewayCall::Approve {
            token,
            spender,
            amount,
        });
        Ok(APPROVE_TX_HASH)
    }

    async fn deposit(
        &self,
        exchange: Address,
        request: DepositRequest,
    ) -> Result<TxHash, ChainError> {
        self.record(GatewayCall::Deposit { exchange, request });
        let state = self.state.lock().unwrap();
        if let Some(data) = &state.deposit_revert {
            return Err(ProviderError::Reverted(Box::new(RevertReason::from(
                data.clone(),
            ))));
        }
        if let Some(message) = &state.deposit_failure {
            return Err(ProviderError::Transport(message.clone()));
        }
        Ok(DEPOSIT_TX_HASH)
    }

    async fn receipt_status(&self, hash: B256) -> Result<Option<bool>, ChainError> {
        self.record(GatewayCall::Receipt(hash));
        match self.state.lock().unwrap().receipts.pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => Err(ProviderError::Transport(message)),
            None => Ok(Some(true)),
        }
    }
}
