//! 100x perpetual DEX client SDK.
//!
//! # Overview
//!
//! Signs EIP-712 typed messages with the account key, submits them to the
//! exchange REST API and performs the on-chain collateral deposit flow.
//!
//! Use [`client::Client`] as the entry point. Every public operation returns a
//! [`response::Response`] carrying either the requested data or an
//! [`response::ApiError`], operations never panic or return `Err`.
//!
//! Numeric amounts are passed as exact decimals ([`fastnum::UD128`]) and are
//! converted to 18-decimal fixed-point integers by [`num::to_wei`] before
//! signing.
//!
//! # Limitations/follow-ups
//!
//! * Transaction receipt polling is unbounded by default, use
//!   [`deposit::ReceiptPolicy::bounded`] to cap the number of attempts.
//!
//! * Mainnet clients register a referral code in the background
//!   on construction, see [`client::Config::auto_referral`].
//!
//! # Testing
//!
//! [`testing`] module provides scripted [`http::Transport`] and
//! [`deposit::Gateway`] doubles, so the whole request pipeline can be
//! exercised without network access.

pub mod abi;
pub mod client;
pub mod deposit;
pub mod error;
pub mod http;
pub mod nonce;
pub mod num;
pub mod response;
pub mod signing;
pub mod testing;
pub mod types;

use std::{fmt, str::FromStr};

use alloy::primitives::{Address, address};

pub use client::{Client, Config};
pub use response::{ApiError, ErrorKind, Response};

/// Exchange deployment the client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    #[default]
    Testnet,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Mainnet => "mainnet",
            Environment::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "production" => Ok(Environment::Mainnet),
            "testnet" | "staging" => Ok(Environment::Testnet),
            other => Err(error::Error::Validation(format!(
                "unknown environment: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
/// Chain and API endpoints of an exchange deployment.
pub struct Chain {
    chain_id: u64,
    api_url: String,
    rpc_url: String,
    exchange: Address,
    verifier: Address,
    usdb: Address,
}

impl Chain {
    pub fn mainnet() -> Self {
        Self {
            chain_id: 81457,
            api_url: "https://api.100x.finance/v1".to_string(),
            rpc_url: "https://rpc.blast.io".to_string(),
            exchange: address!("0x1baebee6b00b3f559b0ff0719b47e0af22a6bfc4"),
            verifier: address!("0x65CbB566D1A6E60107c0c7888761de1AdFa1ccC0"),
            usdb: address!("0x4300000000000000000000000000000000000003"),
        }
    }

    pub fn testnet() -> Self {
        Self {
            chain_id: 168587773,
            api_url: "https://api.ciaobella.dev/v1".to_string(),
            rpc_url: "https://sepolia.blast.io".to_string(),
            exchange: address!("0x0c3b9472b3923cfe199bae24b5f5bd75fad2bae9"),
            verifier: address!("0x02Ca4fcB63E2D3C89fa20D86ccDcfc540c683545"),
            usdb: address!("0x79a59c326c715ac2d31c169c85d1232319e341ce"),
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Mainnet => Self::mainnet(),
            Environment::Testnet => Self::testnet(),
        }
    }

    pub fn custom(
        chain_id: u64,
        api_url: String,
        rpc_url: String,
        exchange: Address,
        verifier: Address,
        usdb: Address,
    ) -> Self {
        Self {
            chain_id,
            api_url,
            rpc_url,
            exchange,
            verifier,
            usdb,
        }
    }

    /// Replaces the default RPC endpoint.
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Exchange (deposit) contract address.
    pub fn exchange(&self) -> Address {
        self.exchange
    }

    /// EIP-712 verifying contract address.
    pub fn verifier(&self) -> Address {
        self.verifier
    }

    /// USDB margin asset address.
    pub fn usdb(&self) -> Address {
        self.usdb
    }
}
