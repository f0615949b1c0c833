use std::fmt::Display;

use alloy::{
    contract,
    primitives::Bytes,
    providers::PendingTransactionError,
    signers::local::LocalSignerError,
    sol_types::SolInterface,
    transports,
};

use crate::abi::ciao::Ciao::CiaoErrors;

pub type ChainError = ProviderError<CiaoErrors>;

/// Reason of a reverted deposit call, decoded against the exchange errors
/// when the revert data carries a known selector.
#[derive(Debug)]
pub enum RevertReason<R> {
    Known(R),
    Generic(String),
    /// Mined with a failed status, no revert data available.
    Unknown,
}

/// Failure of an on-chain call, transaction or receipt lookup.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError<R> {
    #[error("fatal error: {0}")]
    Fatal(String),

    #[error("transaction reverted: {0:?}")]
    Reverted(Box<RevertReason<R>>),

    #[error("rpc error: {0}")]
    Transport(String),

    #[error("receipt not available after polling")]
    Timeout,
}

/// Any failure inside the request pipeline.
///
/// Public client operations never return it directly, it is folded into
/// [`crate::response::ApiError`] by the response normalizer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Api(String),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("signer error: {0}")]
    Signer(#[from] alloy::signers::Error),

    #[error("invalid private key: {0}")]
    Key(#[from] LocalSignerError),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl<R: SolInterface> From<contract::Error> for ProviderError<R> {
    fn from(value: contract::Error) -> Self {
        match value {
            contract::Error::TransportError(rpc_err) => Self::from(rpc_err),
            contract::Error::PendingTransactionError(err) => err.into(),
            other => Self::Fatal(other.to_string()),
        }
    }
}

impl<R: SolInterface> From<PendingTransactionError> for ProviderError<R> {
    fn from(value: PendingTransactionError) -> Self {
        match value {
            PendingTransactionError::TransportError(rpc_err) => Self::from(rpc_err),
            PendingTransactionError::TxWatcher(_) => Self::Timeout,
            other => Self::Transport(other.to_string()),
        }
    }
}

impl<E: Display, R: SolInterface> From<transports::RpcError<E>> for ProviderError<R> {
    fn from(value: transports::RpcError<E>) -> Self {
        // Simulated calls report reverts as error code 3 with the revert data attached.
        let reverted = value
            .as_error_resp()
            .is_some_and(|resp| resp.code == 3 || resp.message.contains("revert"));
        if reverted {
            Self::Reverted(Box::new(RevertReason::from(value)))
        } else {
            Self::Transport(value.to_string())
        }
    }
}

impl<E: Display, R: SolInterface> From<transports::RpcError<E>> for RevertReason<R> {
    fn from(value: transports::RpcError<E>) -> Self {
        value
            .as_error_resp()
            .and_then(|payload| payload.as_decoded_interface_error::<R>())
            .map(Self::Known)
            .unwrap_or_else(|| Self::Generic(value.to_string()))
    }
}

impl<R: SolInterface> From<Bytes> for RevertReason<R> {
    fn from(value: Bytes) -> Self {
        R::abi_decode(&value)
            .map(Self::Known)
            .unwrap_or_else(|_| Self::Generic(value.to_string()))
    }
}
