//! Uniform result shape of the public client operations.
//!
//! Every operation resolves to a [`Response`]: requested data on success, or
//! an [`ApiError`] next to the default (empty) data on failure.

use serde::{Serialize, Serializer, ser::SerializeStruct};
use tracing::{debug, error};

use crate::{
    abi::ciao::Ciao::CiaoErrors,
    error::{Error, ProviderError, RevertReason},
};

/// Message returned for any failure that could not be classified.
pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An unknown error occurred. Try enabling debug mode for more detail.";

/// Failure category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Caller input rejected before signing or network access.
    Validation,
    /// Error reported by the exchange API.
    Api,
    /// Decoded smart contract revert.
    Revert,
    /// Anything else: transport failure, unexpected response, unknown revert.
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// Symbolic contract error name, set for [`ErrorKind::Revert`] only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
            error_name: None,
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Api,
            message: message.into(),
            error_name: None,
        }
    }

    pub fn revert(error_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Revert,
            message: message.into(),
            error_name: Some(error_name.into()),
        }
    }

    pub fn unknown() -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: UNKNOWN_ERROR_MESSAGE.to_string(),
            error_name: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_name {
            Some(name) => write!(f, "{name}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Serializes as `{ success, data, error? }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Response<T> {
    pub data: T,
    pub error: Option<ApiError>,
}

impl<T: Serialize> Serialize for Response<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Response", 3)?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("data", &self.data)?;
        match &self.error {
            Some(error) => state.serialize_field("error", error)?,
            None => state.skip_field("error")?,
        }
        state.end()
    }
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn failed(error: ApiError) -> Self
    where
        T: Default,
    {
        Self {
            data: T::default(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }

    pub(crate) fn from_result(result: Result<T, Error>, verbose: bool) -> Self
    where
        T: Default,
    {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failed(classify(&err, verbose)),
        }
    }
}

/// Maps a pipeline error onto the public error taxonomy.
///
/// Unknown failures are logged with full detail, at error level in verbose mode.
pub fn classify(err: &Error, verbose: bool) -> ApiError {
    match err {
        Error::Validation(message) => ApiError::validation(message.clone()),
        Error::Api(message) => ApiError::api(message.clone()),
        Error::Chain(ProviderError::Reverted(reason)) => match reason.as_ref() {
            RevertReason::Known(known) => {
                let (name, message) = describe_revert(known);
                ApiError::revert(name, message)
            }
            _ => unknown(err, verbose),
        },
        _ => unknown(err, verbose),
    }
}

fn unknown(err: &Error, verbose: bool) -> ApiError {
    if verbose {
        error!(%err, "Request failed with an unknown error");
    } else {
        debug!(%err, "Request failed with an unknown error");
    }
    ApiError::unknown()
}

/// Symbolic name and human readable description of a known exchange revert.
pub fn describe_revert(reason: &CiaoErrors) -> (&'static str, &'static str) {
    match reason {
        CiaoErrors::BalanceInsufficient(_) => ("BalanceInsufficient", "Insufficient balance."),
        CiaoErrors::DepositQuantityInvalid(_) => {
            ("DepositQuantityInvalid", "Invalid deposit quantity.")
        }
        CiaoErrors::WithdrawQuantityInvalid(_) => {
            ("WithdrawQuantityInvalid", "Invalid withdrawal quantity.")
        }
        CiaoErrors::ProductInvalid(_) => ("ProductInvalid", "Invalid product."),
        CiaoErrors::ReentrancyGuardReentrantCall(_) => (
            "ReentrancyGuardReentrantCall",
            "Reentrant call rejected by the contract.",
        ),
        CiaoErrors::SenderInvalid(_) => ("SenderInvalid", "Invalid transaction sender."),
        CiaoErrors::InvalidInitialization(_) => (
            "InvalidInitialization",
            "Contract initialization is invalid.",
        ),
        CiaoErrors::NotInitializing(_) => ("NotInitializing", "Contract is not initializing."),
    }
}
