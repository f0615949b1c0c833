//! EIP-712 typed-message signing.

use alloy::{
    hex,
    primitives::{Address, Signature},
    signers::{SignerSync, local::PrivateKeySigner},
    sol_types::{Eip712Domain, SolStruct},
};

use crate::{Chain, error::Error};

pub const DOMAIN_NAME: &str = "100x";
pub const DOMAIN_VERSION: &str = "0.0.0";

/// Signing domain of the exchange deployment.
pub fn domain(chain: &Chain) -> Eip712Domain {
    Eip712Domain::new(
        Some(DOMAIN_NAME.into()),
        Some(DOMAIN_VERSION.into()),
        Some(alloy::primitives::U256::from(chain.chain_id())),
        Some(chain.verifier()),
        None,
    )
}

/// Capability to sign structured data on behalf of an account.
///
/// The schema and primary type are defined by the [`SolStruct`] message.
pub trait TypedDataSigner {
    fn address(&self) -> Address;

    fn sign_typed<S: SolStruct>(&self, message: &S, domain: &Eip712Domain)
    -> Result<Signature, Error>;
}

impl TypedDataSigner for PrivateKeySigner {
    fn address(&self) -> Address {
        alloy::signers::Signer::address(self)
    }

    fn sign_typed<S: SolStruct>(
        &self,
        message: &S,
        domain: &Eip712Domain,
    ) -> Result<Signature, Error> {
        let hash = message.eip712_signing_hash(domain);
        Ok(self.sign_hash_sync(&hash)?)
    }
}

/// Serializes the signature as `0x`-prefixed `r || s || v` with `v` in {27, 28}.
pub fn to_hex(signature: &Signature) -> String {
    hex::encode_prefixed(signature.as_bytes())
}

/// Signs the message and returns the wire form of the signature.
pub fn sign_hex<T: TypedDataSigner, S: SolStruct>(
    signer: &T,
    message: &S,
    domain: &Eip712Domain,
) -> Result<String, Error> {
    signer.sign_typed(message, domain).map(|sig| to_hex(&sig))
}

/// Recovers the address that produced the hex signature over the message.
pub fn recover<S: SolStruct>(
    signature: &str,
    message: &S,
    domain: &Eip712Domain,
) -> Result<Address, Error> {
    let bytes = hex::decode(signature).map_err(|e| Error::Validation(e.to_string()))?;
    let signature =
        Signature::try_from(bytes.as_slice()).map_err(|e| Error::Validation(e.to_string()))?;
    signature
        .recover_address_from_prehash(&message.eip712_signing_hash(domain))
        .map_err(|e| Error::Validation(e.to_string()))
}
