//! Wallet creation and the mnemonic disclosure policy

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use crate::crypto::envelope;
use crate::crypto::keys::{derive_key_pair, encode_address, ChainFamily, DerivationPath};
use crate::crypto::mnemonic::obtain_seed;
use crate::error::{Error, Result};

/// Wallet classification whose creation result discloses the mnemonic
pub const WALLET_TYPE_IMPORTED: &str = "imported";

/// A wallet-creation request as validated by the API layer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWalletRequest {
    pub wallet_type: String,
    pub blockchain: String,
    pub mnemonic: Option<String>,
    pub wallet_password: String,
    pub wallet_name: String,
    pub derivation_path: Option<String>,
}

/// The outcome of wallet creation.
///
/// `mnemonic` is present only for imported wallets, and the private key
/// only ever appears here in encrypted form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreationResult {
    pub wallet_address: String,
    pub public_key: String,
    pub encrypted_private_key: String,
    pub derivation_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

/// Create a wallet for the requested blockchain.
///
/// Runs the linear pipeline seed -> key pair -> address -> envelope and
/// discards every unencrypted intermediate. The first error aborts the
/// pipeline; a partial result is never returned.
pub fn create_wallet(mut request: CreateWalletRequest) -> Result<WalletCreationResult> {
    validate_request(&request)?;

    let family = ChainFamily::for_blockchain(&request.blockchain);
    let path_str = request
        .derivation_path
        .clone()
        .unwrap_or_else(|| family.default_derivation_path().to_string());
    let path: DerivationPath = path_str.parse()?;

    let (seed, mut mnemonic_used) = obtain_seed(request.mnemonic.as_deref())?;
    if let Some(mut supplied) = request.mnemonic.take() {
        supplied.zeroize();
    }
    debug!(blockchain = %request.blockchain, "seed obtained");

    let key_pair = derive_key_pair(&seed, &path)?;
    debug!(path = %path_str, "key pair derived");

    let wallet_address = encode_address(key_pair.public_key(), family)?;
    debug!(address = %wallet_address, "address computed");

    let envelope = envelope::encrypt(
        key_pair.private_key().secret_bytes(),
        &request.wallet_password,
    )?;
    debug!("private key encrypted");

    // Disclosure policy: only imported wallets get the phrase back; for
    // every other classification it is wiped here and never leaves the core.
    let mnemonic = if request.wallet_type == WALLET_TYPE_IMPORTED {
        Some(mnemonic_used)
    } else {
        mnemonic_used.zeroize();
        None
    };

    Ok(WalletCreationResult {
        wallet_address,
        public_key: key_pair.public_key().to_hex(),
        encrypted_private_key: envelope.to_wire(),
        derivation_path: path_str,
        mnemonic,
    })
}

/// Reject requests missing a required field, in a fixed order so identical
/// input always fails identically
fn validate_request(request: &CreateWalletRequest) -> Result<()> {
    for (value, field) in [
        (&request.wallet_type, "walletType"),
        (&request.blockchain, "blockchain"),
        (&request.wallet_password, "walletPassword"),
        (&request.wallet_name, "walletName"),
    ] {
        if value.is_empty() {
            return Err(Error::Validation(format!(
                "missing required field: {}",
                field
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateWalletRequest {
        CreateWalletRequest {
            wallet_type: "hot".to_string(),
            blockchain: "bitcoin".to_string(),
            mnemonic: None,
            wallet_password: "hunter2".to_string(),
            wallet_name: "main".to_string(),
            derivation_path: None,
        }
    }

    #[test]
    fn test_missing_wallet_type_rejected() {
        let mut req = request();
        req.wallet_type = String::new();

        assert!(matches!(create_wallet(req), Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_blockchain_rejected() {
        let mut req = request();
        req.blockchain = String::new();

        assert!(matches!(create_wallet(req), Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_password_rejected() {
        let mut req = request();
        req.wallet_password = String::new();

        assert!(matches!(create_wallet(req), Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut req = request();
        req.wallet_name = String::new();

        assert!(matches!(create_wallet(req), Err(Error::Validation(_))));
    }

    #[test]
    fn test_malformed_path_rejected_before_seed_generation() {
        let mut req = request();
        req.derivation_path = Some("not-a-path".to_string());

        assert!(matches!(create_wallet(req), Err(Error::KeyDerivation(_))));
    }

    #[test]
    fn test_request_deserializes_with_missing_fields() {
        let req: CreateWalletRequest =
            serde_json::from_str(r#"{"walletType":"hot","blockchain":"bitcoin"}"#).unwrap();

        assert_eq!(req.wallet_type, "hot");
        assert!(req.wallet_password.is_empty());
        assert!(req.mnemonic.is_none());
    }
}
