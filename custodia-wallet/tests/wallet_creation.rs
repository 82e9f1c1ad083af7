//! End-to-end wallet creation tests

use custodia_wallet::account::{create_wallet, CreateWalletRequest};
use custodia_wallet::Error;

const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn base_request() -> CreateWalletRequest {
    CreateWalletRequest {
        wallet_type: "hot".to_string(),
        blockchain: "bitcoin".to_string(),
        mnemonic: None,
        wallet_password: "correct horse".to_string(),
        wallet_name: "main".to_string(),
        derivation_path: None,
    }
}

#[test]
fn test_hot_bitcoin_wallet() {
    let result = create_wallet(base_request()).unwrap();

    assert!(result.wallet_address.starts_with("bc1q"));
    assert_eq!(result.public_key.len(), 66); // 33 bytes, hex encoded
    assert_eq!(result.encrypted_private_key.matches('.').count(), 3);
    assert_eq!(result.derivation_path, "m/84'/0'/0'/0/0");
    assert!(result.mnemonic.is_none());
}

#[test]
fn test_imported_ethereum_wallet() {
    let mut request = base_request();
    request.wallet_type = "imported".to_string();
    request.blockchain = "ethereum".to_string();
    request.mnemonic = Some(TEST_MNEMONIC.to_string());

    let result = create_wallet(request).unwrap();

    assert_eq!(
        result.wallet_address,
        "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
    );
    assert_eq!(result.derivation_path, "m/44'/60'/0'/0/0");
    assert_eq!(result.mnemonic.as_deref(), Some(TEST_MNEMONIC));
}

#[test]
fn test_imported_bitcoin_wallet_matches_reference_vectors() {
    let mut request = base_request();
    request.wallet_type = "imported".to_string();
    request.mnemonic = Some(TEST_MNEMONIC.to_string());

    let result = create_wallet(request).unwrap();

    assert_eq!(
        result.wallet_address,
        "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu"
    );
    assert_eq!(
        result.public_key,
        "0330d54fd0dd420a6e5f8d3624f5f3482cae350f79d5f0753bf5beef9c2d91af3c"
    );
}

#[test]
fn test_corrupted_mnemonic_rejected() {
    let mut request = base_request();
    request.mnemonic = Some(
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
            .to_string(),
    );

    assert!(matches!(
        create_wallet(request),
        Err(Error::InvalidMnemonic(_))
    ));
}

#[test]
fn test_supplied_mnemonic_not_disclosed_for_hot_wallet() {
    let mut request = base_request();
    request.mnemonic = Some(TEST_MNEMONIC.to_string());

    let result = create_wallet(request).unwrap();
    assert!(result.mnemonic.is_none());
}

#[test]
fn test_missing_password_fails_identically() {
    let mut request = base_request();
    request.wallet_password = String::new();

    let first = create_wallet(request.clone());
    let second = create_wallet(request);

    assert!(matches!(first, Err(Error::Validation(_))));
    assert!(matches!(second, Err(Error::Validation(_))));
}

#[test]
fn test_serialized_result_omits_undisclosed_mnemonic() {
    let result = create_wallet(base_request()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json.get("mnemonic").is_none());
    assert!(json.get("walletAddress").is_some());
    assert!(json.get("publicKey").is_some());
    assert!(json.get("encryptedPrivateKey").is_some());
    assert!(json.get("derivationPath").is_some());
}

#[test]
fn test_caller_path_override_is_used_verbatim() {
    let mut request = base_request();
    request.blockchain = "ethereum".to_string();
    request.derivation_path = Some("m/44'/60'/0'/0/7".to_string());

    let result = create_wallet(request).unwrap();
    assert_eq!(result.derivation_path, "m/44'/60'/0'/0/7");
}

#[test]
fn test_identical_requests_produce_distinct_envelopes() {
    let mut request = base_request();
    request.wallet_type = "imported".to_string();
    request.mnemonic = Some(TEST_MNEMONIC.to_string());

    let a = create_wallet(request.clone()).unwrap();
    let b = create_wallet(request).unwrap();

    // same key material, but fresh salt and nonce per encryption
    assert_eq!(a.wallet_address, b.wallet_address);
    assert_ne!(a.encrypted_private_key, b.encrypted_private_key);
}
