//! Error types for the wallet core

use thiserror::Error;

/// Custom error type for wallet-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required request field is missing; the caller must fix the request
    #[error("Validation error: {0}")]
    Validation(String),

    /// A supplied mnemonic failed wordlist or checksum validation
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// No valid child key within the retry bound; theoretical-only
    #[error("Derivation exhausted: no valid child key in index range")]
    DerivationExhausted,

    /// The OS random source failed; never falls back to a weaker source
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("Encryption failure: {0}")]
    EncryptionFailure(String),
}

/// Result type for wallet-core operations
pub type Result<T> = std::result::Result<T, Error>;
