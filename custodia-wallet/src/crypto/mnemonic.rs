//! Mnemonic phrase generation and seed handling

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words24 => 32,
        }
    }
}

/// A 64-byte seed derived from a mnemonic phrase.
///
/// The buffer is wiped on drop and has no public accessor; the only way
/// out of this type is key derivation.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: [u8; 64],
}

impl Seed {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seed").field("bytes", &"[REDACTED]").finish()
    }
}

/// Generate a new random mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<String> {
    let len = strength.entropy_bytes();
    let mut entropy = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut entropy[..len])
        .map_err(|e| Error::RandomnessUnavailable(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy(&entropy[..len])
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
    entropy.zeroize();

    Ok(mnemonic.to_string())
}

/// Validate a mnemonic phrase against the wordlist and checksum
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    Mnemonic::parse_normalized(phrase)
        .map(|_| ())
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// Obtain a seed for wallet creation.
///
/// Generates a fresh 12-word phrase when none is supplied; validates the
/// checksum of a supplied phrase. Returns the seed together with the
/// phrase actually used so the caller can apply its disclosure policy.
/// A supplied phrase comes back verbatim.
pub fn obtain_seed(supplied: Option<&str>) -> Result<(Seed, String)> {
    let phrase = match supplied {
        Some(phrase) => phrase.to_string(),
        None => generate_mnemonic(MnemonicStrength::Words12)?,
    };

    let mnemonic = Mnemonic::parse_normalized(&phrase)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;

    // PBKDF2-HMAC-SHA512, 2048 rounds, "mnemonic" salt, empty passphrase
    let seed = Seed {
        bytes: mnemonic.to_seed(""),
    };

    Ok((seed, phrase))
}
