//! Password-based envelope encryption for secret key material
//!
//! The wire format is a contract with any future decrypt implementation:
//! `base64(salt).base64(iv).base64(authTag).base64(ciphertext)`, four
//! dot-separated segments of standard base64 with padding. The scrypt and
//! AES-GCM parameters below are equally part of that contract; changing
//! them breaks decryptability of previously issued envelopes.

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::{rngs::OsRng, RngCore};
use scrypt::Params;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;

// scrypt cost: N = 2^14, r = 8, p = 1
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

const SEGMENT_SEPARATOR: &str = ".";

/// An encrypted secret, the only form in which raw key material may leave
/// the core or be persisted
pub struct EncryptedSecretEnvelope {
    salt: [u8; SALT_LEN],
    iv: [u8; NONCE_LEN],
    auth_tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl EncryptedSecretEnvelope {
    /// Serialize as the four-segment wire string
    pub fn to_wire(&self) -> String {
        [
            BASE64.encode(self.salt),
            BASE64.encode(self.iv),
            BASE64.encode(self.auth_tag),
            BASE64.encode(&self.ciphertext),
        ]
        .join(SEGMENT_SEPARATOR)
    }
}

impl fmt::Display for EncryptedSecretEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

/// Encrypt a secret under a caller-supplied password.
///
/// Salt and nonce are freshly drawn from the OS random source on every
/// call. Any password, including the empty string, is accepted; the
/// secrecy of the envelope is solely a function of the password's entropy.
pub fn encrypt(secret: &[u8], password: &str) -> Result<EncryptedSecretEnvelope> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| Error::RandomnessUnavailable(e.to_string()))?;

    let mut iv = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| Error::RandomnessUnavailable(e.to_string()))?;

    let key = derive_encryption_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| Error::EncryptionFailure(e.to_string()))?;

    let mut combined = cipher
        .encrypt(Nonce::from_slice(&iv), secret)
        .map_err(|_| Error::EncryptionFailure("AEAD encryption failed".to_string()))?;

    // The cipher appends the tag to the ciphertext; the wire format keeps
    // it as its own segment
    let tag_offset = combined
        .len()
        .checked_sub(TAG_LEN)
        .ok_or_else(|| Error::EncryptionFailure("ciphertext shorter than tag".to_string()))?;
    let auth_tag: [u8; TAG_LEN] = combined[tag_offset..]
        .try_into()
        .map_err(|_| Error::EncryptionFailure("malformed authentication tag".to_string()))?;
    combined.truncate(tag_offset);

    Ok(EncryptedSecretEnvelope {
        salt,
        iv,
        auth_tag,
        ciphertext: combined,
    })
}

/// Stretch a password into an AES key with the fixed scrypt parameters
fn derive_encryption_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| Error::EncryptionFailure(e.to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut key[..])
        .map_err(|e| Error::EncryptionFailure(e.to_string()))?;

    Ok(key)
}
