//! Hierarchical deterministic key derivation

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secp256k1::{PublicKey as Secp256k1PublicKey, Secp256k1, SecretKey};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::mnemonic::Seed;
use crate::error::{Error, Result};

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Consecutive child indices to try before giving up on a path component.
/// A single miss has probability ~2^-127; the bound only exists so the
/// loop provably terminates.
const MAX_CHILD_RETRIES: u32 = 16;

/// One level of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathComponent {
    pub index: u32,
    pub hardened: bool,
}

/// A parsed BIP-32 derivation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    components: Vec<PathComponent>,
}

impl DerivationPath {
    /// The path components in derivation order
    pub fn components(&self) -> &[PathComponent] {
        &self.components
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        if !path.starts_with("m/") {
            return Err(Error::KeyDerivation(format!(
                "invalid derivation path: {}",
                path
            )));
        }

        let mut components = Vec::new();
        for component in path.trim_start_matches("m/").split('/') {
            if component.is_empty() {
                continue;
            }

            let hardened = component.ends_with('\'');
            let index = component
                .trim_end_matches('\'')
                .parse::<u32>()
                .map_err(|_| {
                    Error::KeyDerivation(format!(
                        "invalid derivation path component: {}",
                        component
                    ))
                })?;
            if index >= HARDENED_OFFSET {
                return Err(Error::KeyDerivation(format!(
                    "derivation index out of range: {}",
                    component
                )));
            }

            components.push(PathComponent { index, hardened });
        }

        Ok(Self { components })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            write!(f, "/{}", component.index)?;
            if component.hardened {
                write!(f, "'")?;
            }
        }
        Ok(())
    }
}

/// A derived private key scalar.
///
/// The bytes are wiped on drop and the accessor is crate-private: the
/// scalar can become a public key or an encrypted envelope, nothing else.
pub struct PrivateKey {
    secret: Zeroizing<[u8; 32]>,
}

impl PrivateKey {
    pub(crate) fn secret_bytes(&self) -> &[u8] {
        &self.secret[..]
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A compressed secp256k1 public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; 33],
}

impl PublicKey {
    /// The compressed SEC1 encoding
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex encoding of the compressed point
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// An extended key pair at the full depth of a derivation path
pub struct KeyPair {
    private_key: PrivateKey,
    /// Chain code of the extended key; held alongside the scalar, never exposed
    #[allow(dead_code)]
    chain_code: Zeroizing<[u8; 32]>,
    public_key: PublicKey,
}

impl KeyPair {
    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"[REDACTED]")
            .field("chain_code", &"[REDACTED]")
            .field("public_key", &self.public_key.to_hex())
            .finish()
    }
}

/// Derive the key pair at `path` from a seed.
///
/// Strictly sequential: every path component is visited in order. Nothing
/// is cached across calls.
pub fn derive_key_pair(seed: &Seed, path: &DerivationPath) -> Result<KeyPair> {
    let (mut secret, mut chain_code) = derive_master_key(seed.as_bytes())?;

    for component in path.components() {
        (secret, chain_code) = derive_child_key(&secret, &chain_code, *component)?;
    }

    let secp = Secp256k1::new();
    let secret_key = SecretKey::from_slice(&secret[..])
        .map_err(|e| Error::KeyDerivation(format!("invalid secret key: {}", e)))?;
    let public_key = Secp256k1PublicKey::from_secret_key(&secp, &secret_key);

    Ok(KeyPair {
        private_key: PrivateKey { secret },
        chain_code,
        public_key: PublicKey {
            bytes: public_key.serialize(),
        },
    })
}

/// Derive the master extended key from a seed
fn derive_master_key(seed: &[u8]) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed")
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;
    hmac.update(seed);
    let result = hmac.finalize().into_bytes();

    let mut secret = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);
    secret.copy_from_slice(&result[0..32]);
    chain_code.copy_from_slice(&result[32..64]);

    Ok((secret, chain_code))
}

/// Derive one child key from a parent key.
///
/// Hardened components mix the parent scalar into the HMAC message,
/// normal components the compressed parent point. An invalid child scalar
/// retries the next index.
fn derive_child_key(
    parent_secret: &Zeroizing<[u8; 32]>,
    parent_chain_code: &Zeroizing<[u8; 32]>,
    component: PathComponent,
) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let secp = Secp256k1::new();
    let parent_key = SecretKey::from_slice(&parent_secret[..])
        .map_err(|e| Error::KeyDerivation(format!("invalid parent key: {}", e)))?;

    let base = if component.hardened {
        HARDENED_OFFSET + component.index
    } else {
        component.index
    };

    for attempt in 0..MAX_CHILD_RETRIES {
        let Some(index) = base.checked_add(attempt) else {
            break;
        };

        let mut data = Vec::with_capacity(37);
        if component.hardened {
            data.push(0);
            data.extend_from_slice(&parent_secret[..]);
        } else {
            let parent_public = Secp256k1PublicKey::from_secret_key(&secp, &parent_key);
            data.extend_from_slice(&parent_public.serialize());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let mut hmac = Hmac::<Sha512>::new_from_slice(&parent_chain_code[..])
            .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;
        hmac.update(&data);
        let result = hmac.finalize().into_bytes();
        data.zeroize();

        // child = IL + parent (mod n); an invalid IL means try the next index
        let child = match SecretKey::from_slice(&result[0..32])
            .and_then(|k| k.add_tweak(&parent_key.into()))
        {
            Ok(child) => child,
            Err(_) => continue,
        };

        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&result[32..64]);

        return Ok((Zeroizing::new(child.secret_bytes()), chain_code));
    }

    Err(Error::DerivationExhausted)
}
