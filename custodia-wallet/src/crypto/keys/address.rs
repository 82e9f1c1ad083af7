//! Chain-specific address encoding

use bitcoin::hashes::{hash160, Hash};
use bitcoin_bech32::constants::Network;
use bitcoin_bech32::{u5, WitnessProgram};
use secp256k1::PublicKey as Secp256k1PublicKey;
use sha3::{Digest, Keccak256};

use super::derivation::PublicKey;
use crate::error::{Error, Result};

/// Supported chain families.
///
/// Key derivation is identical across families; only the address encoding
/// differs. New chains extend this enum, not the derivation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    /// Bitcoin native segwit (P2WPKH)
    BitcoinSegwit,
    /// Ethereum and EVM compatible chains
    EvmStyle,
}

impl ChainFamily {
    /// Map a blockchain identifier to its chain family
    pub fn for_blockchain(blockchain: &str) -> Self {
        match blockchain.to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Self::BitcoinSegwit,
            _ => Self::EvmStyle,
        }
    }

    /// The default derivation path for wallets of this family
    pub fn default_derivation_path(&self) -> &'static str {
        match self {
            Self::BitcoinSegwit => "m/84'/0'/0'/0/0",
            Self::EvmStyle => "m/44'/60'/0'/0/0",
        }
    }
}

/// Encode a public key as the canonical address string of a chain family
pub fn encode_address(public_key: &PublicKey, family: ChainFamily) -> Result<String> {
    match family {
        ChainFamily::BitcoinSegwit => encode_segwit_address(public_key),
        ChainFamily::EvmStyle => encode_evm_address(public_key),
    }
}

/// Bech32 P2WPKH address: hash160 of the compressed key as a version-0
/// witness program
fn encode_segwit_address(public_key: &PublicKey) -> Result<String> {
    let program = hash160::Hash::hash(public_key.as_bytes());

    let version = u5::try_from_u8(0)
        .map_err(|e| Error::KeyDerivation(format!("invalid witness version: {:?}", e)))?;
    let witness = WitnessProgram::new(version, program.to_byte_array().to_vec(), Network::Bitcoin)
        .map_err(|e| Error::KeyDerivation(format!("invalid witness program: {:?}", e)))?;

    Ok(witness.to_address())
}

/// EIP-55 checksummed hex address: Keccak-256 over the uncompressed point
/// coordinates, last 20 bytes
fn encode_evm_address(public_key: &PublicKey) -> Result<String> {
    let point = Secp256k1PublicKey::from_slice(public_key.as_bytes())
        .map_err(|e| Error::KeyDerivation(format!("invalid public key: {}", e)))?;

    // Skip the 0x04 prefix and hash the 64 coordinate bytes
    let uncompressed = point.serialize_uncompressed();
    let digest = keccak256(&uncompressed[1..]);

    Ok(checksum_address(&digest[12..]))
}

/// Apply the EIP-55 mixed-case checksum to a 20-byte address
fn checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Calculate the Keccak-256 hash of data
fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
