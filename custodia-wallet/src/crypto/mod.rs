//! Cryptographic primitives and operations
//!
//! This module provides mnemonic handling, hierarchical key derivation,
//! address encoding, and password-based envelope encryption.

pub mod envelope;
pub mod keys;
pub mod mnemonic;

pub use keys::*;
pub use mnemonic::*;
