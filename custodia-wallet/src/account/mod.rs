//! Wallet assembly and policy
//!
//! This module sequences the crypto components into wallet creation and
//! applies the mnemonic disclosure policy.

mod wallet;

pub use wallet::*;
