//! Key derivation and address encoding
//!
//! Both supported chain families share one derivation engine; everything
//! chain-specific lives in the address encoder.

pub mod address;
mod derivation;

pub use address::*;
pub use derivation::*;
