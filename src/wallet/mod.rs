// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mnemonic handling and hierarchical-deterministic key derivation.
//!
//! - `mnemonic` - BIP-39 phrase generation and validation
//! - `derivation` - seed stretching, SLIP-0010 (ed25519) and BIP-32 (secp256k1)

pub mod derivation;
pub mod mnemonic;

pub use derivation::{
    derive_keypair, derive_wallets, seed_from, ChildIndex, DerivationError, DerivationPath, Seed,
};
