// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain integrations.
//!
//! This module provides, per supported chain:
//! - HD keypair derivation and address encoding
//! - Native balance queries
//! - Transfer signing and broadcasting
//! - Test-network airdrops (Solana only)

pub mod ethereum;
pub mod gateway;
pub mod solana;
pub mod types;
pub mod units;

#[cfg(test)]
pub mod testing;

pub use gateway::{ChainError, ChainGateway, ChainRegistry};
pub use types::*;
pub use units::{format_units, parse_amount, ETH_DECIMALS, SOL_DECIMALS};
