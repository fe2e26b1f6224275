// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types shared by the gateways.

use std::fmt;

use url::Url;
use zeroize::Zeroizing;

use crate::models::WalletType;

/// RPC endpoint configuration for one chain.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display and logs
    pub name: &'static str,
    /// RPC endpoint URL
    pub rpc_url: Url,
}

impl NetworkConfig {
    pub fn new(name: &'static str, rpc_url: Url) -> Self {
        Self { name, rpc_url }
    }
}

/// Native balance of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBalance {
    /// Balance in smallest unit (lamports / wei), decimal digits
    pub raw: String,
    /// Balance in the display unit with all decimals
    pub formatted: String,
}

/// A validated native transfer, ready to be signed.
pub struct Transfer {
    pub wallet_type: WalletType,
    pub from: String,
    pub to: String,
    /// Amount in smallest unit (lamports / wei), always positive
    pub amount: u128,
    /// Chain-native secret encoding of the sender
    pub private_key: Zeroizing<String>,
}

impl fmt::Debug for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transfer")
            .field("wallet_type", &self.wallet_type)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("amount", &self.amount)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
