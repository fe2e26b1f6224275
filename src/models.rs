// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. Field names are camelCase on
//! the wire. All types derive `ToSchema` for the OpenAPI document.
//!
//! Request bodies keep every field optional so that the validator can report
//! all missing or malformed fields in one response instead of failing on the
//! first one serde meets.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Wallet Types
// =============================================================================

/// Supported chains.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    #[default]
    Solana,
    Ethereum,
}

impl WalletType {
    pub const ALL: [WalletType; 2] = [WalletType::Solana, WalletType::Ethereum];

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Solana => "solana",
            WalletType::Ethereum => "ethereum",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A derived keypair.
///
/// Created fresh per derivation call and never stored by the server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Chain-native address (base58 for Solana, EIP-55 hex for Ethereum).
    pub public_key: String,
    /// Derivation path used, e.g. `m/44'/501'/0'/0'`.
    pub path: String,
    /// Chain-native secret encoding (base58 keypair for Solana, 0x hex for Ethereum).
    pub private_key: String,
    #[serde(rename = "type")]
    pub wallet_type: WalletType,
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("public_key", &self.public_key)
            .field("path", &self.path)
            .field("private_key", &"<redacted>")
            .field("wallet_type", &self.wallet_type)
            .finish()
    }
}

// =============================================================================
// Mnemonic / Derivation
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MnemonicResponse {
    /// Space-separated 12-word BIP-39 phrase.
    pub mnemonic: String,
}

/// Request to derive one wallet at a given index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateWalletRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<WalletType>,
    /// Account index, `0 <= index < 2^31`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

/// Request to derive the first `walletCount` wallets of a chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateWalletsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    /// Between 1 and 20.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_count: Option<i64>,
    /// Defaults to `solana`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<WalletType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletsResponse {
    pub wallets: Vec<Wallet>,
}

// =============================================================================
// Network Operations
// =============================================================================

/// A decimal amount accepted either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Amount(pub String);

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Amount(n.to_string()),
            Raw::Text(s) => Amount(s),
        })
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount(value.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AirdropRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Defaults to `solana`; only Solana test networks support airdrops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<WalletType>,
}

#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_public_key: Option<String>,
    /// Positive amount in the display unit (SOL / ETH).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "0.5")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Defaults to `solana`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<WalletType>,
}

impl fmt::Debug for SendTransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendTransactionRequest")
            .field("from_public_key", &self.from_public_key)
            .field("to_public_key", &self.to_public_key)
            .field("amount", &self.amount)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("wallet_type", &self.wallet_type)
            .finish()
    }
}

/// Transaction signature (Solana) or hash (Ethereum).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignatureResponse {
    pub signature: String,
}

/// Query parameters for the balance endpoint.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BalanceQuery {
    /// Chain to query. Defaults to `solana`.
    pub wallet_type: Option<WalletType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    /// Balance in the display unit with full precision (9 decimals for SOL, 18 for ETH).
    pub balance: String,
    /// Balance in the smallest unit (lamports / wei).
    pub raw: String,
    pub wallet_type: WalletType,
}
