// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request validation.
//!
//! Each `validate_*` function checks one request body and returns either the
//! typed parameters the handler needs or every field violation found.
//! Nothing here touches the network.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::{
    blockchain::{parse_amount, ChainGateway, ChainRegistry, Transfer},
    models::{
        AirdropRequest, GenerateWalletRequest, GenerateWalletsRequest, SendTransactionRequest,
        WalletType,
    },
    wallet::derivation::HARDENED_OFFSET,
};

/// Upper bound of `walletCount` on `/generate-wallets`.
pub const MAX_WALLET_COUNT: u32 = 20;

/// One invalid request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    /// camelCase field name as sent by the client, or `body`.
    pub field: String,
    pub message: String,
}

/// Violations collected while checking one request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single violation.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut violations = Self::new();
        violations.push(field, message);
        violations
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.0
    }

    /// `Ok(value)` if nothing was recorded.
    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// Validated `/generate-wallet` input.
pub struct DeriveParams {
    pub mnemonic: Zeroizing<String>,
    pub wallet_type: WalletType,
    pub index: u32,
}

/// Validated `/generate-wallets` input.
pub struct BatchParams {
    pub mnemonic: Zeroizing<String>,
    pub wallet_type: WalletType,
    pub count: u32,
}

impl fmt::Debug for DeriveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeriveParams")
            .field("mnemonic", &"<redacted>")
            .field("wallet_type", &self.wallet_type)
            .field("index", &self.index)
            .finish()
    }
}

impl fmt::Debug for BatchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchParams")
            .field("mnemonic", &"<redacted>")
            .field("wallet_type", &self.wallet_type)
            .field("count", &self.count)
            .finish()
    }
}

/// Validated `/request-airdrop` input.
#[derive(Debug)]
pub struct AirdropParams {
    pub public_key: String,
    pub wallet_type: WalletType,
}

/// Trimmed non-empty string or a violation on `field`.
fn required<'a>(violations: &mut Violations, field: &str, value: Option<&'a str>) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        Some(_) => {
            violations.push(field, format!("{field} must not be empty"));
            None
        }
        None => {
            violations.push(field, format!("{field} is required"));
            None
        }
    }
}

fn gateway_for<'a>(
    violations: &mut Violations,
    registry: &'a ChainRegistry,
    wallet_type: WalletType,
) -> Option<&'a dyn ChainGateway> {
    match registry.get(wallet_type) {
        Ok(gateway) => Some(gateway.as_ref()),
        Err(e) => {
            violations.push("walletType", e.to_string());
            None
        }
    }
}

/// Address present and well-formed for the gateway's chain.
fn address<'a>(
    violations: &mut Violations,
    field: &str,
    value: Option<&'a str>,
    gateway: Option<&dyn ChainGateway>,
) -> Option<&'a str> {
    let value = required(violations, field, value)?;
    if let Some(gateway) = gateway {
        if let Err(e) = gateway.validate_address(value) {
            violations.push(field, e.to_string());
            return None;
        }
    }
    Some(value)
}

pub fn validate_generate_wallet(req: &GenerateWalletRequest) -> Result<DeriveParams, Violations> {
    let mut violations = Violations::new();

    let mnemonic = required(&mut violations, "mnemonic", req.mnemonic.as_deref());

    let wallet_type = match req.wallet_type {
        Some(wallet_type) => Some(wallet_type),
        None => {
            violations.push("walletType", "walletType is required");
            None
        }
    };

    let index = match req.index {
        Some(i) if (0..HARDENED_OFFSET as i64).contains(&i) => Some(i as u32),
        Some(_) => {
            violations.push("index", "index must be between 0 and 2147483647");
            None
        }
        None => {
            violations.push("index", "index is required");
            None
        }
    };

    match (mnemonic, wallet_type, index) {
        (Some(mnemonic), Some(wallet_type), Some(index)) => violations.finish(|| DeriveParams {
            mnemonic: Zeroizing::new(mnemonic.to_string()),
            wallet_type,
            index,
        }),
        _ => Err(violations),
    }
}

pub fn validate_generate_wallets(req: &GenerateWalletsRequest) -> Result<BatchParams, Violations> {
    let mut violations = Violations::new();

    let mnemonic = required(&mut violations, "mnemonic", req.mnemonic.as_deref());

    let count = match req.wallet_count {
        Some(n) if (1..=MAX_WALLET_COUNT as i64).contains(&n) => Some(n as u32),
        Some(_) => {
            violations.push(
                "walletCount",
                format!("walletCount must be between 1 and {MAX_WALLET_COUNT}"),
            );
            None
        }
        None => {
            violations.push("walletCount", "walletCount is required");
            None
        }
    };

    match (mnemonic, count) {
        (Some(mnemonic), Some(count)) => violations.finish(|| BatchParams {
            mnemonic: Zeroizing::new(mnemonic.to_string()),
            wallet_type: req.wallet_type.unwrap_or_default(),
            count,
        }),
        _ => Err(violations),
    }
}

pub fn validate_airdrop(
    req: &AirdropRequest,
    registry: &ChainRegistry,
) -> Result<AirdropParams, Violations> {
    let mut violations = Violations::new();
    let wallet_type = req.wallet_type.unwrap_or_default();
    let gateway = gateway_for(&mut violations, registry, wallet_type);

    let public_key = address(&mut violations, "publicKey", req.public_key.as_deref(), gateway);

    match public_key {
        Some(public_key) => violations.finish(|| AirdropParams {
            public_key: public_key.to_string(),
            wallet_type,
        }),
        None => Err(violations),
    }
}

/// Path address of `/get-balance/{publicKey}`.
pub fn validate_balance(
    public_key: &str,
    wallet_type: WalletType,
    registry: &ChainRegistry,
) -> Result<String, Violations> {
    let mut violations = Violations::new();
    let gateway = gateway_for(&mut violations, registry, wallet_type);

    match address(&mut violations, "publicKey", Some(public_key), gateway) {
        Some(public_key) => violations.finish(|| public_key.to_string()),
        None => Err(violations),
    }
}

/// Check a transfer request and convert its amount to smallest units.
pub fn validate_transfer(
    req: &SendTransactionRequest,
    registry: &ChainRegistry,
) -> Result<Transfer, Violations> {
    let mut violations = Violations::new();
    let wallet_type = req.wallet_type.unwrap_or_default();
    let gateway = gateway_for(&mut violations, registry, wallet_type);

    let from = address(&mut violations, "fromPublicKey", req.from_public_key.as_deref(), gateway);
    let to = address(&mut violations, "toPublicKey", req.to_public_key.as_deref(), gateway);

    let amount = match (&req.amount, gateway) {
        (None, _) => {
            violations.push("amount", "amount is required");
            None
        }
        (Some(amount), Some(gateway)) => match parse_amount(&amount.0, gateway.decimals()) {
            Ok(value) => Some(value),
            Err(e) => {
                violations.push("amount", e.to_string());
                None
            }
        },
        (Some(_), None) => None,
    };

    let private_key = required(&mut violations, "privateKey", req.private_key.as_deref());

    match (from, to, amount, private_key) {
        (Some(from), Some(to), Some(amount), Some(private_key)) => violations.finish(|| Transfer {
            wallet_type,
            from: from.to_string(),
            to: to.to_string(),
            amount,
            private_key: Zeroizing::new(private_key.to_string()),
        }),
        _ => Err(violations),
    }
}
