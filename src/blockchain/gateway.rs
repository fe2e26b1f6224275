// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-chain capability interface and the registry that dispatches on
//! [`WalletType`].
//!
//! Adding a chain means adding a `WalletType` variant, implementing
//! [`ChainGateway`] for it and registering it in [`ChainRegistry::from_config`].

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use super::types::{NativeBalance, Transfer};
use crate::{
    config::Config,
    models::{Wallet, WalletType},
    wallet::{DerivationError, Seed},
};

/// Capabilities every supported chain provides.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Chain handled by this gateway.
    fn wallet_type(&self) -> WalletType;

    /// Decimals of the display unit.
    fn decimals(&self) -> u8;

    /// Derive the keypair at `index` and encode it in the chain's formats.
    fn derive_keypair(&self, seed: &Seed, index: u32) -> Result<Wallet, DerivationError>;

    /// Check that `address` is well-formed for this chain.
    fn validate_address(&self, address: &str) -> Result<(), ChainError>;

    /// Native balance of `address`.
    async fn get_balance(&self, address: &str) -> Result<NativeBalance, ChainError>;

    /// Sign and submit a native transfer; returns the signature / tx hash once
    /// the network accepts it (not at finality).
    async fn submit_transfer(&self, transfer: &Transfer) -> Result<String, ChainError>;

    /// Request test currency for `address` and wait for confirmation.
    async fn request_airdrop(&self, _address: &str) -> Result<String, ChainError> {
        Err(ChainError::Unsupported(format!(
            "Airdrops are not available on {}",
            self.wallet_type()
        )))
    }

    /// Cheap reachability probe of the RPC endpoint.
    async fn ping(&self) -> Result<(), ChainError>;
}

/// Gateways indexed by chain.
#[derive(Clone, Default)]
pub struct ChainRegistry {
    gateways: HashMap<WalletType, Arc<dyn ChainGateway>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the Solana and Ethereum gateways from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ChainError> {
        let solana = super::solana::SolanaGateway::new(
            super::types::NetworkConfig::new("Solana", config.solana_rpc_url.clone()),
            config.rpc_timeout,
            config.airdrop_lamports,
            config.airdrop_timeout,
        )?;
        let ethereum = super::ethereum::EthereumGateway::new(
            super::types::NetworkConfig::new("Ethereum", config.ethereum_rpc_url.clone()),
            config.rpc_timeout,
        );

        Ok(Self::new()
            .with_gateway(Arc::new(solana))
            .with_gateway(Arc::new(ethereum)))
    }

    /// Register (or replace) the gateway for its chain.
    pub fn with_gateway(mut self, gateway: Arc<dyn ChainGateway>) -> Self {
        self.gateways.insert(gateway.wallet_type(), gateway);
        self
    }

    pub fn get(&self, wallet_type: WalletType) -> Result<&Arc<dyn ChainGateway>, ChainError> {
        self.gateways
            .get(&wallet_type)
            .ok_or_else(|| ChainError::Unsupported(format!("No gateway configured for {wallet_type}")))
    }

    /// Registered gateways in a stable order.
    pub fn gateways(&self) -> Vec<&Arc<dyn ChainGateway>> {
        let mut all: Vec<_> = self.gateways.values().collect();
        all.sort_by_key(|g| g.wallet_type());
        all
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Remote endpoint unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

impl ChainError {
    /// Classify an upstream rejection message.
    pub fn from_rejection(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        if lower.contains("insufficient funds")
            || lower.contains("insufficient lamports")
            || lower.contains("found no record of a prior credit")
        {
            ChainError::InsufficientFunds(message)
        } else {
            ChainError::Rejected(message)
        }
    }
}
