// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Offline gateways for handler and client tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;

use super::{
    ethereum, solana,
    gateway::{ChainError, ChainGateway, ChainRegistry},
    types::{NativeBalance, Transfer},
    units::{format_units, ETH_DECIMALS, SOL_DECIMALS},
};
use crate::{
    models::{Wallet, WalletType},
    wallet::{DerivationError, Seed},
};

/// Gateway that derives real keys but answers network calls from memory.
///
/// Every network-facing method bumps `network_calls`, so tests can assert that
/// validation failures never reach the chain.
pub struct StubGateway {
    wallet_type: WalletType,
    balance_raw: String,
    failure: Option<fn() -> ChainError>,
    network_calls: AtomicUsize,
}

impl StubGateway {
    pub fn new(wallet_type: WalletType) -> Self {
        Self {
            wallet_type,
            balance_raw: "1000000000".to_string(),
            failure: None,
            network_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_balance(mut self, raw: &str) -> Self {
        self.balance_raw = raw.to_string();
        self
    }

    /// Make every network call fail with the error built by `failure`.
    pub fn failing(mut self, failure: fn() -> ChainError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn network_calls(&self) -> usize {
        self.network_calls.load(Ordering::SeqCst)
    }

    fn hit(&self) -> Result<(), ChainError> {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChainGateway for StubGateway {
    fn wallet_type(&self) -> WalletType {
        self.wallet_type
    }

    fn decimals(&self) -> u8 {
        match self.wallet_type {
            WalletType::Solana => SOL_DECIMALS,
            WalletType::Ethereum => ETH_DECIMALS,
        }
    }

    fn derive_keypair(&self, seed: &Seed, index: u32) -> Result<Wallet, DerivationError> {
        match self.wallet_type {
            WalletType::Solana => solana::derive_wallet(seed, index),
            WalletType::Ethereum => ethereum::derive_wallet(seed, index),
        }
    }

    fn validate_address(&self, address: &str) -> Result<(), ChainError> {
        match self.wallet_type {
            WalletType::Solana => solana::decode_address(address).map(|_| ()),
            WalletType::Ethereum => ethereum::parse_address(address).map(|_| ()),
        }
    }

    async fn get_balance(&self, _address: &str) -> Result<NativeBalance, ChainError> {
        self.hit()?;
        Ok(NativeBalance {
            formatted: format_units(&self.balance_raw, self.decimals()),
            raw: self.balance_raw.clone(),
        })
    }

    async fn submit_transfer(&self, transfer: &Transfer) -> Result<String, ChainError> {
        self.hit()?;
        Ok(format!("sig-{}-{}", self.wallet_type, transfer.amount))
    }

    async fn request_airdrop(&self, address: &str) -> Result<String, ChainError> {
        if self.wallet_type != WalletType::Solana {
            return Err(ChainError::Unsupported(format!(
                "Airdrops are not available on {}",
                self.wallet_type
            )));
        }
        self.hit()?;
        Ok(format!("airdrop-{address}"))
    }

    async fn ping(&self) -> Result<(), ChainError> {
        self.hit()
    }
}

/// Registry of one stub per chain; the stubs are returned for inspection.
pub fn stub_registry() -> (ChainRegistry, Arc<StubGateway>, Arc<StubGateway>) {
    let solana = Arc::new(StubGateway::new(WalletType::Solana));
    let ethereum = Arc::new(StubGateway::new(WalletType::Ethereum).with_balance("2500000000000000000"));
    let registry = ChainRegistry::new()
        .with_gateway(solana.clone())
        .with_gateway(ethereum.clone());
    (registry, solana, ethereum)
}
