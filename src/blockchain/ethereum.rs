// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ethereum gateway.
//!
//! Keys are derived with BIP-32 secp256k1 at `m/44'/60'/0'/0/{index}`.
//! Addresses are EIP-55 checksummed; secrets are 0x-prefixed hex.

use std::{future::Future, str::FromStr, time::Duration};

use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::TransportError,
};
use async_trait::async_trait;

use super::{
    gateway::{ChainError, ChainGateway},
    types::{NativeBalance, NetworkConfig, Transfer},
    units::{format_units, ETH_DECIMALS},
};
use crate::{
    models::{Wallet, WalletType},
    wallet::{derivation::derive_secp256k1, ChildIndex, DerivationError, DerivationPath, Seed},
};

/// SLIP-44 coin type for Ethereum.
pub const COIN_TYPE: u32 = 60;

/// `m/44'/60'/0'/0/{index}`.
pub fn derivation_path(index: u32) -> Result<DerivationPath, DerivationError> {
    DerivationPath::new(vec![
        ChildIndex::Hardened(44),
        ChildIndex::Hardened(COIN_TYPE),
        ChildIndex::Hardened(0),
        ChildIndex::Normal(0),
        ChildIndex::Normal(index),
    ])
}

/// Derive the Ethereum wallet at `index`.
pub fn derive_wallet(seed: &Seed, index: u32) -> Result<Wallet, DerivationError> {
    let path = derivation_path(index)?;
    let key = derive_secp256k1(seed, &path)?;
    let key_bytes = key.to_bytes();

    let signer = PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| DerivationError::KeyDerivation(format!("Invalid secp256k1 key: {e}")))?;

    Ok(Wallet {
        public_key: signer.address().to_checksum(None),
        path: path.to_string(),
        private_key: format!("0x{}", alloy::hex::encode(key_bytes)),
        wallet_type: WalletType::Ethereum,
    })
}

/// Validate an Ethereum address.
///
/// Requires `0x` + 40 hex characters. Mixed-case addresses must carry a valid
/// EIP-55 checksum.
pub fn parse_address(address: &str) -> Result<Address, ChainError> {
    let address = address.trim();
    if !address.starts_with("0x") {
        return Err(ChainError::InvalidAddress("Address must start with 0x".to_string()));
    }
    if address.len() != 42 {
        return Err(ChainError::InvalidAddress(
            "Address must be 42 characters (0x + 40 hex)".to_string(),
        ));
    }
    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidAddress(
            "Address must contain only hex characters".to_string(),
        ));
    }

    let body = &address[2..];
    let mixed_case = body.chars().any(|c| c.is_ascii_uppercase())
        && body.chars().any(|c| c.is_ascii_lowercase());
    if mixed_case {
        Address::parse_checksummed(address, None)
            .map_err(|_| ChainError::InvalidAddress("Address checksum mismatch".to_string()))
    } else {
        Address::from_str(address).map_err(|e| ChainError::InvalidAddress(e.to_string()))
    }
}

/// Create a signer from a hex private key (with or without 0x prefix).
pub fn create_signer(private_key_hex: &str) -> Result<PrivateKeySigner, ChainError> {
    let key_bytes = zeroize::Zeroizing::new(
        alloy::hex::decode(private_key_hex.trim())
            .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?,
    );

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))
}

/// Map an alloy RPC error onto the gateway taxonomy.
///
/// JSON-RPC error responses are rejections by the node; anything else is a
/// transport failure.
fn classify_rpc_error(e: TransportError) -> ChainError {
    match e.as_error_resp() {
        Some(payload) => ChainError::from_rejection(payload.message.to_string()),
        None => ChainError::RemoteUnavailable(e.to_string()),
    }
}

/// Alloy provider backed gateway.
pub struct EthereumGateway {
    network: NetworkConfig,
    provider: DynProvider,
    timeout: Duration,
}

impl EthereumGateway {
    /// Create a gateway; no connection is made until the first call.
    pub fn new(network: NetworkConfig, timeout: Duration) -> Self {
        let provider = ProviderBuilder::new()
            .connect_http(network.rpc_url.clone())
            .erased();

        Self {
            network,
            provider,
            timeout,
        }
    }

    /// Bound an RPC future by the configured timeout.
    async fn bounded<T, F>(&self, what: &str, fut: F) -> Result<T, ChainError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(classify_rpc_error),
            Err(_) => Err(ChainError::RemoteUnavailable(format!(
                "{what} timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

#[async_trait]
impl ChainGateway for EthereumGateway {
    fn wallet_type(&self) -> WalletType {
        WalletType::Ethereum
    }

    fn decimals(&self) -> u8 {
        ETH_DECIMALS
    }

    fn derive_keypair(&self, seed: &Seed, index: u32) -> Result<Wallet, DerivationError> {
        derive_wallet(seed, index)
    }

    fn validate_address(&self, address: &str) -> Result<(), ChainError> {
        parse_address(address).map(|_| ())
    }

    async fn get_balance(&self, address: &str) -> Result<NativeBalance, ChainError> {
        let addr = parse_address(address)?;
        let wei: U256 = self
            .bounded("eth_getBalance", async { self.provider.get_balance(addr).await })
            .await?;

        let raw = wei.to_string();
        Ok(NativeBalance {
            formatted: format_units(&raw, ETH_DECIMALS),
            raw,
        })
    }

    async fn submit_transfer(&self, transfer: &Transfer) -> Result<String, ChainError> {
        let from = parse_address(&transfer.from)?;
        let to = parse_address(&transfer.to).map_err(|e| ChainError::InvalidRecipient(e.to_string()))?;

        let signer = create_signer(&transfer.private_key)?;
        if signer.address() != from {
            return Err(ChainError::InvalidPrivateKey(
                "private key does not match fromPublicKey".to_string(),
            ));
        }

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.network.rpc_url.clone());

        let tx = TransactionRequest::default()
            .from(from)
            .to(to)
            .value(U256::from(transfer.amount));

        tracing::info!(
            network = %self.network.name,
            from = %transfer.from,
            to = %transfer.to,
            wei = %transfer.amount,
            "Submitting Ethereum transfer"
        );

        let pending = self
            .bounded("eth_sendTransaction", async { provider.send_transaction(tx).await })
            .await?;

        Ok(pending.tx_hash().to_string())
    }

    async fn ping(&self) -> Result<(), ChainError> {
        self.bounded("eth_blockNumber", async { self.provider.get_block_number().await })
            .await
            .map(|_| ())
    }
}
