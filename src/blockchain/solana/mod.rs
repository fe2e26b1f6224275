// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana gateway.
//!
//! Keys are derived with SLIP-0010 ed25519 at `m/44'/501'/{index}'/0'`.
//! Addresses are base58 public keys; secrets are the base58 encoding of the
//! 64-byte keypair (secret seed followed by public key).

pub mod rpc;
pub mod transaction;

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ed25519_dalek::SigningKey;

use self::rpc::SolanaRpc;
use super::{
    gateway::{ChainError, ChainGateway},
    types::{NativeBalance, NetworkConfig, Transfer},
    units::{lamports_to_sol, SOL_DECIMALS},
};
use crate::{
    models::{Wallet, WalletType},
    wallet::{derivation::derive_ed25519, ChildIndex, DerivationError, DerivationPath, Seed},
};

/// SLIP-44 coin type for Solana.
pub const COIN_TYPE: u32 = 501;

/// Interval between airdrop confirmation polls.
const AIRDROP_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// `m/44'/501'/{index}'/0'`.
pub fn derivation_path(index: u32) -> Result<DerivationPath, DerivationError> {
    DerivationPath::new(vec![
        ChildIndex::Hardened(44),
        ChildIndex::Hardened(COIN_TYPE),
        ChildIndex::Hardened(index),
        ChildIndex::Hardened(0),
    ])
}

/// Derive the Solana wallet at `index`.
pub fn derive_wallet(seed: &Seed, index: u32) -> Result<Wallet, DerivationError> {
    let path = derivation_path(index)?;
    let secret = derive_ed25519(seed, &path)?;
    let signing_key = SigningKey::from_bytes(&secret);

    Ok(Wallet {
        public_key: bs58::encode(signing_key.verifying_key().to_bytes()).into_string(),
        path: path.to_string(),
        private_key: bs58::encode(signing_key.to_keypair_bytes()).into_string(),
        wallet_type: WalletType::Solana,
    })
}

/// Decode a base58 address into its 32 bytes.
pub fn decode_address(address: &str) -> Result<[u8; 32], ChainError> {
    let bytes = bs58::decode(address.trim())
        .into_vec()
        .map_err(|e| ChainError::InvalidAddress(format!("`{address}` is not base58: {e}")))?;

    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        ChainError::InvalidAddress(format!(
            "`{address}` decodes to {} bytes, expected 32",
            bytes.len()
        ))
    })
}

/// Rebuild a signing key from a base58 secret.
///
/// Accepts the 64-byte keypair encoding (checked for consistency) or a bare
/// 32-byte secret seed.
pub fn signing_key_from_secret(secret: &str) -> Result<SigningKey, ChainError> {
    let bytes = zeroize::Zeroizing::new(
        bs58::decode(secret.trim())
            .into_vec()
            .map_err(|_| ChainError::InvalidPrivateKey("not valid base58".to_string()))?,
    );

    match bytes.len() {
        64 => {
            let mut keypair = zeroize::Zeroizing::new([0u8; 64]);
            keypair.copy_from_slice(&bytes);
            SigningKey::from_keypair_bytes(&keypair)
                .map_err(|_| ChainError::InvalidPrivateKey("inconsistent keypair bytes".to_string()))
        }
        32 => {
            let mut seed = zeroize::Zeroizing::new([0u8; 32]);
            seed.copy_from_slice(&bytes);
            Ok(SigningKey::from_bytes(&seed))
        }
        n => Err(ChainError::InvalidPrivateKey(format!(
            "expected 32 or 64 bytes, got {n}"
        ))),
    }
}

/// Solana JSON-RPC backed gateway.
pub struct SolanaGateway {
    network: NetworkConfig,
    rpc: SolanaRpc,
    airdrop_lamports: u64,
    airdrop_timeout: Duration,
}

impl SolanaGateway {
    pub fn new(
        network: NetworkConfig,
        rpc_timeout: Duration,
        airdrop_lamports: u64,
        airdrop_timeout: Duration,
    ) -> Result<Self, ChainError> {
        let rpc = SolanaRpc::new(network.rpc_url.clone(), rpc_timeout)?;
        Ok(Self {
            network,
            rpc,
            airdrop_lamports,
            airdrop_timeout,
        })
    }

    /// Poll until `signature` reaches `confirmed` or the airdrop timeout elapses.
    async fn wait_for_confirmation(&self, signature: &str) -> Result<(), ChainError> {
        tokio::time::timeout(self.airdrop_timeout, self.poll_confirmation(signature))
            .await
            .map_err(|_| {
                ChainError::RemoteUnavailable(format!(
                    "airdrop {signature} not confirmed within {:?}",
                    self.airdrop_timeout
                ))
            })?
    }

    async fn poll_confirmation(&self, signature: &str) -> Result<(), ChainError> {
        loop {
            if let Some(status) = self.rpc.get_signature_status(signature).await? {
                if let Some(err) = status.err {
                    return Err(ChainError::Rejected(format!(
                        "airdrop transaction failed: {err}"
                    )));
                }
                if status.is_confirmed() {
                    return Ok(());
                }
            }
            tokio::time::sleep(AIRDROP_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl ChainGateway for SolanaGateway {
    fn wallet_type(&self) -> WalletType {
        WalletType::Solana
    }

    fn decimals(&self) -> u8 {
        SOL_DECIMALS
    }

    fn derive_keypair(&self, seed: &Seed, index: u32) -> Result<Wallet, DerivationError> {
        derive_wallet(seed, index)
    }

    fn validate_address(&self, address: &str) -> Result<(), ChainError> {
        decode_address(address).map(|_| ())
    }

    async fn get_balance(&self, address: &str) -> Result<NativeBalance, ChainError> {
        decode_address(address)?;
        let lamports = self.rpc.get_balance(address.trim()).await?;
        Ok(NativeBalance {
            raw: lamports.to_string(),
            formatted: lamports_to_sol(lamports),
        })
    }

    async fn submit_transfer(&self, transfer: &Transfer) -> Result<String, ChainError> {
        let lamports = u64::try_from(transfer.amount).map_err(|_| {
            ChainError::InvalidAmount("amount exceeds the maximum lamport value".to_string())
        })?;

        let from = decode_address(&transfer.from)?;
        let to = decode_address(&transfer.to).map_err(|e| ChainError::InvalidRecipient(e.to_string()))?;

        let signer = signing_key_from_secret(&transfer.private_key)?;
        if signer.verifying_key().to_bytes() != from {
            return Err(ChainError::InvalidPrivateKey(
                "private key does not match fromPublicKey".to_string(),
            ));
        }

        let blockhash = self.rpc.get_latest_blockhash().await?;
        let blockhash = decode_address(&blockhash)
            .map_err(|_| ChainError::RemoteUnavailable(format!("invalid blockhash `{blockhash}`")))?;

        let message = transaction::transfer_message(&from, &to, lamports, &blockhash);
        let (signature, wire) = transaction::sign_transaction(&signer, &message);

        tracing::info!(
            network = %self.network.name,
            from = %transfer.from,
            to = %transfer.to,
            lamports,
            "Submitting Solana transfer"
        );

        let accepted = self.rpc.send_transaction(&BASE64.encode(&wire)).await?;
        let expected = bs58::encode(signature).into_string();
        if accepted != expected {
            tracing::warn!(%accepted, %expected, "RPC returned an unexpected signature");
        }
        Ok(accepted)
    }

    async fn request_airdrop(&self, address: &str) -> Result<String, ChainError> {
        decode_address(address)?;

        let signature = self
            .rpc
            .request_airdrop(address.trim(), self.airdrop_lamports)
            .await
            .map_err(|e| match e {
                ChainError::RemoteUnavailable(_) => e,
                other => ChainError::RemoteUnavailable(other.to_string()),
            })?;

        tracing::info!(
            network = %self.network.name,
            %address,
            %signature,
            lamports = self.airdrop_lamports,
            "Airdrop requested, waiting for confirmation"
        );

        self.wait_for_confirmation(&signature).await?;
        Ok(signature)
    }

    async fn ping(&self) -> Result<(), ChainError> {
        let health = self.rpc.get_health().await?;
        if health == "ok" {
            Ok(())
        } else {
            Err(ChainError::RemoteUnavailable(format!("node reports `{health}`")))
        }
    }
}
