// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Seed stretching and hierarchical-deterministic key derivation.
//!
//! Two derivation schemes are supported:
//!
//! - **SLIP-0010 ed25519** (Solana): HMAC-SHA512 keyed with `"ed25519 seed"`,
//!   hardened children only.
//! - **BIP-32 secp256k1** (Ethereum): delegated to the `bip32` crate.
//!
//! Every function here is pure: the same mnemonic, chain and index always
//! produce the same key.

use std::fmt;

use bip39::Mnemonic;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::blockchain::ChainGateway;
use crate::models::Wallet;

type HmacSha512 = Hmac<Sha512>;

/// First hardened child index (`2^31`).
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// SLIP-0010 master key HMAC key for ed25519.
const ED25519_MASTER_SECRET: &[u8] = b"ed25519 seed";

/// 512-bit BIP-39 seed. Zeroized on drop.
#[derive(Clone)]
pub struct Seed(Zeroizing<[u8; 64]>);

impl Seed {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Seed(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// One level of a derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildIndex {
    Hardened(u32),
    Normal(u32),
}

impl ChildIndex {
    /// Index as used on the wire (hardened indices carry the `2^31` bit).
    pub fn raw(&self) -> u32 {
        match *self {
            ChildIndex::Hardened(i) => i | HARDENED_OFFSET,
            ChildIndex::Normal(i) => i,
        }
    }

    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildIndex::Hardened(_))
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildIndex::Hardened(i) => write!(f, "{i}'"),
            ChildIndex::Normal(i) => write!(f, "{i}"),
        }
    }
}

/// `m/purpose'/coin'/account'/change[/index]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// Build a path, rejecting indices that already carry the hardened bit.
    pub fn new(levels: Vec<ChildIndex>) -> Result<Self, DerivationError> {
        for level in &levels {
            let (ChildIndex::Hardened(i) | ChildIndex::Normal(i)) = *level;
            if i >= HARDENED_OFFSET {
                return Err(DerivationError::IndexOutOfRange(i as u64));
            }
        }
        Ok(DerivationPath(levels))
    }

    pub fn levels(&self) -> &[ChildIndex] {
        &self.0
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for level in &self.0 {
            write!(f, "/{level}")?;
        }
        Ok(())
    }
}

/// Stretch a mnemonic into its 64-byte seed (PBKDF2-HMAC-SHA512, 2048
/// rounds, empty passphrase).
///
/// This is deliberately slow; call it from a blocking task inside async code.
pub fn seed_from(mnemonic: &Mnemonic) -> Seed {
    Seed::from_bytes(mnemonic.to_seed_normalized(""))
}

/// Derive an ed25519 secret key following SLIP-0010.
///
/// Every level of `path` must be hardened.
pub fn derive_ed25519(
    seed: &Seed,
    path: &DerivationPath,
) -> Result<Zeroizing<[u8; 32]>, DerivationError> {
    if let Some(level) = path.levels().iter().find(|l| !l.is_hardened()) {
        return Err(DerivationError::InvalidPath(format!(
            "ed25519 derivation requires hardened levels, found `{level}` in {path}"
        )));
    }

    let (mut key, mut chain_code) = hmac_split(ED25519_MASTER_SECRET, &[&seed.as_bytes()[..]])?;

    for level in path.levels() {
        let index = level.raw().to_be_bytes();
        let (child_key, child_chain) =
            hmac_split(&chain_code[..], &[&[0u8][..], &key[..], &index[..]])?;
        key = child_key;
        chain_code = child_chain;
    }

    Ok(key)
}

/// HMAC-SHA512 over `parts`, split into (IL, IR).
fn hmac_split(
    key: &[u8],
    parts: &[&[u8]],
) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>), DerivationError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| DerivationError::KeyDerivation(format!("HMAC init failed: {e}")))?;
    for part in parts {
        mac.update(part);
    }
    let mut output = [0u8; 64];
    output.copy_from_slice(&mac.finalize().into_bytes());

    let mut left = Zeroizing::new([0u8; 32]);
    let mut right = Zeroizing::new([0u8; 32]);
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    output.zeroize();

    Ok((left, right))
}

/// Derive a secp256k1 signing key following BIP-32.
pub fn derive_secp256k1(
    seed: &Seed,
    path: &DerivationPath,
) -> Result<k256::ecdsa::SigningKey, DerivationError> {
    let bip32_path: bip32::DerivationPath = path
        .to_string()
        .parse()
        .map_err(|e| DerivationError::InvalidPath(format!("{path}: {e}")))?;

    let xprv = bip32::XPrv::derive_from_path(seed.as_bytes(), &bip32_path)
        .map_err(|e| DerivationError::KeyDerivation(format!("BIP-32 derivation failed: {e}")))?;

    Ok(xprv.private_key().clone())
}

/// Derive the wallet at `index` for the gateway's chain.
///
/// Each call is independent; nothing tracks previously used indices.
pub fn derive_keypair(
    gateway: &dyn ChainGateway,
    seed: &Seed,
    index: u32,
) -> Result<Wallet, DerivationError> {
    if index >= HARDENED_OFFSET {
        return Err(DerivationError::IndexOutOfRange(index as u64));
    }
    gateway.derive_keypair(seed, index)
}

/// Derive wallets for indices `0..count`.
pub fn derive_wallets(
    gateway: &dyn ChainGateway,
    seed: &Seed,
    count: u32,
) -> Result<Vec<Wallet>, DerivationError> {
    (0..count)
        .map(|index| derive_keypair(gateway, seed, index))
        .collect()
}

/// Errors raised while turning a mnemonic into keys.
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Index {0} is out of range (must be below 2^31)")]
    IndexOutOfRange(u64),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::mnemonic;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    /// BIP-39 reference seed for `ABANDON_ABOUT` with an empty passphrase.
    const ABANDON_ABOUT_SEED: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn seed_from_hex(s: &str) -> Seed {
        let mut bytes = [0u8; 64];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            bytes[i] = u8::from_str_radix(std::str::from_utf8(chunk).unwrap(), 16).unwrap();
        }
        Seed::from_bytes(bytes)
    }

    fn solana_path(index: u32) -> DerivationPath {
        DerivationPath::new(vec![
            ChildIndex::Hardened(44),
            ChildIndex::Hardened(501),
            ChildIndex::Hardened(index),
            ChildIndex::Hardened(0),
        ])
        .unwrap()
    }

    #[test]
    fn seed_matches_bip39_reference_vector() {
        let m = mnemonic::parse(ABANDON_ABOUT).unwrap();
        assert_eq!(hex(seed_from(&m).as_bytes()), ABANDON_ABOUT_SEED);
    }

    #[test]
    fn path_display_marks_hardened_levels() {
        assert_eq!(solana_path(3).to_string(), "m/44'/501'/3'/0'");

        let eth = DerivationPath::new(vec![
            ChildIndex::Hardened(44),
            ChildIndex::Hardened(60),
            ChildIndex::Hardened(0),
            ChildIndex::Normal(0),
            ChildIndex::Normal(7),
        ])
        .unwrap();
        assert_eq!(eth.to_string(), "m/44'/60'/0'/0/7");
    }

    #[test]
    fn path_rejects_pre_hardened_indices() {
        assert!(matches!(
            DerivationPath::new(vec![ChildIndex::Normal(HARDENED_OFFSET)]),
            Err(DerivationError::IndexOutOfRange(_))
        ));
    }

    #[test]
    fn slip10_master_key_matches_reference_vector() {
        // SLIP-0010 test vector 1 for ed25519, chain m.
        let vector: Vec<u8> = (0u8..16).collect();
        let (key, chain) = hmac_split(ED25519_MASTER_SECRET, &[&vector[..]]).unwrap();
        assert_eq!(
            hex(&key[..]),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex(&chain[..]),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
    }

    #[test]
    fn ed25519_derivation_is_deterministic() {
        let seed = seed_from_hex(ABANDON_ABOUT_SEED);
        let a = derive_ed25519(&seed, &solana_path(0)).unwrap();
        let b = derive_ed25519(&seed, &solana_path(0)).unwrap();
        assert_eq!(&*a, &*b);
    }

    #[test]
    fn ed25519_indices_do_not_collide() {
        let seed = seed_from_hex(ABANDON_ABOUT_SEED);
        let keys: Vec<[u8; 32]> = (0..16)
            .map(|i| *derive_ed25519(&seed, &solana_path(i)).unwrap())
            .collect();
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                assert_ne!(keys[i], keys[j], "indices {i} and {j} collided");
            }
        }
    }

    #[test]
    fn ed25519_rejects_non_hardened_levels() {
        let seed = seed_from_hex(ABANDON_ABOUT_SEED);
        let path = DerivationPath::new(vec![
            ChildIndex::Hardened(44),
            ChildIndex::Hardened(501),
            ChildIndex::Hardened(0),
            ChildIndex::Normal(0),
        ])
        .unwrap();
        let err = derive_ed25519(&seed, &path).unwrap_err();
        assert!(err.to_string().contains("hardened"));
    }

    #[test]
    fn secp256k1_derivation_matches_known_key() {
        // m/44'/60'/0'/0/0 of `ABANDON_ABOUT`.
        let seed = seed_from_hex(ABANDON_ABOUT_SEED);
        let path = DerivationPath::new(vec![
            ChildIndex::Hardened(44),
            ChildIndex::Hardened(60),
            ChildIndex::Hardened(0),
            ChildIndex::Normal(0),
            ChildIndex::Normal(0),
        ])
        .unwrap();
        let key = derive_secp256k1(&seed, &path).unwrap();
        assert_eq!(
            hex(&key.to_bytes()),
            "1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
        );
    }
}
