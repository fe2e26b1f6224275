// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HD Wallet Server - Stateless Solana / Ethereum wallet generator
//!
//! This crate generates BIP-39 mnemonics, derives hierarchical-deterministic
//! keypairs, and talks to Solana and Ethereum RPC endpoints for balances,
//! devnet airdrops and native transfers. Nothing is persisted: mnemonics and
//! private keys live only for the request that carries them.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers, rate limiting and OpenAPI docs (Axum)
//! - `blockchain` - Per-chain gateways behind the `ChainGateway` trait
//! - `client` - Typed HTTP client and caller-owned wallet list
//! - `validation` - Request checks producing field-level violations
//! - `wallet` - Mnemonics, seeds and key derivation

pub mod api;
pub mod blockchain;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod validation;
pub mod wallet;
