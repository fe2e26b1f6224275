// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`Config`] struct loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SOLANA_RPC_URL` | Solana JSON-RPC endpoint | `https://api.devnet.solana.com` |
//! | `ETHEREUM_RPC_URL` | Ethereum JSON-RPC endpoint | `https://ethereum-sepolia-rpc.publicnode.com` |
//! | `RPC_TIMEOUT_SECS` | Timeout for every outbound RPC call | `30` |
//! | `AIRDROP_LAMPORTS` | Lamports requested per airdrop | `1000000000` |
//! | `AIRDROP_TIMEOUT_SECS` | How long to wait for airdrop confirmation | `30` |
//! | `RATE_LIMIT_MAX_REQUESTS` | Requests allowed per client per window | `100` |
//! | `RATE_LIMIT_WINDOW_SECS` | Rate limit window length | `900` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, str::FromStr, time::Duration};

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SOLANA_RPC_URL_ENV: &str = "SOLANA_RPC_URL";
pub const ETHEREUM_RPC_URL_ENV: &str = "ETHEREUM_RPC_URL";
pub const RPC_TIMEOUT_SECS_ENV: &str = "RPC_TIMEOUT_SECS";
pub const AIRDROP_LAMPORTS_ENV: &str = "AIRDROP_LAMPORTS";
pub const AIRDROP_TIMEOUT_SECS_ENV: &str = "AIRDROP_TIMEOUT_SECS";
pub const RATE_LIMIT_MAX_REQUESTS_ENV: &str = "RATE_LIMIT_MAX_REQUESTS";
pub const RATE_LIMIT_WINDOW_SECS_ENV: &str = "RATE_LIMIT_WINDOW_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Solana devnet, where airdrops are available.
pub const DEFAULT_SOLANA_RPC_URL: &str = "https://api.devnet.solana.com";

/// Ethereum Sepolia testnet.
pub const DEFAULT_ETHEREUM_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// 1 SOL.
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = 1_000_000_000;
pub const DEFAULT_AIRDROP_TIMEOUT_SECS: u64 = 30;

/// 100 requests per 15 minutes per client.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub solana_rpc_url: Url,
    pub ethereum_rpc_url: Url,
    pub rpc_timeout: Duration,
    pub airdrop_lamports: u64,
    pub airdrop_timeout: Duration,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            solana_rpc_url: Url::parse(DEFAULT_SOLANA_RPC_URL).expect("valid default URL"),
            ethereum_rpc_url: Url::parse(DEFAULT_ETHEREUM_RPC_URL).expect("valid default URL"),
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
            airdrop_lamports: DEFAULT_AIRDROP_LAMPORTS,
            airdrop_timeout: Duration::from_secs(DEFAULT_AIRDROP_TIMEOUT_SECS),
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to their defaults; set but unparsable
    /// variables are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let config = Self {
            host: lookup(HOST_ENV).unwrap_or(defaults.host),
            port: parse_var(&lookup, PORT_ENV)?.unwrap_or(defaults.port),
            solana_rpc_url: parse_var(&lookup, SOLANA_RPC_URL_ENV)?
                .unwrap_or(defaults.solana_rpc_url),
            ethereum_rpc_url: parse_var(&lookup, ETHEREUM_RPC_URL_ENV)?
                .unwrap_or(defaults.ethereum_rpc_url),
            rpc_timeout: parse_var(&lookup, RPC_TIMEOUT_SECS_ENV)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.rpc_timeout),
            airdrop_lamports: parse_var(&lookup, AIRDROP_LAMPORTS_ENV)?
                .unwrap_or(defaults.airdrop_lamports),
            airdrop_timeout: parse_var(&lookup, AIRDROP_TIMEOUT_SECS_ENV)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.airdrop_timeout),
            rate_limit_max_requests: parse_var(&lookup, RATE_LIMIT_MAX_REQUESTS_ENV)?
                .unwrap_or(defaults.rate_limit_max_requests),
            rate_limit_window: parse_var(&lookup, RATE_LIMIT_WINDOW_SECS_ENV)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_limit_window),
            log_format: parse_var(&lookup, LOG_FORMAT_ENV)?.unwrap_or(defaults.log_format),
        };

        if config.rate_limit_max_requests == 0 {
            return Err(ConfigError::Invalid {
                name: RATE_LIMIT_MAX_REQUESTS_ENV,
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if config.rate_limit_window.is_zero() {
            return Err(ConfigError::Invalid {
                name: RATE_LIMIT_WINDOW_SECS_ENV,
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(config)
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: HOST_ENV,
            value: raw.clone(),
            reason: e.to_string(),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };

    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => Err(ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        }),
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value `{value}` for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}
