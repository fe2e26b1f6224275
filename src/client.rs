// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # HTTP Client
//!
//! Typed client for the wallet server and a caller-owned wallet list.
//!
//! The server keeps no record of derived wallets. Callers that want to show
//! "my wallets" keep a [`WalletList`] and ask it for the next unused index
//! per chain:
//!
//! ```no_run
//! # async fn demo() -> Result<(), hd_wallet_server::client::ClientError> {
//! use hd_wallet_server::{client::{WalletClient, WalletList}, models::WalletType};
//!
//! let client = WalletClient::new("http://localhost:8080".parse()?)?;
//! let mnemonic = client.generate_mnemonic().await?;
//!
//! let mut wallets = WalletList::new();
//! wallets.add_next(&client, &mnemonic, WalletType::Solana).await?;
//! wallets.add_next(&client, &mnemonic, WalletType::Solana).await?;
//! assert_eq!(wallets.next_index(WalletType::Solana), 2);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    error::ErrorBody,
    models::{
        AirdropRequest, BalanceResponse, GenerateWalletRequest, GenerateWalletsRequest,
        MnemonicResponse, SendTransactionRequest, SignatureResponse, Wallet, WalletType,
        WalletsResponse,
    },
    validation::FieldViolation,
};

/// Default request timeout; airdrops wait for confirmation server-side.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors returned by [`WalletClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with its JSON error body.
    #[error("Server returned {status}: {message}")]
    Api {
        status: StatusCode,
        message: String,
        details: Vec<FieldViolation>,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Typed client for every server endpoint.
#[derive(Debug, Clone)]
pub struct WalletClient {
    base_url: Url,
    http: reqwest::Client,
}

impl WalletClient {
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Self::with_client(base_url, http)
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(mut base_url: Url, http: reqwest::Client) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        // `join` replaces the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.post(self.endpoint(path)?).json(body).send().await?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await?;
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Err(ClientError::Api {
                status,
                message: body.error,
                details: body.details.unwrap_or_default(),
            }),
            Err(_) => Err(ClientError::UnexpectedResponse(format!("{status}: {text}"))),
        }
    }

    /// `POST /generate-mnemonic`
    pub async fn generate_mnemonic(&self) -> Result<String, ClientError> {
        let response: MnemonicResponse = self.post("generate-mnemonic", &serde_json::json!({})).await?;
        Ok(response.mnemonic)
    }

    /// `POST /generate-wallet`
    pub async fn generate_wallet(
        &self,
        mnemonic: &str,
        wallet_type: WalletType,
        index: u32,
    ) -> Result<Wallet, ClientError> {
        let request = GenerateWalletRequest {
            mnemonic: Some(mnemonic.to_string()),
            wallet_type: Some(wallet_type),
            index: Some(index.into()),
        };
        let response: WalletsResponse = self.post("generate-wallet", &request).await?;
        response
            .wallets
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::UnexpectedResponse("empty wallet list".to_string()))
    }

    /// `POST /generate-wallets`
    pub async fn generate_wallets(
        &self,
        mnemonic: &str,
        wallet_type: WalletType,
        count: u32,
    ) -> Result<Vec<Wallet>, ClientError> {
        let request = GenerateWalletsRequest {
            mnemonic: Some(mnemonic.to_string()),
            wallet_count: Some(count.into()),
            wallet_type: Some(wallet_type),
        };
        let response: WalletsResponse = self.post("generate-wallets", &request).await?;
        Ok(response.wallets)
    }

    /// `POST /request-airdrop`
    pub async fn request_airdrop(
        &self,
        public_key: &str,
        wallet_type: WalletType,
    ) -> Result<String, ClientError> {
        let request = AirdropRequest {
            public_key: Some(public_key.to_string()),
            wallet_type: Some(wallet_type),
        };
        let response: SignatureResponse = self.post("request-airdrop", &request).await?;
        Ok(response.signature)
    }

    /// `POST /send-transaction`
    pub async fn send_transaction(
        &self,
        request: &SendTransactionRequest,
    ) -> Result<String, ClientError> {
        let response: SignatureResponse = self.post("send-transaction", request).await?;
        Ok(response.signature)
    }

    /// `GET /get-balance/{publicKey}?walletType=`
    pub async fn get_balance(
        &self,
        public_key: &str,
        wallet_type: WalletType,
    ) -> Result<BalanceResponse, ClientError> {
        let mut url = self.endpoint("get-balance/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(public_key);
        url.query_pairs_mut()
            .append_pair("walletType", wallet_type.as_str());

        let response = self.http.get(url).send().await?;
        Self::read(response).await
    }
}

/// Wallets derived by one caller, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletList {
    wallets: Vec<Wallet>,
}

impl WalletList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Wallets of one chain.
    pub fn of_type(&self, wallet_type: WalletType) -> impl Iterator<Item = &Wallet> {
        self.wallets
            .iter()
            .filter(move |w| w.wallet_type == wallet_type)
    }

    /// Next account index for `wallet_type`: the number of wallets of that
    /// chain already held.
    pub fn next_index(&self, wallet_type: WalletType) -> u32 {
        self.of_type(wallet_type).count() as u32
    }

    pub fn push(&mut self, wallet: Wallet) {
        self.wallets.push(wallet);
    }

    /// Derive the wallet at [`next_index`](Self::next_index) and append it.
    pub async fn add_next(
        &mut self,
        client: &WalletClient,
        mnemonic: &str,
        wallet_type: WalletType,
    ) -> Result<&Wallet, ClientError> {
        let index = self.next_index(wallet_type);
        let wallet = client.generate_wallet(mnemonic, wallet_type, index).await?;
        self.wallets.push(wallet);
        Ok(&self.wallets[self.wallets.len() - 1])
    }
}
