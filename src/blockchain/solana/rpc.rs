// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Minimal Solana JSON-RPC client over `reqwest`.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use url::Url;

use crate::blockchain::gateway::ChainError;

/// Commitment used for reads and preflight.
const COMMITMENT: &str = "confirmed";

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Result wrapper carrying the slot the node answered at.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
}

/// Entry of a `getSignatureStatuses` result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    /// `processed`, `confirmed` or `finalized`
    pub confirmation_status: Option<String>,
    /// Transaction error, `null` on success
    pub err: Option<Value>,
}

impl SignatureStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self.confirmation_status.as_deref(),
            Some("confirmed") | Some("finalized")
        )
    }
}

/// Solana JSON-RPC client.
pub struct SolanaRpc {
    url: Url,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl SolanaRpc {
    /// Create a client whose every request is bounded by `timeout`.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::InvalidRpcUrl(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            url,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one JSON-RPC call.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::RemoteUnavailable(format!("{method}: {e}")))?;

        if !response.status().is_success() {
            return Err(ChainError::RemoteUnavailable(format!(
                "{method}: HTTP {} from RPC endpoint",
                response.status()
            )));
        }

        let decoded: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| ChainError::RemoteUnavailable(format!("{method}: invalid response: {e}")))?;

        if let Some(error) = decoded.error {
            tracing::debug!(method, code = error.code, message = %error.message, "Solana RPC error");
            return Err(ChainError::from_rejection(error.message));
        }

        decoded
            .result
            .ok_or_else(|| ChainError::RemoteUnavailable(format!("{method}: empty result")))
    }

    /// Balance in lamports.
    pub async fn get_balance(&self, address: &str) -> Result<u64, ChainError> {
        let result: WithContext<u64> = self
            .call("getBalance", json!([address, { "commitment": COMMITMENT }]))
            .await?;
        Ok(result.value)
    }

    /// Latest blockhash, base58.
    pub async fn get_latest_blockhash(&self) -> Result<String, ChainError> {
        let result: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([{ "commitment": COMMITMENT }]))
            .await?;
        Ok(result.value.blockhash)
    }

    /// Submit a signed, base64-encoded wire transaction. Returns its signature.
    pub async fn send_transaction(&self, wire_base64: &str) -> Result<String, ChainError> {
        self.call(
            "sendTransaction",
            json!([wire_base64, { "encoding": "base64", "preflightCommitment": COMMITMENT }]),
        )
        .await
    }

    /// Ask the faucet for `lamports`. Returns the airdrop signature.
    pub async fn request_airdrop(&self, address: &str, lamports: u64) -> Result<String, ChainError> {
        self.call("requestAirdrop", json!([address, lamports])).await
    }

    /// Status of one signature, `None` if the node has not seen it yet.
    pub async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, ChainError> {
        let result: WithContext<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", json!([[signature]]))
            .await?;
        Ok(result.value.into_iter().next().flatten())
    }

    /// Node health (`"ok"` when healthy).
    pub async fn get_health(&self) -> Result<String, ChainError> {
        self.call("getHealth", json!([])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_status_confirmation_levels() {
        let status: SignatureStatus =
            serde_json::from_str(r#"{"confirmationStatus":"processed","err":null}"#).unwrap();
        assert!(!status.is_confirmed());

        let status: SignatureStatus =
            serde_json::from_str(r#"{"confirmationStatus":"finalized","err":null,"slot":7}"#)
                .unwrap();
        assert!(status.is_confirmed());
        assert!(status.err.is_none());
    }

    #[test]
    fn rpc_error_envelope_decodes() {
        let decoded: RpcResponse<String> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","error":{"code":-32002,"message":"insufficient lamports"},"id":1}"#,
        )
        .unwrap();
        assert!(decoded.result.is_none());
        assert_eq!(decoded.error.unwrap().code, -32002);
    }

    #[test]
    fn balance_result_decodes() {
        let decoded: RpcResponse<WithContext<u64>> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","result":{"context":{"slot":1},"value":42},"id":1}"#,
        )
        .unwrap();
        assert_eq!(decoded.result.unwrap().value, 42);
    }
}
