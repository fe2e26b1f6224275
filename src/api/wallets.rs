// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet derivation endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};

use super::extract::ValidJson;
use crate::{
    blockchain::ChainGateway,
    error::{ApiError, ErrorBody},
    models::{GenerateWalletRequest, GenerateWalletsRequest, Wallet, WalletsResponse},
    state::AppState,
    validation::{validate_generate_wallet, validate_generate_wallets},
    wallet::{self, mnemonic, seed_from, DerivationError},
};

/// Run PBKDF2 and the derivation off the async workers.
async fn derive_blocking<F>(
    phrase: &str,
    gateway: Arc<dyn ChainGateway>,
    derive: F,
) -> Result<Vec<Wallet>, ApiError>
where
    F: FnOnce(&dyn ChainGateway, &wallet::Seed) -> Result<Vec<Wallet>, DerivationError>
        + Send
        + 'static,
{
    // Checked up front so an invalid phrase never reaches the key schedule.
    let mnemonic = mnemonic::parse(phrase)?;

    let wallets = tokio::task::spawn_blocking(move || {
        let seed = seed_from(&mnemonic);
        derive(gateway.as_ref(), &seed)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Derivation task failed");
        ApiError::internal("Key derivation failed")
    })??;

    Ok(wallets)
}

/// Derive the wallet at `index` for one chain.
///
/// Stateless: the same mnemonic, chain and index always give the same wallet.
#[utoipa::path(
    post,
    path = "/generate-wallet",
    tag = "Wallets",
    request_body = GenerateWalletRequest,
    responses(
        (status = 200, description = "Wallet derived", body = WalletsResponse),
        (status = 400, description = "Invalid request or mnemonic", body = ErrorBody)
    )
)]
pub async fn generate_wallet(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<GenerateWalletRequest>,
) -> Result<Json<WalletsResponse>, ApiError> {
    let params = validate_generate_wallet(&req)?;
    let gateway = state.registry.get(params.wallet_type)?.clone();
    let index = params.index;

    let wallets = derive_blocking(&params.mnemonic, gateway, move |gateway, seed| {
        wallet::derive_keypair(gateway, seed, index).map(|w| vec![w])
    })
    .await?;

    tracing::info!(
        wallet_type = %params.wallet_type,
        index,
        address = %wallets[0].public_key,
        "Derived wallet"
    );

    Ok(Json(WalletsResponse { wallets }))
}

/// Derive the first `walletCount` wallets (indices `0..walletCount`).
#[utoipa::path(
    post,
    path = "/generate-wallets",
    tag = "Wallets",
    request_body = GenerateWalletsRequest,
    responses(
        (status = 200, description = "Wallets derived", body = WalletsResponse),
        (status = 400, description = "Invalid request or mnemonic", body = ErrorBody)
    )
)]
pub async fn generate_wallets(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<GenerateWalletsRequest>,
) -> Result<Json<WalletsResponse>, ApiError> {
    let params = validate_generate_wallets(&req)?;
    let gateway = state.registry.get(params.wallet_type)?.clone();
    let count = params.count;

    let wallets = derive_blocking(&params.mnemonic, gateway, move |gateway, seed| {
        wallet::derive_wallets(gateway, seed, count)
    })
    .await?;

    tracing::info!(wallet_type = %params.wallet_type, count, "Derived wallets");

    Ok(Json(WalletsResponse { wallets }))
}
