// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::extract::ValidJson;
use crate::{
    error::{ApiError, ErrorBody},
    models::{AirdropRequest, SignatureResponse},
    state::AppState,
    validation::validate_airdrop,
};

/// Request test currency for an address.
///
/// Only available on Solana test networks. Responds once the airdrop is
/// confirmed or fails after the configured wait.
#[utoipa::path(
    post,
    path = "/request-airdrop",
    tag = "Network",
    request_body = AirdropRequest,
    responses(
        (status = 200, description = "Airdrop confirmed", body = SignatureResponse),
        (status = 400, description = "Invalid address or unsupported chain", body = ErrorBody),
        (status = 500, description = "Upstream network request failed", body = ErrorBody)
    )
)]
pub async fn request_airdrop(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<AirdropRequest>,
) -> Result<Json<SignatureResponse>, ApiError> {
    let params = validate_airdrop(&req, &state.registry)?;
    let gateway = state.registry.get(params.wallet_type)?;

    let signature = gateway.request_airdrop(&params.public_key).await?;
    tracing::info!(
        wallet_type = %params.wallet_type,
        address = %params.public_key,
        %signature,
        "Airdrop confirmed"
    );

    Ok(Json(SignatureResponse { signature }))
}
