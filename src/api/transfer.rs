// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::extract::ValidJson;
use crate::{
    error::{ApiError, ErrorBody},
    models::{SendTransactionRequest, SignatureResponse},
    state::AppState,
    validation::validate_transfer,
};

/// Sign and submit a native transfer.
///
/// The private key is used for this one request and never stored. The
/// signature (Solana) or transaction hash (Ethereum) is returned once the
/// network accepts the transaction, not at finality.
#[utoipa::path(
    post,
    path = "/send-transaction",
    tag = "Network",
    request_body = SendTransactionRequest,
    responses(
        (status = 200, description = "Transaction submitted", body = SignatureResponse),
        (status = 400, description = "Invalid request, key or insufficient funds", body = ErrorBody),
        (status = 500, description = "Upstream network request failed", body = ErrorBody)
    )
)]
pub async fn send_transaction(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SendTransactionRequest>,
) -> Result<Json<SignatureResponse>, ApiError> {
    let transfer = validate_transfer(&req, &state.registry)?;
    let gateway = state.registry.get(transfer.wallet_type)?;

    let signature = gateway.submit_transfer(&transfer).await?;
    tracing::info!(
        wallet_type = %transfer.wallet_type,
        from = %transfer.from,
        to = %transfer.to,
        amount = %transfer.amount,
        %signature,
        "Transfer submitted"
    );

    Ok(Json(SignatureResponse { signature }))
}
