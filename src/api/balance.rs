// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native balance query endpoint.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{BalanceQuery, BalanceResponse},
    state::AppState,
    validation::{validate_balance, Violations},
};

/// Get the native balance of an address.
///
/// The balance is returned in the display unit with the chain's full
/// precision, alongside the raw smallest-unit value.
#[utoipa::path(
    get,
    path = "/get-balance/{public_key}",
    tag = "Network",
    params(
        ("public_key" = String, Path, description = "Address to query"),
        BalanceQuery
    ),
    responses(
        (status = 200, description = "Balance retrieved", body = BalanceResponse),
        (status = 400, description = "Invalid address", body = ErrorBody),
        (status = 500, description = "Upstream network request failed", body = ErrorBody)
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(public_key): Path<String>,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Result<Json<BalanceResponse>, ApiError> {
    // The only query parameter is `walletType`.
    let Query(query) = query.map_err(|e| Violations::single("walletType", e.body_text()))?;
    let wallet_type = query.wallet_type.unwrap_or_default();
    let address = validate_balance(&public_key, wallet_type, &state.registry)?;
    let gateway = state.registry.get(wallet_type)?;

    let balance = gateway.get_balance(&address).await?;
    tracing::debug!(%wallet_type, %address, raw = %balance.raw, "Fetched balance");

    Ok(Json(BalanceResponse {
        balance: balance.formatted,
        raw: balance.raw,
        wallet_type,
    }))
}
