// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::{error::ApiError, models::MnemonicResponse, wallet::mnemonic};

/// Generate a fresh 12-word BIP-39 mnemonic.
///
/// The phrase is returned once and never stored.
#[utoipa::path(
    post,
    path = "/generate-mnemonic",
    tag = "Wallets",
    responses(
        (status = 200, description = "Mnemonic generated", body = MnemonicResponse),
        (status = 500, description = "Entropy source failure")
    )
)]
pub async fn generate_mnemonic() -> Result<Json<MnemonicResponse>, ApiError> {
    let mnemonic = mnemonic::generate()?;
    Ok(Json(MnemonicResponse {
        mnemonic: mnemonic.to_string(),
    }))
}
