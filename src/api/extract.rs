// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON body extractor reporting rejections as validation errors.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::{error::ApiError, validation::Violations};

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Like [`axum::Json`], but a malformed body yields the API's 400 error shape.
///
/// When the failure sits on a known field (an unknown `walletType`, a string
/// where a number belongs) the violation names that field.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(violation_for(&rejection).into()),
        }
    }
}

fn violation_for(rejection: &JsonRejection) -> Violations {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            let text = e.body_text();
            let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&text);
            match detail.split_once(": ") {
                Some((path, message)) if is_field_path(path) => Violations::single(path, message),
                _ => Violations::single("body", detail),
            }
        }
        JsonRejection::JsonSyntaxError(_) => Violations::single("body", "Malformed JSON body"),
        JsonRejection::MissingJsonContentType(_) => {
            Violations::single("body", "Expected `Content-Type: application/json`")
        }
        other => Violations::single("body", other.body_text()),
    }
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '[' | ']' | '_'))
}
