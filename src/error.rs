// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::ChainError,
    validation::{FieldViolation, Violations},
    wallet::DerivationError,
};

/// Message returned for upstream failures; details stay in the server log.
pub const UPSTREAM_FAILURE: &str = "Upstream network request failed";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Vec<FieldViolation>>,
    /// Seconds until the client may retry (429 only).
    pub retry_after: Option<u64>,
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            retry_after: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn too_many_requests(retry_after: u64) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests, please try again later",
            )
        }
    }

    /// 400 carrying field-level violations.
    pub fn validation(details: Vec<FieldViolation>) -> Self {
        Self {
            details: Some(details),
            ..Self::bad_request("Validation failed")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            details: self.details,
        });
        let mut response = (self.status, body).into_response();
        if let Some(secs) = self.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<Violations> for ApiError {
    fn from(violations: Violations) -> Self {
        ApiError::validation(violations.into_vec())
    }
}

impl From<DerivationError> for ApiError {
    fn from(err: DerivationError) -> Self {
        match err {
            DerivationError::InvalidMnemonic(reason) => {
                tracing::debug!(%reason, "Rejected mnemonic");
                ApiError::bad_request("Invalid mnemonic phrase")
            }
            DerivationError::IndexOutOfRange(_) => ApiError::bad_request(err.to_string()),
            DerivationError::InvalidPath(_) | DerivationError::KeyDerivation(_) => {
                tracing::error!(error = %err, "Key derivation failed");
                ApiError::internal("Key derivation failed")
            }
        }
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InvalidAddress(_)
            | ChainError::InvalidRecipient(_)
            | ChainError::InvalidPrivateKey(_)
            | ChainError::InvalidAmount(_)
            | ChainError::InsufficientFunds(_)
            | ChainError::Unsupported(_) => ApiError::bad_request(err.to_string()),
            ChainError::RemoteUnavailable(_) | ChainError::Rejected(_) => {
                tracing::error!(error = %err, "Chain request failed");
                ApiError::internal(UPSTREAM_FAILURE)
            }
            ChainError::InvalidRpcUrl(_) => {
                tracing::error!(error = %err, "Chain gateway misconfigured");
                ApiError::internal("Internal server error")
            }
        }
    }
}
