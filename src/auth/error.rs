// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::ErrorBody;

/// Authorization failure.
///
/// Every variant is terminal for the current request. The `Display` text is
/// the human description returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header present
    #[error("Authorization header is expected.")]
    MissingHeader,
    /// Header present but not `Bearer <token>`
    #[error("{0}")]
    MalformedHeader(&'static str),
    /// Token header unusable (undecodable, no `kid`, unknown `kid`, disallowed `alg`)
    #[error("{0}")]
    InvalidHeader(&'static str),
    /// Signing keys could not be fetched or decoded.
    ///
    /// `reason` is logged, never sent to the client.
    #[error("Unable to retrieve signing keys.")]
    KeyRetrieval { reason: String },
    /// Signature does not verify against the selected key
    #[error("Token signature is invalid.")]
    InvalidSignature,
    /// `exp` has passed
    #[error("Token expired.")]
    TokenExpired,
    /// Audience, issuer or other registered claim rejected
    #[error("{0}")]
    InvalidClaims(&'static str),
    /// Token carries no `permissions` claim
    #[error("Permissions not included in JWT.")]
    PermissionsMissing,
    /// Required permission not granted
    #[error("Permission not found.")]
    Unauthorized,
}

impl AuthError {
    pub(crate) fn key_retrieval(reason: impl Into<String>) -> Self {
        AuthError::KeyRetrieval {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader(_) => "authorization_header_malformed",
            AuthError::InvalidHeader(_) => "invalid_header",
            AuthError::KeyRetrieval { .. } => "key_retrieval_error",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::PermissionsMissing => "permissions_missing",
            AuthError::Unauthorized => "unauthorized",
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::PermissionsMissing => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized => StatusCode::FORBIDDEN,
            AuthError::MissingHeader
            | AuthError::MalformedHeader(_)
            | AuthError::InvalidHeader(_)
            | AuthError::KeyRetrieval { .. }
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody::new(status, self.description()).with_code(self.code());
        (status, Json(body)).into_response()
    }
}
