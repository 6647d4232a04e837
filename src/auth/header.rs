// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `Authorization: Bearer <token>` parsing.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

/// Extract the bearer token from a raw `Authorization` header value.
///
/// An absent or blank header is [`AuthError::MissingHeader`]; anything other
/// than exactly `<scheme> <token>` with a case-insensitive `Bearer` scheme is
/// [`AuthError::MalformedHeader`].
pub fn bearer_token(value: Option<&str>) -> Result<&str, AuthError> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Err(AuthError::MissingHeader),
    };

    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MissingHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader(
            "Authorization header must start with \"Bearer\".",
        ));
    }

    let token = parts
        .next()
        .ok_or(AuthError::MalformedHeader("Token not found."))?;

    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader(
            "Authorization header must be bearer token.",
        ));
    }

    Ok(token)
}

/// Extract the bearer token from request headers.
pub fn bearer_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    match headers.get(AUTHORIZATION) {
        None => Err(AuthError::MissingHeader),
        Some(raw) => {
            let value = raw.to_str().map_err(|_| {
                AuthError::MalformedHeader("Authorization header is not valid text.")
            })?;
            bearer_token(Some(value))
        }
    }
}
