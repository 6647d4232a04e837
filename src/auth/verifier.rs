// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature and claim verification.
//!
//! Order of checks:
//!
//! 1. compact header decodes and its `alg` is in the allow-list
//! 2. header carries a `kid`
//! 3. unverified `exp` is not already past (rejection only)
//! 4. key for `kid` is selected from the JWKS cache
//! 5. signature, `exp`, `nbf`, `aud` and `iss` verified by `jsonwebtoken`

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, get_current_timestamp, Algorithm, Validation};
use serde::Deserialize;

use super::{AuthError, Claims, JwksCache};

/// Clock skew tolerance (60 seconds).
pub const DEFAULT_LEEWAY: u64 = 60;

/// What a token must satisfy to be accepted.
#[derive(Debug, Clone)]
pub struct VerifierSettings {
    /// Expected `iss` (Auth0 tenant URL with trailing slash)
    pub issuer: String,
    /// Expected `aud` (API identifier)
    pub audience: String,
    /// Signing algorithms accepted in the token header
    pub algorithms: Vec<Algorithm>,
    /// Clock skew tolerance in seconds
    pub leeway_secs: u64,
}

impl VerifierSettings {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            leeway_secs: DEFAULT_LEEWAY,
        }
    }
}

#[derive(Deserialize)]
struct ExpiryProbe {
    #[serde(default)]
    exp: Option<u64>,
}

/// Verifies bearer tokens against the provider's JWKS.
pub struct TokenVerifier {
    keys: JwksCache,
    settings: VerifierSettings,
}

impl TokenVerifier {
    pub fn new(keys: JwksCache, settings: VerifierSettings) -> Self {
        Self { keys, settings }
    }

    pub fn keys(&self) -> &JwksCache {
        &self.keys
    }

    pub fn settings(&self) -> &VerifierSettings {
        &self.settings
    }

    /// Verify `token` and return its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::InvalidHeader("Unable to parse authentication token."))?;

        if !self.settings.algorithms.contains(&header.alg) {
            return Err(AuthError::InvalidHeader("Token algorithm is not permitted."));
        }

        let kid = header
            .kid
            .as_deref()
            .ok_or(AuthError::InvalidHeader("Authorization malformed."))?;

        self.reject_expired(token)?;

        let key = self.keys.decoding_key(kid, header.alg).await?;
        let token_data = decode::<Claims>(token, &key, &self.validation(header.alg))
            .map_err(|e| map_decode_error(e.kind()))?;

        tracing::debug!(
            sub = token_data.claims.subject(),
            expires_at = ?token_data.claims.expires_at(),
            "Token verified"
        );
        Ok(token_data.claims)
    }

    /// Reject a token whose `exp` is already past without touching the JWKS.
    ///
    /// Undecodable payloads pass through; `decode` reports those after
    /// signature verification.
    fn reject_expired(&self, token: &str) -> Result<(), AuthError> {
        let Ok(probe) = jsonwebtoken::dangerous::insecure_decode::<ExpiryProbe>(token) else {
            return Ok(());
        };

        match probe.claims.exp {
            Some(exp) if exp.saturating_add(self.settings.leeway_secs) < get_current_timestamp() => {
                Err(AuthError::TokenExpired)
            }
            _ => Ok(()),
        }
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.leeway = self.settings.leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_audience(&[&self.settings.audience]);
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation
    }
}

fn map_decode_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims(
            "Incorrect claims. Please, check the audience and issuer.",
        ),
        ErrorKind::ImmatureSignature => AuthError::InvalidClaims("Token is not yet valid."),
        ErrorKind::MissingRequiredClaim(_) => {
            AuthError::InvalidClaims("Token is missing a required claim.")
        }
        ErrorKind::Json(_) => AuthError::InvalidClaims("Unable to decode token claims."),
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::InvalidHeader("Token algorithm does not match the signing key.")
        }
        _ => AuthError::InvalidHeader("Unable to parse authentication token."),
    }
}
