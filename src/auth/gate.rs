// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate.
//!
//! Sequences header extraction, token verification and the permission
//! check. The protected operation runs only after all three pass.
//!
//! Two ways to use it:
//!
//! - [`PermissionGate::run`] wraps any async operation taking [`Claims`]
//! - [`require_permission`] is Axum middleware for a route:
//!
//! ```rust,ignore
//! let gate = PermissionGate::new(verifier, Permission::PostDrinks);
//! let route = post(create_drink)
//!     .route_layer(middleware::from_fn_with_state(gate, require_permission));
//!
//! async fn create_drink(Extension(claims): Extension<Claims>, /* ... */) {}
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::header::{bearer_from_headers, bearer_token};
use super::permissions::check_permissions;
use super::{AuthError, Claims, Permission, TokenVerifier};

/// Gate requiring one permission.
#[derive(Clone)]
pub struct PermissionGate {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGate {
    pub fn new(verifier: Arc<TokenVerifier>, permission: Permission) -> Self {
        Self::for_permission(verifier, permission.as_str())
    }

    /// Gate on an arbitrary permission string.
    pub fn for_permission(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }

    pub fn permission(&self) -> &'static str {
        self.permission
    }

    async fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.verifier.verify(token).await?;
        check_permissions(self.permission, &claims)?;
        Ok(claims)
    }

    fn rejected(&self, error: AuthError) -> AuthError {
        tracing::warn!(
            code = error.code(),
            status = error.status_code().as_u16(),
            permission = self.permission,
            "Request rejected"
        );
        error
    }

    /// Authorize a raw `Authorization` header value.
    pub async fn authorize(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let result = match bearer_token(header) {
            Ok(token) => self.verify_token(token).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| self.rejected(e))
    }

    /// Authorize, then invoke `handler` with the claims.
    ///
    /// `handler` is called exactly once on success and never on failure.
    pub async fn run<F, Fut, T>(&self, header: Option<&str>, handler: F) -> Result<T, AuthError>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(header).await?;
        Ok(handler(claims).await)
    }
}

/// Axum middleware enforcing a [`PermissionGate`].
///
/// On success the verified [`Claims`] are inserted into the request
/// extensions for the handler's `Extension<Claims>` extractor.
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_from_headers(request.headers()).map(str::to_owned);
    let result = match token {
        Ok(token) => gate.verify_token(&token).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(claims) => {
            tracing::debug!(
                sub = claims.subject(),
                permission = gate.permission(),
                "Request authorized"
            );
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => gate.rejected(e).into_response(),
    }
}
