// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Auth0 access-token verification and RBAC permission checks for the
//! drinks API.
//!
//! ## Auth Flow
//!
//! 1. Frontend authenticates the user with Auth0
//! 2. Frontend sends `Authorization: Bearer <access token>`
//! 3. Server:
//!    - Fetches the Auth0 JWKS via HTTPS (cached with TTL)
//!    - Verifies signature, expiry, issuer, audience
//!    - Checks the route's permission against the `permissions` claim
//!
//! ## Security
//!
//! - Signing algorithms come from a fixed allow-list; `none` and HMAC are
//!   never accepted
//! - Symmetric keys published in the JWKS are ignored
//! - Clock skew tolerance is 60 seconds by default

pub mod claims;
pub mod error;
pub mod gate;
pub mod header;
pub mod jwks;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::{Audience, Claims};
pub use error::AuthError;
pub use gate::{require_permission, PermissionGate};
pub use jwks::{JwksCache, KeySource, RemoteKeySource, StaticKeySource};
pub use permissions::{check_permissions, Permission};
pub use verifier::{TokenVerifier, VerifierSettings};
