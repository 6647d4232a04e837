// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop - drink menu API protected by Auth0 bearer tokens
//!
//! Tokens are RS256 JWTs verified against the tenant's published JWKS.
//! Mutating endpoints additionally require a permission from the token's
//! `permissions` claim.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token verification and permission gates
//! - `config` - Environment-based configuration
//! - `store` - In-memory drink storage

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
