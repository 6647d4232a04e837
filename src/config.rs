// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Auth0 tenant domain (e.g. `tenant.auth0.com`) | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH_ALGORITHMS` | Comma-separated signing algorithm allow-list | `RS256` |
//! | `JWKS_CACHE_TTL_SECS` | JWKS cache lifetime | `300` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | Timeout for one JWKS fetch | `10` |
//! | `JWKS_MIN_REFRESH_SECS` | Minimum spacing of refresh-on-miss fetches | `10` |
//! | `AUTH_LEEWAY_SECS` | Clock skew tolerance | `60` |
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `5000` |
//! | `SEED_SAMPLE_DRINK` | Insert the sample drink at startup | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;
use url::Url;

use crate::auth::{
    verifier::DEFAULT_LEEWAY, AuthError, JwksCache, RemoteKeySource, TokenVerifier,
    VerifierSettings,
};
use crate::auth::jwks::{DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT, DEFAULT_MIN_REFRESH_INTERVAL};

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const AUTH_ALGORITHMS_ENV: &str = "AUTH_ALGORITHMS";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_FETCH_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
pub const JWKS_MIN_REFRESH_ENV: &str = "JWKS_MIN_REFRESH_SECS";
pub const AUTH_LEEWAY_ENV: &str = "AUTH_LEEWAY_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SEED_SAMPLE_DRINK_ENV: &str = "SEED_SAMPLE_DRINK";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

/// Identity-provider settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Expected `iss`, `https://<domain>/`
    pub issuer: String,
    pub audience: String,
    pub jwks_url: Url,
    pub algorithms: Vec<Algorithm>,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub min_refresh_interval: Duration,
    pub leeway_secs: u64,
}

impl AuthSettings {
    /// Settings for `domain` and `audience` with every other value defaulted.
    pub fn new(domain: &str, audience: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/');
        if domain.is_empty() {
            return Err(ConfigError::Missing(AUTH0_DOMAIN_ENV));
        }

        let base = Url::parse(&format!("https://{domain}/"))
            .map_err(|e| invalid(AUTH0_DOMAIN_ENV, e.to_string()))?;
        let jwks_url = base
            .join(".well-known/jwks.json")
            .map_err(|e| invalid(AUTH0_DOMAIN_ENV, e.to_string()))?;

        Ok(Self {
            issuer: base.to_string(),
            audience: audience.into(),
            jwks_url,
            algorithms: vec![Algorithm::RS256],
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            leeway_secs: DEFAULT_LEEWAY,
        })
    }

    pub fn verifier_settings(&self) -> VerifierSettings {
        VerifierSettings {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            algorithms: self.algorithms.clone(),
            leeway_secs: self.leeway_secs,
        }
    }

    /// Verifier backed by the remote JWKS endpoint.
    pub fn build_verifier(&self) -> Result<TokenVerifier, AuthError> {
        let source = RemoteKeySource::new(self.jwks_url.as_str(), self.fetch_timeout)?;
        tracing::info!(jwks_url = source.url(), "Using remote JWKS");
        let keys = JwksCache::new(Arc::new(source))
            .with_cache_ttl(self.cache_ttl)
            .with_min_refresh_interval(self.min_refresh_interval);
        Ok(TokenVerifier::new(keys, self.verifier_settings()))
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub seed_sample_drink: bool,
    pub json_logs: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthSettings,
    pub server: ServerSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let domain = get(AUTH0_DOMAIN_ENV).ok_or(ConfigError::Missing(AUTH0_DOMAIN_ENV))?;
        let audience = get(API_AUDIENCE_ENV).ok_or(ConfigError::Missing(API_AUDIENCE_ENV))?;

        let mut auth = AuthSettings::new(&domain, audience.trim())?;
        if let Some(algs) = get(AUTH_ALGORITHMS_ENV) {
            auth.algorithms = parse_algorithms(&algs)?;
        }
        if let Some(v) = get(JWKS_CACHE_TTL_ENV) {
            auth.cache_ttl = Duration::from_secs(parse_number(JWKS_CACHE_TTL_ENV, &v)?);
        }
        if let Some(v) = get(JWKS_FETCH_TIMEOUT_ENV) {
            let secs = parse_number(JWKS_FETCH_TIMEOUT_ENV, &v)?;
            if secs == 0 {
                return Err(invalid(JWKS_FETCH_TIMEOUT_ENV, "must be positive"));
            }
            auth.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get(JWKS_MIN_REFRESH_ENV) {
            auth.min_refresh_interval = Duration::from_secs(parse_number(JWKS_MIN_REFRESH_ENV, &v)?);
        }
        if let Some(v) = get(AUTH_LEEWAY_ENV) {
            auth.leeway_secs = parse_number(AUTH_LEEWAY_ENV, &v)?;
        }

        let port = match get(PORT_ENV) {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| invalid(PORT_ENV, format!("'{v}' is not a port")))?,
            None => DEFAULT_PORT,
        };

        let server = ServerSettings {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            seed_sample_drink: get(SEED_SAMPLE_DRINK_ENV)
                .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
            json_logs: get(LOG_FORMAT_ENV).is_some_and(|v| v.trim().eq_ignore_ascii_case("json")),
        };

        Ok(Self { auth, server })
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(name, format!("'{value}' is not a whole number")))
}

/// Parse a comma-separated algorithm allow-list.
///
/// Only asymmetric algorithms are accepted; `none` is not an algorithm
/// `jsonwebtoken` can parse, so it is rejected with the other unknown names.
pub fn parse_algorithms(value: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::new();

    for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let alg = Algorithm::from_str(name)
            .map_err(|_| invalid(AUTH_ALGORITHMS_ENV, format!("unknown algorithm '{name}'")))?;
        if matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(invalid(
                AUTH_ALGORITHMS_ENV,
                format!("symmetric algorithm '{name}' is not allowed"),
            ));
        }
        if !algorithms.contains(&alg) {
            algorithms.push(alg);
        }
    }

    if algorithms.is_empty() {
        return Err(invalid(AUTH_ALGORITHMS_ENV, "at least one algorithm is required"));
    }
    Ok(algorithms)
}
