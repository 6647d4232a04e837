// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Security
//!
//! - Keys come from a [`KeySource`]; in production that is the Auth0
//!   `/.well-known/jwks.json` endpoint fetched over HTTPS
//! - Keys are cached with a configurable TTL
//! - An unknown `kid` triggers at most one forced refresh, rate limited by a
//!   minimum refresh interval so random `kid`s cannot hammer the provider
//! - Symmetric (`oct`) keys and encryption keys are never used for
//!   verification
//!
//! ## Concurrency
//!
//! Readers only take the read lock. Fetches are serialized by a separate
//! mutex and happen outside the cache lock; the new set is swapped in under
//! a short write lock.
//!
//! A failed fetch is remembered under that mutex for the minimum refresh
//! interval. Requests queued behind it fail with the same error instead of
//! each waiting out another round trip.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::{Mutex, RwLock};

use super::error::AuthError;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default minimum spacing between refresh-on-miss fetches.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Default bound on one JWKS round trip.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where signing keys come from.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches the key set from the identity provider over HTTP.
pub struct RemoteKeySource {
    url: String,
    client: reqwest::Client,
}

impl RemoteKeySource {
    /// Create a source for `url` whose requests give up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::key_retrieval(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySource for RemoteKeySource {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AuthError::key_retrieval(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::key_retrieval(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::key_retrieval(e.to_string()))?;

        tracing::info!(url = %self.url, keys = jwks.keys.len(), "Fetched JWKS");
        Ok(jwks)
    }
}

/// A fixed key set, for offline deployments and tests.
pub struct StaticKeySource {
    jwks: JwkSet,
}

impl StaticKeySource {
    pub fn new(jwks: JwkSet) -> Self {
        Self { jwks }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        Ok(self.jwks.clone())
    }
}

/// JWKS cache entry.
struct CacheEntry {
    jwks: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Most recent fetch failure.
struct FailedFetch {
    error: AuthError,
    at: Instant,
}

/// JWKS cache with TTL and refresh-on-miss.
#[derive(Clone)]
pub struct JwksCache {
    source: Arc<dyn KeySource>,
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    refresh_lock: Arc<Mutex<Option<FailedFetch>>>,
}

impl JwksCache {
    pub fn new(source: Arc<dyn KeySource>) -> Self {
        Self {
            source,
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(None)),
        }
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Create with custom refresh-on-miss spacing.
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Cached key set younger than `max_age`, if any.
    async fn cached_within(&self, max_age: Duration) -> Option<Arc<JwkSet>> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < max_age)
            .map(|entry| Arc::clone(&entry.jwks))
    }

    /// Fetch from the source and swap the result in.
    ///
    /// `last_failure` is the guarded contents of `refresh_lock`. A failure
    /// younger than the minimum refresh interval is returned without
    /// fetching again.
    async fn fetch_and_store(
        &self,
        last_failure: &mut Option<FailedFetch>,
    ) -> Result<Arc<JwkSet>, AuthError> {
        if let Some(failed) = last_failure
            .as_ref()
            .filter(|failed| failed.at.elapsed() < self.min_refresh_interval)
        {
            tracing::debug!("JWKS fetch failed recently, not retrying yet");
            return Err(failed.error.clone());
        }

        let jwks = match self.source.fetch().await {
            Ok(jwks) => Arc::new(jwks),
            Err(e) => {
                if let AuthError::KeyRetrieval { reason } = &e {
                    tracing::warn!(%reason, "JWKS fetch failed");
                }
                *last_failure = Some(FailedFetch {
                    error: e.clone(),
                    at: Instant::now(),
                });
                return Err(e);
            }
        };
        *last_failure = None;

        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            jwks: Arc::clone(&jwks),
            fetched_at: Instant::now(),
        });
        Ok(jwks)
    }

    /// Current key set, fetching when empty or past its TTL.
    async fn current(&self) -> Result<Arc<JwkSet>, AuthError> {
        if let Some(jwks) = self.cached_within(self.cache_ttl).await {
            return Ok(jwks);
        }

        let mut last_failure = self.refresh_lock.lock().await;
        // Another request may have refreshed while we waited.
        if let Some(jwks) = self.cached_within(self.cache_ttl).await {
            return Ok(jwks);
        }
        self.fetch_and_store(&mut last_failure).await
    }

    /// Refresh after a `kid` miss unless the set was fetched very recently.
    async fn refresh_on_miss(&self) -> Result<Arc<JwkSet>, AuthError> {
        let mut last_failure = self.refresh_lock.lock().await;
        if let Some(jwks) = self.cached_within(self.min_refresh_interval).await {
            return Ok(jwks);
        }
        tracing::debug!("Unknown kid, refreshing JWKS");
        self.fetch_and_store(&mut last_failure).await
    }

    /// Verification key for `kid`, usable with `alg`.
    pub async fn decoding_key(&self, kid: &str, alg: Algorithm) -> Result<DecodingKey, AuthError> {
        let jwks = self.current().await?;
        if let Some(jwk) = find_key(&jwks, kid) {
            return jwk_to_decoding_key(jwk, alg);
        }

        let jwks = self.refresh_on_miss().await?;
        let jwk = find_key(&jwks, kid)
            .ok_or(AuthError::InvalidHeader("Unable to find the appropriate key."))?;
        jwk_to_decoding_key(jwk, alg)
    }

    /// Make sure a fresh key set is cached, fetching if needed.
    ///
    /// Shares the failure back-off with token verification, so repeated
    /// calls during an outage do not reach the provider more than once per
    /// minimum refresh interval.
    pub async fn ensure_keys(&self) -> Result<(), AuthError> {
        self.current().await.map(|_| ())
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        self.cached_within(self.cache_ttl).await.is_some()
    }
}

fn find_key<'a>(jwks: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    jwks.keys
        .iter()
        .find(|k| k.common.key_id.as_deref() == Some(kid))
}

fn declared_algorithm(alg: KeyAlgorithm) -> Option<Algorithm> {
    match alg {
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        _ => None,
    }
}

/// Convert a JWK to a DecodingKey for a token signed with `alg`.
fn jwk_to_decoding_key(jwk: &Jwk, alg: Algorithm) -> Result<DecodingKey, AuthError> {
    if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
        return Err(AuthError::InvalidHeader("Unable to find the appropriate key."));
    }

    if let Some(declared) = jwk.common.key_algorithm {
        if declared_algorithm(declared) != Some(alg) {
            return Err(AuthError::InvalidHeader(
                "Token algorithm does not match the signing key.",
            ));
        }
    }

    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| AuthError::key_retrieval(format!("invalid RSA key: {e}"))),
        AlgorithmParameters::EllipticCurve(ec) => DecodingKey::from_ec_components(&ec.x, &ec.y)
            .map_err(|e| AuthError::key_retrieval(format!("invalid EC key: {e}"))),
        AlgorithmParameters::OctetKeyPair(okp) => DecodingKey::from_ed_components(&okp.x)
            .map_err(|e| AuthError::key_retrieval(format!("invalid OKP key: {e}"))),
        _ => Err(AuthError::InvalidHeader("Unable to find the appropriate key.")),
    }
}
