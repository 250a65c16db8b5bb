use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// One verification key from the remote key-set document.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key identifier matched against the token header's `kid`.
    pub kid: String,
    /// Key type (`RSA` is the only type this verifier uses).
    pub kty: String,
    /// Intended algorithm, when the key set declares one.
    #[serde(default)]
    pub alg: Option<String>,
    /// RSA modulus, base64url.
    #[serde(default)]
    pub n: Option<String>,
    /// RSA public exponent, base64url.
    #[serde(default)]
    pub e: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JwkSetDocument {
    #[serde(default)]
    keys: Vec<Jwk>,
}

#[derive(Debug, Default)]
struct CacheSlot {
    keys: HashMap<String, Jwk>,
    refreshed_at: Option<Instant>,
}

/// Cache over the remote signed-key-set source.
///
/// The slot is guarded by a mutex so that concurrent requests hitting a cold
/// or stale cache share a single outbound fetch: at most one fetch happens
/// per TTL window, and readers observe either the old set or the fully
/// refreshed one. A fetch failure is an error, never an empty key set — the
/// verifier fails closed.
pub struct JwksCache {
    url: String,
    ttl: Duration,
    client: reqwest::Client,
    slot: Mutex<CacheSlot>,
}

impl JwksCache {
    /// Create a cache over the given key-set URL.
    #[must_use]
    pub fn new(url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            url: url.into(),
            ttl,
            client: reqwest::Client::new(),
            slot: Mutex::new(CacheSlot::default()),
        }
    }

    /// Look up a key by id, refreshing the cached set when it is stale.
    pub async fn get(&self, kid: &str) -> Result<Option<Jwk>, String> {
        let mut slot = self.slot.lock().await;

        let stale = slot
            .refreshed_at
            .is_none_or(|at| at.elapsed() >= self.ttl);
        if stale {
            let document = self.fetch().await.map_err(|err| {
                warn!(error = %err, "key-set fetch failed");
                err
            })?;
            slot.keys = document
                .keys
                .into_iter()
                .map(|key| (key.kid.clone(), key))
                .collect();
            slot.refreshed_at = Some(Instant::now());
            debug!(count = slot.keys.len(), "verification key set refreshed");
        }

        Ok(slot.keys.get(kid).cloned())
    }

    async fn fetch(&self) -> Result<JwkSetDocument, String> {
        let response = self
            .client
            .get(&self.url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|err| format!("key-set request failed: {err}"))?;

        let response = response
            .error_for_status()
            .map_err(|err| format!("key-set source returned an error: {err}"))?;

        response
            .json::<JwkSetDocument>()
            .await
            .map_err(|err| format!("key-set document is malformed: {err}"))
    }
}
