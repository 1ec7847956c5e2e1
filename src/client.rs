//! Key resolution against a single JWKS endpoint.
//!
//! ```text
//! get_key(kid) → cache read ─ hit ─────────────────────────────→ key
//!                   │
//!                  miss → singleflight(uri) → download_keys(uri)
//!                                                 │
//!                           error ←───────────────┤
//!                                                 ↓
//!                                    cache write (add) → key | KeyNotFound
//! ```

use std::sync::Arc;

use crate::error::Error;
use crate::extractor::{FromHeader, RequestTokenExtractor};
use crate::jwk::{Jwk, JwkSet};
use crate::key_cacher::{KeyCacher, MemoryKeyCacher};
use crate::singleflight::Group;
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct JwkClientOptions {
    pub uri: String,
    /// Transport used for the JWKS request. Timeouts, TLS and proxies are
    /// configured here; `None` falls back to `reqwest::Client::default()`.
    pub client: Option<reqwest::Client>,
}

impl JwkClientOptions {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            client: None,
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }
}

pub struct JwkClient {
    uri: String,
    http: reqwest::Client,
    extractor: Box<dyn RequestTokenExtractor>,
    key_cacher: tokio::sync::RwLock<Box<dyn KeyCacher>>,
    downloads: Group<String, Arc<JwkSet>, Error>,
}

impl std::fmt::Debug for JwkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwkClient")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

impl JwkClient {
    /// Client with the persistent in-memory cacher and the bearer header
    /// extractor.
    pub fn new(options: JwkClientOptions) -> Self {
        Self {
            http: options.client.unwrap_or_default(),
            uri: options.uri,
            extractor: Box::new(FromHeader),
            key_cacher: tokio::sync::RwLock::new(Box::new(MemoryKeyCacher::persistent())),
            downloads: Group::new(),
        }
    }

    pub fn with_key_cacher(mut self, key_cacher: impl KeyCacher + 'static) -> Self {
        self.key_cacher = tokio::sync::RwLock::new(Box::new(key_cacher));
        self
    }

    pub fn with_extractor(mut self, extractor: impl RequestTokenExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the key for `kid`, downloading the key set on a cache miss.
    ///
    /// Concurrent misses share one download whichever kid they ask for. A
    /// failed download leaves the cache untouched, so the next miss tries
    /// again.
    pub async fn get_key(&self, kid: &str) -> Result<Jwk, Error> {
        let cached = self.key_cacher.read().await.get(kid);
        if let Ok(key) = cached {
            log::debug!("action=cache-hit kid={}", kid);
            return Ok(key);
        }
        log::debug!("action=cache-miss kid={}", kid);

        let http = self.http.clone();
        let uri = self.uri.clone();
        let keys = self
            .downloads
            .run(self.uri.clone(), move || async move {
                crate::fetch::download_keys(&http, &uri).await.map(Arc::new)
            })
            .await
            .map_err(|e| {
                log::warn!(
                    "action=fetch-failed kid={} uri={} error={}",
                    kid,
                    self.uri,
                    e.error_string()
                );
                e
            })?;

        let result = self.key_cacher.write().await.add(kid, &keys.keys);
        match &result {
            Ok(_) => log::debug!("action=resolved kid={}", kid),
            Err(e) => log::info!("action=unresolved kid={} error={}", kid, e.error_string()),
        }
        result
    }

    /// Resolves the key named by the token's first header.
    pub async fn get_secret(&self, token: &Token) -> Result<Jwk, Error> {
        let kid = token.key_id()?;
        self.get_key(kid).await
    }

    /// Extracts the request's token with the configured extractor and resolves
    /// its key.
    pub async fn resolve_for_request(&self, req: &actix_web::HttpRequest) -> Result<Jwk, Error> {
        let raw = self.extractor.extract(req)?.ok_or(Error::MissingToken)?;
        let token = Token::decode(&raw)?;
        self.get_secret(&token).await
    }
}
