use super::endpoint::{self, EndpointSpec, SCRAPE_HOST, SEARCH_HOST};
use super::normalize;
use super::{Locale, SearchError, SearchKind, SearchOutput, SearchRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Header carrying the API credential.
const API_KEY_HEADER: &str = "X-API-KEY";

/// Bounds how long a network stall can hold the caller; the provider
/// normally answers in well under a second.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on memoized results before the oldest entry is evicted.
const CACHE_CAPACITY: usize = 256;

/// Client for the Serper.dev API.
///
/// Holds the credential, the HTTP connection pool and the in-session memo
/// cache. One instance is meant to live for the whole session so identical
/// requests are never billed twice.
pub struct SerperClient {
    http: reqwest::Client,
    api_key: String,
    search_base: String,
    scrape_base: String,
    cache: Mutex<MemoCache>,
}

impl SerperClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key: api_key.into(),
            search_base: SEARCH_HOST.to_string(),
            scrape_base: SCRAPE_HOST.to_string(),
            cache: Mutex::new(MemoCache::new(CACHE_CAPACITY)),
        }
    }

    /// Override the search host, e.g. to point at a local mock server.
    pub fn with_search_base(mut self, base: impl Into<String>) -> Self {
        self.search_base = base.into();
        self
    }

    /// Override the scrape host.
    pub fn with_scrape_base(mut self, base: impl Into<String>) -> Self {
        self.scrape_base = base.into();
        self
    }

    /// Dispatch one search request.
    ///
    /// Consults the memo cache first; on a miss, resolves the endpoint,
    /// issues a single POST and normalizes the response. Only successful
    /// results are cached, so a retry after a transient error always
    /// re-issues the call.
    pub async fn search(&self, req: &SearchRequest) -> Result<SearchOutput, SearchError> {
        if req.query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let key = CacheKey::for_request(&self.api_key, req);
        if let Some(hit) = self.cache.lock().unwrap().get(&key) {
            tracing::debug!(kind = %req.kind, query = %req.query, "returning memoized result");
            return Ok(hit);
        }

        let spec = endpoint::resolve(req.kind, &req.query);
        let payload = endpoint::build_payload(&spec, req);
        let url = self.endpoint_url(&spec);

        tracing::debug!(kind = %req.kind, url = %url, num = req.num, "dispatching search");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            tracing::warn!(
                kind = %req.kind,
                status = %status,
                body = %crate::logging::redact_credential(&body, &self.api_key),
                "provider returned error"
            );

            return Err(match status.as_u16() {
                401 => SearchError::Unauthorized,
                403 => SearchError::Forbidden,
                code => SearchError::Http { status: code, body },
            });
        }

        let body = response.text().await?;
        let raw: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;

        let rows = normalize::normalize(req.kind, &raw);
        let output = SearchOutput { raw, rows };

        tracing::info!(kind = %req.kind, row_count = output.rows.len(), "search complete");

        self.cache.lock().unwrap().put(key, output.clone());
        Ok(output)
    }

    fn endpoint_url(&self, spec: &EndpointSpec) -> String {
        let base = if spec.host == SCRAPE_HOST {
            &self.scrape_base
        } else {
            &self.search_base
        };
        format!("{}{}", base, spec.path)
    }
}

/// Full parameter tuple identifying one billable request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    api_key: String,
    kind: SearchKind,
    query: String,
    locale: Locale,
    num: u32,
}

impl CacheKey {
    fn for_request(api_key: &str, req: &SearchRequest) -> Self {
        Self {
            api_key: api_key.to_string(),
            kind: req.kind,
            query: req.query.clone(),
            locale: req.locale.clone(),
            num: req.num,
        }
    }
}

struct CachedOutput {
    output: SearchOutput,
    /// Insertion tick used for oldest-first eviction.
    inserted: u64,
}

/// Bounded in-session memoization of successful results.
///
/// Entries never expire within the session: responses are point-in-time
/// snapshots, not live state. The map is capped, with the oldest entry
/// evicted at capacity.
struct MemoCache {
    entries: HashMap<CacheKey, CachedOutput>,
    capacity: usize,
    clock: u64,
}

impl MemoCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            clock: 0,
        }
    }

    fn get(&self, key: &CacheKey) -> Option<SearchOutput> {
        self.entries.get(key).map(|e| e.output.clone())
    }

    fn put(&mut self, key: CacheKey, output: SearchOutput) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            if let Some(oldest_key) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&oldest_key);
                tracing::trace!("evicted oldest memo entry");
            }
        }

        self.clock += 1;
        self.entries.insert(
            key,
            CachedOutput {
                output,
                inserted: self.clock,
            },
        );
    }
}
