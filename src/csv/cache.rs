//! Fetching and caching of CSV datasets.
//!
//! DESIGN
//! ======
//! `CsvCache` maps each dataset to its parsed rows for the lifetime of the
//! process. The first `get` for a dataset fetches and parses it; later
//! calls share the same `Arc`. Entries are never evicted or refreshed.
//!
//! ERROR HANDLING
//! ==============
//! A failed load is returned to the caller and not cached, so the next
//! request fetches again. Two concurrent first loads of one dataset both
//! fetch; whichever finishes last owns the cache slot.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::dataset::CsvDataset;
use super::parse::{CsvRow, parse_csv};
use crate::config::HttpTimeouts;

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),
    #[error("failed to fetch CSV: {0}")]
    Fetch(String),
    #[error("failed to fetch CSV from {url}: HTTP {status}")]
    Status { status: u16, url: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),
}

/// Where CSV text comes from. Implemented over HTTP in production and by
/// in-memory fakes in tests.
#[async_trait]
pub trait CsvSource: Send + Sync {
    /// Fetch the raw CSV body at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`CsvError`] on transport failure or a non-success status.
    async fn fetch_text(&self, url: &str) -> Result<String, CsvError>;
}

pub struct HttpCsvSource {
    http: reqwest::Client,
}

impl HttpCsvSource {
    /// # Errors
    ///
    /// Returns [`CsvError::HttpClientBuild`] if the TLS backend cannot initialize.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, CsvError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| CsvError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl CsvSource for HttpCsvSource {
    async fn fetch_text(&self, url: &str) -> Result<String, CsvError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CsvError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CsvError::Status { status: status.as_u16(), url: url.to_string() });
        }

        response.text().await.map_err(|e| CsvError::Fetch(e.to_string()))
    }
}

/// Process-wide dataset cache. Clone is cheap; clones share entries.
#[derive(Clone)]
pub struct CsvCache {
    source: Arc<dyn CsvSource>,
    base_url: Arc<str>,
    entries: Arc<RwLock<HashMap<CsvDataset, Arc<Vec<CsvRow>>>>>,
}

impl CsvCache {
    #[must_use]
    pub fn new(source: Arc<dyn CsvSource>, base_url: &str) -> Self {
        Self {
            source,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch and parse a dataset, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Propagates the source's fetch error.
    pub async fn load(&self, dataset: CsvDataset) -> Result<Vec<CsvRow>, CsvError> {
        let url = dataset.url(&self.base_url);
        let text = self.source.fetch_text(&url).await?;
        let rows = parse_csv(&text);
        info!(%dataset, rows = rows.len(), "loaded CSV dataset");
        Ok(rows)
    }

    /// Cached rows for a dataset, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns the load error when the dataset is not cached and cannot be fetched.
    pub async fn get(&self, dataset: CsvDataset) -> Result<Arc<Vec<CsvRow>>, CsvError> {
        {
            let entries = self.entries.read().await;
            if let Some(rows) = entries.get(&dataset) {
                return Ok(Arc::clone(rows));
            }
        }

        let rows = match self.load(dataset).await {
            Ok(rows) => Arc::new(rows),
            Err(e) => {
                warn!(%dataset, error = %e, "CSV dataset load failed");
                return Err(e);
            }
        };

        self.entries.write().await.insert(dataset, Arc::clone(&rows));
        Ok(rows)
    }

    #[cfg(test)]
    pub async fn is_cached(&self, dataset: CsvDataset) -> bool {
        self.entries.read().await.contains_key(&dataset)
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
