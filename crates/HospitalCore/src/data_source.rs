//! # Record Source Loading
//!
//! Resolves the connection string (`HMS_DATABASE_URL`) into a record store.
//!
//! ## Supported Sources
//!
//! ```text
//! sqlite://hms.db                    SQLite database, created if missing
//! memory://                          empty in-process store
//! file:///var/lib/hms/snapshot.json  snapshot on local disk
//! https://example.org/snapshot.json  snapshot served over HTTP
//! ```
//!
//! Only `sqlite:` sources are durable. The other sources open a
//! [`MemoryStore`]: a snapshot is read once at startup and writes are kept in
//! process only, which suits tests and offline reporting over an export.
//!
//! A snapshot is one JSON object with an array per table, each row in the
//! camelCase shape of [`crate::models`]. Missing tables load as empty.
//!
//! ## Examples
//!
//! ```rust
//! use hospital_core::data_source::{DataSource, SnapshotSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SnapshotSource::new();
//! let snapshot = source.load("memory://").await?;
//! assert!(snapshot.staff.is_empty());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::info;
use url::Url;

use crate::sql_store::SqlStore;
use crate::store::{MemoryStore, RecordStore, Snapshot};
use crate::{HospitalError, HospitalResult};

/// Loads a record snapshot from a connection string.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn load(&self, source: &str) -> HospitalResult<Snapshot>;
}

/// [`DataSource`] dispatching on the URL scheme.
pub struct SnapshotSource {
    client: reqwest::Client,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl Default for SnapshotSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for SnapshotSource {
    async fn load(&self, source: &str) -> HospitalResult<Snapshot> {
        let url = Url::parse(source).map_err(|e| {
            HospitalError::InvalidSource(format!("Invalid source URL '{}': {}", source, e))
        })?;

        match url.scheme() {
            "memory" => Ok(Snapshot::default()),
            "file" => load_from_file(&url).await,
            "http" | "https" => load_from_http(&self.client, &url).await,
            scheme => Err(HospitalError::UnsupportedSourceProtocol(format!(
                "{}. Supported: memory://, file://, http(s)://",
                scheme
            ))),
        }
    }
}

async fn load_from_file(url: &Url) -> HospitalResult<Snapshot> {
    let path = url
        .to_file_path()
        .map_err(|_| HospitalError::InvalidSource(format!("Invalid file URL: {}", url)))?;

    if !path.exists() {
        return Err(HospitalError::SourceNotFound(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(&path)
        .await
        .map_err(|e| HospitalError::SourceRead(format!("Failed to read file: {}", e)))?;

    parse_snapshot(&contents, &path.to_string_lossy())
}

async fn load_from_http(client: &reqwest::Client, url: &Url) -> HospitalResult<Snapshot> {
    let response = client
        .get(url.as_str())
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| HospitalError::SourceRead(format!("Failed to fetch '{}': {}", url, e)))?;

    if !response.status().is_success() {
        return Err(HospitalError::SourceRead(format!(
            "HTTP error {} when fetching '{}'",
            response.status(),
            url
        )));
    }

    let contents = response
        .text()
        .await
        .map_err(|e| HospitalError::SourceRead(format!("Failed to read response body: {}", e)))?;

    parse_snapshot(&contents, url.as_str())
}

/// Parse snapshot JSON; `origin` only labels the error.
pub fn parse_snapshot(contents: &str, origin: &str) -> HospitalResult<Snapshot> {
    serde_json::from_str(contents).map_err(|e| {
        HospitalError::SourceRead(format!("Invalid snapshot in '{}': {}", origin, e))
    })
}

fn is_database_url(source: &str) -> bool {
    source.starts_with("sqlite:")
}

/// Build the store named by a connection string.
pub async fn open_store(source: &str) -> HospitalResult<Arc<dyn RecordStore>> {
    if is_database_url(source) {
        return Ok(Arc::new(SqlStore::connect(source).await?));
    }
    let snapshot = SnapshotSource::new().load(source).await?;
    info!("Opened in-process record store from {}", source);
    Ok(Arc::new(MemoryStore::from_snapshot(snapshot)))
}

/// Turn a bare path into a `file://` URL; strings that already carry a scheme
/// (including `sqlite:` database URLs) pass through.
pub fn normalize_source_path(source: &str) -> HospitalResult<String> {
    if source.contains("://") || is_database_url(source) {
        return Ok(source.to_string());
    }

    let path = PathBuf::from(source);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };
    let canonical = absolute.canonicalize().unwrap_or(absolute);

    Url::from_file_path(&canonical)
        .map(String::from)
        .map_err(|_| {
            HospitalError::InvalidSource(format!("Invalid file path: {}", canonical.display()))
        })
}
