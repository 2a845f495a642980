//! Habit sources
//!
//! A source is the collaborator the store loads habits from. The store only
//! relies on the request/response contract of [`HabitSource`]; transport and
//! storage are up to the implementation.
//!
//! - [`JsonFileSource`]: a JSON array on the local filesystem, also writable
//! - [`HttpSource`]: a JSON array served over HTTP(S)

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::LoadError;
use crate::models::Habit;

/// Request timeout for remote sources in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Something the store can fetch a full habit list from
pub trait HabitSource: Send + Sync {
    /// Fetch the authoritative habit list
    fn fetch(&self) -> impl Future<Output = Result<Vec<Habit>, LoadError>> + Send;

    /// Human-readable location, used in logs and status output
    fn describe(&self) -> String;
}

/// Habits stored as a JSON array in a local file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the habit list back to disk
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames it
    /// over the target so the file is never left half-written.
    pub async fn save(&self, habits: &[Habit]) -> Result<(), LoadError> {
        let json = serde_json::to_vec_pretty(habits).map_err(|source| LoadError::Parse {
            origin: self.describe(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.write_error(source))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|source| self.write_error(source))?;
        file.write_all(&json)
            .await
            .map_err(|source| self.write_error(source))?;
        file.sync_all()
            .await
            .map_err(|source| self.write_error(source))?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|source| self.write_error(source))?;

        debug!(path = %self.path.display(), count = habits.len(), "Saved habits");
        Ok(())
    }

    fn write_error(&self, source: io::Error) -> LoadError {
        LoadError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl HabitSource for JsonFileSource {
    /// A missing file is an empty collection, not an error
    async fn fetch(&self) -> Result<Vec<Habit>, LoadError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No habits file yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(LoadError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
            origin: self.describe(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Habits served as a JSON array from a URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl HabitSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Habit>, LoadError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| LoadError::Parse {
            origin: self.url.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
