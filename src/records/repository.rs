use thiserror::Error;

use crate::records::{normalize_all, RawRecord, Record};
use crate::store::{KvStore, StoreError};

pub const RECORDS_KEY: &str = "records";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no cached records and no records URL configured")]
    NoSource,

    #[error("failed to fetch records from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("records fetch from {url} returned status {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("invalid records format, expected a JSON array")]
    InvalidFormat,

    #[error("failed to read records file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordSource {
    Cache,
    Remote,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::Cache => "cache",
            RecordSource::Remote => "remote",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoadedRecords {
    pub records: Vec<Record>,
    pub source: RecordSource,
    /// Set when the fetched set could not be written back to the store;
    /// the load itself still succeeds.
    pub cache_warning: Option<String>,
}

/// Owns the record working set: cache-first load with a single-attempt
/// remote fetch fallback, wholesale replacement on import.
#[derive(Clone, Debug)]
pub struct Repository {
    store: KvStore,
    url: Option<String>,
}

impl Repository {
    pub fn new(store: KvStore, url: Option<String>) -> Repository {
        Repository { store, url }
    }

    /// A malformed cache is discarded before falling back to the fetch, so
    /// a bad cache never wedges the view. An empty cached array also falls
    /// through to the fetch.
    pub async fn load(&self) -> Result<LoadedRecords, RepositoryError> {
        if let Some(raw) = self.store.get(RECORDS_KEY)? {
            match parse_array(&raw) {
                Some(raws) if !raws.is_empty() => {
                    return Ok(LoadedRecords {
                        records: normalize_all(raws),
                        source: RecordSource::Cache,
                        cache_warning: None,
                    });
                }
                Some(_) => {}
                None => self.store.remove(RECORDS_KEY)?,
            }
        }

        let url = self.url.as_deref().ok_or(RepositoryError::NoSource)?;
        let body = self.fetch(url).await?;
        let raws = parse_array(&body).ok_or(RepositoryError::InvalidFormat)?;
        let cache_warning = self
            .store
            .set(RECORDS_KEY, &body)
            .err()
            .map(|e| format!("unable to cache fetched records: {e}"));
        Ok(LoadedRecords {
            records: normalize_all(raws),
            source: RecordSource::Remote,
            cache_warning,
        })
    }

    async fn fetch(&self, url: &str) -> Result<String, RepositoryError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RepositoryError::Fetch {
                url: url.to_string(),
                source: e,
            })?;
        let resp = client
            .get(url)
            .send()
            .await
            .map_err(|e| RepositoryError::Fetch {
                url: url.to_string(),
                source: e,
            })?;
        if !resp.status().is_success() {
            return Err(RepositoryError::FetchStatus {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        resp.text().await.map_err(|e| RepositoryError::Fetch {
            url: url.to_string(),
            source: e,
        })
    }

    /// Wholesale replacement of the working set from a local JSON array
    /// file. This is the upload-data path; the caller checks the capability.
    pub fn replace_from_file(&self, path: &str) -> Result<Vec<Record>, RepositoryError> {
        let body = std::fs::read_to_string(path).map_err(|e| RepositoryError::FileRead {
            path: path.to_string(),
            source: e,
        })?;
        let raws = parse_array(&body).ok_or(RepositoryError::InvalidFormat)?;
        self.store.set(RECORDS_KEY, &body)?;
        Ok(normalize_all(raws))
    }

    /// Drop the cached working set so the next load refetches.
    pub fn invalidate(&self) -> Result<(), RepositoryError> {
        self.store.remove(RECORDS_KEY)?;
        Ok(())
    }
}

fn parse_array(body: &str) -> Option<Vec<RawRecord>> {
    serde_json::from_str::<Vec<RawRecord>>(body).ok()
}
