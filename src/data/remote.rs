//! Remote backing-store fetch.
//!
//! The dashboard can pull its CSV straight from an HTTP endpoint (e.g. a
//! published `owid`-style dataset) instead of a local file. The URL comes
//! from the CLI or from the `EPI_DATA_URL` environment variable (a `.env`
//! file is honored via dotenvy).

use reqwest::blocking::Client;

use crate::domain::Dataset;
use crate::error::AppError;
use crate::io::ingest::{parse_dataset, IngestReport};

/// Environment variable holding the default dataset URL.
pub const ENV_DATA_URL: &str = "EPI_DATA_URL";

pub struct RemoteClient {
    client: Client,
    url: String,
}

impl RemoteClient {
    /// Build a client from the environment (`EPI_DATA_URL`, `.env` honored).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let url = std::env::var(ENV_DATA_URL).map_err(|_| {
            AppError::data_unavailable(format!(
                "Missing {ENV_DATA_URL} in environment (.env). Pass --url or --data instead."
            ))
        })?;
        Ok(Self::with_url(url))
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the remote CSV.
    pub fn fetch_dataset(&self) -> Result<(Dataset, IngestReport), AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::data_unavailable(format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data_unavailable(format!(
                "Dataset request failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::data_unavailable(format!("Failed to read dataset body: {e}")))?;

        parse_dataset(body.as_ref())
    }
}
