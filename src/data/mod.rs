//! Backing-store access and the process-lifetime dataset cache.
//!
//! The dataset is loaded at most once per process: the first `DataStore::get`
//! resolves the source, every later call returns the same in-memory result
//! without touching the backing store again. `OnceLock` gives us the
//! initialize-at-most-once discipline even with concurrent callers.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::domain::Dataset;
use crate::error::AppError;
use crate::io::ingest::{read_dataset_csv, IngestReport};

pub mod remote;
pub mod sample;

pub use remote::{RemoteClient, ENV_DATA_URL};
pub use sample::{generate_sample, SampleSpec};

/// Where the dataset comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A local CSV file.
    Csv(PathBuf),
    /// A remote CSV endpoint; `None` falls back to `EPI_DATA_URL`.
    Remote(Option<String>),
    /// Deterministic synthetic data (demo/offline mode).
    Sample(SampleSpec),
}

impl DataSource {
    /// Short label for headers and status lines.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Csv(path) => format!("csv:{}", path.display()),
            DataSource::Remote(Some(url)) => format!("remote:{url}"),
            DataSource::Remote(None) => "remote:$EPI_DATA_URL".to_string(),
            DataSource::Sample(spec) => format!(
                "sample:{} locations x {} days (seed {})",
                spec.locations, spec.days, spec.seed
            ),
        }
    }
}

/// A loaded dataset plus its ingest bookkeeping.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub dataset: Dataset,
    pub report: IngestReport,
    pub source: String,
}

/// Process-lifetime dataset cache.
///
/// The source argument of the *first* `get` call wins; later calls return the
/// cached dataset regardless of their argument. This matches the dashboard's
/// lifecycle, where the source is fixed at startup.
pub struct DataStore {
    slot: OnceLock<Result<Arc<Loaded>, AppError>>,
}

impl DataStore {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Load (once) and return the shared dataset.
    pub fn get(&self, source: &DataSource) -> Result<Arc<Loaded>, AppError> {
        self.get_or_load(|| load_dataset(source))
    }

    /// Same as [`DataStore::get`], with an explicit loader (used by tests and
    /// alternative front-ends).
    pub fn get_or_load<F>(&self, loader: F) -> Result<Arc<Loaded>, AppError>
    where
        F: FnOnce() -> Result<Loaded, AppError>,
    {
        self.slot.get_or_init(|| loader().map(Arc::new)).clone()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The store shared by the CLI and TUI front-ends.
pub static STORE: DataStore = DataStore::new();

/// Resolve a source and load it, bypassing the cache.
pub fn load_dataset(source: &DataSource) -> Result<Loaded, AppError> {
    let label = source.describe();
    let (dataset, report) = match source {
        DataSource::Csv(path) => read_dataset_csv(path)?,
        DataSource::Remote(url) => {
            let client = match url {
                Some(url) => RemoteClient::with_url(url),
                None => RemoteClient::from_env()?,
            };
            client.fetch_dataset()?
        }
        DataSource::Sample(spec) => {
            let dataset = generate_sample(spec)?;
            let rows = dataset.rows.len();
            (
                dataset,
                IngestReport {
                    rows_read: rows,
                    rows_used: rows,
                    row_errors: Vec::new(),
                },
            )
        }
    };

    Ok(Loaded {
        dataset,
        report,
        source: label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn tiny_loaded() -> Loaded {
        let dataset = generate_sample(&SampleSpec {
            locations: 1,
            days: 30,
            ..SampleSpec::default()
        })
        .unwrap();
        let rows = dataset.rows.len();
        Loaded {
            dataset,
            report: IngestReport {
                rows_read: rows,
                rows_used: rows,
                row_errors: Vec::new(),
            },
            source: "test".to_string(),
        }
    }

    #[test]
    fn store_loads_exactly_once_and_returns_identical_data() {
        let store = DataStore::new();
        let calls = Cell::new(0usize);

        let first = store
            .get_or_load(|| {
                calls.set(calls.get() + 1);
                Ok(tiny_loaded())
            })
            .unwrap();
        let second = store
            .get_or_load(|| {
                calls.set(calls.get() + 1);
                Ok(tiny_loaded())
            })
            .unwrap();

        assert_eq!(calls.get(), 1, "loader must run exactly once");
        assert!(Arc::ptr_eq(&first, &second), "cache must return the same allocation");
    }

    #[test]
    fn store_caches_failures_too() {
        let store = DataStore::new();
        let err = store
            .get_or_load(|| Err(AppError::data_unavailable("boom")))
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);

        // A later call must not retry the backing store.
        let err = store.get_or_load(|| Ok(tiny_loaded())).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn sample_source_reports_row_counts() {
        let loaded = load_dataset(&DataSource::Sample(SampleSpec {
            locations: 2,
            days: 40,
            ..SampleSpec::default()
        }))
        .unwrap();
        assert_eq!(loaded.report.rows_used, 80);
        assert!(loaded.source.starts_with("sample:"));
    }
}
