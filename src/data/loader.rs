use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, info};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::model::{CustomerRecord, Dataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to produce a table from a source file. Fatal to the component
/// that depends on the table; never silently defaulted.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: missing required columns: {columns:?}")]
    MissingColumns { path: PathBuf, columns: Vec<String> },
    #[error("{path}: malformed row: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: expected at least one data row")]
    Empty { path: PathBuf },
}

/// Columns the churn table must carry. Checked up front so a schema problem
/// surfaces as one `MissingColumns` error instead of a per-row parse error.
pub const REQUIRED_COLUMNS: [&str; 31] = [
    "Customer_ID",
    "Gender",
    "Age",
    "Married",
    "State",
    "Number_of_Referrals",
    "Tenure_in_Months",
    "Value_Deal",
    "Phone_Service",
    "Multiple_Lines",
    "Internet_Type",
    "Online_Security",
    "Online_Backup",
    "Device_Protection_Plan",
    "Premium_Support",
    "Streaming_TV",
    "Streaming_Movies",
    "Streaming_Music",
    "Unlimited_Data",
    "Contract",
    "Paperless_Billing",
    "Payment_Method",
    "Monthly_Charge",
    "Total_Charges",
    "Total_Refunds",
    "Total_Extra_Data_Charges",
    "Total_Long_Distance_Charges",
    "Total_Revenue",
    "Customer_Status",
    "Churn_Category",
    "Churn_Reason",
];

// ---------------------------------------------------------------------------
// CSV reading
// ---------------------------------------------------------------------------

/// Read a whole CSV file into typed rows, verifying `required` headers first.
pub(crate) fn read_rows<T: DeserializeOwned>(
    path: &Path,
    required: &[&str],
) -> Result<Vec<T>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Unavailable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers().map_err(|e| DataError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|e| DataError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse the churn table from `path`. Deterministic; no caching.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let records: Vec<CustomerRecord> = read_rows(path, &REQUIRED_COLUMNS)?;
    info!("loaded {} customer rows from {}", records.len(), path.display());
    Ok(Dataset::new(records))
}

// ---------------------------------------------------------------------------
// Process-wide dataset cache
// ---------------------------------------------------------------------------

// Keyed by canonicalized path; invalidated only manually or on process exit.
static CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<Dataset>>>> = OnceLock::new();

fn cache() -> &'static Mutex<HashMap<PathBuf, Arc<Dataset>>> {
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn cache_key(path: &Path) -> PathBuf {
    // Fall back to the given path if canonicalization fails; the load itself
    // will then report the underlying IO error.
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Cached variant of [`load_dataset`]. Repeated loads of the same source
/// return the same shared `Dataset` without re-parsing.
pub fn load_dataset_cached(path: &Path) -> Result<Arc<Dataset>, DataError> {
    let key = cache_key(path);
    if let Some(ds) = cache().lock().unwrap_or_else(std::sync::PoisonError::into_inner).get(&key) {
        debug!("dataset cache hit for {}", key.display());
        return Ok(Arc::clone(ds));
    }
    let ds = Arc::new(load_dataset(path)?);
    cache()
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .insert(key, Arc::clone(&ds));
    Ok(ds)
}

/// Drop the cached table for `path`, forcing the next load to re-parse.
pub fn invalidate(path: &Path) {
    cache()
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .remove(&cache_key(path));
}

/// Drop every cached table.
pub fn clear_cache() {
    cache().lock().unwrap_or_else(std::sync::PoisonError::into_inner).clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CustomerStatus;
    use crate::data::testutil::{churn_csv_header, churn_csv_row};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_typed_rows() {
        let file = write_csv(&[
            churn_csv_header(),
            churn_csv_row("C1", "CA", 34, "Stayed"),
            churn_csv_row("C2", "TX", 61, "Churned"),
        ]);
        let ds = load_dataset(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].customer_id, "C1");
        assert_eq!(ds.records()[1].status, CustomerStatus::Churned);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = load_dataset(Path::new("/no/such/churn.csv")).unwrap_err();
        assert!(matches!(err, DataError::Unavailable { .. }), "{err}");
    }

    #[test]
    fn missing_columns_are_reported_by_name() {
        let file = write_csv(&[
            "Customer_ID,Gender,Age".to_string(),
            "C1,Female,30".to_string(),
        ]);
        match load_dataset(file.path()).unwrap_err() {
            DataError::MissingColumns { columns, .. } => {
                assert!(columns.contains(&"Customer_Status".to_string()));
                assert!(columns.contains(&"Total_Revenue".to_string()));
            }
            other => panic!("expected MissingColumns, got {other}"),
        }
    }

    #[test]
    fn unparseable_cell_is_malformed() {
        let file = write_csv(&[
            churn_csv_header(),
            churn_csv_row("C1", "CA", 34, "Vanished"),
        ]);
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }), "{err}");
    }

    #[test]
    fn cached_load_is_shared_until_invalidated() {
        let file = write_csv(&[churn_csv_header(), churn_csv_row("C1", "CA", 34, "Stayed")]);
        let a = load_dataset_cached(file.path()).unwrap();
        let b = load_dataset_cached(file.path()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        invalidate(file.path());
        let c = load_dataset_cached(file.path()).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
