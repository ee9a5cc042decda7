//! Transaction store.
//!
//! Defines the `TransactionStore` trait the service reads customer series
//! through, and an in-memory implementation loaded from a JSON file.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::types::{normalize_customer_id, EligibilityError, TransactionRecord};

/// Abstraction over wherever monthly transaction summaries live.
///
/// Implementors return a customer's records sorted ascending by date, or an
/// empty vector when the customer is unknown.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Fetch the chronological series for a normalised customer id.
    async fn series_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<TransactionRecord>, EligibilityError>;

    /// All known customer ids, sorted.
    async fn customers(&self) -> Result<Vec<String>, EligibilityError>;

    /// Store name for logging and identification.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Read-only store keyed by normalised customer id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    series: BTreeMap<String, Vec<TransactionRecord>>,
}

impl InMemoryStore {
    /// Group records by normalised customer id and sort each series by date.
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        let mut series: BTreeMap<String, Vec<TransactionRecord>> = BTreeMap::new();
        for mut record in records {
            record.customer_id = normalize_customer_id(&record.customer_id);
            series
                .entry(record.customer_id.clone())
                .or_default()
                .push(record);
        }
        for records in series.values_mut() {
            records.sort_by_key(|r| r.date);
        }
        Self { series }
    }

    /// Load an array of records from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transactions from {}", path.display()))?;
        let store = Self::from_json(&json)
            .with_context(|| format!("Failed to parse transactions from {}", path.display()))?;

        info!(
            path = %path.display(),
            customers = store.len(),
            records = store.record_count(),
            "Transactions loaded from disk"
        );
        Ok(store)
    }

    /// Parse an array of records from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<TransactionRecord> = serde_json::from_str(json)?;
        if records.is_empty() {
            warn!("Transaction file contains no records");
        }
        Ok(Self::from_records(records))
    }

    /// Number of distinct customers.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total number of records across all customers.
    pub fn record_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn series_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<TransactionRecord>, EligibilityError> {
        let series = self.series.get(customer_id).cloned().unwrap_or_default();
        debug!(customer_id, records = series.len(), "Series fetched");
        Ok(series)
    }

    async fn customers(&self) -> Result<Vec<String>, EligibilityError> {
        Ok(self.series.keys().cloned().collect())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
