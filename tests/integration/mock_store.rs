//! Mock transaction store for integration testing.
//!
//! Provides a deterministic `TransactionStore` implementation with a fixed
//! set of customer profiles, a lookup log, and a switchable failure mode.
//! Everything lives in memory.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use cashtrend::store::TransactionStore;
use cashtrend::types::{EligibilityError, TransactionRecord};

/// A mock transaction store for deterministic testing.
pub struct MockStore {
    name: String,
    records: Vec<TransactionRecord>,
    lookups: Arc<Mutex<Vec<String>>>,
    /// If set, all operations will return this error.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockStore {
    /// Create a store with the default customer profiles.
    pub fn new(name: &str) -> Self {
        Self::with_records(name, Self::default_records())
    }

    /// Create a store with custom records (assumed already normalised).
    pub fn with_records(name: &str, records: Vec<TransactionRecord>) -> Self {
        Self {
            name: name.to_string(),
            records,
            lookups: Arc::new(Mutex::new(Vec::new())),
            force_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Force all subsequent operations to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Clear any forced error.
    pub fn clear_error(&self) {
        *self.force_error.lock().unwrap() = None;
    }

    /// Customer ids requested so far, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<(), EligibilityError> {
        match self.force_error.lock().unwrap().as_ref() {
            Some(err) => Err(EligibilityError::Store {
                store: self.name.clone(),
                message: err.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Twelve month-end records per profile:
    /// - "user 1": +200/month from 1,000 (strong uptrend)
    /// - "user 2": +50/month from 2,500 (moderate uptrend)
    /// - "user 3": -150/month from 5,000 (strong downtrend)
    /// - "user 4": flat 3,000 (stable)
    pub fn default_records() -> Vec<TransactionRecord> {
        let profiles: [(&str, f64, f64); 4] = [
            ("user 1", 1000.0, 200.0),
            ("user 2", 2500.0, 50.0),
            ("user 3", 5000.0, -150.0),
            ("user 4", 3000.0, 0.0),
        ];

        let mut records = Vec::new();
        for (customer, start, step) in profiles {
            let mut balance = 0.0;
            for month in 1..=12u32 {
                let inflow = start + step * (month - 1) as f64;
                balance += inflow * 0.2;
                records.push(TransactionRecord {
                    customer_id: customer.to_string(),
                    date: month_end(2024, month),
                    monthly_inflow: inflow,
                    balance,
                });
            }
        }
        records
    }
}

/// Last calendar day of `month`.
pub fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap()
}

#[async_trait]
impl TransactionStore for MockStore {
    async fn series_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<TransactionRecord>, EligibilityError> {
        self.check_error()?;
        self.lookups.lock().unwrap().push(customer_id.to_string());
        Ok(self
            .records
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn customers(&self) -> Result<Vec<String>, EligibilityError> {
        self.check_error()?;
        let mut ids: Vec<String> = self.records.iter().map(|r| r.customer_id.clone()).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_end() {
        assert_eq!(month_end(2024, 2), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(month_end(2024, 12), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[tokio::test]
    async fn test_mock_default_customers() {
        let store = MockStore::new("mock");
        let customers = store.customers().await.unwrap();
        assert_eq!(customers, vec!["user 1", "user 2", "user 3", "user 4"]);
    }

    #[tokio::test]
    async fn test_mock_series_is_chronological() {
        let store = MockStore::new("mock");
        let series = store.series_for_customer("user 3").await.unwrap();
        assert_eq!(series.len(), 12);
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(series[0].monthly_inflow, 5000.0);
        assert_eq!(series[11].monthly_inflow, 3350.0);
    }

    #[tokio::test]
    async fn test_mock_records_lookups() {
        let store = MockStore::new("mock");
        store.series_for_customer("user 1").await.unwrap();
        store.series_for_customer("ghost").await.unwrap();
        assert_eq!(store.lookups(), vec!["user 1", "ghost"]);
    }

    #[tokio::test]
    async fn test_mock_forced_error() {
        let store = MockStore::new("mock");
        store.set_error("simulated outage");
        assert!(store.series_for_customer("user 1").await.is_err());
        assert!(store.customers().await.is_err());

        store.clear_error();
        assert!(store.series_for_customer("user 1").await.is_ok());
    }
}
