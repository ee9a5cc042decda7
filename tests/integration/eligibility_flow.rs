//! End-to-end eligibility flow.
//!
//! Drives the public API (store → service → scorer → report) against the
//! mock store's fixed customer profiles.

use std::sync::Arc;

use cashtrend::config::{AppConfig, ScoringConfig};
use cashtrend::report;
use cashtrend::scoring::regression::LinearFit;
use cashtrend::scoring::EligibilityScorer;
use cashtrend::service::EligibilityService;
use cashtrend::store::InMemoryStore;
use cashtrend::types::{EligibilityError, LoanRequest, TransactionRecord, TrendLabel};

use crate::mock_store::{month_end, MockStore};

fn service_with(store: MockStore) -> (Arc<MockStore>, EligibilityService) {
    let store = Arc::new(store);
    let service = EligibilityService::new(store.clone(), EligibilityScorer::default());
    (store, service)
}

fn series(customer: &str, inflows: &[f64]) -> Vec<TransactionRecord> {
    inflows
        .iter()
        .enumerate()
        .map(|(i, &inflow)| TransactionRecord {
            customer_id: customer.to_string(),
            date: month_end(2024, 1 + i as u32),
            monthly_inflow: inflow,
            balance: 1000.0,
        })
        .collect()
}

#[tokio::test]
async fn test_profiles_classify_as_expected() {
    let (_, service) = service_with(MockStore::new("mock"));

    let cases = [
        ("user 1", TrendLabel::StrongUp),
        ("user 2", TrendLabel::ModerateUp),
        ("user 3", TrendLabel::StrongDown),
        ("user 4", TrendLabel::Stable),
    ];
    for (customer, expected) in cases {
        let a = service.assess(&LoanRequest::new(customer, 1000.0)).await.unwrap();
        assert_eq!(a.result.trend_label, expected, "{customer}");
        assert_eq!(a.result.eligible, a.result.probability_of_approval >= 0.60);
    }
}

#[tokio::test]
async fn test_strong_uptrend_over_and_under_ceiling() {
    let (_, service) = service_with(MockStore::new("mock"));

    // user 1 averages 2,100/month → ceiling 6,300
    let ok = service.assess(&LoanRequest::new("User 1", 6000.0)).await.unwrap();
    assert_eq!(ok.result.probability_of_approval, 0.95);
    assert!(ok.result.eligible);
    assert!((ok.result.max_recommended_loan.unwrap() - 6300.0).abs() < 1e-9);

    let over = service.assess(&LoanRequest::new("User 1", 6300.01)).await.unwrap();
    assert!((over.result.probability_of_approval - 0.095).abs() < 1e-12);
    assert!(!over.result.eligible);
    assert!(over.result.message.contains("NGN 6,300.00"));
}

#[tokio::test]
async fn test_boundary_scenario_end_to_end() {
    let store = MockStore::with_records(
        "boundary",
        series("user 1", &[2000.0, 2100.0, 2200.0, 2300.0]),
    );
    let (_, service) = service_with(store);

    let a = service.assess(&LoanRequest::new("user 1", 5000.0)).await.unwrap();
    assert_eq!(a.result.trend_label, TrendLabel::ModerateUp);
    assert!((a.result.average_monthly_inflow.unwrap() - 2150.0).abs() < 1e-9);
    assert!((a.result.max_recommended_loan.unwrap() - 6450.0).abs() < 1e-9);
    assert_eq!(a.result.probability_of_approval, 0.75);
    assert!(a.result.eligible);

    let b = service.assess(&LoanRequest::new("user 1", 10_000.0)).await.unwrap();
    assert!((b.result.probability_of_approval - 0.075).abs() < 1e-12);
    assert!(!b.result.eligible);
}

#[tokio::test]
async fn test_unknown_customer_any_amount() {
    let (store, service) = service_with(MockStore::new("mock"));
    for amount in [1.0, 1000.0, 1e9] {
        let a = service.assess(&LoanRequest::new("  USER 99 ", amount)).await.unwrap();
        assert!(!a.result.eligible);
        assert_eq!(a.result.trend_label, TrendLabel::NotFound);
        assert_eq!(a.result.probability_of_approval, 0.0);
    }
    assert!(store.lookups().iter().all(|id| id == "user 99"));
}

#[tokio::test]
async fn test_invalid_amount_never_reaches_store() {
    let (store, service) = service_with(MockStore::new("mock"));
    let err = service.assess(&LoanRequest::new("user 1", 0.0)).await.unwrap_err();
    assert!(matches!(err, EligibilityError::InvalidInput(_)));
    assert!(store.lookups().is_empty());
}

#[tokio::test]
async fn test_store_outage_surfaces_as_error() {
    let (store, service) = service_with(MockStore::new("mock"));
    store.set_error("replica unavailable");
    let err = service.assess(&LoanRequest::new("user 1", 500.0)).await.unwrap_err();
    assert!(err.to_string().contains("replica unavailable"));

    store.clear_error();
    assert!(service.assess(&LoanRequest::new("user 1", 500.0)).await.is_ok());
}

#[tokio::test]
async fn test_malformed_series_rejected() {
    let mut records = series("user 1", &[1000.0, 1100.0, 1200.0]);
    records[2].date = records[0].date;
    let (_, service) = service_with(MockStore::with_records("bad", records));
    let err = service.assess(&LoanRequest::new("user 1", 500.0)).await.unwrap_err();
    assert!(matches!(err, EligibilityError::InvalidInput(_)));
}

#[tokio::test]
async fn test_monotonic_fast_growth_is_strong_up() {
    // Irregular steps, all increasing, averaging well above 100/month
    let inflows = [1000.0, 1150.0, 1240.0, 1500.0, 1610.0, 1900.0];
    let fit = LinearFit::fit(&inflows).unwrap();
    assert!(fit.slope > 100.0);

    let (_, service) = service_with(MockStore::with_records("growth", series("user 8", &inflows)));
    let a = service.assess(&LoanRequest::new("user 8", 100.0)).await.unwrap();
    assert_eq!(a.result.trend_label, TrendLabel::StrongUp);
}

#[tokio::test]
async fn test_configured_scorer_and_text_report() {
    let cfg = AppConfig::from_toml(
        r#"
        [scoring]
        loan_multiple = 2.0

        [display]
        currency = "USD"
        "#,
    )
    .unwrap();
    assert_ne!(cfg.scoring, ScoringConfig::default());

    let store = InMemoryStore::from_records(series("user 5", &[2000.0, 2100.0, 2200.0, 2300.0]));
    let service = EligibilityService::new(
        Arc::new(store),
        EligibilityScorer::from_config(&cfg.scoring, &cfg.display.currency),
    );

    // ceiling is now 4,300, so 5,000 is over the limit
    let a = service.assess(&LoanRequest::new("user 5", 5000.0)).await.unwrap();
    assert!((a.result.max_recommended_loan.unwrap() - 4300.0).abs() < 1e-9);
    assert!(!a.result.eligible);

    let text = report::render_text(&a, &cfg.display.currency);
    assert!(text.contains("USD 4,300.00"));
    assert!(text.contains("Moderate Uptrend"));
    assert!(text.contains("Unlikely to be eligible."));
}

#[tokio::test]
async fn test_bundled_fixture_loads_and_scores() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/transactions.json");
    let store = InMemoryStore::load_json(path).unwrap();
    assert_eq!(store.len(), 5);
    assert_eq!(store.record_count(), 60);

    let service = EligibilityService::new(Arc::new(store), EligibilityScorer::default());
    let a = service.assess(&LoanRequest::new("user 1", 2000.0)).await.unwrap();
    assert_eq!(a.result.trend_label, TrendLabel::StrongUp);
    let b = service.assess(&LoanRequest::new("user 3", 2000.0)).await.unwrap();
    assert_eq!(b.result.trend_label, TrendLabel::StrongDown);
    assert!(!b.result.eligible);
}
