//! CASHTREND: cash-inflow trend loan eligibility assessor
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod scoring;
pub mod store;
pub mod service;
pub mod report;
pub mod api;
