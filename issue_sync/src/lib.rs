//! Local cache and synchronization engine for remote comic metadata.
//!
//! The remote catalog is rate limited hard enough that every read path goes
//! through a local relational cache (publishers, volumes, issues). This crate
//! owns that cache: freshness policy, cache-aside fetches with failure
//! backoff, bulk issue ingestion, and the budget-bounded resumable priming
//! pass that keeps a calendar week's issues warm.

#![deny(missing_docs)]

pub mod config;
pub mod db;
pub mod freshness;
pub mod models;
pub mod query;
pub mod repo;
pub mod schema;
pub mod sync;
