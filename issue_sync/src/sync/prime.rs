//! The resumable, budget-bounded range priming pass.
//!
//! Priming walks a date range day by day, page by page, pulling every issue
//! released on each date into the cache — across all volumes, not just the
//! ones already cached. The pass is stateless across invocations: when its
//! budget runs out it reports the exact `(date, page)` it stopped at, and
//! the caller (the week orchestrator) persists that checkpoint so the next
//! invocation continues without skipping or re-fetching anything.

use chrono::{Duration, NaiveDate, Utc};
use diesel::SqliteConnection;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use comicvine_ingestor::models::query::{IssueFilter, IssuesQuery};

use super::{Synchronizer, budget::Budget};
use crate::repo;

/// Exact point at which a suspended priming pass should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// The date that was being primed when the budget ran out.
    pub date: NaiveDate,
    /// The next page (1-based) to fetch for that date.
    pub page: u32,
}

/// What one priming pass observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeSummary {
    /// Whether the whole date range was covered.
    pub complete: bool,
    /// Where to continue, when `complete` is false.
    pub resume: Option<Checkpoint>,
    /// Issues written to the cache during this pass.
    pub issues_upserted: usize,
    /// Day pages fetched successfully during this pass.
    pub pages_fetched: usize,
    /// Days abandoned because a page fetch failed.
    pub days_failed: usize,
}

impl Synchronizer {
    /// Primes the cache with every issue whose store date falls inside
    /// `[start_date, end_date]`, within a wall-clock budget.
    ///
    /// Days are processed strictly in ascending order and pages strictly in
    /// ascending order per day; only the first resumed day honors a carried
    /// page, every later day starts at page 1. The budget is checked once
    /// per day-page, before the remote call — budget exhaustion is a normal
    /// suspension, not an error. A failed page abandons only its day.
    ///
    /// Persisting the returned checkpoint is the caller's responsibility;
    /// this function holds no state between invocations.
    pub async fn prime_issues_for_date_range(
        &self,
        conn: &mut SqliteConnection,
        start_date: NaiveDate,
        end_date: NaiveDate,
        resume: Option<Checkpoint>,
        budget: &mut dyn Budget,
    ) -> anyhow::Result<PrimeSummary> {
        let mut summary = PrimeSummary {
            complete: false,
            resume: None,
            issues_upserted: 0,
            pages_fetched: 0,
            days_failed: 0,
        };

        let (mut date, mut page) = match resume {
            Some(checkpoint) => (checkpoint.date, checkpoint.page.max(1)),
            None => (start_date, 1),
        };

        // Volumes already resolved during this pass. One busy release day
        // references the same volumes over and over; without the memo each
        // reference would re-run the cache-aside volume lookup.
        let mut resolved_volumes: IndexMap<i64, ()> = IndexMap::new();

        while date <= end_date {
            loop {
                if budget.exhausted() {
                    summary.resume = Some(Checkpoint { date, page });
                    info!(%date, page, issues = summary.issues_upserted, "priming budget exhausted, suspending");
                    return Ok(summary);
                }

                let query =
                    IssuesQuery::page(IssueFilter::StoreDate(date), page, self.config.page_size);
                let started = std::time::Instant::now();
                let records = match self.provider.list_issues(&query).await {
                    Ok(records) => records,
                    Err(err) => {
                        // One bad day must not abort the whole range.
                        warn!(
                            %date,
                            page,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            transient = err.is_transient(),
                            error = %err,
                            "day page fetch failed, abandoning day"
                        );
                        summary.days_failed += 1;
                        break;
                    }
                };
                summary.pages_fetched += 1;
                debug!(%date, page, count = records.len(), "day page fetched");

                let short_page = (records.len() as u32) < self.config.page_size;
                let now = Utc::now().naive_utc();
                for record in &records {
                    let Some(stub) = &record.volume else {
                        warn!(issue_id = record.id, "issue payload missing volume, skipped");
                        continue;
                    };
                    if !resolved_volumes.contains_key(&stub.id) {
                        self.get_volume(conn, stub.id, false).await?;
                        resolved_volumes.insert(stub.id, ());
                    }
                    repo::upsert_issue(conn, &self.issue_upsert(stub.id, record, now))?;
                    summary.issues_upserted += 1;
                }

                if short_page {
                    break;
                }
                page += 1;
            }

            date += Duration::days(1);
            page = 1;
        }

        summary.complete = true;
        Ok(summary)
    }
}
