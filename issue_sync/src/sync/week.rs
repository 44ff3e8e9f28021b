//! Week-level orchestration of the priming pass.
//!
//! One [`WeekPriming`] row per Monday tracks how far priming got for that
//! calendar week. A completed week sleeps for a long TTL; an incomplete or
//! failed week gets a TTL of seconds so the very next read request resumes
//! it. Reads never gate on any of this — priming is best-effort freshness,
//! and a partially primed week still serves whatever is cached.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use diesel::SqliteConnection;
use tracing::{debug, info, warn};

use super::{Synchronizer, budget::WallClockBudget, prime::Checkpoint};
use crate::models::{WeekPriming, WeekPrimingUpsert};
use crate::repo;

/// Monday of the week containing `date`.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

impl Synchronizer {
    /// Ensures the week containing `date` has been primed, resuming a
    /// suspended pass if there is one, and returns the week's state row.
    ///
    /// Priming runs when the week has no state yet, its state expired, its
    /// last attempt failed, or it never completed. The pass runs under the
    /// configured wall-clock budget so it is safe to call inline from a
    /// read request.
    pub async fn ensure_week(
        &self,
        conn: &mut SqliteConnection,
        date: NaiveDate,
    ) -> Result<WeekPriming> {
        let week_start = week_start_for(date);
        let week_end = week_start + Duration::days(6);
        let now = Utc::now().naive_utc();

        let state = repo::load_week(conn, week_start)?;
        if let Some(s) = &state {
            let should_prime = now >= s.cache_expires || s.fetch_failed || !s.priming_complete;
            if !should_prime {
                debug!(%week_start, "week is fresh and complete, skipping prime");
                return Ok(s.clone());
            }
        }
        let resume = state.as_ref().and_then(|s| s.checkpoint());

        let mut budget = WallClockBudget::new(self.config.prime_budget());
        match self
            .prime_issues_for_date_range(conn, week_start, week_end, resume, &mut budget)
            .await
        {
            Ok(summary) => {
                let now = Utc::now().naive_utc();
                let row = if summary.complete {
                    WeekPrimingUpsert {
                        week_start,
                        priming_complete: true,
                        next_date_to_prime: None,
                        current_day_page: 1,
                        last_updated: now,
                        cache_expires: now + self.config.week_complete_ttl(),
                        fetch_failed: false,
                        fetch_failure_count: 0,
                        last_failure: None,
                    }
                } else {
                    let checkpoint = summary.resume.unwrap_or(Checkpoint {
                        date: week_start,
                        page: 1,
                    });
                    WeekPrimingUpsert {
                        week_start,
                        priming_complete: false,
                        next_date_to_prime: Some(checkpoint.date),
                        current_day_page: checkpoint.page as i32,
                        last_updated: now,
                        cache_expires: now + self.config.week_retry_ttl(),
                        fetch_failed: false,
                        fetch_failure_count: 0,
                        last_failure: None,
                    }
                };
                info!(
                    %week_start,
                    complete = summary.complete,
                    issues = summary.issues_upserted,
                    pages = summary.pages_fetched,
                    days_failed = summary.days_failed,
                    "week priming pass finished"
                );
                repo::upsert_week(conn, &row)
            }
            Err(err) => {
                warn!(%week_start, error = %err, "week priming pass errored");
                repo::record_week_failure(conn, week_start, now, self.config.week_retry_ttl())
            }
        }
    }
}
