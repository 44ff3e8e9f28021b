//! The synchronizer: cache-aside single-entity fetches, bulk issue
//! ingestion, and the budget-bounded resumable range priming pass.
//!
//! Remote failures are recovered here and turned into cache-record failure
//! state ([`crate::repo::record_volume_failure`]); they never propagate to
//! read paths. Database errors do propagate — a broken store is not
//! something this layer can degrade around.

pub mod budget;
pub mod prime;
pub mod week;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use diesel::SqliteConnection;
use tracing::{debug, info, warn};

use comicvine_ingestor::{
    models::{
        issue::IssueRecord,
        query::{IssueFilter, IssuesQuery},
    },
    providers::MetadataProvider,
};

use crate::{
    config::SyncConfig,
    freshness::{Freshness, freshness},
    models::{Issue, IssueUpsert, Volume, VolumeUpsert},
    query, repo,
};

/// Orchestrates fetch-or-serve-from-cache against a [`MetadataProvider`].
///
/// Holds no connection: callers pass one in, so the same synchronizer can
/// serve many requests.
pub struct Synchronizer {
    provider: Arc<dyn MetadataProvider>,
    config: SyncConfig,
}

impl Synchronizer {
    /// Creates a synchronizer over the given provider and configuration.
    pub fn new(provider: Arc<dyn MetadataProvider>, config: SyncConfig) -> Self {
        Self { provider, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Cache-aside fetch of a single volume.
    ///
    /// Fresh and recently-failed records are returned as-is with zero remote
    /// calls; otherwise the provider is called at most once. A provider
    /// error is recorded on the row (creating a synthetic-name placeholder
    /// if needed) and the failed row is returned — never an error.
    pub async fn get_volume(
        &self,
        conn: &mut SqliteConnection,
        volume_id: i64,
        force_refresh: bool,
    ) -> Result<Volume> {
        let now = Utc::now().naive_utc();
        if let Some(volume) = repo::load_volume(conn, volume_id)? {
            match freshness(Some(&volume.cache_meta()), force_refresh, now) {
                Freshness::Fresh => {
                    debug!(volume_id, "returning fresh cached volume");
                    return Ok(volume);
                }
                Freshness::RecentFailure => {
                    debug!(volume_id, "recent fetch failure, skipping remote call");
                    return Ok(volume);
                }
                Freshness::Stale | Freshness::Absent => {}
            }
        }

        let started = Instant::now();
        match self.provider.get_volume(volume_id).await {
            Ok(record) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let Some(publisher) = record.publisher else {
                    // A volume with no publisher cannot be stored as a
                    // success; treated like any other malformed payload.
                    warn!(volume_id, elapsed_ms, "volume payload missing publisher");
                    return repo::record_volume_failure(conn, volume_id, now);
                };
                info!(volume_id, elapsed_ms, "volume fetch succeeded");

                let publisher_name = publisher
                    .name
                    .unwrap_or_else(|| format!("Publisher {}", publisher.id));
                repo::upsert_publisher(conn, publisher.id, &publisher_name)?;

                let name = record
                    .name
                    .unwrap_or_else(|| format!("Volume {volume_id}"));
                let row = VolumeUpsert {
                    cv_id: volume_id,
                    name: &name,
                    start_year: record.start_year,
                    count_of_issues: record.count_of_issues,
                    publisher_id: publisher.id,
                    last_updated: now,
                    cache_expires: now + self.config.volume_ttl(),
                    fetch_failed: false,
                    fetch_failure_count: 0,
                    last_failure: None,
                };
                repo::upsert_volume(conn, &row)
            }
            Err(err) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                warn!(
                    volume_id,
                    elapsed_ms,
                    transient = err.is_transient(),
                    error = %err,
                    "volume fetch failed"
                );
                repo::record_volume_failure(conn, volume_id, now)
            }
        }
    }

    /// Bulk-ingests the issues of one volume and returns the cached set.
    ///
    /// Pages through the provider (store-date ascending) until a short page
    /// or the configured page cap, upserting every record; repeated calls
    /// are idempotent. A provider error mid-paging ends the paging and the
    /// issues cached so far are returned.
    pub async fn get_volume_issues(
        &self,
        conn: &mut SqliteConnection,
        volume_id: i64,
    ) -> Result<Vec<Issue>> {
        let volume = self.get_volume(conn, volume_id, false).await?;

        let page_size = self.config.page_size;
        let mut page: u32 = 1;
        loop {
            let page_query = IssuesQuery::page(IssueFilter::Volume(volume.cv_id), page, page_size);
            let started = Instant::now();
            match self.provider.list_issues(&page_query).await {
                Ok(records) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    info!(
                        volume_id,
                        page,
                        count = records.len(),
                        elapsed_ms,
                        "issue page fetched"
                    );
                    let short_page = (records.len() as u32) < page_size;
                    let now = Utc::now().naive_utc();
                    for record in &records {
                        repo::upsert_issue(conn, &self.issue_upsert(volume.cv_id, record, now))?;
                    }
                    if short_page {
                        break;
                    }
                    if page >= self.config.volume_page_cap {
                        debug!(
                            volume_id,
                            cap = self.config.volume_page_cap,
                            "volume page cap reached"
                        );
                        break;
                    }
                    page += 1;
                }
                Err(err) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    warn!(
                        volume_id,
                        page,
                        elapsed_ms,
                        transient = err.is_transient(),
                        error = %err,
                        "issue page fetch failed"
                    );
                    break;
                }
            }
        }

        query::issues_for_volume(conn, volume.cv_id)
    }

    /// Maps an upstream issue record onto the cache row shape, applying the
    /// canonical-date rule and the image preference order.
    fn issue_upsert(&self, volume_id: i64, record: &IssueRecord, now: NaiveDateTime) -> IssueUpsert {
        let image = record.image.clone().unwrap_or_default();
        let image_best_url = image.best_url().map(str::to_string);

        IssueUpsert {
            cv_id: record.id,
            volume_id,
            name: record.name.clone(),
            number: record.number.clone(),
            store_date: record.store_date,
            cover_date: record.cover_date,
            canonical_date: record.canonical_date(),
            description: record.description.clone(),
            api_url: record.api_url.clone(),
            site_url: record.site_url.clone(),
            date_added: record.date_added.map(|t| t.naive_utc()),
            date_last_updated: record.date_last_updated.map(|t| t.naive_utc()),
            image_icon_url: image.icon_url,
            image_thumbnail_url: image.thumbnail_url,
            image_tiny_url: image.tiny_url,
            image_small_url: image.small_url,
            image_medium_url: image.medium_url,
            image_screen_url: image.screen_url,
            image_super_url: image.super_url,
            image_large_screen_url: image.large_screen_url,
            image_original_url: image.original_url,
            image_best_url,
            last_updated: now,
            cache_expires: now + self.config.issue_ttl(),
            fetch_failed: false,
            fetch_failure_count: 0,
            last_failure: None,
        }
    }
}
