//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`] for use with Diesel's Queryable/Insertable APIs:
//! - [`crate::schema::publishers`] — lightweight publisher lookup rows
//! - [`crate::schema::volumes`] — cached series with TTL/failure metadata
//! - [`crate::schema::issues`] — cached issues, cascade-deleted with volumes
//! - [`crate::schema::week_primings`] — per-week priming progress rows
//!
//! Each cached table carries the same five cache-metadata columns; the
//! `*Upsert` forms are Insertable + AsChangeset so one struct drives both
//! arms of `INSERT .. ON CONFLICT .. DO UPDATE`. They treat `None` as NULL:
//! the upstream catalog is authoritative, so a field it nulls out gets
//! nulled here too.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::freshness::CacheMeta;
use crate::schema::{issues, publishers, volumes, week_primings};
use crate::sync::prime::Checkpoint;

/// A row in [`crate::schema::publishers`]. Created on demand when a volume
/// first references the publisher; never expires.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = publishers, primary_key(cv_id), check_for_backend(diesel::sqlite::Sqlite))]
pub struct Publisher {
    /// External catalog id (natural primary key).
    pub cv_id: i64,
    /// Publisher display name.
    pub name: String,
}

/// Insertable/changeset form of [`Publisher`].
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = publishers)]
pub struct NewPublisher<'a> {
    /// External catalog id.
    pub cv_id: i64,
    /// Publisher display name.
    pub name: &'a str,
}

/// A row in [`crate::schema::volumes`]: one cached comic series.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = volumes, primary_key(cv_id), check_for_backend(diesel::sqlite::Sqlite))]
pub struct Volume {
    /// External catalog id (natural primary key).
    pub cv_id: i64,
    /// Series name; synthetic (`Volume {id}`) for failed placeholders.
    pub name: String,
    /// Year the series started, when the catalog knows it.
    pub start_year: Option<i32>,
    /// Issue count reported by the catalog.
    pub count_of_issues: i32,
    /// FK to [`Publisher`]. NULL only on placeholders that have never been
    /// fetched successfully.
    pub publisher_id: Option<i64>,
    /// Set on every write.
    pub last_updated: NaiveDateTime,
    /// TTL boundary; stale once `now` passes it.
    pub cache_expires: NaiveDateTime,
    /// Whether the most recent remote fetch failed.
    pub fetch_failed: bool,
    /// Lifetime count of failed remote fetches.
    pub fetch_failure_count: i32,
    /// When the most recent failure happened.
    pub last_failure: Option<NaiveDateTime>,
}

impl Volume {
    /// The cache-metadata view used by the freshness policy.
    pub fn cache_meta(&self) -> CacheMeta {
        CacheMeta {
            cache_expires: self.cache_expires,
            fetch_failed: self.fetch_failed,
            last_failure: self.last_failure,
        }
    }
}

/// Upsert form of [`Volume`] for successful fetches. `publisher_id` is
/// non-optional here: a volume that has been fetched successfully always has
/// a publisher.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = volumes, treat_none_as_null = true)]
pub struct VolumeUpsert<'a> {
    /// External catalog id.
    pub cv_id: i64,
    /// Series name.
    pub name: &'a str,
    /// Year the series started.
    pub start_year: Option<i32>,
    /// Issue count reported by the catalog.
    pub count_of_issues: i32,
    /// FK to [`Publisher`]; the row must already exist.
    pub publisher_id: i64,
    /// Write timestamp.
    pub last_updated: NaiveDateTime,
    /// New TTL boundary.
    pub cache_expires: NaiveDateTime,
    /// Reset to false on success.
    pub fetch_failed: bool,
    /// Reset to zero on success.
    pub fetch_failure_count: i32,
    /// Reset to NULL on success.
    pub last_failure: Option<NaiveDateTime>,
}

/// Insert-only placeholder for a volume whose first fetch failed.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = volumes)]
pub struct VolumePlaceholder {
    /// External catalog id.
    pub cv_id: i64,
    /// Synthetic name, e.g. `Volume 18436`.
    pub name: String,
    /// Write timestamp.
    pub last_updated: NaiveDateTime,
    /// Already expired, so the next allowed attempt refetches.
    pub cache_expires: NaiveDateTime,
    /// Always true for placeholders.
    pub fetch_failed: bool,
    /// Starts at one.
    pub fetch_failure_count: i32,
    /// When the failure happened.
    pub last_failure: Option<NaiveDateTime>,
}

/// A row in [`crate::schema::issues`]: one cached issue of a volume.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = issues, primary_key(cv_id), check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(Volume, foreign_key = volume_id))]
pub struct Issue {
    /// External catalog id (natural primary key).
    pub cv_id: i64,
    /// FK to [`Volume`]; cascade-deleted with it.
    pub volume_id: i64,
    /// Issue title, when the catalog has one.
    pub name: Option<String>,
    /// Issue number; alphanumeric (e.g. "12A").
    pub number: Option<String>,
    /// Store (sale) date.
    pub store_date: Option<NaiveDate>,
    /// Cover date.
    pub cover_date: Option<NaiveDate>,
    /// `store_date` if present, else `cover_date`. The only date
    /// chronological queries may use.
    pub canonical_date: Option<NaiveDate>,
    /// Long-form description HTML.
    pub description: Option<String>,
    /// Catalog API detail URL.
    pub api_url: Option<String>,
    /// Catalog site detail URL.
    pub site_url: Option<String>,
    /// When the catalog first saw this issue.
    pub date_added: Option<NaiveDateTime>,
    /// When the catalog last updated this issue.
    pub date_last_updated: Option<NaiveDateTime>,
    /// Cover art, square avatar size.
    pub image_icon_url: Option<String>,
    /// Cover art, scaled avatar size.
    pub image_thumbnail_url: Option<String>,
    /// Cover art, square mini size.
    pub image_tiny_url: Option<String>,
    /// Cover art, scaled small size.
    pub image_small_url: Option<String>,
    /// Cover art, scaled medium size.
    pub image_medium_url: Option<String>,
    /// Cover art, screen medium size.
    pub image_screen_url: Option<String>,
    /// Cover art, scaled large size.
    pub image_super_url: Option<String>,
    /// Cover art, screen kubrick size.
    pub image_large_screen_url: Option<String>,
    /// Cover art, original size.
    pub image_original_url: Option<String>,
    /// First non-null variant in the fixed preference order; see
    /// [`comicvine_ingestor::models::image::ImageSet::best_url`].
    pub image_best_url: Option<String>,
    /// Set on every write.
    pub last_updated: NaiveDateTime,
    /// TTL boundary.
    pub cache_expires: NaiveDateTime,
    /// Whether the most recent remote fetch failed.
    pub fetch_failed: bool,
    /// Lifetime count of failed remote fetches.
    pub fetch_failure_count: i32,
    /// When the most recent failure happened.
    pub last_failure: Option<NaiveDateTime>,
}

impl Issue {
    /// The cache-metadata view used by the freshness policy.
    pub fn cache_meta(&self) -> CacheMeta {
        CacheMeta {
            cache_expires: self.cache_expires,
            fetch_failed: self.fetch_failed,
            last_failure: self.last_failure,
        }
    }
}

/// Upsert form of [`Issue`]. All content fields come from the upstream
/// record; repeated ingestion converges the row toward the upstream state.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = issues, treat_none_as_null = true)]
pub struct IssueUpsert {
    /// External catalog id.
    pub cv_id: i64,
    /// FK to [`Volume`].
    pub volume_id: i64,
    /// Issue title.
    pub name: Option<String>,
    /// Issue number.
    pub number: Option<String>,
    /// Store (sale) date.
    pub store_date: Option<NaiveDate>,
    /// Cover date.
    pub cover_date: Option<NaiveDate>,
    /// Derived canonical date.
    pub canonical_date: Option<NaiveDate>,
    /// Long-form description HTML.
    pub description: Option<String>,
    /// Catalog API detail URL.
    pub api_url: Option<String>,
    /// Catalog site detail URL.
    pub site_url: Option<String>,
    /// When the catalog first saw this issue.
    pub date_added: Option<NaiveDateTime>,
    /// When the catalog last updated this issue.
    pub date_last_updated: Option<NaiveDateTime>,
    /// Cover art, square avatar size.
    pub image_icon_url: Option<String>,
    /// Cover art, scaled avatar size.
    pub image_thumbnail_url: Option<String>,
    /// Cover art, square mini size.
    pub image_tiny_url: Option<String>,
    /// Cover art, scaled small size.
    pub image_small_url: Option<String>,
    /// Cover art, scaled medium size.
    pub image_medium_url: Option<String>,
    /// Cover art, screen medium size.
    pub image_screen_url: Option<String>,
    /// Cover art, scaled large size.
    pub image_super_url: Option<String>,
    /// Cover art, screen kubrick size.
    pub image_large_screen_url: Option<String>,
    /// Cover art, original size.
    pub image_original_url: Option<String>,
    /// Derived best thumbnail.
    pub image_best_url: Option<String>,
    /// Write timestamp.
    pub last_updated: NaiveDateTime,
    /// New TTL boundary.
    pub cache_expires: NaiveDateTime,
    /// Reset to false on successful ingestion.
    pub fetch_failed: bool,
    /// Reset to zero on successful ingestion.
    pub fetch_failure_count: i32,
    /// Reset to NULL on successful ingestion.
    pub last_failure: Option<NaiveDateTime>,
}

/// A row in [`crate::schema::week_primings`]: priming progress for one
/// calendar week (Monday-anchored).
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = week_primings, primary_key(week_start), check_for_backend(diesel::sqlite::Sqlite))]
pub struct WeekPriming {
    /// Monday of the tracked week (natural primary key).
    pub week_start: NaiveDate,
    /// Whether the last priming pass covered every day/page of the week.
    pub priming_complete: bool,
    /// Resume marker: next date to prime within the week.
    pub next_date_to_prime: Option<NaiveDate>,
    /// Resume marker: next page (1-based) to fetch for that date.
    pub current_day_page: i32,
    /// Set on every write.
    pub last_updated: NaiveDateTime,
    /// TTL boundary: long after completion, short while in progress.
    pub cache_expires: NaiveDateTime,
    /// Whether the last priming attempt itself errored.
    pub fetch_failed: bool,
    /// Lifetime count of failed priming attempts.
    pub fetch_failure_count: i32,
    /// When the most recent failure happened.
    pub last_failure: Option<NaiveDateTime>,
}

impl WeekPriming {
    /// The cache-metadata view used by the freshness policy.
    pub fn cache_meta(&self) -> CacheMeta {
        CacheMeta {
            cache_expires: self.cache_expires,
            fetch_failed: self.fetch_failed,
            last_failure: self.last_failure,
        }
    }

    /// The two resume columns as one value, present only while a pass is
    /// actually suspended mid-week.
    pub fn checkpoint(&self) -> Option<Checkpoint> {
        self.next_date_to_prime.map(|date| Checkpoint {
            date,
            page: self.current_day_page.max(1) as u32,
        })
    }
}

/// Upsert form of [`WeekPriming`].
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = week_primings, treat_none_as_null = true)]
pub struct WeekPrimingUpsert {
    /// Monday of the tracked week.
    pub week_start: NaiveDate,
    /// Whether priming covered the whole week.
    pub priming_complete: bool,
    /// Resume marker: next date to prime, NULL when complete.
    pub next_date_to_prime: Option<NaiveDate>,
    /// Resume marker: next page (1-based) for that date.
    pub current_day_page: i32,
    /// Write timestamp.
    pub last_updated: NaiveDateTime,
    /// New TTL boundary.
    pub cache_expires: NaiveDateTime,
    /// Reset to false when a priming pass returns.
    pub fetch_failed: bool,
    /// Lifetime failure count, carried through.
    pub fetch_failure_count: i32,
    /// Carried through, or NULL on success.
    pub last_failure: Option<NaiveDateTime>,
}
