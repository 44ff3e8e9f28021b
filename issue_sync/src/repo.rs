//! upsert and load statements
//!
//! All writes are keyed by natural external ids (`INSERT .. ON CONFLICT ..
//! DO UPDATE`), so concurrent writers converge instead of duplicating.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::{SqliteConnection, insert_into};

use crate::models::{
    Issue, IssueUpsert, NewPublisher, Volume, VolumePlaceholder, VolumeUpsert, WeekPriming,
    WeekPrimingUpsert,
};
use crate::schema::{issues, publishers, volumes, week_primings};

/// upsert publisher
pub fn upsert_publisher(
    conn: &mut SqliteConnection,
    cv_id_: i64,
    name_: &str,
) -> anyhow::Result<usize> {
    let row = NewPublisher {
        cv_id: cv_id_,
        name: name_,
    };
    let n = insert_into(publishers::table)
        .values(&row)
        .on_conflict(publishers::cv_id)
        .do_update()
        .set(publishers::name.eq(name_))
        .execute(conn)?;
    Ok(n)
}

/// load a cached volume, if any
pub fn load_volume(conn: &mut SqliteConnection, cv_id_: i64) -> anyhow::Result<Option<Volume>> {
    let row = volumes::table
        .find(cv_id_)
        .select(Volume::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

/// Upsert a successfully fetched volume and return the stored row.
/// The publisher row must exist before this is called.
pub fn upsert_volume(conn: &mut SqliteConnection, row: &VolumeUpsert) -> anyhow::Result<Volume> {
    let volume = insert_into(volumes::table)
        .values(row)
        .on_conflict(volumes::cv_id)
        .do_update()
        .set(row)
        .returning(Volume::as_returning())
        .get_result(conn)?;
    Ok(volume)
}

/// Record a failed volume fetch: creates a synthetic-name placeholder if the
/// volume was never seen, otherwise increments the failure counter in place.
/// `cache_expires` of an existing row is left untouched.
pub fn record_volume_failure(
    conn: &mut SqliteConnection,
    cv_id_: i64,
    now: NaiveDateTime,
) -> anyhow::Result<Volume> {
    let placeholder = VolumePlaceholder {
        cv_id: cv_id_,
        name: format!("Volume {cv_id_}"),
        last_updated: now,
        cache_expires: now,
        fetch_failed: true,
        fetch_failure_count: 1,
        last_failure: Some(now),
    };
    let volume = insert_into(volumes::table)
        .values(&placeholder)
        .on_conflict(volumes::cv_id)
        .do_update()
        .set((
            volumes::fetch_failed.eq(true),
            volumes::fetch_failure_count.eq(volumes::fetch_failure_count + 1),
            volumes::last_failure.eq(now),
            volumes::last_updated.eq(now),
        ))
        .returning(Volume::as_returning())
        .get_result(conn)?;
    Ok(volume)
}

/// upsert issue
pub fn upsert_issue(conn: &mut SqliteConnection, row: &IssueUpsert) -> anyhow::Result<usize> {
    let n = insert_into(issues::table)
        .values(row)
        .on_conflict(issues::cv_id)
        .do_update()
        .set(row)
        .execute(conn)?;
    Ok(n)
}

/// load a cached issue, if any
pub fn load_issue(conn: &mut SqliteConnection, cv_id_: i64) -> anyhow::Result<Option<Issue>> {
    let row = issues::table
        .find(cv_id_)
        .select(Issue::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

/// number of cached issues for a volume
pub fn count_volume_issues(conn: &mut SqliteConnection, volume_id_: i64) -> anyhow::Result<i64> {
    let n = issues::table
        .filter(issues::volume_id.eq(volume_id_))
        .count()
        .get_result(conn)?;
    Ok(n)
}

/// load the priming state for a week, if any
pub fn load_week(
    conn: &mut SqliteConnection,
    week_start_: NaiveDate,
) -> anyhow::Result<Option<WeekPriming>> {
    let row = week_primings::table
        .find(week_start_)
        .select(WeekPriming::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

/// Upsert a week priming row (used after a priming pass returns).
pub fn upsert_week(
    conn: &mut SqliteConnection,
    row: &WeekPrimingUpsert,
) -> anyhow::Result<WeekPriming> {
    let week = insert_into(week_primings::table)
        .values(row)
        .on_conflict(week_primings::week_start)
        .do_update()
        .set(row)
        .returning(WeekPriming::as_returning())
        .get_result(conn)?;
    Ok(week)
}

/// Record that a priming pass for a week errored. Existing resume markers
/// are kept so the next attempt continues where the failed one stood; the
/// short retry TTL makes that next attempt happen soon.
pub fn record_week_failure(
    conn: &mut SqliteConnection,
    week_start_: NaiveDate,
    now: NaiveDateTime,
    retry_ttl: Duration,
) -> anyhow::Result<WeekPriming> {
    let expires = now + retry_ttl;
    let row = WeekPrimingUpsert {
        week_start: week_start_,
        priming_complete: false,
        next_date_to_prime: None,
        current_day_page: 1,
        last_updated: now,
        cache_expires: expires,
        fetch_failed: true,
        fetch_failure_count: 1,
        last_failure: Some(now),
    };
    let week = insert_into(week_primings::table)
        .values(&row)
        .on_conflict(week_primings::week_start)
        .do_update()
        .set((
            week_primings::fetch_failed.eq(true),
            week_primings::fetch_failure_count.eq(week_primings::fetch_failure_count + 1),
            week_primings::last_failure.eq(now),
            week_primings::cache_expires.eq(expires),
            week_primings::last_updated.eq(now),
        ))
        .returning(WeekPriming::as_returning())
        .get_result(conn)?;
    Ok(week)
}
