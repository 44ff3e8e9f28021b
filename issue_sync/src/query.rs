//! Read-only query surface consumed by the CRUD layer.
//!
//! Every chronological filter and ordering here uses `canonical_date` only;
//! the raw store/cover dates are never queried directly. Reads go straight
//! to the cache and never wait on (or fail because of) priming.

use chrono::{Duration, NaiveDate};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::models::{Issue, Volume};
use crate::schema::{issues, volumes};

/// All cached issues with a canonical date inside `[start, end]`, ordered by
/// canonical date, then volume, then number.
pub fn issues_in_range(
    conn: &mut SqliteConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Vec<Issue>> {
    let rows = issues::table
        .filter(issues::canonical_date.between(start, end))
        .order((
            issues::canonical_date.asc(),
            issues::volume_id.asc(),
            issues::number.asc(),
        ))
        .select(Issue::as_select())
        .load(conn)?;
    Ok(rows)
}

/// All cached issues of one volume, in canonical order.
pub fn issues_for_volume(
    conn: &mut SqliteConnection,
    volume_id_: i64,
) -> anyhow::Result<Vec<Issue>> {
    let rows = issues::table
        .filter(issues::volume_id.eq(volume_id_))
        .order((issues::canonical_date.asc(), issues::number.asc()))
        .select(Issue::as_select())
        .load(conn)?;
    Ok(rows)
}

/// The issues of one calendar week joined with their volumes, ordered the
/// way a weekly release list is displayed (by series name, then number).
pub fn week_issues(
    conn: &mut SqliteConnection,
    week_start: NaiveDate,
) -> anyhow::Result<Vec<(Issue, Volume)>> {
    let week_end = week_start + Duration::days(6);
    let rows = issues::table
        .inner_join(volumes::table)
        .filter(issues::canonical_date.between(week_start, week_end))
        .order((volumes::name.asc(), issues::number.asc()))
        .select((Issue::as_select(), Volume::as_select()))
        .load(conn)?;
    Ok(rows)
}
