//! The cache freshness policy.
//!
//! [`freshness`] is the single decision point for "should we hit the remote
//! API for this record". It is pure: the caller supplies the clock, so every
//! branch is directly testable.

use chrono::{Duration, NaiveDateTime};

/// The cache-metadata columns shared by volumes, issues, and week rows,
/// detached from any particular table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheMeta {
    /// TTL boundary set by the last successful fetch.
    pub cache_expires: NaiveDateTime,
    /// Whether the most recent remote fetch failed.
    pub fetch_failed: bool,
    /// When the most recent failure happened.
    pub last_failure: Option<NaiveDateTime>,
}

/// Outcome of the freshness decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Cached record is usable as-is; do not call the remote API.
    Fresh,
    /// Cached record exists but should be refetched.
    Stale,
    /// The last fetch failed recently; return the cached record as-is and do
    /// NOT retry yet, so a failing upstream is not hammered.
    RecentFailure,
    /// No cached record exists.
    Absent,
}

/// How long to back off after a failed fetch before retrying.
pub fn failure_backoff() -> Duration {
    Duration::hours(1)
}

/// Classifies a cached record.
///
/// `Fresh` requires all of: no forced refresh, `now` before the TTL
/// boundary, and no recorded failure. A failed record within the backoff
/// window is `RecentFailure`; everything else is `Stale`.
pub fn freshness(meta: Option<&CacheMeta>, force_refresh: bool, now: NaiveDateTime) -> Freshness {
    let Some(meta) = meta else {
        return Freshness::Absent;
    };

    if !force_refresh && now < meta.cache_expires && !meta.fetch_failed {
        return Freshness::Fresh;
    }

    if meta.fetch_failed {
        // A failed row with no recorded failure time counts as just-failed.
        let since_failure = now - meta.last_failure.unwrap_or(now);
        if since_failure < failure_backoff() {
            return Freshness::RecentFailure;
        }
    }

    Freshness::Stale
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn meta(expires: NaiveDateTime, failed: bool, failure: Option<NaiveDateTime>) -> CacheMeta {
        CacheMeta {
            cache_expires: expires,
            fetch_failed: failed,
            last_failure: failure,
        }
    }

    #[test]
    fn absent_when_no_record() {
        assert_eq!(freshness(None, false, at(12)), Freshness::Absent);
    }

    #[test]
    fn fresh_within_ttl() {
        let m = meta(at(18), false, None);
        assert_eq!(freshness(Some(&m), false, at(12)), Freshness::Fresh);
    }

    #[test]
    fn force_refresh_overrides_fresh() {
        let m = meta(at(18), false, None);
        assert_eq!(freshness(Some(&m), true, at(12)), Freshness::Stale);
    }

    #[test]
    fn stale_past_ttl() {
        let m = meta(at(6), false, None);
        assert_eq!(freshness(Some(&m), false, at(12)), Freshness::Stale);
    }

    #[test]
    fn recent_failure_within_backoff() {
        let m = meta(at(18), true, Some(at(12)));
        // 30 minutes after the failure.
        let now = at(12) + Duration::minutes(30);
        assert_eq!(freshness(Some(&m), false, now), Freshness::RecentFailure);
    }

    #[test]
    fn failed_but_backoff_elapsed_is_stale() {
        let m = meta(at(18), true, Some(at(10)));
        assert_eq!(freshness(Some(&m), false, at(12)), Freshness::Stale);
    }

    #[test]
    fn failed_with_no_failure_time_backs_off() {
        let m = meta(at(18), true, None);
        assert_eq!(freshness(Some(&m), false, at(12)), Freshness::RecentFailure);
    }

    #[test]
    fn expired_and_failed_recently_still_backs_off() {
        // Flipping fetch_failed must not depend on cache_expires.
        let m = meta(at(6), true, Some(at(11)));
        assert_eq!(freshness(Some(&m), false, at(12)), Freshness::RecentFailure);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fresh_iff_unexpired_and_unfailed(
            expires_offset in -72i64..72,
            failed in any::<bool>(),
            failure_offset in proptest::option::of(-120i64..0),
        ) {
            let now = at(12);
            let m = meta(
                now + Duration::hours(expires_offset),
                failed,
                failure_offset.map(|o| now + Duration::minutes(o)),
            );
            let verdict = freshness(Some(&m), false, now);
            let expect_fresh = now < m.cache_expires && !m.fetch_failed;
            prop_assert_eq!(verdict == Freshness::Fresh, expect_fresh);
        }
    }
}
