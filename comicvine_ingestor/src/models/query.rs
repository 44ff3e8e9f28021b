use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Row filter for an issue listing request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum IssueFilter {
    /// All issues belonging to one volume.
    Volume(i64),
    /// All issues with exactly this store date.
    StoreDate(NaiveDate),
}

/// One page of an issue listing.
///
/// Results are always sorted by store date ascending; paging is plain
/// offset/limit. `page_size` is capped by the API at 100 per its docs but the
/// caller owns the choice.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct IssuesQuery {
    pub filter: IssueFilter,
    pub offset: u32,
    pub page_size: u32,
}

impl IssuesQuery {
    /// Query for page `page` (1-based) of issues matching `filter`.
    pub fn page(filter: IssueFilter, page: u32, page_size: u32) -> Self {
        Self {
            filter,
            offset: page.saturating_sub(1) * page_size,
            page_size,
        }
    }
}

/// Volume search used by reconciliation tooling. Results are sorted by
/// descending issue count so the best-established series surface first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumesQuery {
    /// Series name to search for.
    pub name: String,
    /// Optional exact publisher-name filter, applied after the search.
    pub publisher: Option<String>,
    /// Optional start-year filter, applied after the search.
    pub year: Option<i32>,
}
