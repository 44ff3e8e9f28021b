//! Volume (series) and publisher records as returned by the metadata API.

use serde::Deserialize;

use crate::models::dates;

/// A publisher reference nested inside a volume payload.
#[derive(Clone, Debug, Deserialize)]
pub struct PublisherRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// One comic series as the API describes it.
///
/// `start_year` goes through [`dates::flexible_year`] because the API serves
/// it as an int, a numeric string, or junk depending on the record.
#[derive(Clone, Debug, Deserialize)]
pub struct VolumeRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "dates::flexible_year")]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub count_of_issues: i32,
    #[serde(default)]
    pub publisher: Option<PublisherRecord>,
}
