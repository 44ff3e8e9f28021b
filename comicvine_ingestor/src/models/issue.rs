//! Issue records as returned by the metadata API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::models::{dates, image::ImageSet};

/// The volume reference nested inside an issue payload. Only the id is
/// guaranteed; the name is a convenience for logging.
#[derive(Clone, Debug, Deserialize)]
pub struct VolumeStub {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// One published issue as the API describes it.
///
/// All temporal fields are normalized at this boundary (see
/// [`crate::models::dates`]): calendar dates become `NaiveDate`, timestamps
/// become UTC `DateTime`s, and the raw strings never leak downstream.
#[derive(Clone, Debug, Deserialize)]
pub struct IssueRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// Issue number; alphanumeric (e.g. "12A"), not necessarily numeric.
    #[serde(rename = "issue_number", default)]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "dates::flexible_date")]
    pub store_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::flexible_date")]
    pub cover_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::flexible_datetime")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::flexible_datetime")]
    pub date_last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "api_detail_url", default)]
    pub api_url: Option<String>,
    #[serde(rename = "site_detail_url", default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub image: Option<ImageSet>,
    #[serde(default)]
    pub volume: Option<VolumeStub>,
}

impl IssueRecord {
    /// The single date used for all chronological queries: the store (sale)
    /// date when the API has one, otherwise the cover date.
    pub fn canonical_date(&self) -> Option<NaiveDate> {
        self.store_date.or(self.cover_date)
    }
}
