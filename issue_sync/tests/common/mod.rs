#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use tempfile::TempDir;

use comicvine_ingestor::{
    models::{
        issue::{IssueRecord, VolumeStub},
        query::{IssueFilter, IssuesQuery, VolumesQuery},
        volume::{PublisherRecord, VolumeRecord},
    },
    providers::{MetadataProvider, ProviderError},
};
use issue_sync::db::{connection, migrate};
use issue_sync::sync::budget::Budget;

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

/// One recorded provider interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetVolume(i64),
    ListIssues { key: String, page: u32 },
}

/// Scripted in-memory provider. Responses are staged per volume id or per
/// (filter, page); everything else returns an "Object Not Found" service
/// error. Every interaction is recorded for call-count assertions.
#[derive(Default)]
pub struct MockProvider {
    volumes: Mutex<HashMap<i64, VolumeRecord>>,
    failing_volumes: Mutex<HashSet<i64>>,
    issue_pages: Mutex<HashMap<(String, u32), Vec<IssueRecord>>>,
    failing_pages: Mutex<HashSet<(String, u32)>>,
    calls: Mutex<Vec<Call>>,
}

/// Filter key for a volume's issue listing.
pub fn volume_key(volume_id: i64) -> String {
    format!("volume:{volume_id}")
}

/// Filter key for a store-date issue listing.
pub fn day_key(date: NaiveDate) -> String {
    format!("store_date:{date}")
}

impl MockProvider {
    pub fn stage_volume(&self, record: VolumeRecord) {
        self.volumes.lock().unwrap().insert(record.id, record);
    }

    pub fn stage_volume_failure(&self, volume_id: i64) {
        self.failing_volumes.lock().unwrap().insert(volume_id);
    }

    pub fn clear_volume_failure(&self, volume_id: i64) {
        self.failing_volumes.lock().unwrap().remove(&volume_id);
    }

    /// Stages one page (1-based) of an issue listing for a filter key.
    pub fn stage_issue_page(&self, key: &str, page: u32, records: Vec<IssueRecord>) {
        self.issue_pages
            .lock()
            .unwrap()
            .insert((key.to_string(), page), records);
    }

    pub fn stage_page_failure(&self, key: &str, page: u32) {
        self.failing_pages
            .lock()
            .unwrap()
            .insert((key.to_string(), page));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn volume_fetch_count(&self, volume_id: i64) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == Call::GetVolume(volume_id))
            .count()
    }

    pub fn list_call_count(&self, key: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListIssues { key: k, .. } if k == key))
            .count()
    }

    pub fn total_list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListIssues { .. }))
            .count()
    }
}

fn service_error(message: &str) -> ProviderError {
    ProviderError::Service {
        status: 420,
        message: message.to_string(),
    }
}

#[async_trait]
impl MetadataProvider for MockProvider {
    async fn get_volume(&self, volume_id: i64) -> Result<VolumeRecord, ProviderError> {
        self.calls.lock().unwrap().push(Call::GetVolume(volume_id));

        if self.failing_volumes.lock().unwrap().contains(&volume_id) {
            return Err(service_error("scripted volume failure"));
        }
        self.volumes
            .lock()
            .unwrap()
            .get(&volume_id)
            .cloned()
            .ok_or_else(|| ProviderError::Service {
                status: 101,
                message: "Object Not Found".to_string(),
            })
    }

    async fn list_issues(&self, query: &IssuesQuery) -> Result<Vec<IssueRecord>, ProviderError> {
        let key = match query.filter {
            IssueFilter::Volume(id) => volume_key(id),
            IssueFilter::StoreDate(date) => day_key(date),
        };
        let page = query.offset / query.page_size + 1;
        self.calls.lock().unwrap().push(Call::ListIssues {
            key: key.clone(),
            page,
        });

        if self.failing_pages.lock().unwrap().contains(&(key.clone(), page)) {
            return Err(service_error("scripted page failure"));
        }
        Ok(self
            .issue_pages
            .lock()
            .unwrap()
            .get(&(key, page))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_volumes(&self, _query: &VolumesQuery) -> Result<Vec<VolumeRecord>, ProviderError> {
        Ok(vec![])
    }
}

/// Budget that allows a fixed number of checks, then reports exhaustion.
/// Each check corresponds to one would-be day-page fetch.
pub struct CountingBudget {
    pub checks_allowed: usize,
}

impl Budget for CountingBudget {
    fn exhausted(&mut self) -> bool {
        if self.checks_allowed == 0 {
            return true;
        }
        self.checks_allowed -= 1;
        false
    }
}

/// A volume record with a publisher, as a successful fetch would return.
pub fn volume_record(id: i64, name: &str) -> VolumeRecord {
    VolumeRecord {
        id,
        name: Some(name.to_string()),
        start_year: Some(2020),
        count_of_issues: 0,
        publisher: Some(PublisherRecord {
            id: 31,
            name: Some("Marvel".to_string()),
        }),
    }
}

/// A minimal issue record belonging to `volume_id`.
pub fn issue_record(id: i64, volume_id: i64, store_date: Option<NaiveDate>) -> IssueRecord {
    IssueRecord {
        id,
        name: None,
        number: Some(id.to_string()),
        store_date,
        cover_date: None,
        date_added: None,
        date_last_updated: None,
        description: None,
        api_url: None,
        site_url: None,
        image: None,
        volume: Some(VolumeStub {
            id: volume_id,
            name: None,
        }),
    }
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
