mod common;
use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{MockProvider, setup_db, volume_record};
use diesel::prelude::*;

use comicvine_ingestor::models::volume::VolumeRecord;
use issue_sync::config::SyncConfig;
use issue_sync::schema::{publishers, volumes};
use issue_sync::sync::Synchronizer;

fn sync_over(provider: Arc<MockProvider>) -> Synchronizer {
    Synchronizer::new(provider, SyncConfig::default())
}

#[tokio::test]
async fn fresh_volume_is_served_without_a_remote_call() {
    let (_db, mut conn) = setup_db();
    let provider = Arc::new(MockProvider::default());
    provider.stage_volume(volume_record(10, "Saga"));
    let sync = sync_over(provider.clone());

    let first = sync.get_volume(&mut conn, 10, false).await.unwrap();
    assert_eq!(first.name, "Saga");
    assert_eq!(first.publisher_id, Some(31));
    assert!(!first.fetch_failed);

    let second = sync.get_volume(&mut conn, 10, false).await.unwrap();
    assert_eq!(second.cache_expires, first.cache_expires);

    // Exactly one remote call despite two invocations.
    assert_eq!(provider.volume_fetch_count(10), 1);
}

#[tokio::test]
async fn success_creates_the_publisher_row() {
    let (_db, mut conn) = setup_db();
    let provider = Arc::new(MockProvider::default());
    provider.stage_volume(volume_record(10, "Saga"));
    let sync = sync_over(provider);

    sync.get_volume(&mut conn, 10, false).await.unwrap();

    let name: String = publishers::table
        .find(31_i64)
        .select(publishers::name)
        .first(&mut conn)
        .unwrap();
    assert_eq!(name, "Marvel");
}

#[tokio::test]
async fn failure_creates_a_synthetic_placeholder() {
    let (_db, mut conn) = setup_db();
    let provider = Arc::new(MockProvider::default());
    provider.stage_volume_failure(7);
    let sync = sync_over(provider);

    let volume = sync.get_volume(&mut conn, 7, false).await.unwrap();
    assert_eq!(volume.name, "Volume 7");
    assert!(volume.fetch_failed);
    assert_eq!(volume.fetch_failure_count, 1);
    assert!(volume.last_failure.is_some());
    assert_eq!(volume.publisher_id, None);
}

#[tokio::test]
async fn backoff_is_respected_after_a_failure() {
    let (_db, mut conn) = setup_db();
    let provider = Arc::new(MockProvider::default());
    provider.stage_volume_failure(7);
    let sync = sync_over(provider.clone());

    let failed = sync.get_volume(&mut conn, 7, false).await.unwrap();
    assert_eq!(provider.volume_fetch_count(7), 1);

    // Within the backoff window: zero remote calls, record returned as-is.
    let again = sync.get_volume(&mut conn, 7, false).await.unwrap();
    assert_eq!(provider.volume_fetch_count(7), 1);
    assert_eq!(again.fetch_failure_count, failed.fetch_failure_count);
    assert_eq!(again.last_failure, failed.last_failure);
}

#[tokio::test]
async fn recording_a_failure_does_not_reset_cache_expires() {
    let (_db, mut conn) = setup_db();
    let provider = Arc::new(MockProvider::default());
    provider.stage_volume(volume_record(10, "Saga"));
    let sync = sync_over(provider.clone());

    let fresh = sync.get_volume(&mut conn, 10, false).await.unwrap();

    // Force a refresh that fails; the TTL boundary must survive the failure.
    provider.stage_volume_failure(10);
    let failed = sync.get_volume(&mut conn, 10, true).await.unwrap();

    assert!(failed.fetch_failed);
    assert_eq!(failed.fetch_failure_count, 1);
    assert_eq!(failed.cache_expires, fresh.cache_expires);
    assert_eq!(failed.name, "Saga");
}

#[tokio::test]
async fn retry_after_backoff_resets_failure_state() {
    let (_db, mut conn) = setup_db();
    let provider = Arc::new(MockProvider::default());
    provider.stage_volume_failure(7);
    let sync = sync_over(provider.clone());

    sync.get_volume(&mut conn, 7, false).await.unwrap();

    // Age the failure past the one-hour backoff window.
    let two_hours_ago = Utc::now().naive_utc() - Duration::hours(2);
    diesel::update(volumes::table.find(7_i64))
        .set(volumes::last_failure.eq(two_hours_ago))
        .execute(&mut conn)
        .unwrap();

    provider.clear_volume_failure(7);
    provider.stage_volume(volume_record(7, "Monstress"));

    let recovered = sync.get_volume(&mut conn, 7, false).await.unwrap();
    assert_eq!(provider.volume_fetch_count(7), 2);
    assert_eq!(recovered.name, "Monstress");
    assert!(!recovered.fetch_failed);
    assert_eq!(recovered.fetch_failure_count, 0);
    assert_eq!(recovered.last_failure, None);
    assert_eq!(recovered.publisher_id, Some(31));
}

#[tokio::test]
async fn payload_without_publisher_is_recorded_as_failure() {
    let (_db, mut conn) = setup_db();
    let provider = Arc::new(MockProvider::default());
    provider.stage_volume(VolumeRecord {
        publisher: None,
        ..volume_record(10, "Orphan")
    });
    let sync = sync_over(provider);

    let volume = sync.get_volume(&mut conn, 10, false).await.unwrap();
    assert!(volume.fetch_failed);
    assert_eq!(volume.publisher_id, None);
    assert_eq!(volume.name, "Volume 10");
}
