//! Provider abstraction for comic metadata sources.
//!
//! This module defines the [`MetadataProvider`] trait, a unified interface
//! for fetching volume and issue metadata from any comics catalog vendor.
//! The one concrete implementation is [`comicvine_rest::ComicVineProvider`];
//! test suites substitute their own mocks behind the same trait.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn MetadataProvider`) so the synchronizer can be handed a provider at
//! runtime.

pub mod comicvine_rest;
pub mod errors;

pub use errors::{ProviderError, ProviderInitError};

use async_trait::async_trait;

use crate::models::{
    issue::IssueRecord,
    query::{IssuesQuery, VolumesQuery},
    volume::VolumeRecord,
};

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetches a single volume by its catalog id.
    async fn get_volume(&self, volume_id: i64) -> Result<VolumeRecord, ProviderError>;

    /// Fetches one page of issues matching the query, sorted by store date
    /// ascending. Returns at most `query.page_size` records.
    async fn list_issues(&self, query: &IssuesQuery) -> Result<Vec<IssueRecord>, ProviderError>;

    /// Searches volumes by name, sorted by descending issue count.
    async fn list_volumes(&self, query: &VolumesQuery) -> Result<Vec<VolumeRecord>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ComicVine;
    struct OtherCatalog;

    #[async_trait]
    impl MetadataProvider for ComicVine {
        async fn get_volume(&self, volume_id: i64) -> Result<VolumeRecord, ProviderError> {
            Err(ProviderError::Service {
                status: 101,
                message: format!("no volume {volume_id}"),
            })
        }
        async fn list_issues(&self, _query: &IssuesQuery) -> Result<Vec<IssueRecord>, ProviderError> {
            Ok(vec![])
        }
        async fn list_volumes(
            &self,
            _query: &VolumesQuery,
        ) -> Result<Vec<VolumeRecord>, ProviderError> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl MetadataProvider for OtherCatalog {
        async fn get_volume(&self, _volume_id: i64) -> Result<VolumeRecord, ProviderError> {
            Err(ProviderError::Service {
                status: 1,
                message: "unsupported".into(),
            })
        }
        async fn list_issues(&self, _query: &IssuesQuery) -> Result<Vec<IssueRecord>, ProviderError> {
            Ok(vec![])
        }
        async fn list_volumes(
            &self,
            _query: &VolumesQuery,
        ) -> Result<Vec<VolumeRecord>, ProviderError> {
            Ok(vec![])
        }
    }

    // Runtime provider selection only works through `Box<dyn MetadataProvider>`.
    fn get_provider(name: &str) -> Box<dyn MetadataProvider> {
        if name == "comicvine" {
            Box::new(ComicVine)
        } else {
            Box::new(OtherCatalog)
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let provider = get_provider("comicvine");

        let query = IssuesQuery::page(crate::models::query::IssueFilter::Volume(18436), 1, 100);
        let result = provider.list_issues(&query).await;
        assert!(result.is_ok());
    }
}
