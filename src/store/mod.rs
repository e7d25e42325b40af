/// Client-side stores module
mod detail;
mod list;
#[cfg(test)]
pub(crate) mod testing;

pub use detail::{DetailState, ImageState, PlanetDetailStore};
pub use list::{ListState, PlanetListStore};

use crate::clients::BackendClient;
use crate::config::{ResponsePolicy, SyncConfig};
use crate::domain::{ListQuery, ListResponse, PlanetDetail, PlanetImage};
use crate::errors::FetchResult;
use crate::repo::LocalStorage;
use crate::sync::{Location, UrlSync};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The three query interfaces the stores consume.
///
/// Failures never escape a store: they become an `error` string next to an
/// emptied data field.
#[async_trait]
pub trait PlanetApi: Send + Sync {
    async fn list_planets(&self, query: &ListQuery) -> FetchResult<ListResponse>;
    async fn planet_detail(&self, id: &str) -> FetchResult<PlanetDetail>;
    async fn planet_image(&self, id: &str) -> FetchResult<PlanetImage>;
}

/// Lifecycle of one fetch channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl LoadStatus {
    pub fn is_loading(self) -> bool {
        self == LoadStatus::Loading
    }
}

/// Numbers outgoing requests and decides whether a late response may be applied
#[derive(Debug)]
pub struct RequestSequencer {
    policy: ResponsePolicy,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RequestSequencer {
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            policy,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record `seq` as resolved; `false` means the response must be dropped
    pub fn accept(&self, seq: u64) -> bool {
        let previous = self.applied.fetch_max(seq, Ordering::SeqCst);
        match self.policy {
            ResponsePolicy::LastResolvedWins => true,
            ResponsePolicy::LatestIssuedWins => seq > previous,
        }
    }

    /// Whether a newer request than `seq` has been issued
    pub fn is_superseded(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) > seq
    }
}

/// Both stores sharing one API client and one storage file
pub struct Stores {
    pub list: Arc<PlanetListStore>,
    pub detail: Arc<PlanetDetailStore>,
    debounce: std::time::Duration,
}

impl Stores {
    /// Wire the stores to the HTTP API at `config.api_base_url`
    pub fn connect(config: &SyncConfig) -> FetchResult<Self> {
        let api = BackendClient::new(config.api_base_url.clone(), config.request_timeout)?;
        Ok(Self::with_api(Arc::new(api), config))
    }

    /// Wire the stores from `API_BASE_URL`, `STORAGE_PATH` and the other client variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = SyncConfig::from_env()?;
        Ok(Self::connect(&config)?)
    }

    pub fn with_api(api: Arc<dyn PlanetApi>, config: &SyncConfig) -> Self {
        let storage = config
            .storage_path
            .as_ref()
            .map(|path| Arc::new(LocalStorage::open(path)));

        Self {
            list: Arc::new(PlanetListStore::new(api.clone(), config, storage.clone())),
            detail: Arc::new(PlanetDetailStore::new(api, config, storage)),
            debounce: config.debounce,
        }
    }

    /// URL binding for the list store; call `mount` on it once
    pub fn url_sync(&self, location: Arc<dyn Location>) -> UrlSync {
        UrlSync::new(self.list.clone(), location, self.debounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::MemoryLocation;
    use testing::FixtureApi;

    #[tokio::test]
    async fn test_stores_share_one_storage_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig {
            storage_path: Some(dir.path().join("planets.json")),
            ..SyncConfig::default()
        };
        let api = Arc::new(FixtureApi::new());

        let stores = Stores::with_api(api.clone(), &config);
        stores.detail.toggle_favorite("jupiter");
        stores.list.set_search_term("ur");

        let revived = Stores::with_api(api, &config);
        assert!(revived.detail.is_favorite("jupiter"));
        assert_eq!(revived.list.state().search_term, "ur");
    }

    #[tokio::test]
    async fn test_url_sync_drives_the_shared_list_store() {
        let stores = Stores::with_api(Arc::new(FixtureApi::new()), &SyncConfig::default());
        let sync = stores.url_sync(Arc::new(MemoryLocation::new("order=desc")));
        sync.mount().await;
        assert_eq!(stores.list.state().order, crate::domain::SortOrder::Desc);
        assert_eq!(stores.list.state().planets.len(), 5);
    }

    #[test]
    fn test_connect_builds_http_backed_stores() {
        let stores = Stores::connect(&SyncConfig::default()).unwrap();
        assert!(stores.detail.favorites().is_empty());
    }

    #[test]
    fn test_last_resolved_accepts_everything() {
        let seq = RequestSequencer::new(ResponsePolicy::LastResolvedWins);
        let first = seq.issue();
        let second = seq.issue();
        assert!(seq.accept(second));
        assert!(seq.accept(first));
    }

    #[test]
    fn test_latest_issued_drops_older_responses() {
        let seq = RequestSequencer::new(ResponsePolicy::LatestIssuedWins);
        let first = seq.issue();
        let second = seq.issue();
        assert!(seq.accept(second));
        assert!(!seq.accept(first));
        assert!(seq.is_superseded(first));
        assert!(!seq.is_superseded(second));
    }

    #[test]
    fn test_latest_issued_in_order_responses_apply() {
        let seq = RequestSequencer::new(ResponsePolicy::LatestIssuedWins);
        let first = seq.issue();
        assert!(seq.accept(first));
        let second = seq.issue();
        assert!(seq.accept(second));
    }
}
