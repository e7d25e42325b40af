use super::{LoadStatus, PlanetApi, RequestSequencer};
use crate::config::SyncConfig;
use crate::domain::{ListQuery, Pagination, PlanetSummary, SortOrder};
use crate::repo::{
    rehydrate_pagination, ListSnapshot, LocalStorage, PersistedPagination, LIST_STORAGE_KEY,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Everything the list view renders
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub planets: Vec<PlanetSummary>,
    pub search_term: String,
    pub pagination: Pagination,
    pub status: LoadStatus,
    pub error: Option<String>,
    pub order: SortOrder,
    pub realtime: bool,
}

impl ListState {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            planets: Vec::new(),
            search_term: String::new(),
            pagination: Pagination::fallback(items_per_page),
            status: LoadStatus::Idle,
            error: None,
            order: SortOrder::Asc,
            realtime: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Project the subset that survives a reload
    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            pagination: PersistedPagination {
                current_page: self.pagination.current_page,
                total_pages: self.pagination.total_pages,
                items_per_page: self.pagination.items_per_page,
            },
            search_term: self.search_term.clone(),
            order: self.order,
            realtime: self.realtime,
        }
    }

    /// Merge a persisted subset into a fresh default state
    pub fn rehydrate(snapshot: ListSnapshot, items_per_page: u32) -> Self {
        let mut state = Self::new(items_per_page);
        state.pagination = rehydrate_pagination(snapshot.pagination);
        state.search_term = snapshot.search_term;
        state.order = snapshot.order;
        state.realtime = snapshot.realtime;
        state
    }
}

/// Paginated, searchable, sortable planet list
pub struct PlanetListStore {
    api: Arc<dyn PlanetApi>,
    state: Mutex<ListState>,
    items_per_page: u32,
    sequencer: RequestSequencer,
    issued: watch::Sender<ListQuery>,
    applied: watch::Sender<ListQuery>,
    storage: Option<Arc<LocalStorage>>,
}

impl PlanetListStore {
    pub fn new(
        api: Arc<dyn PlanetApi>,
        config: &SyncConfig,
        storage: Option<Arc<LocalStorage>>,
    ) -> Self {
        let items_per_page = config.items_per_page.max(1);
        let state = storage
            .as_ref()
            .and_then(|s| s.load::<ListSnapshot>(LIST_STORAGE_KEY))
            .map(|snapshot| ListState::rehydrate(snapshot, items_per_page))
            .unwrap_or_else(|| ListState::new(items_per_page));
        let (issued, _) = watch::channel(ListQuery::default());
        let (applied, _) = watch::channel(ListQuery::default());

        Self {
            api,
            state: Mutex::new(state),
            items_per_page,
            sequencer: RequestSequencer::new(config.response_policy),
            issued,
            applied,
            storage,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ListState {
        self.lock().clone()
    }

    /// Receiver notified with every query this store issues
    pub fn subscribe(&self) -> watch::Receiver<ListQuery> {
        self.issued.subscribe()
    }

    /// Receiver notified each time a response (or failure) is written into
    /// the store. The value describes what the store now shows, so after an
    /// out-of-order resolution it is the older query, not the newest issued.
    pub fn watch_applied(&self) -> watch::Receiver<ListQuery> {
        self.applied.subscribe()
    }

    /// Query matching the current term, order, flag and page
    pub fn current_query(&self) -> ListQuery {
        let state = self.lock();
        ListQuery {
            page: state.pagination.current_page,
            name: state.search_term.clone(),
            order: state.order,
            realtime: state.realtime,
        }
    }

    /// Update the term only; fetching is left to the debounced path
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.lock().search_term = term.into();
        self.persist();
    }

    /// Overwrite term, order and page without fetching
    pub fn seed(&self, term: String, order: SortOrder, page: u32) {
        {
            let mut state = self.lock();
            state.search_term = term;
            state.order = order;
            state.pagination.current_page = page.max(1);
        }
        self.persist();
    }

    /// Change the sort order and reload the first page
    pub async fn set_order(&self, order: SortOrder) {
        let query = {
            let mut state = self.lock();
            state.order = order;
            ListQuery {
                page: 1,
                name: state.search_term.clone(),
                order,
                realtime: state.realtime,
            }
        };
        self.persist();
        self.fetch_list(query).await;
    }

    pub async fn toggle_order(&self) {
        let order = self.lock().order.toggled();
        self.set_order(order).await;
    }

    /// Flip the realtime-distance flag and reload the first page
    pub async fn toggle_realtime(&self) {
        let query = {
            let mut state = self.lock();
            state.realtime = !state.realtime;
            ListQuery {
                page: 1,
                name: state.search_term.clone(),
                order: state.order,
                realtime: state.realtime,
            }
        };
        self.persist();
        self.fetch_list(query).await;
    }

    /// Load the following page; no-op on the last page
    pub async fn next_page(&self) -> bool {
        let query = {
            let state = self.lock();
            if !state.pagination.has_more {
                return false;
            }
            ListQuery {
                page: state.pagination.current_page + 1,
                name: state.search_term.clone(),
                order: state.order,
                realtime: state.realtime,
            }
        };
        self.fetch_list(query).await;
        true
    }

    /// Load the preceding page; no-op on the first page
    pub async fn previous_page(&self) -> bool {
        let query = {
            let state = self.lock();
            if state.pagination.current_page <= 1 {
                return false;
            }
            ListQuery {
                page: state.pagination.current_page - 1,
                name: state.search_term.clone(),
                order: state.order,
                realtime: state.realtime,
            }
        };
        self.fetch_list(query).await;
        true
    }

    /// Issue a list query and write its outcome into the store.
    ///
    /// In-flight requests are never cancelled; whether a late response is
    /// written is up to the configured `ResponsePolicy`.
    pub async fn fetch_list(&self, query: ListQuery) {
        let seq = self.sequencer.issue();
        {
            let mut state = self.lock();
            state.status = LoadStatus::Loading;
            state.error = None;
        }
        self.issued.send_replace(query.clone());
        debug!("list request #{} for page {}", seq, query.page);

        let result = self.api.list_planets(&query).await;

        if !self.sequencer.accept(seq) {
            debug!("dropping stale list response #{}", seq);
            return;
        }
        if self.sequencer.is_superseded(seq) {
            debug!("applying list response #{} over a newer request", seq);
        }

        let shown = {
            let mut state = self.lock();
            match result {
                Ok(mut resp) => {
                    resp.data.truncate(resp.pagination.items_per_page.max(1) as usize);
                    state.planets = resp.data;
                    state.pagination = resp.pagination;
                    state.error = None;
                    state.status = LoadStatus::Success;
                }
                Err(e) => {
                    warn!("Error fetching planets: {}", e);
                    state.planets.clear();
                    state.pagination = Pagination::fallback(self.items_per_page);
                    state.error = Some(e.to_string());
                    state.status = LoadStatus::Error;
                }
            }
            ListQuery {
                page: state.pagination.current_page,
                ..query
            }
        };
        self.applied.send_replace(shown);
        self.persist();
    }

    /// Back to defaults, including the persisted subset
    pub fn reset(&self) {
        *self.lock() = ListState::new(self.items_per_page);
        self.persist();
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let snapshot = self.lock().snapshot();
        if let Err(e) = storage.save(LIST_STORAGE_KEY, &snapshot) {
            warn!("Failed to persist list state: {}", e);
        }
    }
}
