/// URL synchronization module
use crate::debounce::{debounce, Debouncer};
use crate::domain::{ListQuery, SortOrder};
use crate::store::PlanetListStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use url::form_urlencoded;

/// Address bar abstraction
pub trait Location: Send + Sync {
    /// Current query string, without the leading `?`
    fn query(&self) -> String;
    /// Replace the query string in place (no new history entry)
    fn replace_query(&self, query: &str);
}

/// In-process [`Location`] that remembers every rewrite
#[derive(Debug, Default)]
pub struct MemoryLocation {
    history: Mutex<Vec<String>>,
}

impl MemoryLocation {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![initial.into()]),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> String {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn replace_query(&self, query: &str) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());
    }
}

/// The `search`, `order` and `page` query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParams {
    pub search: String,
    pub order: SortOrder,
    pub page: u32,
}

impl Default for UrlParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            order: SortOrder::Asc,
            page: 1,
        }
    }
}

impl UrlParams {
    /// Lenient parse; unknown keys are ignored and bad values fall back to defaults
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" => params.search = value.into_owned(),
                "order" => params.order = value.parse().unwrap_or_default(),
                "page" => params.page = value.parse::<u32>().unwrap_or(1).max(1),
                _ => {}
            }
        }
        params
    }

    /// Serialize, omitting `page=1` and an empty search
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            out.append_pair("search", &self.search);
        }
        out.append_pair("order", self.order.as_str());
        if self.page != 1 {
            out.append_pair("page", &self.page.to_string());
        }
        out.finish()
    }
}

impl From<&ListQuery> for UrlParams {
    fn from(query: &ListQuery) -> Self {
        Self {
            search: query.name.clone(),
            order: query.order,
            page: query.page.max(1),
        }
    }
}

/// Two-way binding between the list store and the address bar query string.
///
/// The URL is read once, on mount, to seed the store. From then on every
/// state the store applies is written back to the URL, and search input goes
/// through a debouncer before it reaches the store.
pub struct UrlSync {
    store: Arc<PlanetListStore>,
    location: Arc<dyn Location>,
    delay: Duration,
    initialized: AtomicBool,
    search: Mutex<Option<Debouncer<String>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl UrlSync {
    pub fn new(store: Arc<PlanetListStore>, location: Arc<dyn Location>, delay: Duration) -> Self {
        Self {
            store,
            location,
            delay,
            initialized: AtomicBool::new(false),
            search: Mutex::new(None),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Arc<PlanetListStore> {
        &self.store
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Seed the store from the URL and run the initial fetch.
    ///
    /// Only the first call does anything.
    pub async fn mount(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("url sync already mounted");
            return;
        }

        let params = UrlParams::parse(&self.location.query());
        info!(
            "mounting list view: search={:?} order={} page={}",
            params.search, params.order, params.page
        );
        self.store.seed(params.search.clone(), params.order, params.page);
        let initial = ListQuery {
            page: params.page,
            name: params.search.clone(),
            order: params.order,
            realtime: self.store.state().realtime,
        };
        self.store.fetch_list(initial).await;

        // Subscribing now marks the initial load as seen
        let mut applied = self.store.watch_applied();
        let location = self.location.clone();
        let writer = tokio::spawn(async move {
            while applied.changed().await.is_ok() {
                let params = UrlParams::from(&*applied.borrow_and_update());
                location.replace_query(&params.to_query_string());
            }
        });

        let (debouncer, mut settled) = debounce::<String>(self.delay);
        let store = self.store.clone();
        let mut last_applied = params.search;
        let searcher = tokio::spawn(async move {
            while let Some(term) = settled.recv().await {
                if term == last_applied {
                    continue;
                }
                last_applied = term.clone();
                let state = store.state();
                store
                    .fetch_list(ListQuery {
                        page: 1,
                        name: term,
                        order: state.order,
                        realtime: state.realtime,
                    })
                    .await;
            }
        });

        *self.search.lock().unwrap_or_else(PoisonError::into_inner) = Some(debouncer);
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend([writer, searcher]);
    }

    /// Record a keystroke; the fetch happens once input settles
    pub fn search_input(&self, term: impl Into<String>) {
        let term = term.into();
        self.store.set_search_term(term.clone());
        if let Some(debouncer) = &*self.search.lock().unwrap_or_else(PoisonError::into_inner) {
            debouncer.push(term);
        }
    }
}

impl Drop for UrlSync {
    fn drop(&mut self) {
        for task in self
            .tasks
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
        {
            task.abort();
        }
    }
}
