use super::{LoadStatus, PlanetApi, RequestSequencer};
use crate::config::SyncConfig;
use crate::domain::PlanetDetail;
use crate::repo::{FavoritesSnapshot, LocalStorage, DETAIL_STORAGE_KEY};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Data channel of the detail view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub planet: Option<PlanetDetail>,
    pub error: Option<String>,
    pub status: LoadStatus,
}

/// Image channel of the detail view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageState {
    pub url: Option<String>,
    pub error: Option<String>,
    pub status: LoadStatus,
}

/// Single-planet detail, its image and the favorites set.
///
/// The data and image channels load independently: a failure in one leaves
/// the other untouched. Favorites are persisted and survive [`reset`].
///
/// [`reset`]: PlanetDetailStore::reset
pub struct PlanetDetailStore {
    api: Arc<dyn PlanetApi>,
    detail: Mutex<DetailState>,
    image: Mutex<ImageState>,
    favorites: Mutex<BTreeSet<String>>,
    detail_seq: RequestSequencer,
    image_seq: RequestSequencer,
    storage: Option<Arc<LocalStorage>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlanetDetailStore {
    pub fn new(
        api: Arc<dyn PlanetApi>,
        config: &SyncConfig,
        storage: Option<Arc<LocalStorage>>,
    ) -> Self {
        let favorites = storage
            .as_ref()
            .and_then(|s| s.load::<FavoritesSnapshot>(DETAIL_STORAGE_KEY))
            .map(|snapshot| snapshot.favorites.into_iter().collect())
            .unwrap_or_default();

        Self {
            api,
            detail: Mutex::new(DetailState::default()),
            image: Mutex::new(ImageState::default()),
            favorites: Mutex::new(favorites),
            detail_seq: RequestSequencer::new(config.response_policy),
            image_seq: RequestSequencer::new(config.response_policy),
            storage,
        }
    }

    pub fn detail(&self) -> DetailState {
        lock(&self.detail).clone()
    }

    pub fn image(&self) -> ImageState {
        lock(&self.image).clone()
    }

    /// True while either channel is in flight
    pub fn is_loading(&self) -> bool {
        lock(&self.detail).status.is_loading() || lock(&self.image).status.is_loading()
    }

    /// Start both channels for `id` and wait for them to settle
    pub async fn load(&self, id: &str) {
        tokio::join!(self.fetch_planet_data(id), self.fetch_planet_image(id));
    }

    pub async fn fetch_planet_data(&self, id: &str) {
        let seq = self.detail_seq.issue();
        {
            let mut state = lock(&self.detail);
            state.status = LoadStatus::Loading;
            state.error = None;
        }

        let result = self.api.planet_detail(id).await;
        if !self.detail_seq.accept(seq) {
            debug!("dropping stale detail response for {}", id);
            return;
        }

        let mut state = lock(&self.detail);
        match result {
            Ok(planet) => {
                state.planet = Some(planet);
                state.error = None;
                state.status = LoadStatus::Success;
            }
            Err(e) => {
                warn!("Error fetching planet {}: {}", id, e);
                state.planet = None;
                state.error = Some(e.to_string());
                state.status = LoadStatus::Error;
            }
        }
    }

    pub async fn fetch_planet_image(&self, id: &str) {
        let seq = self.image_seq.issue();
        {
            let mut state = lock(&self.image);
            state.status = LoadStatus::Loading;
            state.error = None;
        }

        let result = self.api.planet_image(id).await;
        if !self.image_seq.accept(seq) {
            debug!("dropping stale image response for {}", id);
            return;
        }

        let mut state = lock(&self.image);
        match result {
            Ok(image) => {
                state.url = Some(image.image_url);
                state.error = None;
                state.status = LoadStatus::Success;
            }
            Err(e) => {
                warn!("Error fetching image for {}: {}", id, e);
                state.url = None;
                state.error = Some(e.to_string());
                state.status = LoadStatus::Error;
            }
        }
    }

    /// Flip membership of `id`; returns whether it is now a favorite
    pub fn toggle_favorite(&self, id: &str) -> bool {
        let (now_favorite, snapshot) = {
            let mut favorites = lock(&self.favorites);
            let now_favorite = if favorites.remove(id) {
                false
            } else {
                favorites.insert(id.to_string());
                true
            };
            let snapshot = FavoritesSnapshot {
                favorites: favorites.iter().cloned().collect(),
            };
            (now_favorite, snapshot)
        };

        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(DETAIL_STORAGE_KEY, &snapshot) {
                warn!("Failed to persist favorites: {}", e);
            }
        }
        now_favorite
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        lock(&self.favorites).contains(id)
    }

    pub fn favorites(&self) -> Vec<String> {
        lock(&self.favorites).iter().cloned().collect()
    }

    /// Clear both channels; favorites are kept
    pub fn reset(&self) {
        *lock(&self.detail) = DetailState::default();
        *lock(&self.image) = ImageState::default();
    }
}
