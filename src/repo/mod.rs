/// Durable local storage for the client stores
use crate::domain::{Pagination, SortOrder};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const LIST_STORAGE_KEY: &str = "planets-navigation-storage";
pub const DETAIL_STORAGE_KEY: &str = "planet-detail-storage";

/// Key/value JSON storage, optionally backed by a file.
///
/// Reads never fail: a missing, unreadable or corrupt entry is treated as absent.
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: Mutex<Map<String, Value>>,
}

impl LocalStorage {
    /// Storage that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(Map::new()),
        }
    }

    /// Open (or lazily create) a JSON file
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt storage file {:?}: {}", path, e);
                Map::new()
            }),
            Err(_) => Map::new(),
        };
        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries().get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Discarding unreadable storage entry {}: {}", key, e);
                None
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries();
        entries.insert(key.to_string(), value);

        if let Some(path) = &self.path {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create storage directory {:?}", dir))?;
            }
            // Stage then rename; the target file is never partially written
            let raw = serde_json::to_string_pretty(&*entries)?;
            let staging = staging_path(path);
            std::fs::write(&staging, raw)
                .with_context(|| format!("Failed to write storage file {:?}", staging))?;
            std::fs::rename(&staging, path)
                .with_context(|| format!("Failed to replace storage file {:?}", path))?;
        }
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Pagination fields that survive a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub items_per_page: u32,
}

/// Persisted subset of the list store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    pub pagination: PersistedPagination,
    pub search_term: String,
    pub order: SortOrder,
    pub realtime: bool,
}

/// Persisted subset of the detail store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesSnapshot {
    pub favorites: Vec<String>,
}

/// Rebuild pagination from its persisted fields; the rest is re-derived
pub fn rehydrate_pagination(persisted: PersistedPagination) -> Pagination {
    let current_page = persisted.current_page.max(1);
    let total_pages = persisted.total_pages.max(1);
    Pagination {
        current_page,
        total_pages,
        has_more: current_page < total_pages,
        total_items: 0,
        items_per_page: persisted.items_per_page.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_round_trip() {
        let storage = LocalStorage::in_memory();
        let snapshot = FavoritesSnapshot {
            favorites: vec!["marte".into()],
        };
        storage.save(DETAIL_STORAGE_KEY, &snapshot).unwrap();
        assert_eq!(storage.load(DETAIL_STORAGE_KEY), Some(snapshot));
        assert_eq!(storage.load::<FavoritesSnapshot>("missing"), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let storage = LocalStorage::open(&path);
        storage
            .save(
                DETAIL_STORAGE_KEY,
                &FavoritesSnapshot {
                    favorites: vec!["tierra".into(), "saturno".into()],
                },
            )
            .unwrap();

        let reopened = LocalStorage::open(&path);
        let loaded: FavoritesSnapshot = reopened.load(DETAIL_STORAGE_KEY).unwrap();
        assert_eq!(loaded.favorites, vec!["tierra", "saturno"]);
    }

    #[test]
    fn test_save_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let storage = LocalStorage::open(&path);
        storage
            .save(DETAIL_STORAGE_KEY, &FavoritesSnapshot::default())
            .unwrap();

        assert!(path.exists());
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_interrupted_write_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let storage = LocalStorage::open(&path);
        storage
            .save(
                DETAIL_STORAGE_KEY,
                &FavoritesSnapshot {
                    favorites: vec!["marte".into()],
                },
            )
            .unwrap();
        // a crash mid-write only ever leaves a torn staging file behind
        std::fs::write(staging_path(&path), "{ \"planet-detail-sto").unwrap();

        let reopened = LocalStorage::open(&path);
        let loaded: FavoritesSnapshot = reopened.load(DETAIL_STORAGE_KEY).unwrap();
        assert_eq!(loaded.favorites, vec!["marte"]);

        reopened
            .save(
                DETAIL_STORAGE_KEY,
                &FavoritesSnapshot {
                    favorites: vec!["marte".into(), "venus".into()],
                },
            )
            .unwrap();
        let again = LocalStorage::open(&path);
        let again: FavoritesSnapshot = again.load(DETAIL_STORAGE_KEY).unwrap();
        assert_eq!(again.favorites, vec!["marte", "venus"]);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let storage = LocalStorage::open(&path);
        assert_eq!(storage.load::<FavoritesSnapshot>(DETAIL_STORAGE_KEY), None);
    }

    #[test]
    fn test_wrong_shape_is_discarded() {
        let storage = LocalStorage::in_memory();
        storage.save(LIST_STORAGE_KEY, &"just a string").unwrap();
        assert_eq!(storage.load::<ListSnapshot>(LIST_STORAGE_KEY), None);
    }

    #[test]
    fn test_rehydrate_pagination_derives_has_more() {
        let p = rehydrate_pagination(PersistedPagination {
            current_page: 1,
            total_pages: 2,
            items_per_page: 5,
        });
        assert!(p.has_more);
        assert_eq!(p.total_items, 0);

        let p = rehydrate_pagination(PersistedPagination {
            current_page: 0,
            total_pages: 0,
            items_per_page: 0,
        });
        assert_eq!((p.current_page, p.total_pages, p.items_per_page), (1, 1, 1));
    }
}
