use crate::models::{FavoriteEntry, MovieSummary};
use crate::storage::{self, KeyValueStore};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

pub const FAVORITES_KEY: &str = "movie-explorer-favorites";

/// Ordered favorites list mirrored to a [`KeyValueStore`].
///
/// Entries are unique by movie id and kept in insertion order. Storage
/// failures are logged and never surfaced; the in-memory list stays usable.
#[derive(Debug)]
pub struct Favorites<S: KeyValueStore> {
    store: S,
    entries: Vec<FavoriteEntry>,
}

impl<S: KeyValueStore> Favorites<S> {
    /// Creates the manager and loads whatever the store holds.
    pub fn new(store: S) -> Self {
        let mut favorites = Self {
            store,
            entries: Vec::new(),
        };
        favorites.load();
        favorites
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    pub fn add(&mut self, movie: &MovieSummary) {
        if self.is_favorite(&movie.id) {
            debug!("'{}' already in favorites", movie.id);
            return;
        }

        info!("Adding '{}' ({}) to favorites", movie.title, movie.id);
        self.entries.push(FavoriteEntry::new(movie.clone()));
        self.save();
    }

    pub fn remove(&mut self, id: &str) {
        let Some(index) = self.entries.iter().position(|entry| entry.id() == id) else {
            debug!("'{}' not in favorites", id);
            return;
        };

        info!("Removing '{}' from favorites", id);
        self.entries.remove(index);
        self.save();
    }

    /// Adds the movie when absent, removes it when present.
    pub fn toggle(&mut self, movie: &MovieSummary) {
        if self.is_favorite(&movie.id) {
            self.remove(&movie.id);
        } else {
            self.add(movie);
        }
    }

    /// Replaces the in-memory list with the stored one.
    ///
    /// Missing or unreadable data leaves the current list untouched.
    pub fn load(&mut self) {
        match storage::read_json::<Vec<FavoriteEntry>, _>(&self.store, FAVORITES_KEY) {
            Ok(Some(entries)) => {
                self.entries = dedupe(entries);
                debug!("Loaded {} favorites", self.entries.len());
            }
            Ok(None) => debug!("No stored favorites"),
            Err(e) => error!("Failed to load favorites: {}", e),
        }
    }

    pub fn save(&mut self) {
        if let Err(e) = storage::write_json(&mut self.store, FAVORITES_KEY, &self.entries) {
            error!("Failed to save favorites: {}", e);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn dedupe(entries: Vec<FavoriteEntry>) -> Vec<FavoriteEntry> {
    let mut seen = HashSet::new();
    let before = entries.len();
    let unique: Vec<_> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.movie.id.clone()))
        .collect();

    if unique.len() != before {
        warn!("Dropped {} duplicate stored favorites", before - unique.len());
    }
    unique
}
