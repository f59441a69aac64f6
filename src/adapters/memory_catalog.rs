//! In-memory content discovery adapter.
//!
//! A fixed genre → tracks table, for hosts that already know their
//! library and for tests.  Genres are matched exactly.

use crate::app::ports::{CatalogPort, Track};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    genres: Vec<(String, Vec<Track>)>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a genre.  Insertion order is presentation order.
    pub fn with_genre(mut self, genre: impl Into<String>, tracks: Vec<Track>) -> Self {
        self.insert(genre, tracks);
        self
    }

    /// Convenience: a genre whose locators are `<genre>/<title>`.
    pub fn with_titles(self, genre: &str, titles: &[&str]) -> Self {
        let tracks = titles
            .iter()
            .map(|t| Track::new(*t, format!("{genre}/{t}")))
            .collect();
        self.with_genre(genre, tracks)
    }

    pub fn insert(&mut self, genre: impl Into<String>, tracks: Vec<Track>) {
        let genre = genre.into();
        match self.genres.iter_mut().find(|(g, _)| *g == genre) {
            Some((_, existing)) => *existing = tracks,
            None => self.genres.push((genre, tracks)),
        }
    }

    pub fn remove(&mut self, genre: &str) -> Option<Vec<Track>> {
        let pos = self.genres.iter().position(|(g, _)| g == genre)?;
        Some(self.genres.remove(pos).1)
    }
}

impl CatalogPort for InMemoryCatalog {
    fn list_genres(&self) -> Vec<String> {
        self.genres.iter().map(|(g, _)| g.clone()).collect()
    }

    fn list_tracks(&self, genre: &str) -> Vec<Track> {
        self.genres
            .iter()
            .find(|(g, _)| g == genre)
            .map(|(_, t)| t.clone())
            .unwrap_or_default()
    }
}
