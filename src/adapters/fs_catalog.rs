//! Filesystem content discovery adapter.
//!
//! Implements [`CatalogPort`] over a music folder laid out as one
//! sub-directory per genre:
//!
//! ```text
//! <root>/
//!   rock/   Alpha.mp3  Beta.MP3  notes.txt
//!   jazz/   Blue.mp3
//! ```
//!
//! Genres are the sub-directory names, capitalised and sorted.  A genre
//! resolves to the sub-directory whose name matches case-insensitively.
//! Tracks are the files with a configured audio extension, titled by
//! file stem and sorted by title; the locator is the file path.
//!
//! I/O failures are logged and degrade to an empty listing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::app::ports::{CatalogPort, Track};
use crate::config::ControllerConfig;

pub struct MusicFolderCatalog {
    root: PathBuf,
    extensions: Vec<String>,
}

impl MusicFolderCatalog {
    /// Catalog over `root` that accepts `.mp3` files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extensions(root, &["mp3"])
    }

    /// Catalog over `root` accepting the given extensions (no dot,
    /// compared case-insensitively).
    pub fn with_extensions<S: AsRef<str>>(root: impl Into<PathBuf>, extensions: &[S]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Catalog over `root` accepting `config.audio_extensions`.
    pub fn from_config(root: impl Into<PathBuf>, config: &ControllerConfig) -> Self {
        Self::with_extensions(root, &config.audio_extensions)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn genre_dirs(&self) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("reading music folder {}", self.root.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("listing {}", self.root.display()))?
                .path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        Ok(dirs)
    }

    fn find_genre_dir(&self, genre: &str) -> Result<Option<PathBuf>> {
        Ok(self.genre_dirs()?.into_iter().find(|dir| {
            dir.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.eq_ignore_ascii_case(genre))
        }))
    }

    fn is_audio(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
    }

    fn scan_genres(&self) -> Result<Vec<String>> {
        let mut genres: Vec<String> = self
            .genre_dirs()?
            .iter()
            .filter_map(|dir| dir.file_name()?.to_str().map(capitalize))
            .collect();
        genres.sort();
        genres.dedup();
        Ok(genres)
    }

    fn scan_tracks(&self, genre: &str) -> Result<Vec<Track>> {
        let Some(dir) = self.find_genre_dir(genre)? else {
            debug!("MusicFolderCatalog: no folder for genre {}", genre);
            return Ok(Vec::new());
        };

        let mut tracks = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry
                .with_context(|| format!("listing {}", dir.display()))?
                .path();
            if !path.is_file() || !self.is_audio(&path) {
                continue;
            }
            let Some(title) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!("MusicFolderCatalog: skipping non-UTF-8 name {}", path.display());
                continue;
            };
            tracks.push(Track::new(title, path.to_string_lossy()));
        }
        tracks.sort_by(|a, b| a.title.cmp(&b.title));
        debug!("MusicFolderCatalog: {} tracks in {}", tracks.len(), dir.display());
        Ok(tracks)
    }
}

impl CatalogPort for MusicFolderCatalog {
    fn list_genres(&self) -> Vec<String> {
        self.scan_genres().unwrap_or_else(|e| {
            warn!("MusicFolderCatalog: {:#}", e);
            Vec::new()
        })
    }

    fn list_tracks(&self, genre: &str) -> Vec<Track> {
        self.scan_tracks(genre).unwrap_or_else(|e| {
            warn!("MusicFolderCatalog: {:#}", e);
            Vec::new()
        })
    }
}

/// `"rEGGAETON"` → `"Reggaeton"`.
fn capitalize(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
