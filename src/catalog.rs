//! The hymn catalog: an ordered, read-only collection of songs with an index
//! by number. It is built once at startup from a JSON fixture and never
//! mutated afterwards, so lookups hand out plain shared references.
//!
//! Misses are ordinary results here. `by_number` and `adjacent` return `None`
//! and `search` yields nothing; only a broken source is an error.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Direction, Song};

/// Catalog shipped with the binary.
const BUNDLED_CATALOG: &str = include_str!("../data/songs.json");

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("catalog source is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("song record #{index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("song record #{index} has number 0; numbers start at 1")]
    ZeroNumber { index: usize },

    #[error("song number {0} appears more than once")]
    DuplicateNumber(u32),

    #[error("song {0} has no verses")]
    NoVerses(u32),

    #[error("catalog contains no songs")]
    Empty,
}

/// Shape of one record in the catalog source. Every field is optional here so
/// a missing one is reported by name instead of as a generic decode failure.
#[derive(Debug, Deserialize)]
struct SongRecord {
    #[serde(alias = "number")]
    song_number: Option<u32>,
    title: Option<String>,
    #[serde(alias = "subtitle")]
    sub_title: Option<String>,
    verses: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    songs: Vec<Song>,
    index: HashMap<u32, usize>,
}

impl Catalog {
    /// Parse a JSON array of song records and build the number index.
    pub fn load(source: &str) -> Result<Self, CatalogLoadError> {
        let records: Vec<SongRecord> = serde_json::from_str(source)?;
        let songs = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| song_from_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_songs(songs)
    }

    /// Load the catalog embedded in the binary.
    pub fn bundled() -> Result<Self, CatalogLoadError> {
        Self::load(BUNDLED_CATALOG)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn from_file(path: &Path) -> Result<Self, CatalogLoadError> {
        let source = fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&source)
    }

    /// Build the index over already constructed songs, keeping their order.
    pub fn from_songs(songs: Vec<Song>) -> Result<Self, CatalogLoadError> {
        if songs.is_empty() {
            return Err(CatalogLoadError::Empty);
        }

        let mut index = HashMap::with_capacity(songs.len());
        for (position, song) in songs.iter().enumerate() {
            if song.verses.is_empty() {
                return Err(CatalogLoadError::NoVerses(song.number));
            }
            if index.insert(song.number, position).is_some() {
                return Err(CatalogLoadError::DuplicateNumber(song.number));
            }
        }

        info!(songs = songs.len(), "catalog loaded");
        Ok(Self { songs, index })
    }

    pub fn by_number(&self, number: u32) -> Option<&Song> {
        self.index.get(&number).map(|&position| &self.songs[position])
    }

    /// The song numbered exactly one below or above `number`. Gaps in the
    /// numbering and both ends of the catalog yield `None`; there is no
    /// wraparound.
    pub fn adjacent(&self, number: u32, direction: Direction) -> Option<&Song> {
        let neighbour = match direction {
            Direction::Prev => number.checked_sub(1)?,
            Direction::Next => number.checked_add(1)?,
        };
        self.by_number(neighbour)
    }

    /// Songs matching `query`, lazily, in catalog order. A song matches when
    /// its number equals the trimmed query or its title contains the query
    /// case-insensitively. Only the number test trims, so surrounding spaces
    /// still count in a title search. An empty query matches everything.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Song> + 'a {
        let needle = SearchNeedle::new(query);
        debug!(query, "catalog search");
        self.songs
            .iter()
            .filter(move |song| needle.matches(song))
    }

    /// Songs whose numbers appear in `numbers`, in catalog order. Numbers the
    /// catalog does not know are skipped.
    pub fn subset(&self, numbers: &[u32]) -> Vec<&Song> {
        let wanted: HashSet<u32> = numbers.iter().copied().collect();
        self.songs
            .iter()
            .filter(|song| wanted.contains(&song.number))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.songs.iter().map(|song| song.number)
    }

    pub fn first(&self) -> Option<&Song> {
        self.songs.first()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

/// Pre-normalized forms of a search query.
struct SearchNeedle {
    number: String,
    title: String,
}

impl SearchNeedle {
    fn new(query: &str) -> Self {
        Self {
            number: query.trim().to_string(),
            title: query.to_lowercase(),
        }
    }

    fn matches(&self, song: &Song) -> bool {
        self.title.is_empty()
            || song.number.to_string() == self.number
            || song.title.to_lowercase().contains(&self.title)
    }
}

fn song_from_record(index: usize, record: SongRecord) -> Result<Song, CatalogLoadError> {
    let number = record
        .song_number
        .ok_or(CatalogLoadError::MissingField {
            index,
            field: "song_number",
        })?;
    if number == 0 {
        return Err(CatalogLoadError::ZeroNumber { index });
    }
    let title = record.title.ok_or(CatalogLoadError::MissingField {
        index,
        field: "title",
    })?;
    let verses = record.verses.ok_or(CatalogLoadError::MissingField {
        index,
        field: "verses",
    })?;

    Ok(Song::new(number, title, record.sub_title, verses))
}
