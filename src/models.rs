//! Domain models shared by the catalog, the favorites store and the TUI. The
//! types stay light-weight data holders: a song is built once when the catalog
//! loads and never changes afterwards, so every other layer can hold plain
//! references or pass the song number around.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One hymn from the catalog. The `number` is the only stable identifier;
/// titles are allowed to repeat.
pub struct Song {
    /// Hymn number printed in the book. Always positive and unique.
    pub number: u32,
    /// Title as found in the source. It may embed a parenthesized subtitle.
    pub title: String,
    /// Explicit subtitle, or the parenthesized part of the title when the
    /// source did not provide one.
    pub subtitle: Option<String>,
    /// Raw verse texts in book order. Each verse still carries its markup.
    pub verses: Vec<String>,
}

impl Song {
    /// Build a song, deriving the subtitle from the title when `subtitle` is
    /// missing or blank.
    pub fn new(number: u32, title: String, subtitle: Option<String>, verses: Vec<String>) -> Self {
        let subtitle = subtitle
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .or_else(|| derive_subtitle(&title));
        Self {
            number,
            title,
            subtitle,
            verses,
        }
    }

    /// Header text used by the detail view, e.g. `12.Amazing Grace`.
    pub fn heading(&self) -> String {
        format!("{}.{}", self.number, self.title)
    }

    /// Title without the parenthesized subtitle segment.
    pub fn short_title(&self) -> &str {
        match self.title.find('(') {
            Some(idx) => self.title[..idx].trim(),
            None => self.title.trim(),
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.title)
    }
}

/// Pull `Subtitle` out of `Title (Subtitle)`. An unterminated parenthesis
/// takes the rest of the title.
fn derive_subtitle(title: &str) -> Option<String> {
    let open = title.find('(')?;
    let rest = &title[open + 1..];
    let inner = match rest.find(')') {
        Some(close) => &rest[..close],
        None => rest,
    };
    let inner = inner.trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Sequential browsing direction between neighbouring hymn numbers.
pub enum Direction {
    Prev,
    Next,
}
