//! Core library for the hymnal reader.
//!
//! Three pieces do the data work: the [`catalog`] indexes the fixed song set
//! and answers lookup, neighbour and search queries; the [`markup`] parser
//! turns raw verse text into tagged tokens for rendering; the [`favorites`]
//! store keeps the reader's bookmarks in a key-value table. The [`ui`] module
//! is a terminal front-end composed from those three.
pub mod catalog;
pub mod config;
pub mod db;
pub mod favorites;
pub mod logging;
pub mod markup;
pub mod models;
pub mod ui;

pub use catalog::{Catalog, CatalogLoadError};
pub use config::Config;
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use markup::{parse_verse, render_verse, Line, LineKind, Token, TokenKind};
pub use models::{Direction, Song};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
