//! Persistence module split across logical submodules.

mod connection;
mod settings;

pub use connection::{ensure_schema, open_in_memory};
pub use settings::{KeyValueStore, MemoryStore, SqliteStore};
