//! Binary entry point: resolve the configuration, load the catalog, open the
//! favorites database and hand everything to the terminal UI.
use anyhow::Context;
use tracing::{info, warn};

use hymnal::db::{ensure_schema, open_in_memory, SqliteStore};
use hymnal::{logging, run_app, App, Config, FavoritesStore};

/// A catalog that fails to load is fatal. A favorites database that cannot be
/// opened is not: the session falls back to an in-memory store.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    config.ensure_dirs()?;

    if let Err(err) = logging::init(&config.log_path()) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let catalog = config
        .load_catalog()
        .context("failed to load the hymn catalog")?;

    let conn = match ensure_schema(&config.database_path()) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("favorites will not be saved this session: {err:#}");
            open_in_memory()?
        }
    };
    let favorites = FavoritesStore::new(SqliteStore::new(conn), &catalog);

    info!(songs = catalog.len(), "starting hymnal");
    let mut app = App::new(catalog, favorites);
    run_app(&mut app)
}
