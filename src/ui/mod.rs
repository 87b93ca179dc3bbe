//! Terminal front-end. It only talks to the core through the catalog lookups,
//! the markup parser and the favorites store; screens pass song numbers
//! around and re-resolve the song from the catalog when drawing.

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
