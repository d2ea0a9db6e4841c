//! UI layer for the directory: app shell and user cards.

pub mod app;
pub mod cards;

pub use app::DirectoryApp;
