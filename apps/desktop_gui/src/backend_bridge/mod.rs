//! Worker side of the app: commands in, UI events out.

pub mod commands;
pub mod runtime;
