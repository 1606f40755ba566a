//! Library side of the `calc` command-line previewer.

pub mod commands;
pub mod logging;
pub mod summary;
