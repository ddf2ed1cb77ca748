//! Library side of the `sheetbind` command-line tool.

pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
