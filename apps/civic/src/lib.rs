//! # civic
//!
//! Presentation layer over `civic-core`: command-line parsing, snapshot
//! files and configuration loading.

pub mod cli;
pub mod config;
pub mod snapshot;
