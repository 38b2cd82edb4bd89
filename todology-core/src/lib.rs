//! Core types for todology.
//!
//! This crate provides everything between the config file and the task backend:
//! - `config` for loading and validating `config.yml`
//! - `ledger` for the set of already-imported event UIDs
//! - `feed` for downloading and parsing the iCalendar feed
//! - `assignment` for turning feed events into importable assignments
//! - `backend` and `push` for creating tasks, behind a rate limiter
//! - `import` for the filter, push, persist step of a run

pub mod assignment;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod feed;
pub mod import;
pub mod ledger;
pub mod push;
pub mod rate_limit;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{TodologyError, TodologyResult};
