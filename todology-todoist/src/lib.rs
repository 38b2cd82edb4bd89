//! Todoist backend for todology.
//!
//! Talks to the Todoist REST API (v2) with a personal API token and implements
//! [`todology_core::backend::TaskBackend`] on top of it.

mod client;
mod types;

pub use client::{DEFAULT_API_URL, TodoistClient};
