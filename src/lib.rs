//! Owner-scoped events and functions service with a cache-aside read layer.
//!
//! Reads go through [`cache::ReadThrough`], which consults the shared cache
//! store first and falls back to the Postgres repositories on a miss. Writes
//! go straight to Postgres and then drop the affected cache entries.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
