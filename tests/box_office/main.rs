//! Box office integration tests.
//!
//! Drives the service end to end against real JSON files in a temp dir.

mod common;
mod concurrency;
mod persistence;
mod scenarios;
