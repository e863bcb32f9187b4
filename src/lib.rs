//! Ticketbooth - movie ticket sales core
//!
//! Catalog of movies on sale, a ticket purchase transaction with half-price
//! rules, and an append-only sales ledger, persisted as JSON documents.
//!
//! ## Modules
//! - [`storage`]: document stores (filesystem, memory) and lenient loading
//! - [`catalog`]: catalog entries, search and refresh merge
//! - [`ledger`]: sale records and aggregates
//! - [`purchase`]: request validation, pricing and the purchase transaction
//! - [`box_office`]: serialized, persisted operations over all of the above
//! - [`refresh`]: sources of fresh catalogs (TMDB)

pub mod access;
pub mod box_office;
pub mod catalog;
pub mod config;
pub mod ledger;
pub mod purchase;
pub mod refresh;
pub mod storage;
pub mod utils;

pub use access::Principal;
pub use box_office::BoxOffice;
