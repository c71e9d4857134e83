//! News Fanout - a cached multi-source feed aggregator
//!
//! This crate fetches several news feeds concurrently, pairs each with its
//! site icon, and serves the merged result as one JSON document. Results are
//! cached for a fixed TTL and concurrent refreshes are coalesced.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod routes;
pub mod upstream;
