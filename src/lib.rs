//! Listing Proxy Library
//!
//! Caches a Webflow CMS collection in memory and serves it filtered and
//! paginated over HTTP. Exposed as a library for the binary and the
//! integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod listing;
pub mod server;
