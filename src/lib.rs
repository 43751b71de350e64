//! weatherhub library
//!
//! Exposes the caches, upstream clients, stores and service routers so the
//! binary and the integration tests can assemble them.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod resolver;
pub mod services;
pub mod store;
