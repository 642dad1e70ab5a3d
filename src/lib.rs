//! Consulting Site Core
//!
//! Data layer for a consulting company website backed by a hosted document
//! collection service:
//!
//! - `repository`: the collection client seam and its memory, JSON file,
//!   HTTP and timeout-bounded implementations
//! - `store`: per-page snapshots of a collection and how they are kept in
//!   step after a confirmed mutation
//! - `filter`: derived views (search, field predicates, ordering)
//! - `form`: the create/edit/delete state machine
//! - `pages`: the site's pages composed from the pieces above

pub mod assistant;
pub mod config;
pub mod domain;
pub mod export;
pub mod filter;
pub mod form;
pub mod generators;
pub mod pages;
pub mod repository;
pub mod resume;
pub mod store;

#[cfg(test)]
mod testing;
