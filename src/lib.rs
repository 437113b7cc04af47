//! Fighter Lookup - resolves fighter names into profiles scraped from upstream providers
//!
//! This library caches a fighter roster, matches free-text queries against it
//! with a tiered strategy, and extracts structured profile fields from
//! detail pages using a declarative schema.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{DetailSchema, Extractor, MatchResult, MatchTier, Matcher};
pub use models::{FighterDetail, FighterSummary, Roster, RosterEntry};
pub use services::{HttpUpstream, ResolveError, Resolver, RosterCache};
