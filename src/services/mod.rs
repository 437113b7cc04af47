// Service exports
pub mod resolver;
pub mod roster_cache;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testing;

pub use resolver::{ResolveError, Resolver, DEFAULT_SEARCH_LIMIT};
pub use roster_cache::{Clock, RosterCache, RosterError, RosterSnapshot, SystemClock};
pub use upstream::{FighterSource, HttpUpstream, UpstreamError};
