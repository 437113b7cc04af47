use crate::core::{normalize_query, ExtractError, Extractor, Matcher};
use crate::models::{FighterDetail, FighterSummary, Roster, RosterEntry};
use crate::services::roster_cache::{RosterCache, RosterError, RosterSnapshot};
use crate::services::upstream::{FighterSource, UpstreamError};
use std::sync::Arc;
use thiserror::Error;

/// Default number of search hits returned
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Errors surfaced to callers of the resolver
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0}")]
    BadRequest(String),

    #[error("No fighter found matching {0:?}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),

    #[error("Upstream payload malformed: {0}")]
    MalformedUpstream(#[from] ExtractError),
}

impl From<RosterError> for ResolveError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::Upstream(e) => ResolveError::UpstreamUnavailable(e),
            RosterError::Malformed(e) => ResolveError::MalformedUpstream(e),
        }
    }
}

impl ResolveError {
    /// HTTP status this error maps to
    pub fn http_status(&self) -> u16 {
        match self {
            ResolveError::BadRequest(_) => 400,
            ResolveError::NotFound(_) => 404,
            ResolveError::UpstreamUnavailable(_) => 502,
            ResolveError::MalformedUpstream(_) => 500,
        }
    }

    /// Short machine-readable error name
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::BadRequest(_) => "bad_request",
            ResolveError::NotFound(_) => "not_found",
            ResolveError::UpstreamUnavailable(_) => "upstream_unavailable",
            ResolveError::MalformedUpstream(_) => "malformed_upstream",
        }
    }

    /// Text fit for end users; upstream detail stays in the logs
    pub fn user_message(&self) -> String {
        match self {
            ResolveError::BadRequest(_) | ResolveError::NotFound(_) => self.to_string(),
            ResolveError::UpstreamUnavailable(_) => {
                "Fighter data is unavailable right now, please try again later".to_string()
            }
            ResolveError::MalformedUpstream(_) => {
                "Fighter data could not be read from the provider".to_string()
            }
        }
    }
}

/// Turns fighter names and ids into full profiles
///
/// Owns the roster cache; detail pages are fetched per call and never cached.
pub struct Resolver {
    roster: RosterCache,
    source: Arc<dyn FighterSource>,
    extractor: Arc<Extractor>,
    matcher: Matcher,
    search_limit: usize,
}

impl Resolver {
    pub fn new(
        roster: RosterCache,
        source: Arc<dyn FighterSource>,
        extractor: Arc<Extractor>,
        matcher: Matcher,
    ) -> Self {
        Self {
            roster,
            source,
            extractor,
            matcher,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn roster_cache(&self) -> &RosterCache {
        &self.roster
    }

    fn validate(&self, query: &str) -> Result<String, ResolveError> {
        let normalized = normalize_query(query);
        if normalized.is_empty() {
            return Err(ResolveError::BadRequest("Missing query".to_string()));
        }
        if !self.matcher.accepts(&normalized) {
            return Err(ResolveError::BadRequest(format!(
                "Query must be at least {} characters",
                self.matcher.min_query_len()
            )));
        }
        Ok(normalized)
    }

    async fn roster(&self) -> Result<RosterSnapshot, ResolveError> {
        let snapshot = self.roster.get_roster().await?;
        if snapshot.stale {
            tracing::warn!(
                "Using stale roster fetched at {}",
                snapshot.roster.fetched_at
            );
        }
        Ok(snapshot)
    }

    fn best_match<'r>(&self, normalized: &str, roster: &'r Roster) -> Result<&'r RosterEntry, ResolveError> {
        let result = self.matcher.match_query(normalized, roster);
        match (result.entry(), result.tier()) {
            (Some(entry), Some(tier)) => {
                tracing::debug!("Query {:?} matched {} via {:?}", normalized, entry.id, tier);
                Ok(entry)
            }
            _ => Err(ResolveError::NotFound(normalized.to_string())),
        }
    }

    /// Fetch the detail page of a roster entry and overlay roster identity
    async fn fetch_detail(&self, entry: &RosterEntry) -> Result<FighterDetail, ResolveError> {
        let payload = self
            .source
            .fetch_detail_page(&entry.profile_ref)
            .await
            .map_err(|e| {
                tracing::error!("Detail fetch for {} failed: {}", entry.id, e);
                e
            })?;

        let detail = self.extractor.extract_detail(&payload, &entry.profile_ref);
        Ok(merge_identity(entry, detail))
    }

    /// Resolve a fighter name or fragment to a full profile
    pub async fn resolve(&self, query: &str) -> Result<FighterDetail, ResolveError> {
        let normalized = self.validate(query)?;
        let snapshot = self.roster().await?;
        let entry = self.best_match(&normalized, &snapshot.roster)?;

        self.fetch_detail(entry).await
    }

    /// All roster entries matching a fragment, best tier first
    pub async fn search_fighters(
        &self,
        fragment: &str,
        limit: Option<usize>,
    ) -> Result<Vec<FighterSummary>, ResolveError> {
        let normalized = self.validate(fragment)?;
        let snapshot = self.roster().await?;
        let limit = limit.unwrap_or(self.search_limit);

        let hits: Vec<FighterSummary> = self
            .matcher
            .search(&normalized, &snapshot.roster, limit)
            .into_iter()
            .map(RosterEntry::summary)
            .collect();

        tracing::debug!("Search {:?} returned {} fighters", normalized, hits.len());
        Ok(hits)
    }

    /// Profile for a roster id or profile ref, falling back to name matching
    pub async fn fighter_detail(&self, identifier: &str) -> Result<FighterDetail, ResolveError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ResolveError::BadRequest("Missing id".to_string()));
        }

        let snapshot = self.roster().await?;
        if let Some(entry) = snapshot.roster.find_by_identifier(identifier) {
            return self.fetch_detail(entry).await;
        }

        let normalized = self.validate(identifier)?;
        let entry = self.best_match(&normalized, &snapshot.roster)?;
        self.fetch_detail(entry).await
    }
}

/// Roster id and name win over whatever the detail page claims
fn merge_identity(entry: &RosterEntry, mut detail: FighterDetail) -> FighterDetail {
    detail.id = entry.id.clone();

    let name = entry.full_name();
    if !name.is_empty() {
        detail.name = name;
    }

    detail
}
