use crate::core::{ExtractError, Extractor};
use crate::models::{Roster, RosterStatus};
use crate::services::upstream::{FighterSource, UpstreamError};
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading the roster
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Roster provider unavailable: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Roster payload malformed: {0}")]
    Malformed(#[from] ExtractError),
}

/// Time source for freshness checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Roster handed to a caller, plus whether it outlived its TTL
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    pub roster: Arc<Roster>,
    pub stale: bool,
}

/// Single-slot roster cache with a freshness deadline
///
/// The slot only ever holds a complete, immutable `Roster` and is replaced
/// with one atomic store. Concurrent callers in a stale window may each
/// refetch; the last store wins and readers never see a partial roster.
pub struct RosterCache {
    source: Arc<dyn FighterSource>,
    extractor: Arc<Extractor>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: ArcSwapOption<Roster>,
}

impl RosterCache {
    pub fn new(
        source: Arc<dyn FighterSource>,
        extractor: Arc<Extractor>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            extractor,
            clock,
            ttl,
            slot: ArcSwapOption::const_empty(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, roster: &Roster, now: DateTime<Utc>) -> bool {
        now - roster.fetched_at <= self.ttl
    }

    /// Current roster, refetching when missing or expired
    ///
    /// A failed refetch falls back to the previous roster, flagged stale.
    pub async fn get_roster(&self) -> Result<RosterSnapshot, RosterError> {
        let cached = self.slot.load_full();

        if let Some(roster) = &cached {
            if self.is_fresh(roster, self.clock.now()) {
                tracing::trace!("Roster cache hit ({} entries)", roster.len());
                return Ok(RosterSnapshot {
                    roster: Arc::clone(roster),
                    stale: false,
                });
            }
        }

        match self.refresh().await {
            Ok(roster) => Ok(RosterSnapshot {
                roster,
                stale: false,
            }),
            Err(e) => {
                let Some(roster) = cached else {
                    log_refresh_failure(&e, "no cached roster to fall back on");
                    return Err(e);
                };
                log_refresh_failure(&e, "serving stale roster");
                Ok(RosterSnapshot {
                    roster,
                    stale: true,
                })
            }
        }
    }

    /// Fetch and publish a new roster unconditionally
    pub async fn refresh(&self) -> Result<Arc<Roster>, RosterError> {
        let payload = self.source.fetch_roster_page().await?;
        let entries = self.extractor.extract_roster(&payload)?;
        let roster = Arc::new(Roster::new(entries, self.clock.now()));

        self.slot.store(Some(Arc::clone(&roster)));
        tracing::info!("Roster refreshed from {} ({} entries)", payload.url, roster.len());

        Ok(roster)
    }

    /// Cache state for health reporting; never fetches
    pub fn status(&self) -> RosterStatus {
        match self.slot.load_full() {
            Some(roster) => RosterStatus {
                loaded: true,
                entries: roster.len(),
                fetched_at: Some(roster.fetched_at),
                stale: !self.is_fresh(&roster, self.clock.now()),
            },
            None => RosterStatus {
                loaded: false,
                entries: 0,
                fetched_at: None,
                stale: false,
            },
        }
    }
}

fn log_refresh_failure(err: &RosterError, outcome: &str) {
    match err {
        RosterError::Upstream(e) if e.is_timeout() => {
            tracing::warn!("Roster refetch timed out, {}: {}", outcome, e)
        }
        RosterError::Upstream(e) => {
            tracing::warn!("Roster refetch failed, {}: {}", outcome, e)
        }
        RosterError::Malformed(e) => {
            tracing::error!("Roster provider changed its payload shape, {}: {}", outcome, e)
        }
    }
}
