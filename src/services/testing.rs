//! In-memory doubles for the upstream and clock seams

use crate::models::RawPayload;
use crate::services::roster_cache::Clock;
use crate::services::upstream::{FighterSource, UpstreamError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Canned upstream that counts every call
pub struct FakeSource {
    roster: Mutex<Result<String, u16>>,
    detail: Mutex<Result<String, u16>>,
    roster_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_roster(body: &str) -> Self {
        Self {
            roster: Mutex::new(Ok(body.to_string())),
            detail: Mutex::new(Err(404)),
            roster_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_detail(self, body: &str) -> Self {
        self.set_detail(body);
        self
    }

    pub fn set_roster(&self, body: &str) {
        *self.roster.lock().unwrap() = Ok(body.to_string());
    }

    pub fn fail_roster(&self, status: u16) {
        *self.roster.lock().unwrap() = Err(status);
    }

    pub fn set_detail(&self, body: &str) {
        *self.detail.lock().unwrap() = Ok(body.to_string());
    }

    pub fn fail_detail(&self, status: u16) {
        *self.detail.lock().unwrap() = Err(status);
    }

    pub fn roster_calls(&self) -> usize {
        self.roster_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn respond(slot: &Mutex<Result<String, u16>>, url: String) -> Result<RawPayload, UpstreamError> {
        match &*slot.lock().unwrap() {
            Ok(body) => Ok(RawPayload::new(url, body.clone())),
            Err(status) => Err(UpstreamError::HttpStatus {
                status: *status,
                url,
            }),
        }
    }
}

#[async_trait]
impl FighterSource for FakeSource {
    async fn fetch_roster_page(&self) -> Result<RawPayload, UpstreamError> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        // Let concurrent callers interleave with the fetch
        tokio::task::yield_now().await;
        Self::respond(&self.roster, "fake://roster".to_string())
    }

    async fn fetch_detail_page(&self, profile_ref: &str) -> Result<RawPayload, UpstreamError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        Self::respond(&self.detail, self.detail_url(profile_ref))
    }

    fn detail_url(&self, profile_ref: &str) -> String {
        format!("fake://detail/{}", profile_ref)
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
