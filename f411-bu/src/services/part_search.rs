//! Debounced part-number search
//!
//! Free-text inputs (part autocomplete in the row-edit flow) coalesce
//! keystrokes: a lookup is only issued once the query has been stable for
//! the debounce window, and a superseded call reports back without hitting
//! the network.

use crate::error::UploadResult;
use crate::models::PartSummary;
use crate::services::api_client::ApiClient;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Keystroke coalescing window
pub const DEBOUNCE_MS: u64 = 300;

/// Minimum query length before any request is issued
const MIN_QUERY_LEN: usize = 2;

/// Sequence-numbered debounce timer
pub struct Debouncer {
    delay: Duration,
    seq: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            seq: AtomicU64::new(0),
        }
    }

    /// Wait out the debounce window. Returns false when a newer call
    /// arrived while waiting (this one should be dropped).
    pub async fn settle(&self) -> bool {
        let my_seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        my_seq == self.seq.load(Ordering::SeqCst)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS))
    }
}

/// Part lookup with debouncing, for the row-edit remediation flow
pub struct PartSearcher {
    debouncer: Debouncer,
    limit: u32,
}

impl PartSearcher {
    pub fn new(limit: u32) -> Self {
        Self {
            debouncer: Debouncer::default(),
            limit,
        }
    }

    /// Search the part master. Returns `Ok(None)` when the call was
    /// superseded by newer input; too-short queries yield an empty list
    /// without a request.
    pub async fn search(
        &self,
        api: &ApiClient,
        query: &str,
    ) -> UploadResult<Option<Vec<PartSummary>>> {
        let query = query.trim();
        if query.len() < MIN_QUERY_LEN {
            return Ok(Some(Vec::new()));
        }
        if !self.debouncer.settle().await {
            return Ok(None);
        }
        api.search_parts(query, self.limit).await.map(Some)
    }
}
