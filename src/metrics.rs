use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;

/// Global run metrics for the collector.
///
/// Purpose:
/// - Track API traffic (pages fetched / failed)
/// - Track what happened to every observation seen
///
/// Design:
/// - Lock-free (Atomics)
/// - Only read once, for the end-of-run summary
#[derive(Default)]
pub struct RunMetrics {
    // API
    pub pages_fetched: AtomicUsize,
    pub page_errors: AtomicUsize,

    // Observations
    pub observations_seen: AtomicUsize,
    pub observations_without_photo: AtomicUsize,
    pub duplicates_skipped: AtomicUsize,
    pub rows_collected: AtomicUsize,
}

impl RunMetrics {
    /// One-line summary, logged at the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "[METRICS] pages={} page_err={} obs={} no_photo={} dup={} rows={}",
            self.pages_fetched.load(Ordering::Relaxed),
            self.page_errors.load(Ordering::Relaxed),
            self.observations_seen.load(Ordering::Relaxed),
            self.observations_without_photo.load(Ordering::Relaxed),
            self.duplicates_skipped.load(Ordering::Relaxed),
            self.rows_collected.load(Ordering::Relaxed),
        )
    }
}

/// Global metrics registry (singleton)
pub static METRICS: Lazy<Arc<RunMetrics>> =
    Lazy::new(|| Arc::new(RunMetrics::default()));
