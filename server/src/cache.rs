//! # License Record Cache
//!
//! In-memory snapshot of the public license registry.
//!
//! - Refreshed wholesale from the registry endpoint, never field-by-field
//! - Readers only ever see a complete snapshot (replace-on-write behind
//!   an `RwLock`, records shared out as `Arc<Vec<_>>`)
//! - A failed refresh keeps the previous snapshot authoritative
//! - Concurrent refreshes collapse into one fetch: the gate mutex plus a
//!   generation check means a caller that lost the race returns without
//!   fetching again

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use registry::LicenseRecord;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Snapshot age past which `records()` triggers a refresh before answering.
pub const FRESHNESS: Duration = Duration::from_secs(5 * 60);

/// Hard cap on search results, insertion order, no ranking.
pub const SEARCH_LIMIT: usize = 50;

/// Where a snapshot comes from. Production wraps the registry endpoint;
/// tests substitute a stub.
pub trait RegistrySource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<LicenseRecord>, anyhow::Error>> + Send;
}

pub struct HttpRegistry {
    http: reqwest::Client,
    url: String,
}

impl HttpRegistry {
    pub fn new(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }
}

impl RegistrySource for HttpRegistry {
    fn fetch(&self) -> impl Future<Output = Result<Vec<LicenseRecord>, anyhow::Error>> + Send {
        async move { registry::fetch_licenses(&self.http, &self.url).await }
    }
}

struct Snapshot {
    records: Arc<Vec<LicenseRecord>>,
    refreshed_at: Option<Instant>,
    generation: u64,
}

pub struct LicenseCache<S> {
    source: S,
    snapshot: RwLock<Snapshot>,
    refresh_gate: Mutex<()>,
    announced: AtomicBool,
}

impl<S: RegistrySource> LicenseCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Snapshot {
                records: Arc::new(Vec::new()),
                refreshed_at: None,
                generation: 0,
            }),
            refresh_gate: Mutex::new(()),
            announced: AtomicBool::new(false),
        }
    }

    /// Replaces the snapshot from the registry. Never raises: a failed
    /// fetch logs a warning and the stale snapshot stays authoritative.
    pub async fn refresh(&self) {
        let entry_generation = self.snapshot.read().await.generation;

        let _gate = self.refresh_gate.lock().await;

        // a concurrent caller already replaced the snapshot while we waited
        if self.snapshot.read().await.generation != entry_generation {
            return;
        }

        match self.source.fetch().await {
            Ok(records) => {
                let count = records.len();

                let mut snapshot = self.snapshot.write().await;
                snapshot.records = Arc::new(records);
                snapshot.refreshed_at = Some(Instant::now());
                snapshot.generation += 1;
                drop(snapshot);

                if !self.announced.swap(true, Ordering::Relaxed) {
                    info!(count, "license data loaded");
                }
            }
            Err(e) => {
                warn!("registry refresh failed, keeping stale data: {e}");
            }
        }
    }

    /// The current snapshot, refreshed first when stale.
    pub async fn records(&self) -> Arc<Vec<LicenseRecord>> {
        if !self.is_fresh().await {
            self.refresh().await;
        }

        self.snapshot.read().await.records.clone()
    }

    /// Case-insensitive substring search over license number, entity name,
    /// DBA, holder name, and city. At most [`SEARCH_LIMIT`] matches, in
    /// snapshot insertion order.
    pub async fn search(&self, query: &str) -> Vec<LicenseRecord> {
        let needle = query.trim().to_lowercase();
        let records = self.records().await;

        records
            .iter()
            .filter(|record| matches(record, &needle))
            .take(SEARCH_LIMIT)
            .cloned()
            .collect()
    }

    /// Exact case-insensitive match on license number only.
    pub async fn lookup(&self, license_number: &str) -> Option<LicenseRecord> {
        let wanted = license_number.trim();
        let records = self.records().await;

        records
            .iter()
            .find(|record| record.license_number.eq_ignore_ascii_case(wanted))
            .cloned()
    }

    async fn is_fresh(&self) -> bool {
        self.snapshot
            .read()
            .await
            .refreshed_at
            .is_some_and(|at| at.elapsed() < FRESHNESS)
    }
}

fn matches(record: &LicenseRecord, needle: &str) -> bool {
    [
        &record.license_number,
        &record.entity_name,
        &record.dba_name,
        &record.license_holder,
        &record.city,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
