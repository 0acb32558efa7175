//! Read-through cache for project listings.
//!
//! Keys carry a generation number. A write bumps the generation before
//! clearing entries, so a listing computed before the write can never be
//! served after it, even if it lands in the cache late.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use quillpad_config::CacheConfig;
use quillpad_core::{ProjectDetail, ProjectType};

/// Filters accepted by the project listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProjectQuery {
    pub pinned_only: bool,
    /// `None` lists every type.
    pub project_type: Option<ProjectType>,
}

type Listing = Arc<Vec<ProjectDetail>>;

#[derive(Clone)]
pub struct ProjectCache {
    entries: Option<Cache<(u64, ProjectQuery), Listing>>,
    generation: Arc<AtomicU64>,
}

impl ProjectCache {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = config.is_enabled().then(|| {
            Cache::builder()
                .max_capacity(config.max_entries())
                .time_to_live(Duration::from_secs(config.projects_ttl_secs()))
                .build()
        });
        Self {
            entries,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn disabled() -> Self {
        Self {
            entries: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Snapshot to pass back to [`insert`](Self::insert) once the listing is computed.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub async fn get(&self, generation: u64, query: &ProjectQuery) -> Option<Listing> {
        let entries = self.entries.as_ref()?;
        entries.get(&(generation, query.clone())).await
    }

    pub async fn insert(&self, generation: u64, query: ProjectQuery, listing: Listing) {
        if let Some(entries) = &self.entries {
            entries.insert((generation, query), listing).await;
        }
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(entries) = &self.entries {
            entries.invalidate_all();
        }
    }
}

impl std::fmt::Debug for ProjectCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCache")
            .field("enabled", &self.is_enabled())
            .field("generation", &self.generation())
            .finish()
    }
}
