//! The single write path for every entity, plus the read paths built on it.
//!
//! Each mutation runs authorize → validate → store, in that order, so a
//! rejected request never touches the database. Multi-row writes happen inside
//! one transaction.

pub mod about;
pub mod accounts;
pub mod cache;
pub mod comments;
pub mod password;
pub mod posts;
pub mod projects;
pub mod taxonomy;
mod tx;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use quillpad_config::{QuillpadConfig, SectionKeywords, SectionName};
use quillpad_content::{PatternError, PitfallExtractor, Section, SectionPattern};
use sea_orm::DatabaseConnection;

pub use cache::{ProjectCache, ProjectQuery};
pub use posts::{PitfallPreview, PostQuery};
pub use taxonomy::TermKind;

/// Handle to the blog's storage and policies. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Blog {
    db: DatabaseConnection,
    extractor: Arc<PitfallExtractor>,
    projects: ProjectCache,
}

impl Blog {
    /// Built-in pitfall headings, project cache off.
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            extractor: Arc::new(PitfallExtractor::default()),
            projects: ProjectCache::disabled(),
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &QuillpadConfig) -> Result<Self, PatternError> {
        let extractor = if config.pitfall.uses_builtin_headings() {
            PitfallExtractor::default()
        } else {
            PitfallExtractor::new(config.pitfall.sections().iter().map(section_pattern).collect())?
        };
        Ok(Self {
            db,
            extractor: Arc::new(extractor),
            projects: ProjectCache::new(&config.cache),
        })
    }

    pub fn with_project_cache(mut self, cache: ProjectCache) -> Self {
        self.projects = cache;
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn section_pattern(cfg: &SectionKeywords) -> SectionPattern {
    let section = match cfg.section {
        SectionName::Problem => Section::Problem,
        SectionName::Cause => Section::Cause,
        SectionName::Solution => Section::Solution,
        SectionName::Summary => Section::Summary,
    };
    SectionPattern::new(section, cfg.keywords.iter().cloned(), cfg.cap)
}
