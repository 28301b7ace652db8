//! File-backed correction persistence
//!
//! One JSON document per correction plus `index.json`, a summary used for
//! listing. Loaded corrections are memoized per store instance; recording or
//! deleting a correction drops the memo so the next lookup reloads from disk.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;

use super::matcher::{score_correction, MatchScore};
use super::tags::derive_tags;
use super::types::{
    Correction, CorrectionIndex, CorrectionWarning, IndexEntry, NewCorrection, WarningContext,
};
use crate::storage::{
    document_path, list_documents, read_json, remove_json, write_document, write_json,
};
use crate::{Error, Result};

/// File name of the summary index
const INDEX_FILE: &str = "index.json";

/// Maximum warnings returned for one context
const MAX_WARNINGS: usize = 5;

/// Durable store of remembered mistakes
#[derive(Debug)]
pub struct CorrectionStore {
    dir: PathBuf,
    cache: Mutex<Option<Vec<Correction>>>,
}

impl CorrectionStore {
    /// Create a store in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(None),
        }
    }

    /// The store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Record a correction and return its id
    ///
    /// Fills defaults, derives tags, writes the document and updates the index.
    pub async fn record(&self, new: NewCorrection) -> Result<String> {
        let id = format!("corr-{}", uuid::Uuid::new_v4().simple());
        let tags = derive_tags(
            &new.wrong_behavior,
            &new.correct_behavior,
            &new.context.tech_stack,
        );

        let correction = Correction {
            id: id.clone(),
            wrong_behavior: new.wrong_behavior,
            correct_behavior: new.correct_behavior,
            context: new.context,
            severity: new.severity.unwrap_or_default(),
            created_at: Utc::now(),
            warn_count: 0,
            workflow_ids: new.workflow_ids,
            tags,
        };

        write_document(&self.dir, &id, &correction).await?;

        let mut index = self.read_index().await?;
        index.corrections.push(IndexEntry::for_correction(&correction));
        self.write_index(index).await?;

        *self.cache.lock().await = None;

        tracing::info!(
            correction = %id,
            severity = %correction.severity,
            tags = ?correction.tags,
            "Correction recorded"
        );

        Ok(id)
    }

    /// Load one correction
    pub async fn get(&self, id: &str) -> Result<Correction> {
        let Some(path) = document_path(&self.dir, id) else {
            return Err(Error::not_found("correction", id));
        };
        read_json(&path)
            .await?
            .ok_or_else(|| Error::not_found("correction", id))
    }

    /// Index entries, newest first
    pub async fn list(&self) -> Result<Vec<IndexEntry>> {
        let mut entries = self.read_index().await?.corrections;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Delete a correction and its index entry
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = match document_path(&self.dir, id) {
            Some(path) => remove_json(&path).await?,
            None => false,
        };
        if !removed {
            return Err(Error::not_found("correction", id));
        }

        let mut index = self.read_index().await?;
        index.corrections.retain(|entry| entry.id != id);
        self.write_index(index).await?;

        *self.cache.lock().await = None;
        tracing::info!(correction = %id, "Correction deleted");
        Ok(())
    }

    /// Corrections relevant to `context`, most confident first, at most five
    ///
    /// Every returned correction has its warn count incremented and persisted.
    pub async fn warnings(&self, context: &WarningContext) -> Result<Vec<CorrectionWarning>> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load_all().await?);
        }
        let Some(corrections) = cache.as_mut() else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<(usize, MatchScore)> = corrections
            .iter()
            .enumerate()
            .map(|(i, correction)| (i, score_correction(correction, context)))
            .filter(|(_, score)| score.is_match())
            .collect();

        // stable sort: equal scores keep severity then load order
        matches.sort_by(|(a_idx, a), (b_idx, b)| {
            b.points
                .cmp(&a.points)
                .then_with(|| corrections[*b_idx].severity.cmp(&corrections[*a_idx].severity))
        });
        matches.truncate(MAX_WARNINGS);

        let mut warnings = Vec::with_capacity(matches.len());
        for (idx, score) in matches {
            let correction = &mut corrections[idx];
            correction.warn_count += 1;
            write_document(&self.dir, &correction.id, &*correction).await?;

            tracing::debug!(
                correction = %correction.id,
                confidence = score.confidence(),
                reason = %score.reason(),
                "Correction matched"
            );

            warnings.push(CorrectionWarning {
                correction: correction.clone(),
                confidence: score.confidence(),
                reason: score.reason(),
            });
        }

        Ok(warnings)
    }

    async fn load_all(&self) -> Result<Vec<Correction>> {
        let mut corrections = Vec::new();
        for path in list_documents(&self.dir, Some(INDEX_FILE)).await? {
            match read_json::<Correction>(&path).await {
                Ok(Some(correction)) => corrections.push(correction),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping unreadable correction: {}", e),
            }
        }
        corrections.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(corrections)
    }

    async fn read_index(&self) -> Result<CorrectionIndex> {
        Ok(read_json(&self.index_path()).await?.unwrap_or_default())
    }

    async fn write_index(&self, mut index: CorrectionIndex) -> Result<()> {
        index.last_updated = Utc::now();
        index.total_corrections = index.corrections.len();
        write_json(&self.index_path(), &index).await
    }
}
