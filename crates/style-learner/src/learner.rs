//! Sample store, in memory or backed by a JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reply_core::{LearnType, ServiceResult, StyleProfile};
use serde::{Deserialize, Serialize};
use service_client::StyleSource;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::analysis::build_profile;

/// Samples longer than this are rejected.
pub const MAX_SAMPLE_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSample {
    pub id: Uuid,
    pub content: String,
    pub learn_type: LearnType,
    pub learned_at: DateTime<Utc>,
}

/// Thread-safe learner; clones share the same samples.
///
/// A learner opened with [`StyleLearner::open`] rewrites its file after every accepted
/// sample, so samples survive across processes.
#[derive(Debug, Clone, Default)]
pub struct StyleLearner {
    samples: Arc<RwLock<Vec<StyleSample>>>,
    store: Option<PathBuf>,
}

impl StyleLearner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads samples from a JSON file. A missing file starts empty and is created on the
    /// first accepted sample.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let samples: Vec<StyleSample> = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read style samples {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid style samples file {}", path.display()))?
        } else {
            Vec::new()
        };
        info!(count = samples.len(), path = %path.display(), "Loaded style samples");
        Ok(Self {
            samples: Arc::new(RwLock::new(samples)),
            store: Some(path.to_path_buf()),
        })
    }

    /// Stores a sample. Returns `false` for blank or oversized content, or when the sample
    /// cannot be written to the backing file.
    pub async fn learn(&self, content: &str, learn_type: LearnType) -> bool {
        if content.trim().is_empty() {
            debug!("Rejected empty style sample");
            return false;
        }
        let chars = content.chars().count();
        if chars > MAX_SAMPLE_CHARS {
            debug!(chars, "Rejected oversized style sample");
            return false;
        }

        let sample = StyleSample {
            id: Uuid::new_v4(),
            content: content.to_string(),
            learn_type,
            learned_at: Utc::now(),
        };
        let mut samples = self.samples.write().await;
        samples.push(sample);
        if let Some(path) = &self.store {
            if let Err(e) = save_samples(path, &samples).await {
                error!(error = %e, path = %path.display(), "Failed to persist style sample");
                samples.pop();
                return false;
            }
        }
        info!(
            learn_type = learn_type.as_str(),
            total = samples.len(),
            "Learned style sample"
        );
        true
    }

    pub async fn profile(&self) -> StyleProfile {
        let samples = self.samples.read().await;
        let contents: Vec<&str> = samples.iter().map(|s| s.content.as_str()).collect();
        build_profile(&contents)
    }

    pub async fn samples(&self) -> Vec<StyleSample> {
        self.samples.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.samples.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.samples.read().await.is_empty()
    }
}

async fn save_samples(path: &Path, samples: &[StyleSample]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(samples)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[async_trait]
impl StyleSource for StyleLearner {
    async fn profile(&self) -> ServiceResult<StyleProfile> {
        ServiceResult::Success(StyleLearner::profile(self).await)
    }

    async fn learn(&self, content: &str, kind: LearnType) -> ServiceResult<bool> {
        ServiceResult::Success(StyleLearner::learn(self, content, kind).await)
    }
}
