//! The startup model registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use prism_core::ModelId;

use crate::artifact::{load_features, load_model};
use crate::error::RegistryError;
use crate::scan::scan;
use crate::{Predictor, Transformer};

/// One loaded model and its optional feature pipeline.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub model_id: ModelId,
    pub model: Arc<dyn Predictor>,
    pub features: Option<Arc<dyn Transformer>>,
    pub source_path: PathBuf,
    pub features_path: Option<PathBuf>,
}

/// Immutable map of model id to loaded model, built once before serving.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<ModelId, ModelEntry>,
}

impl Registry {
    /// Scan `root`, load every model artifact and its partner, and index them
    /// by model id.
    ///
    /// Any artifact that fails to load aborts the build.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RootMissing`] for a missing root,
    /// [`RegistryError::Walk`] if traversal fails, and
    /// [`RegistryError::Artifact`] naming the first artifact that fails.
    pub fn build(root: &Path) -> Result<Self, RegistryError> {
        let mut registry = Self::default();

        for found in scan(root)? {
            let model = load_model(&found.model_path).map_err(|source| RegistryError::Artifact {
                path: found.model_path.clone(),
                source,
            })?;

            let features = match &found.features_path {
                Some(path) => {
                    let pipeline = load_features(path).map_err(|source| RegistryError::Artifact {
                        path: path.clone(),
                        source,
                    })?;
                    Some(Arc::new(pipeline) as Arc<dyn Transformer>)
                }
                None => None,
            };

            let stem = found
                .model_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            tracing::debug!(
                model = %found.model_path.display(),
                kind = model.kind(),
                features = ?found.features_path,
                "loaded model artifact"
            );

            registry.insert(ModelEntry {
                model_id: ModelId::from_stem(&stem),
                model: Arc::new(model),
                features,
                source_path: found.model_path,
                features_path: found.features_path,
            });
        }

        tracing::info!(root = %root.display(), models = registry.len(), "model registry built");
        Ok(registry)
    }

    /// Build a registry from pre-constructed entries. Later entries replace
    /// earlier ones with the same id.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            registry.insert(entry);
        }
        registry
    }

    fn insert(&mut self, entry: ModelEntry) {
        if let Some(previous) = self.entries.insert(entry.model_id.clone(), entry) {
            let current = &self.entries[&previous.model_id];
            tracing::warn!(
                model_id = %previous.model_id,
                replaced = %previous.source_path.display(),
                by = %current.source_path.display(),
                "duplicate model id; later artifact wins"
            );
        }
    }

    #[must_use]
    pub fn get(&self, model_id: &str) -> Option<&ModelEntry> {
        self.entries.get(model_id)
    }

    /// All model ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<ModelId> {
        let mut ids: Vec<ModelId> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Entries sorted by model id.
    #[must_use]
    pub fn entries(&self) -> Vec<&ModelEntry> {
        let mut entries: Vec<&ModelEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.model_id.cmp(&b.model_id));
        entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
