//! Lazy, load-once model holder
//!
//! The model artifact is read the first time a prediction needs it and the
//! handle is cached for the rest of the process. Concurrent first callers
//! block on the same initialization, so the artifact is deserialized at most
//! once. A failed load is not cached and the next caller tries again.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use super::forest::RandomForest;
use super::ModelHandle;
use crate::utils::error::{CropError, Result};

/// File name of the bundled model artifact
pub const MODEL_FILE_NAME: &str = "random_forest_model.json";

type LoadFn = dyn Fn(&Path) -> Result<ModelHandle> + Send + Sync;

pub struct ModelLoader {
    path: PathBuf,
    load_fn: Box<LoadFn>,
    model: OnceCell<ModelHandle>,
    loads: AtomicUsize,
}

impl ModelLoader {
    /// Loader for a random forest artifact at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_load_fn(path, |path| {
            let forest = RandomForest::load(path)?;
            Ok(Arc::new(forest) as ModelHandle)
        })
    }

    /// Loader with a custom deserialization routine
    pub fn with_load_fn<F>(path: impl Into<PathBuf>, load_fn: F) -> Self
    where
        F: Fn(&Path) -> Result<ModelHandle> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            load_fn: Box::new(load_fn),
            model: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Artifact location inside the crate's own directory, independent of
    /// the process working directory
    pub fn default_model_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("model")
            .join(MODEL_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail with `ModelNotFound` if the artifact is absent
    pub fn ensure_present(&self) -> Result<()> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(CropError::ModelNotFound(self.path.clone()))
        }
    }

    /// Return the cached model, loading it on first use
    pub fn get_model(&self) -> Result<ModelHandle> {
        self.model
            .get_or_try_init(|| {
                self.ensure_present()?;

                info!("Loading ML model from {}...", self.path.display());
                self.loads.fetch_add(1, Ordering::SeqCst);
                let model = (self.load_fn)(&self.path)?;
                info!("Model loaded successfully: {}", model.describe());

                Ok(model)
            })
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Number of times the load routine has run
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
