use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{error, info};

use super::model::{Classifier, ModelArtifact};

/// The model artifact could not be turned into a classifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelUnavailable {
    #[error("model artifact not found at {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to load model from {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ModelUnavailable {
    /// Message shown on the form in place of a verdict.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { path } => format!(
                "Model file not found. Make sure {} exists.",
                path.display()
            ),
            Self::Invalid { reason, .. } => format!("Failed to load model: {reason}"),
        }
    }
}

/// Read and validate a model artifact from disk.
pub fn load_artifact(path: &Path) -> Result<Arc<dyn Classifier>, ModelUnavailable> {
    let raw = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ModelUnavailable::NotFound {
            path: path.to_path_buf(),
        },
        _ => ModelUnavailable::Invalid {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    })?;

    let artifact = ModelArtifact::from_json(&raw).map_err(|err| ModelUnavailable::Invalid {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    Ok(artifact.into_classifier())
}

type Loader = Box<dyn Fn() -> Result<Arc<dyn Classifier>, ModelUnavailable> + Send + Sync>;

/// Snapshot of the cache for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierStatus {
    NotLoaded,
    Loaded,
    Failed(ModelUnavailable),
}

/// Load-once holder for the process classifier.
///
/// The first call to [`ClassifierCache::load`] runs the loader; its result, success or
/// failure, is returned to every later caller without touching the artifact again.
pub struct ClassifierCache {
    source: String,
    loader: Loader,
    slot: OnceLock<Result<Arc<dyn Classifier>, ModelUnavailable>>,
}

impl ClassifierCache {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source = path.display().to_string();
        Self::with_loader(source, move || load_artifact(&path))
    }

    pub fn with_loader<F>(source: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Classifier>, ModelUnavailable> + Send + Sync + 'static,
    {
        Self {
            source: source.into(),
            loader: Box::new(loader),
            slot: OnceLock::new(),
        }
    }

    /// Wrap an already constructed classifier; the slot starts filled.
    pub fn preloaded(classifier: Arc<dyn Classifier>) -> Self {
        let handle = Arc::clone(&classifier);
        Self {
            source: "preloaded".to_string(),
            loader: Box::new(move || Ok(Arc::clone(&handle))),
            slot: OnceLock::from(Ok(classifier)),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn load(&self) -> Result<Arc<dyn Classifier>, ModelUnavailable> {
        self.slot
            .get_or_init(|| {
                let result = (self.loader)();
                match &result {
                    Ok(_) => info!(source = %self.source, "classifier loaded"),
                    Err(err) => error!(source = %self.source, error = %err, "classifier unavailable"),
                }
                result
            })
            .clone()
    }

    pub fn status(&self) -> ClassifierStatus {
        match self.slot.get() {
            None => ClassifierStatus::NotLoaded,
            Some(Ok(_)) => ClassifierStatus::Loaded,
            Some(Err(err)) => ClassifierStatus::Failed(err.clone()),
        }
    }
}

impl fmt::Debug for ClassifierCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierCache")
            .field("source", &self.source)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::features::FeatureVector;
    use crate::screening::model::PredictionError;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Constant;

    impl Classifier for Constant {
        fn predict(&self, _features: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
            Ok(vec![1.0])
        }
    }

    #[test]
    fn missing_artifact_is_reported_as_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");

        match load_artifact(&path) {
            Err(ModelUnavailable::NotFound { path: reported }) => assert_eq!(reported, path),
            Err(other) => panic!("expected not found, got {other:?}"),
            Ok(_) => panic!("expected not found, got a classifier"),
        }
    }

    #[test]
    fn malformed_artifact_is_reported_as_invalid() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ not json").expect("write artifact");

        let err = load_artifact(file.path()).err().expect("load fails");
        assert!(matches!(err, ModelUnavailable::Invalid { .. }));
        assert!(err.user_message().starts_with("Failed to load model:"));
    }

    #[test]
    fn failure_is_cached_and_not_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let cache = ClassifierCache::with_loader("counting", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ModelUnavailable::NotFound {
                path: PathBuf::from("recruitment_model.json"),
            })
        });

        assert_eq!(cache.status(), ClassifierStatus::NotLoaded);
        assert!(cache.load().is_err());
        assert!(cache.load().is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(cache.status(), ClassifierStatus::Failed(_)));
    }

    #[test]
    fn success_returns_the_same_handle() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let cache = ClassifierCache::with_loader("counting", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Constant) as Arc<dyn Classifier>)
        });

        let first = cache.load().expect("loads");
        let second = cache.load().expect("cached");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(), ClassifierStatus::Loaded);
    }

    #[test]
    fn preloaded_cache_is_loaded_from_the_start() {
        let classifier: Arc<dyn Classifier> = Arc::new(Constant);
        let cache = ClassifierCache::preloaded(Arc::clone(&classifier));

        assert_eq!(cache.status(), ClassifierStatus::Loaded);
        let loaded = cache.load().expect("preloaded classifier");
        assert!(Arc::ptr_eq(&loaded, &classifier));
        assert_eq!(cache.source(), "preloaded");
    }

    #[test]
    fn not_found_message_names_the_path() {
        let err = ModelUnavailable::NotFound {
            path: PathBuf::from("models/recruitment_model.json"),
        };
        assert_eq!(
            err.user_message(),
            "Model file not found. Make sure models/recruitment_model.json exists."
        );
    }
}
