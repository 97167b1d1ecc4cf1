//! Lazily-initialised, process-shared model handle.
//!
//! The original design cached the model behind an ambient global; here the
//! handle is explicit — whoever owns the [`SharedModel`] decides its scope —
//! while keeping the same guarantees: the artifact is read from disk **at
//! most once**, first access loads it (safely under concurrent first access),
//! and every later access returns the same read-only instance.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;

use super::svm::{ModelError, SvmModel};

// ---------------------------------------------------------------------------
// SharedModel
// ---------------------------------------------------------------------------

/// Once-initialised shared handle to the classifier artifact.
///
/// Cheap to share behind an `Arc`; [`get`](Self::get) blocks other first
/// callers while one thread performs the load, then everyone observes the
/// same `&SvmModel`.
///
/// A failed load is fatal for the invocation: the error propagates to the
/// caller, which is expected to halt rather than retry.
///
/// # Example
///
/// ```rust,no_run
/// use voice_emotion::classifier::SharedModel;
///
/// let model = SharedModel::new("trained_model.json");
/// let class = model.get().unwrap().predict(&vec![0.0_f32; 2080]).unwrap();
/// println!("class index {class}");
/// ```
pub struct SharedModel {
    path: PathBuf,
    cell: OnceCell<SvmModel>,
    /// How many times the artifact has actually been read from disk.
    loads: AtomicUsize,
}

impl SharedModel {
    /// Create a handle for the artifact at `path`.  Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Get the loaded model, reading the artifact on first access.
    ///
    /// Concurrent first callers race on one guarded initialisation; exactly
    /// one of them performs the disk read.
    ///
    /// # Errors
    ///
    /// Propagates [`ModelError`] from [`SvmModel::load`] — missing or corrupt
    /// artifacts are unrecoverable for the application.
    pub fn get(&self) -> Result<&SvmModel, ModelError> {
        self.cell.get_or_try_init(|| {
            self.loads.fetch_add(1, Ordering::SeqCst);
            log::info!("loading classifier artifact: {}", self.path.display());
            SvmModel::load(&self.path)
        })
    }

    /// Number of times the artifact file has been read.
    ///
    /// Stays at 1 after any number of successful [`get`](Self::get) calls.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Path of the artifact this handle loads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    fn artifact_file() -> tempfile::NamedTempFile {
        let json = serde_json::json!({
            "kernel": "rbf",
            "gamma": 0.5,
            "n_features": 2,
            "classes": [0, 1],
            "n_support": [1, 1],
            "support_vectors": [[0.0, 0.0], [1.0, 1.0]],
            "dual_coef": [[1.0, -1.0]],
            "intercepts": [0.0]
        });
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.to_string().as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_is_idempotent() {
        let file = artifact_file();
        let shared = SharedModel::new(file.path());

        assert_eq!(shared.load_count(), 0);
        let first = shared.get().unwrap() as *const SvmModel;
        let second = shared.get().unwrap() as *const SvmModel;
        let third = shared.get().unwrap() as *const SvmModel;

        // Same logical instance, one disk read.
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(shared.load_count(), 1);
    }

    #[test]
    fn missing_artifact_propagates_not_found() {
        let shared = SharedModel::new("/nonexistent/trained_model.json");
        let err = shared.get().unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
    }

    #[test]
    fn concurrent_first_access_loads_once() {
        let file = artifact_file();
        let shared = Arc::new(SharedModel::new(file.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    shared.get().map(|m| m.n_features()).unwrap()
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), 2);
        }
        assert_eq!(shared.load_count(), 1);
    }

    #[test]
    fn path_is_reported() {
        let shared = SharedModel::new("trained_model.json");
        assert_eq!(shared.path(), Path::new("trained_model.json"));
    }
}
