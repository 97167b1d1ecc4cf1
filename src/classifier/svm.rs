//! Pre-trained support-vector classifier: JSON artifact, RBF kernel,
//! one-vs-one decision with majority vote.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ModelError
// ---------------------------------------------------------------------------

/// Errors that can arise from the classifier subsystem.
///
/// Artifact problems ([`NotFound`](Self::NotFound), [`Read`](Self::Read),
/// [`Parse`](Self::Parse), [`Invalid`](Self::Invalid)) are fatal to the
/// application — there is no retry path without a valid model on disk.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file was not found at the given path.
    #[error("model artifact not found: {0}")]
    NotFound(String),

    /// The artifact file exists but could not be read.
    #[error("failed to read model artifact: {0}")]
    Read(#[from] std::io::Error),

    /// The artifact file is not valid JSON / does not match the schema.
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// The artifact parsed but its dimensions are inconsistent (corrupt or
    /// produced by an incompatible exporter).
    #[error("model artifact is internally inconsistent: {0}")]
    Invalid(String),

    /// The input vector does not match the artifact's feature count.
    #[error("feature length mismatch: got {got}, model expects {want}")]
    FeatureLen { got: usize, want: usize },
}

// ---------------------------------------------------------------------------
// SvmModel
// ---------------------------------------------------------------------------

/// A pre-trained RBF-kernel SVM in the one-vs-one layout.
///
/// For `n` classes the artifact carries `n*(n-1)/2` binary sub-problems.
/// Support vectors are stored grouped by class (`n_support[c]` rows for
/// class `c`, in class order); `dual_coef` has `n - 1` rows, where the
/// coefficients of class `i`'s support vectors for the sub-problem against
/// class `j` live in row `j - 1` when `j > i` and row `j` otherwise.
///
/// The struct deserializes straight from the JSON artifact and is read-only
/// afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct SvmModel {
    /// Kernel name; only `"rbf"` is supported.
    kernel: String,
    /// RBF kernel width: `K(x, v) = exp(-gamma * ||x - v||^2)`.
    gamma: f32,
    /// Expected input vector length (2080 for the emotion artifact).
    n_features: usize,
    /// Class indices in training order; predictions come from this list.
    classes: Vec<u32>,
    /// Support-vector count per class, same order as `classes`.
    n_support: Vec<usize>,
    /// All support vectors, grouped by class.
    support_vectors: Vec<Vec<f32>>,
    /// Dual coefficients, `(n_classes - 1) × total_sv`.
    dual_coef: Vec<Vec<f32>>,
    /// Per-pair intercepts, `n_classes * (n_classes - 1) / 2`, pair order
    /// `(0,1), (0,2), …, (0,n-1), (1,2), …`.
    intercepts: Vec<f32>,
}

impl SvmModel {
    /// Load and validate an artifact from `path`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::NotFound`] — `path` does not exist.
    /// - [`ModelError::Read`] / [`ModelError::Parse`] — unreadable or
    ///   malformed file.
    /// - [`ModelError::Invalid`] — dimensions do not agree with each other.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ModelError::NotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)?;
        let model: SvmModel = serde_json::from_str(&raw)?;
        model.validate()?;

        log::info!(
            "classifier loaded: {} classes, {} support vectors, {} features",
            model.classes.len(),
            model.support_vectors.len(),
            model.n_features
        );

        Ok(model)
    }

    /// Check that every dimension in the artifact agrees with the others.
    fn validate(&self) -> Result<(), ModelError> {
        let invalid = |msg: String| Err(ModelError::Invalid(msg));

        if self.kernel != "rbf" {
            return invalid(format!("unsupported kernel {:?}", self.kernel));
        }
        if self.classes.len() < 2 {
            return invalid(format!("need at least 2 classes, got {}", self.classes.len()));
        }
        if self.n_support.len() != self.classes.len() {
            return invalid(format!(
                "n_support has {} entries for {} classes",
                self.n_support.len(),
                self.classes.len()
            ));
        }

        let total_sv: usize = self.n_support.iter().sum();
        if total_sv != self.support_vectors.len() {
            return invalid(format!(
                "n_support sums to {total_sv} but {} support vectors are present",
                self.support_vectors.len()
            ));
        }
        if let Some(bad) = self
            .support_vectors
            .iter()
            .position(|sv| sv.len() != self.n_features)
        {
            return invalid(format!(
                "support vector {bad} has {} features, expected {}",
                self.support_vectors[bad].len(),
                self.n_features
            ));
        }

        let n = self.classes.len();
        if self.dual_coef.len() != n - 1 {
            return invalid(format!(
                "dual_coef has {} rows, expected {}",
                self.dual_coef.len(),
                n - 1
            ));
        }
        if self.dual_coef.iter().any(|row| row.len() != total_sv) {
            return invalid("dual_coef row length != support vector count".into());
        }

        let pairs = n * (n - 1) / 2;
        if self.intercepts.len() != pairs {
            return invalid(format!(
                "{} intercepts for {pairs} class pairs",
                self.intercepts.len()
            ));
        }

        Ok(())
    }

    /// Expected input vector length.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Class indices in training order.
    pub fn classes(&self) -> &[u32] {
        &self.classes
    }

    /// Predict the class index for a single feature vector.
    ///
    /// The decision routine is batch-oriented, so the sample is wrapped as a
    /// batch of one.
    ///
    /// # Errors
    ///
    /// [`ModelError::FeatureLen`] when `features.len() != n_features`.
    pub fn predict(&self, features: &[f32]) -> Result<u32, ModelError> {
        Ok(self.predict_batch(&[features])?[0])
    }

    /// Predict class indices for a batch of feature vectors.
    fn predict_batch(&self, batch: &[&[f32]]) -> Result<Vec<u32>, ModelError> {
        for sample in batch {
            if sample.len() != self.n_features {
                return Err(ModelError::FeatureLen {
                    got: sample.len(),
                    want: self.n_features,
                });
            }
        }

        Ok(batch.iter().map(|sample| self.predict_one(sample)).collect())
    }

    /// One-vs-one decision for a single (length-checked) sample.
    fn predict_one(&self, sample: &[f32]) -> u32 {
        // Kernel row: K(sample, sv) for every support vector.
        let kernel: Vec<f32> = self
            .support_vectors
            .iter()
            .map(|sv| {
                let dist_sq: f32 = sample
                    .iter()
                    .zip(sv.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                (-self.gamma * dist_sq).exp()
            })
            .collect();

        // Start index of each class's support-vector block.
        let n = self.classes.len();
        let mut starts = Vec::with_capacity(n);
        let mut acc = 0;
        for &count in &self.n_support {
            starts.push(acc);
            acc += count;
        }

        let mut votes = vec![0u32; n];
        let mut pair = 0;

        for i in 0..n {
            for j in (i + 1)..n {
                let mut decision = self.intercepts[pair];

                // Class i's support vectors, coefficients from row j-1.
                for sv in starts[i]..starts[i] + self.n_support[i] {
                    decision += self.dual_coef[j - 1][sv] * kernel[sv];
                }
                // Class j's support vectors, coefficients from row i.
                for sv in starts[j]..starts[j] + self.n_support[j] {
                    decision += self.dual_coef[i][sv] * kernel[sv];
                }

                if decision > 0.0 {
                    votes[i] += 1;
                } else {
                    votes[j] += 1;
                }
                pair += 1;
            }
        }

        // First maximum wins ties.
        let mut winner = 0;
        for (idx, &count) in votes.iter().enumerate() {
            if count > votes[winner] {
                winner = idx;
            }
        }

        self.classes[winner]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// A 3-class toy model with one unit support vector per class at
    /// (0,0), (1,0), (0,1).  Coefficients are ±1 so each pair's decision is
    /// `K(x, sv_i) - K(x, sv_j)` — the nearer support vector wins.
    fn toy_model() -> SvmModel {
        serde_json::from_value(serde_json::json!({
            "kernel": "rbf",
            "gamma": 1.0,
            "n_features": 2,
            "classes": [0, 2, 7],
            "n_support": [1, 1, 1],
            "support_vectors": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            "dual_coef": [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0]],
            "intercepts": [0.0, 0.0, 0.0]
        }))
        .unwrap()
    }

    fn write_artifact(json: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.to_string().as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    // ---- prediction --------------------------------------------------------

    #[test]
    fn predicts_class_of_nearest_support_vector() {
        let model = toy_model();
        assert_eq!(model.predict(&[0.05, 0.05]).unwrap(), 0);
        assert_eq!(model.predict(&[0.9, 0.1]).unwrap(), 2);
        assert_eq!(model.predict(&[0.1, 0.9]).unwrap(), 7);
    }

    #[test]
    fn prediction_returns_artifact_class_index_not_position() {
        // Position 1 in `classes` carries index 2 — the mapping must come
        // from the artifact, not from the vote position.
        let model = toy_model();
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 2);
    }

    #[test]
    fn feature_length_mismatch_is_rejected() {
        let model = toy_model();
        let err = model.predict(&[0.0; 3]).unwrap_err();
        assert!(matches!(err, ModelError::FeatureLen { got: 3, want: 2 }));
    }

    #[test]
    fn intercept_shifts_the_decision() {
        // Same geometry, but a strong positive intercept on every pair pulls
        // all decisions toward the lower-indexed class.
        let mut model = toy_model();
        model.intercepts = vec![10.0, 10.0, 10.0];
        assert_eq!(model.predict(&[0.9, 0.1]).unwrap(), 0);
    }

    #[test]
    fn accessors_report_artifact_metadata() {
        let model = toy_model();
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.classes(), &[0, 2, 7]);
    }

    // ---- load --------------------------------------------------------------

    #[test]
    fn load_missing_artifact_returns_not_found() {
        let result = SvmModel::load("/nonexistent/trained_model.json");
        assert!(
            matches!(result, Err(ModelError::NotFound(_))),
            "expected NotFound, got: {result:?}"
        );
    }

    #[test]
    fn load_garbage_returns_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json at all").unwrap();
        file.flush().unwrap();

        let result = SvmModel::load(file.path());
        assert!(matches!(result, Err(ModelError::Parse(_))));
    }

    #[test]
    fn load_valid_artifact_round_trips() {
        let file = write_artifact(&serde_json::json!({
            "kernel": "rbf",
            "gamma": 0.5,
            "n_features": 2,
            "classes": [0, 1],
            "n_support": [1, 1],
            "support_vectors": [[0.0, 0.0], [1.0, 1.0]],
            "dual_coef": [[1.0, -1.0]],
            "intercepts": [0.0]
        }));

        let model = SvmModel::load(file.path()).unwrap();
        assert_eq!(model.predict(&[0.1, 0.1]).unwrap(), 0);
        assert_eq!(model.predict(&[0.9, 0.9]).unwrap(), 1);
    }

    // ---- validation --------------------------------------------------------

    #[test]
    fn inconsistent_support_counts_are_invalid() {
        let file = write_artifact(&serde_json::json!({
            "kernel": "rbf",
            "gamma": 0.5,
            "n_features": 2,
            "classes": [0, 1],
            "n_support": [2, 1], // sums to 3, only 2 vectors present
            "support_vectors": [[0.0, 0.0], [1.0, 1.0]],
            "dual_coef": [[1.0, -1.0]],
            "intercepts": [0.0]
        }));

        let result = SvmModel::load(file.path());
        assert!(matches!(result, Err(ModelError::Invalid(_))));
    }

    #[test]
    fn wrong_kernel_is_invalid() {
        let file = write_artifact(&serde_json::json!({
            "kernel": "poly",
            "gamma": 0.5,
            "n_features": 2,
            "classes": [0, 1],
            "n_support": [1, 1],
            "support_vectors": [[0.0, 0.0], [1.0, 1.0]],
            "dual_coef": [[1.0, -1.0]],
            "intercepts": [0.0]
        }));

        let result = SvmModel::load(file.path());
        assert!(matches!(result, Err(ModelError::Invalid(_))));
    }

    #[test]
    fn wrong_intercept_count_is_invalid() {
        let file = write_artifact(&serde_json::json!({
            "kernel": "rbf",
            "gamma": 0.5,
            "n_features": 2,
            "classes": [0, 1],
            "n_support": [1, 1],
            "support_vectors": [[0.0, 0.0], [1.0, 1.0]],
            "dual_coef": [[1.0, -1.0]],
            "intercepts": [0.0, 0.0]
        }));

        let result = SvmModel::load(file.path());
        assert!(matches!(result, Err(ModelError::Invalid(_))));
    }

    #[test]
    fn support_vector_with_wrong_width_is_invalid() {
        let file = write_artifact(&serde_json::json!({
            "kernel": "rbf",
            "gamma": 0.5,
            "n_features": 2,
            "classes": [0, 1],
            "n_support": [1, 1],
            "support_vectors": [[0.0, 0.0], [1.0]],
            "dual_coef": [[1.0, -1.0]],
            "intercepts": [0.0]
        }));

        let result = SvmModel::load(file.path());
        assert!(matches!(result, Err(ModelError::Invalid(_))));
    }
}
