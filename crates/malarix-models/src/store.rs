//! Model store: fixed artifact filenames under a configured directory.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use malarix_common::{FeatureMatrix, MalarixError, Result};

use crate::linear::LinearModel;

/// Activity classifier artifact filename.
pub const ACTIVITY_MODEL_FILE: &str = "activity_model.json";
/// pIC50 regressor artifact filename.
pub const PIC50_MODEL_FILE: &str = "pic50_model.json";

/// Binary activity call against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLabel {
    Active,
    Inactive,
}

impl ActivityLabel {
    /// Map a classifier class code to a label. Code 1 means active;
    /// every other code, including unexpected ones, reads as inactive.
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            ActivityLabel::Active
        } else {
            ActivityLabel::Inactive
        }
    }
}

impl fmt::Display for ActivityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityLabel::Active => write!(f, "Active"),
            ActivityLabel::Inactive => write!(f, "Inactive"),
        }
    }
}

/// Resolves artifact paths. Loading happens per call so retrained files on
/// disk take effect immediately.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn activity_model_path(&self) -> PathBuf {
        self.dir.join(ACTIVITY_MODEL_FILE)
    }

    pub fn pic50_model_path(&self) -> PathBuf {
        self.dir.join(PIC50_MODEL_FILE)
    }

    /// Load the activity classifier from disk.
    pub fn load_activity_classifier(&self) -> Result<ActivityClassifier> {
        ActivityClassifier::from_path(&self.activity_model_path())
    }

    /// Load the pIC50 regressor from disk.
    pub fn load_potency_regressor(&self) -> Result<PotencyRegressor> {
        PotencyRegressor::from_path(&self.pic50_model_path())
    }
}

/// Binary linear classifier over the four Lipinski descriptors.
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    model: LinearModel,
}

impl ActivityClassifier {
    pub fn from_path(path: &Path) -> Result<Self> {
        let model = LinearModel::from_path(path)?;
        if model.classes.len() != 2 {
            return Err(MalarixError::ModelLoad(format!(
                "{}: classifier artifact needs exactly 2 classes, found {}",
                path.display(),
                model.classes.len()
            )));
        }
        debug!(path = %path.display(), width = model.expected_width(), "loaded activity classifier");
        Ok(Self { model })
    }

    pub fn expected_width(&self) -> usize {
        self.model.expected_width()
    }

    /// Predict the class code for one feature row.
    pub fn predict_code(&self, features: &[f64]) -> Result<i64> {
        let score = self.model.score(features)?;
        let code = if score >= 0.0 {
            self.model.classes[1]
        } else {
            self.model.classes[0]
        };
        Ok(code)
    }
}

/// Linear regressor over the externally generated feature matrix.
#[derive(Debug, Clone)]
pub struct PotencyRegressor {
    model: LinearModel,
}

impl PotencyRegressor {
    pub fn from_path(path: &Path) -> Result<Self> {
        let model = LinearModel::from_path(path)?;
        debug!(path = %path.display(), width = model.expected_width(), "loaded potency regressor");
        Ok(Self { model })
    }

    pub fn expected_width(&self) -> usize {
        self.model.expected_width()
    }

    /// Predict raw pIC50 for one feature matrix. Width must match the
    /// artifact; differing feature names with a matching width only warn,
    /// since generator versions rename columns without reordering them.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<f64> {
        if features.width() == self.model.expected_width()
            && features.feature_names() != self.model.feature_names.as_slice()
        {
            warn!(
                width = features.width(),
                "feature names differ from artifact; relying on column order"
            );
        }
        self.model.score(features.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn models_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ACTIVITY_MODEL_FILE),
            r#"{"feature_names":["MW","LogP","NumHDonors","NumHAcceptors"],
                "weights":[-0.002,0.5,-0.3,-0.1],"intercept":0.4,"classes":[0,1]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(PIC50_MODEL_FILE),
            r#"{"feature_names":["f1","f2","f3"],"weights":[1.0,2.0,3.0],"intercept":0.25}"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn label_mapping_is_tolerant() {
        assert_eq!(ActivityLabel::from_code(1), ActivityLabel::Active);
        assert_eq!(ActivityLabel::from_code(0), ActivityLabel::Inactive);
        assert_eq!(ActivityLabel::from_code(-3), ActivityLabel::Inactive);
        assert_eq!(ActivityLabel::from_code(7), ActivityLabel::Inactive);
        assert_eq!(ActivityLabel::Active.to_string(), "Active");
        assert_eq!(ActivityLabel::Inactive.to_string(), "Inactive");
    }

    #[test]
    fn classifier_round_trip() {
        let dir = models_dir();
        let store = ModelStore::new(dir.path());
        let clf = store.load_activity_classifier().unwrap();
        assert_eq!(clf.expected_width(), 4);

        // Small drug-like row scores just above zero under these weights.
        let code = clf.predict_code(&[46.07, 0.3, 1.0, 1.0]).unwrap();
        assert_eq!(code, 1);
        assert_eq!(ActivityLabel::from_code(code), ActivityLabel::Active);

        // Heavy, polar molecule pushes the score negative.
        let code = clf.predict_code(&[900.0, 0.0, 6.0, 12.0]).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn classifier_requires_two_classes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(ACTIVITY_MODEL_FILE),
            r#"{"feature_names":["a"],"weights":[1.0],"intercept":0.0}"#,
        )
        .unwrap();
        let err = ModelStore::new(dir.path())
            .load_activity_classifier()
            .unwrap_err();
        assert!(matches!(err, MalarixError::ModelLoad(_)));
    }

    #[test]
    fn regressor_predicts_and_checks_shape() {
        let dir = models_dir();
        let store = ModelStore::new(dir.path());
        let reg = store.load_potency_regressor().unwrap();

        let features = FeatureMatrix::new(
            vec!["f1".into(), "f2".into(), "f3".into()],
            vec![1.0, 0.5, 2.0],
        )
        .unwrap();
        let y = reg.predict(&features).unwrap();
        assert!((y - 8.25).abs() < 1e-12);

        let narrow =
            FeatureMatrix::new(vec!["f1".into(), "f2".into()], vec![1.0, 0.5]).unwrap();
        assert!(matches!(
            reg.predict(&narrow).unwrap_err(),
            MalarixError::FeatureShapeMismatch { expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn missing_artifact_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        assert!(matches!(
            store.load_potency_regressor().unwrap_err(),
            MalarixError::ModelLoad(_)
        ));
    }
}
