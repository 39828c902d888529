//! JSON-serialized linear predictor.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use malarix_common::{MalarixError, Result};

/// A linear model artifact as stored on disk.
///
/// `weights` and `feature_names` are index-aligned; `classes` is present
/// only for classifiers and holds the class codes in decision order
/// (negative score selects `classes[0]`, positive selects `classes[1]`).
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub classes: Vec<i64>,
}

impl LinearModel {
    /// Deserialize an artifact file. Any failure to read, parse, or make
    /// sense of the file is a `ModelLoad` failure.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            MalarixError::ModelLoad(format!("cannot read {}: {e}", path.display()))
        })?;
        let model: LinearModel = serde_json::from_str(&raw).map_err(|e| {
            MalarixError::ModelLoad(format!("cannot parse {}: {e}", path.display()))
        })?;
        if model.weights.len() != model.feature_names.len() {
            return Err(MalarixError::ModelLoad(format!(
                "{}: {} weights for {} feature names",
                path.display(),
                model.weights.len(),
                model.feature_names.len()
            )));
        }
        if model.feature_names.is_empty() {
            return Err(MalarixError::ModelLoad(format!(
                "{}: artifact has no features",
                path.display()
            )));
        }
        Ok(model)
    }

    pub fn expected_width(&self) -> usize {
        self.feature_names.len()
    }

    /// Linear score for one feature row. The row width must match the
    /// artifact exactly; a mismatch never silently truncates or pads.
    pub fn score(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.weights.len() {
            return Err(MalarixError::FeatureShapeMismatch {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_artifact(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_and_scores() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(
            &dir,
            "m.json",
            r#"{"feature_names":["a","b"],"weights":[2.0,-1.0],"intercept":0.5}"#,
        );
        let model = LinearModel::from_path(&path).unwrap();
        assert_eq!(model.expected_width(), 2);
        assert!((model.score(&[1.0, 3.0]).unwrap() - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn shape_mismatch_is_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(
            &dir,
            "m.json",
            r#"{"feature_names":["a","b"],"weights":[1.0,1.0],"intercept":0.0}"#,
        );
        let model = LinearModel::from_path(&path).unwrap();
        let err = model.score(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            MalarixError::FeatureShapeMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn bad_files_are_load_failures() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("nope.json");
        assert!(matches!(
            LinearModel::from_path(&missing).unwrap_err(),
            MalarixError::ModelLoad(_)
        ));

        let corrupt = write_artifact(&dir, "corrupt.json", "{not json");
        assert!(matches!(
            LinearModel::from_path(&corrupt).unwrap_err(),
            MalarixError::ModelLoad(_)
        ));

        let skewed = write_artifact(
            &dir,
            "skewed.json",
            r#"{"feature_names":["a"],"weights":[1.0,2.0],"intercept":0.0}"#,
        );
        assert!(matches!(
            LinearModel::from_path(&skewed).unwrap_err(),
            MalarixError::ModelLoad(_)
        ));
    }
}
