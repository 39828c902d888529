//! Shared domain entities passed between pipeline stages.

use serde::{Deserialize, Serialize};

use crate::error::{MalarixError, Result};

/// Identifiers returned by the structural search, in relevance order.
pub type ProteinIdSet = Vec<String>;

/// A single-compound feature table produced by the external generator.
///
/// The reserved "Name" column has already been dropped; what remains is the
/// header-derived feature names and exactly one numeric row. The schema is
/// dictated by the external tool's version and is not validated beyond that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    feature_names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureMatrix {
    pub fn new(feature_names: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if feature_names.len() != values.len() {
            return Err(MalarixError::FeatureParse(format!(
                "{} feature names but {} values",
                feature_names.len(),
                values.len()
            )));
        }
        if values.is_empty() {
            return Err(MalarixError::FeatureParse("no feature columns".to_string()));
        }
        Ok(Self { feature_names, values })
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
