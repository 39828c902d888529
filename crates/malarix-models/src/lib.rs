//! malarix-models — trained model artifacts and inference.
//!
//! Artifacts are linear predictors serialized as JSON (`feature_names`,
//! `weights`, `intercept`, and `classes` for classifiers). They are loaded
//! fresh on every invocation so a retrained file on disk takes effect
//! without a restart; nothing here caches.

pub mod linear;
pub mod store;

pub use linear::LinearModel;
pub use store::{
    ActivityClassifier, ActivityLabel, ModelStore, PotencyRegressor, ACTIVITY_MODEL_FILE,
    PIC50_MODEL_FILE,
};
