//! malarix-common — Shared errors, entities, and the capped HTTP client
//! used across all Malarix crates.

pub mod entities;
pub mod error;
pub mod sandbox;

pub use entities::{FeatureMatrix, ProteinIdSet};
pub use error::{MalarixError, Result};
