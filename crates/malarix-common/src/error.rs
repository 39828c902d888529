use thiserror::Error;

#[derive(Debug, Error)]
pub enum MalarixError {
    #[error("Invalid SMILES string: {0}")]
    InvalidStructure(String),

    #[error("External feature generator failed: {0}")]
    ExternalTool(String),

    #[error("Feature table parse error: {0}")]
    FeatureParse(String),

    #[error("Model artifact load error: {0}")]
    ModelLoad(String),

    #[error("Feature shape mismatch: model expects {expected} features, got {actual}")]
    FeatureShapeMismatch { expected: usize, actual: usize },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Security error: {0}")]
    Security(String),
}

impl MalarixError {
    /// One stable user-facing message per failure kind.
    ///
    /// This is the message the pipeline boundary renders; internal detail
    /// stays in the `Display` impl and the logs. No partial results
    /// accompany any of these.
    pub fn user_message(&self) -> String {
        match self {
            MalarixError::InvalidStructure(_) => {
                "Invalid SMILES string. Enter a valid canonical SMILES.".to_string()
            }
            MalarixError::ExternalTool(_) => {
                "The descriptor generator could not be run. No prediction was made.".to_string()
            }
            MalarixError::FeatureParse(_) => {
                "The descriptor generator produced unreadable output. No prediction was made."
                    .to_string()
            }
            MalarixError::ModelLoad(_) => {
                "A prediction model could not be loaded.".to_string()
            }
            MalarixError::FeatureShapeMismatch { .. } => {
                "The computed features do not match the model's expected inputs.".to_string()
            }
            MalarixError::Http(_) => "A network request failed.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MalarixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_both_widths() {
        let err = MalarixError::FeatureShapeMismatch { expected: 4, actual: 3 };
        let msg = err.to_string();
        assert!(msg.contains('4') && msg.contains('3'), "{msg}");
    }

    #[test]
    fn user_message_hides_internal_detail() {
        let err = MalarixError::InvalidStructure("ring closure digit without atom".into());
        assert!(!err.user_message().contains("ring closure"));
    }
}
