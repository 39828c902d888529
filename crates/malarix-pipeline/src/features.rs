//! External feature generation via a batch descriptor tool.
//!
//! The tool contract comes from PaDEL-style wrappers: it reads a
//! `molecule.smi` file from its working directory and writes
//! `descriptors_output.csv` next to it. Each invocation gets a fresh
//! temporary directory, so concurrent runs never share files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use malarix_common::{FeatureMatrix, MalarixError, Result};

/// Input filename the tool expects in its working directory.
pub const INPUT_FILE: &str = "molecule.smi";
/// Output filename the tool writes to its working directory.
pub const OUTPUT_FILE: &str = "descriptors_output.csv";

/// Placeholder compound name written into the input file; the tool echoes
/// it back in the output's "Name" column.
const COMPOUND_NAME: &str = "compound_1";

/// Something that turns a SMILES string into a wide feature row.
///
/// Production uses [`PadelRunner`]; tests inject fakes.
#[async_trait]
pub trait FeatureGenerator: Send + Sync {
    async fn generate(&self, smiles: &str) -> Result<FeatureMatrix>;
}

/// Runs the configured generator script as a subprocess.
pub struct PadelRunner {
    script: PathBuf,
    timeout: Duration,
}

impl PadelRunner {
    pub fn new<P: AsRef<Path>>(script: P, timeout: Duration) -> Self {
        Self {
            script: script.as_ref().to_path_buf(),
            timeout,
        }
    }
}

#[async_trait]
impl FeatureGenerator for PadelRunner {
    async fn generate(&self, smiles: &str) -> Result<FeatureMatrix> {
        // The script runs with cwd = temp dir, so its own path must stay
        // valid from there.
        let script = std::fs::canonicalize(&self.script).map_err(|e| {
            MalarixError::ExternalTool(format!(
                "generator script {} not found: {e}",
                self.script.display()
            ))
        })?;

        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join(INPUT_FILE);
        tokio::fs::write(&input, format!("{smiles}\t{COMPOUND_NAME}\n")).await?;

        info!(script = %script.display(), "running feature generator");
        let run = Command::new(&script)
            .current_dir(workdir.path())
            .kill_on_drop(true)
            .output();
        let output = timeout(self.timeout, run)
            .await
            .map_err(|_| {
                MalarixError::ExternalTool(format!(
                    "feature generator timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                MalarixError::ExternalTool(format!(
                    "cannot launch {}: {e}",
                    script.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MalarixError::ExternalTool(format!(
                "feature generator exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        debug!("feature generator completed");

        parse_descriptor_csv(&workdir.path().join(OUTPUT_FILE))
    }
}

/// Parse the tool's output CSV into a feature matrix.
///
/// Requires a header whose first column is "Name", exactly one data row, and
/// at least one numeric feature column. The Name column is dropped; the
/// remaining header names become the feature names.
pub fn parse_descriptor_csv(path: &Path) -> Result<FeatureMatrix> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        MalarixError::FeatureParse(format!("cannot open {}: {e}", path.display()))
    })?;

    let headers = reader
        .headers()
        .map_err(|e| MalarixError::FeatureParse(format!("unreadable header: {e}")))?
        .clone();
    if headers.get(0) != Some("Name") {
        return Err(MalarixError::FeatureParse(format!(
            "first column must be \"Name\", found {:?}",
            headers.get(0).unwrap_or("")
        )));
    }
    let feature_names: Vec<String> = headers.iter().skip(1).map(String::from).collect();

    let mut values: Option<Vec<f64>> = None;
    for record in reader.records() {
        let record =
            record.map_err(|e| MalarixError::FeatureParse(format!("bad record: {e}")))?;
        if values.is_some() {
            return Err(MalarixError::FeatureParse(
                "expected exactly one data row".to_string(),
            ));
        }
        let row = record
            .iter()
            .skip(1)
            .enumerate()
            .map(|(i, cell)| {
                cell.trim().parse::<f64>().map_err(|_| {
                    MalarixError::FeatureParse(format!(
                        "non-numeric value {:?} in column {}",
                        cell,
                        feature_names.get(i).map(String::as_str).unwrap_or("?")
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        values = Some(row);
    }

    let values = values
        .ok_or_else(|| MalarixError::FeatureParse("output has no data row".to_string()))?;
    FeatureMatrix::new(feature_names, values)
}
