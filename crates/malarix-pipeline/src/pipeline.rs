//! Pipeline orchestrator.
//!
//! One `run()` call takes a raw SMILES string and a task selector to
//! completion. The structure is always validated first, whatever the task;
//! after that each branch stands alone. A failed branch surfaces its error
//! as-is: no retries, no fallback to another branch, no partial results.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use malarix_chem::descriptors::DISPLAY_TITLES;
use malarix_chem::{parse_smiles, DescriptorEngine, LipinskiDescriptors};
use malarix_common::{MalarixError, ProteinIdSet, Result};
use malarix_models::{ActivityLabel, ModelStore};

use crate::features::FeatureGenerator;
use crate::pdb::StructureSearchClient;

/// The four things the pipeline can do with a compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    LipinskiDescriptors,
    ActivityPrediction,
    PotencyPrediction,
    ProteinInteractions,
}

impl FromStr for Task {
    type Err = MalarixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "descriptors" => Ok(Task::LipinskiDescriptors),
            "activity" => Ok(Task::ActivityPrediction),
            "pic50" => Ok(Task::PotencyPrediction),
            "proteins" => Ok(Task::ProteinInteractions),
            other => Err(MalarixError::Config(format!(
                "unknown task {other:?} (expected descriptors, activity, pic50, or proteins)"
            ))),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Task::LipinskiDescriptors => "Compute Lipinski's Descriptors",
            Task::ActivityPrediction => "Predict the Compound's Activity",
            Task::PotencyPrediction => "Predict the Compound's pIC50",
            Task::ProteinInteractions => "Retrieve interacting proteins",
        };
        f.write_str(name)
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    Descriptors(LipinskiDescriptors),
    Activity(ActivityLabel),
    /// Raw predicted pIC50; two-decimal rounding happens at display time,
    /// never before.
    Potency(f64),
    Proteins(ProteinIdSet),
}

impl fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutput::Descriptors(d) => {
                writeln!(f, "{}: {:.2}", DISPLAY_TITLES[0], d.molecular_weight)?;
                writeln!(f, "{}: {:.2}", DISPLAY_TITLES[1], d.logp)?;
                writeln!(f, "{}: {}", DISPLAY_TITLES[2], d.h_bond_donors)?;
                write!(f, "{}: {}", DISPLAY_TITLES[3], d.h_bond_acceptors)
            }
            TaskOutput::Activity(label) => write!(f, "{label}"),
            TaskOutput::Potency(value) => {
                write!(f, "The pIC50 of your compound is {value:.2}")
            }
            TaskOutput::Proteins(ids) => {
                if ids.is_empty() {
                    write!(f, "No interacting structures found")
                } else {
                    write!(f, "{}", ids.join(", "))
                }
            }
        }
    }
}

/// Wires the stages together and dispatches tasks.
pub struct Pipeline {
    engine: DescriptorEngine,
    generator: Arc<dyn FeatureGenerator>,
    store: ModelStore,
    search: StructureSearchClient,
}

impl Pipeline {
    pub fn new(
        generator: Arc<dyn FeatureGenerator>,
        store: ModelStore,
        search: StructureSearchClient,
    ) -> Self {
        Self {
            engine: DescriptorEngine::new(),
            generator,
            store,
            search,
        }
    }

    /// Run one task against one compound.
    pub async fn run(&self, task: Task, smiles: &str) -> Result<TaskOutput> {
        // Validation gates every branch; the parser's error surfaces verbatim.
        parse_smiles(smiles)?;
        info!(%task, smiles, "pipeline task started");

        match task {
            Task::LipinskiDescriptors => {
                Ok(TaskOutput::Descriptors(self.engine.descriptors(smiles)?))
            }
            Task::ActivityPrediction => {
                let descriptors = self.engine.descriptors(smiles)?;
                let classifier = self.store.load_activity_classifier()?;
                let code = classifier.predict_code(&descriptors.to_row())?;
                Ok(TaskOutput::Activity(ActivityLabel::from_code(code)))
            }
            Task::PotencyPrediction => {
                let features = self.generator.generate(smiles).await?;
                let regressor = self.store.load_potency_regressor()?;
                let value = regressor.predict(&features)?;
                Ok(TaskOutput::Potency(value))
            }
            Task::ProteinInteractions => {
                let ids = self.search.related_structures(smiles).await?;
                Ok(TaskOutput::Proteins(ids))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use malarix_common::FeatureMatrix;

    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeatureGenerator for CountingGenerator {
        async fn generate(&self, _smiles: &str) -> Result<FeatureMatrix> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            FeatureMatrix::new(vec!["f1".into()], vec![1.0])
        }
    }

    fn pipeline_with(generator: Arc<CountingGenerator>, dir: &std::path::Path) -> Pipeline {
        Pipeline::new(
            generator,
            ModelStore::new(dir),
            StructureSearchClient::new().unwrap(),
        )
    }

    #[test]
    fn task_names_parse() {
        assert_eq!("descriptors".parse::<Task>().unwrap(), Task::LipinskiDescriptors);
        assert_eq!("ACTIVITY".parse::<Task>().unwrap(), Task::ActivityPrediction);
        assert_eq!("pic50".parse::<Task>().unwrap(), Task::PotencyPrediction);
        assert_eq!("proteins".parse::<Task>().unwrap(), Task::ProteinInteractions);
        assert!("docking".parse::<Task>().is_err());
    }

    #[tokio::test]
    async fn invalid_structure_stops_before_any_branch_work() {
        let generator = Arc::new(CountingGenerator { calls: AtomicUsize::new(0) });
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(Arc::clone(&generator), dir.path());

        let err = pipeline
            .run(Task::PotencyPrediction, "not a structure")
            .await
            .unwrap_err();
        assert!(matches!(err, MalarixError::InvalidStructure(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn descriptor_branch_does_not_touch_models_or_tools() {
        let generator = Arc::new(CountingGenerator { calls: AtomicUsize::new(0) });
        // Empty models dir: descriptor branch must still succeed.
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(Arc::clone(&generator), dir.path());

        let out = pipeline.run(Task::LipinskiDescriptors, "CCO").await.unwrap();
        match out {
            TaskOutput::Descriptors(d) => {
                assert!((d.molecular_weight - 46.07).abs() < 0.01);
                assert_eq!(d.h_bond_donors, 1);
                assert_eq!(d.h_bond_acceptors, 1);
            }
            other => panic!("unexpected output {other:?}"),
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn potency_branch_needs_its_model() {
        let generator = Arc::new(CountingGenerator { calls: AtomicUsize::new(0) });
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_with(Arc::clone(&generator), dir.path());

        // Features generate fine; the missing artifact fails the branch and
        // nothing falls back.
        let err = pipeline.run(Task::PotencyPrediction, "CCO").await.unwrap_err();
        assert!(matches!(err, MalarixError::ModelLoad(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn potency_rounds_only_in_display() {
        let out = TaskOutput::Potency(6.12345);
        assert_eq!(out.to_string(), "The pIC50 of your compound is 6.12");
        let out = TaskOutput::Potency(3.14159);
        assert_eq!(out.to_string(), "The pIC50 of your compound is 3.14");
    }

    #[test]
    fn protein_output_formats() {
        let out = TaskOutput::Proteins(vec!["4TZK".into(), "1U72".into()]);
        assert_eq!(out.to_string(), "4TZK, 1U72");
        assert_eq!(
            TaskOutput::Proteins(Vec::new()).to_string(),
            "No interacting structures found"
        );
    }

    #[test]
    fn descriptor_output_uses_display_titles() {
        let out = TaskOutput::Descriptors(LipinskiDescriptors {
            molecular_weight: 46.069,
            logp: 0.28,
            h_bond_donors: 1,
            h_bond_acceptors: 1,
        });
        let text = out.to_string();
        assert!(text.contains("Molecular Weight: 46.07"));
        assert!(text.contains("Octanol-Water Partition Coefficient (LogP): 0.28"));
        assert!(text.contains("Number of Hydrogen Bond Donors: 1"));
        assert!(text.contains("Number of Hydrogen Bond Acceptors: 1"));
    }
}
