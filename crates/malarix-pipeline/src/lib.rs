//! malarix-pipeline — the prediction pipeline proper.
//!
//! Three pieces sit on top of the chem and models crates:
//! - [`features`]: runs the external batch descriptor tool in a temp dir and
//!   parses its CSV output into a feature matrix
//! - [`pdb`]: structure search against the RCSB API
//! - [`pipeline`]: the orchestrator dispatching the four task branches

pub mod features;
pub mod pdb;
pub mod pipeline;

pub use features::{FeatureGenerator, PadelRunner};
pub use pdb::StructureSearchClient;
pub use pipeline::{Pipeline, Task, TaskOutput};
