//! malarix-chem — Molecule parsing and Lipinski descriptor computation.
//!
//! This crate is the pure, no-I/O core of the pipeline:
//! 1. Parsing a SMILES string into a molecular graph (with validation)
//! 2. Implicit hydrogen assignment and valence checking
//! 3. The four Lipinski descriptors: MW, LogP, H-bond donors/acceptors
//!
//! Everything downstream (models, external feature generation, structural
//! search) assumes its molecule input has already passed through
//! [`parse_smiles`] and does not re-validate.

pub mod descriptors;
pub mod element;
pub mod molecule;
pub mod smiles;

pub use descriptors::{lipinski_descriptors, DescriptorEngine, LipinskiDescriptors};
pub use element::Element;
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use smiles::parse_smiles;
