//! Element properties needed for descriptor computation.

use serde::{Deserialize, Serialize};

/// The elements the SMILES parser accepts.
///
/// Covers the organic subset plus the halogens, the alphabet the activity
/// model's training compounds were drawn from. Anything else fails parsing
/// as an invalid structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Hydrogen,
    Boron,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Phosphorus,
    Sulfur,
    Chlorine,
    Bromine,
    Iodine,
}

impl Element {
    /// Look up an element from its symbol ("C", "Cl", ...). Case-sensitive
    /// on the first letter having been uppercased by the caller.
    pub fn from_symbol(sym: &str) -> Option<Self> {
        match sym {
            "H" => Some(Element::Hydrogen),
            "B" => Some(Element::Boron),
            "C" => Some(Element::Carbon),
            "N" => Some(Element::Nitrogen),
            "O" => Some(Element::Oxygen),
            "F" => Some(Element::Fluorine),
            "P" => Some(Element::Phosphorus),
            "S" => Some(Element::Sulfur),
            "Cl" => Some(Element::Chlorine),
            "Br" => Some(Element::Bromine),
            "I" => Some(Element::Iodine),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Hydrogen => "H",
            Element::Boron => "B",
            Element::Carbon => "C",
            Element::Nitrogen => "N",
            Element::Oxygen => "O",
            Element::Fluorine => "F",
            Element::Phosphorus => "P",
            Element::Sulfur => "S",
            Element::Chlorine => "Cl",
            Element::Bromine => "Br",
            Element::Iodine => "I",
        }
    }

    /// Standard (abundance-averaged) atomic weight in Daltons.
    pub fn atomic_weight(&self) -> f64 {
        match self {
            Element::Hydrogen => 1.008,
            Element::Boron => 10.81,
            Element::Carbon => 12.011,
            Element::Nitrogen => 14.007,
            Element::Oxygen => 15.999,
            Element::Fluorine => 18.998,
            Element::Phosphorus => 30.974,
            Element::Sulfur => 32.06,
            Element::Chlorine => 35.45,
            Element::Bromine => 79.904,
            Element::Iodine => 126.904,
        }
    }

    /// Allowed valences for implicit hydrogen filling, lowest first.
    pub fn valences(&self) -> &'static [u8] {
        match self {
            Element::Hydrogen => &[1],
            Element::Boron => &[3],
            Element::Carbon => &[4],
            Element::Nitrogen => &[3, 5],
            Element::Oxygen => &[2],
            Element::Fluorine => &[1],
            Element::Phosphorus => &[3, 5],
            Element::Sulfur => &[2, 4, 6],
            Element::Chlorine => &[1],
            Element::Bromine => &[1],
            Element::Iodine => &[1],
        }
    }

    /// Whether this element may be written lowercase (aromatic) in SMILES.
    pub fn supports_aromatic(&self) -> bool {
        matches!(
            self,
            Element::Boron
                | Element::Carbon
                | Element::Nitrogen
                | Element::Oxygen
                | Element::Phosphorus
                | Element::Sulfur
        )
    }

    /// Whether an aromatic atom of this element contributes a formal double
    /// bond in a Kekulé structure. Aromatic O/S donate a lone pair instead
    /// and get no valence bump during implicit-H assignment.
    pub fn aromatic_double_bond(&self) -> bool {
        matches!(
            self,
            Element::Boron | Element::Carbon | Element::Nitrogen | Element::Phosphorus
        )
    }
}
