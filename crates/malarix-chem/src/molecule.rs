//! Molecular graph representation.

use serde::{Deserialize, Serialize};

use crate::element::Element;

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Integer bond order used for valence accounting. Aromatic bonds count
    /// as one here; the aromatic valence contribution is handled separately
    /// during implicit-H assignment (see `smiles::assign_implicit_hydrogens`).
    pub fn valence_units(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// An atom in a molecular graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: i8,
    pub is_aromatic: bool,
    /// H count stated inside a bracket atom, e.g. `[nH]`. `None` for
    /// organic-subset atoms, where hydrogens are filled in from valence.
    pub explicit_h: Option<u8>,
    /// Filled in after parsing; zero until `assign_implicit_hydrogens` runs.
    pub implicit_h: u8,
}

/// A bond between two atoms, stored with the lower index first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub atom_0: usize,
    pub atom_1: usize,
    pub order: BondOrder,
}

/// A molecular graph with atoms, bonds, and adjacency information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom_idx] = Vec<(neighbor_atom_idx, bond_idx)>
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Build a molecule, deriving the adjacency list from atoms and bonds.
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom_0].push((bond.atom_1, bi));
            adjacency[bond.atom_1].push((bond.atom_0, bi));
        }
        Molecule { atoms, bonds, adjacency }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Graph degree of an atom (explicit bonds only).
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Sum of bond valence units at an atom (aromatic counted as 1).
    pub fn bond_valence_sum(&self, atom_idx: usize) -> u8 {
        self.adjacency[atom_idx]
            .iter()
            .map(|&(_, bi)| self.bonds[bi].order.valence_units())
            .sum()
    }

    /// Whether the atom participates in at least one bond of the given order.
    pub fn has_bond_of_order(&self, atom_idx: usize, order: BondOrder) -> bool {
        self.adjacency[atom_idx]
            .iter()
            .any(|&(_, bi)| self.bonds[bi].order == order)
    }

    /// Total hydrogens on an atom: implicit plus explicitly drawn H neighbors.
    pub fn hydrogens_on(&self, atom_idx: usize) -> u8 {
        let explicit = self.adjacency[atom_idx]
            .iter()
            .filter(|&&(n, _)| self.atoms[n].element == Element::Hydrogen)
            .count() as u8;
        self.atoms[atom_idx].implicit_h + explicit
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms
            .iter()
            .filter(|a| a.element != Element::Hydrogen)
            .count()
    }
}
