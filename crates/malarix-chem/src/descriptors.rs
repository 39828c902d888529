//! Lipinski descriptor computation.
//!
//! Four values per molecule, in a fixed order the downstream classifier
//! depends on: molecular weight, LogP, hydrogen bond donor count, hydrogen
//! bond acceptor count. Molecular weight uses average atomic weights and
//! includes every hydrogen. LogP is a Wildman-Crippen-style estimate from
//! per-atom contributions.

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use malarix_common::Result;

use crate::element::Element;
use crate::molecule::{BondOrder, Molecule};
use crate::smiles::parse_smiles;

/// Feature names in classifier input order.
pub const FEATURE_NAMES: [&str; 4] = ["MW", "LogP", "NumHDonors", "NumHAcceptors"];

/// Human-readable column titles for rendered descriptor tables.
pub const DISPLAY_TITLES: [&str; 4] = [
    "Molecular Weight",
    "Octanol-Water Partition Coefficient (LogP)",
    "Number of Hydrogen Bond Donors",
    "Number of Hydrogen Bond Acceptors",
];

/// The four Lipinski descriptors for one molecule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LipinskiDescriptors {
    pub molecular_weight: f64,
    pub logp: f64,
    pub h_bond_donors: u32,
    pub h_bond_acceptors: u32,
}

impl LipinskiDescriptors {
    /// Values in `FEATURE_NAMES` order.
    pub fn to_row(&self) -> [f64; 4] {
        [
            self.molecular_weight,
            self.logp,
            self.h_bond_donors as f64,
            self.h_bond_acceptors as f64,
        ]
    }

    /// Number of Lipinski rule-of-five criteria this molecule violates.
    pub fn ro5_violations(&self) -> u32 {
        let mut violations = 0;
        if self.molecular_weight > 500.0 {
            violations += 1;
        }
        if self.logp > 5.0 {
            violations += 1;
        }
        if self.h_bond_donors > 5 {
            violations += 1;
        }
        if self.h_bond_acceptors > 10 {
            violations += 1;
        }
        violations
    }
}

/// Compute all four descriptors from a parsed molecule.
pub fn lipinski_descriptors(mol: &Molecule) -> LipinskiDescriptors {
    LipinskiDescriptors {
        molecular_weight: molecular_weight(mol),
        logp: crippen_logp(mol),
        h_bond_donors: h_bond_donors(mol),
        h_bond_acceptors: h_bond_acceptors(mol),
    }
}

/// Average molecular weight including implicit and explicit hydrogens.
pub fn molecular_weight(mol: &Molecule) -> f64 {
    let mut mw = 0.0;
    for (i, atom) in mol.atoms.iter().enumerate() {
        mw += atom.element.atomic_weight();
        if atom.element != Element::Hydrogen {
            mw += f64::from(mol.hydrogens_on(i)) * Element::Hydrogen.atomic_weight();
        }
    }
    mw
}

/// Hydrogen bond donors: N or O atoms carrying at least one hydrogen.
pub fn h_bond_donors(mol: &Molecule) -> u32 {
    let mut count = 0;
    for (i, atom) in mol.atoms.iter().enumerate() {
        let donor_element =
            atom.element == Element::Nitrogen || atom.element == Element::Oxygen;
        if donor_element && mol.hydrogens_on(i) > 0 {
            count += 1;
        }
    }
    count
}

/// Hydrogen bond acceptors: N and O atoms, except pyrrole-type aromatic NH
/// whose lone pair sits in the ring pi system.
pub fn h_bond_acceptors(mol: &Molecule) -> u32 {
    let mut count = 0;
    for (i, atom) in mol.atoms.iter().enumerate() {
        match atom.element {
            Element::Oxygen => count += 1,
            Element::Nitrogen => {
                if !(atom.is_aromatic && mol.hydrogens_on(i) > 0) {
                    count += 1;
                }
            }
            _ => {}
        }
    }
    count
}

/// Wildman-Crippen-style LogP estimate.
///
/// Per-atom contributions keyed off element, aromaticity, degree, and double
/// bond presence, plus 0.1230 per hydrogen on carbon and -0.2677 per
/// hydrogen on a heteroatom.
pub fn crippen_logp(mol: &Molecule) -> f64 {
    let mut logp = 0.0;

    for (i, atom) in mol.atoms.iter().enumerate() {
        logp += crippen_atom_contribution(mol, i);

        if atom.element == Element::Hydrogen {
            continue;
        }
        let h_count = f64::from(mol.hydrogens_on(i));
        if atom.element == Element::Carbon {
            logp += h_count * 0.1230;
        } else {
            logp += h_count * (-0.2677);
        }
    }
    logp
}

fn crippen_atom_contribution(mol: &Molecule, atom_idx: usize) -> f64 {
    let atom = &mol.atoms[atom_idx];
    let degree = mol.degree(atom_idx);
    let has_double_bond = mol.has_bond_of_order(atom_idx, BondOrder::Double);
    let has_hetero_neighbor = mol.adjacency[atom_idx].iter().any(|&(n, _)| {
        mol.atoms[n].element != Element::Carbon && mol.atoms[n].element != Element::Hydrogen
    });

    match atom.element {
        Element::Carbon => {
            if atom.is_aromatic {
                if has_hetero_neighbor {
                    -0.14
                } else {
                    0.296
                }
            } else if has_double_bond {
                if has_hetero_neighbor {
                    -0.03
                } else {
                    0.08
                }
            } else {
                match degree {
                    0..=2 => 0.1441,
                    3 => 0.0,
                    _ => -0.04,
                }
            }
        }
        Element::Nitrogen => {
            if atom.is_aromatic {
                -0.3187
            } else if atom.formal_charge > 0 {
                -1.0190
            } else if has_double_bond {
                -0.5262
            } else {
                -0.4458
            }
        }
        Element::Oxygen => {
            if atom.formal_charge < 0 {
                -1.189
            } else if has_double_bond {
                -0.3339
            } else if degree >= 2 {
                -0.2893
            } else {
                -0.3567
            }
        }
        Element::Sulfur => {
            if has_double_bond {
                -0.1084
            } else if atom.formal_charge != 0 {
                -0.5188
            } else {
                0.6237
            }
        }
        Element::Fluorine => 0.4118,
        Element::Chlorine => 0.6895,
        Element::Bromine => 0.8813,
        Element::Iodine => 1.050,
        Element::Phosphorus => 0.2836,
        Element::Boron => -0.3187,
        Element::Hydrogen => 0.0,
    }
}

/// Memoizing descriptor engine.
///
/// Identical SMILES strings yield the value computed on first request; the
/// map is safe to share across concurrent tasks.
#[derive(Debug, Default)]
pub struct DescriptorEngine {
    cache: DashMap<String, LipinskiDescriptors>,
}

impl DescriptorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse, validate, and compute descriptors, consulting the cache first.
    pub fn descriptors(&self, smiles: &str) -> Result<LipinskiDescriptors> {
        if let Some(hit) = self.cache.get(smiles) {
            debug!(smiles, "descriptor cache hit");
            return Ok(*hit);
        }
        let mol = parse_smiles(smiles)?;
        let desc = lipinski_descriptors(&mol);
        self.cache.insert(smiles.to_string(), desc);
        Ok(desc)
    }

    #[cfg(test)]
    fn cached(&self, smiles: &str) -> bool {
        self.cache.contains_key(smiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn ethanol_descriptors() {
        let mol = parse_smiles("CCO").unwrap();
        let d = lipinski_descriptors(&mol);
        assert!(close(d.molecular_weight, 46.07, 0.01), "MW {}", d.molecular_weight);
        assert_eq!(d.h_bond_donors, 1);
        assert_eq!(d.h_bond_acceptors, 1);
        // Small polar molecule: LogP near zero.
        assert!(d.logp > -1.0 && d.logp < 1.0, "LogP {}", d.logp);
    }

    #[test]
    fn aspirin_descriptors() {
        let mol = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let d = lipinski_descriptors(&mol);
        // C9H8O4
        assert!(close(d.molecular_weight, 180.16, 0.05), "MW {}", d.molecular_weight);
        assert_eq!(d.h_bond_donors, 1);
        assert_eq!(d.h_bond_acceptors, 4);
        assert_eq!(d.ro5_violations(), 0);
    }

    #[test]
    fn benzene_is_lipophilic() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        let d = lipinski_descriptors(&mol);
        assert!(close(d.molecular_weight, 78.11, 0.05), "MW {}", d.molecular_weight);
        assert_eq!(d.h_bond_donors, 0);
        assert_eq!(d.h_bond_acceptors, 0);
        assert!(d.logp > 1.0, "LogP {}", d.logp);
    }

    #[test]
    fn pyrrole_nh_is_donor_but_not_acceptor() {
        let mol = parse_smiles("c1cc[nH]c1").unwrap();
        assert_eq!(h_bond_donors(&mol), 1);
        assert_eq!(h_bond_acceptors(&mol), 0);
    }

    #[test]
    fn n_methylpyrrole_descriptors() {
        // Substituted pyrrole nitrogen: no hydrogen, no donor.
        let mol = parse_smiles("Cn1cccc1").unwrap();
        let d = lipinski_descriptors(&mol);
        assert!(close(d.molecular_weight, 81.12, 0.01), "MW {}", d.molecular_weight);
        assert_eq!(d.h_bond_donors, 0);
    }

    #[test]
    fn row_follows_feature_order() {
        let d = LipinskiDescriptors {
            molecular_weight: 180.16,
            logp: 1.2,
            h_bond_donors: 1,
            h_bond_acceptors: 4,
        };
        assert_eq!(d.to_row(), [180.16, 1.2, 1.0, 4.0]);
        assert_eq!(FEATURE_NAMES.len(), DISPLAY_TITLES.len());
    }

    #[test]
    fn ro5_counts_each_criterion() {
        let heavy = LipinskiDescriptors {
            molecular_weight: 612.0,
            logp: 6.3,
            h_bond_donors: 7,
            h_bond_acceptors: 12,
        };
        assert_eq!(heavy.ro5_violations(), 4);
    }

    #[test]
    fn engine_memoizes_and_is_deterministic() {
        let engine = DescriptorEngine::new();
        assert!(!engine.cached("CCO"));
        let first = engine.descriptors("CCO").unwrap();
        assert!(engine.cached("CCO"));
        let second = engine.descriptors("CCO").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn engine_propagates_parse_errors() {
        let engine = DescriptorEngine::new();
        assert!(engine.descriptors("not a molecule").is_err());
        assert!(!engine.cached("not a molecule"));
    }
}
