//! SMILES parsing and structure validation.
//!
//! Accepts the organic subset, bracket atoms (isotope, chirality, H count,
//! charge, atom map), branches, single- and two-digit ring closures, stereo
//! bond characters (treated as single bonds for connectivity), and `.`
//! component separators. Every way a string can fail (empty input, stray
//! characters, unmatched brackets or rings, unknown elements, valence
//! overflow) collapses into the single `InvalidStructure` failure kind;
//! callers do not distinguish sub-cases.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use malarix_common::{MalarixError, Result};

use crate::element::Element;
use crate::molecule::{Atom, Bond, BondOrder, Molecule};

/// Parse a SMILES string into a validated molecular graph.
///
/// The returned molecule has implicit hydrogens assigned and has passed the
/// valence check; downstream descriptor code assumes both.
pub fn parse_smiles(data: &str) -> Result<Molecule> {
    let data = data.trim();
    if data.is_empty() {
        return Err(invalid("empty SMILES string"));
    }

    let mut atoms: Vec<Atom> = Vec::new();
    let mut bonds: Vec<Bond> = Vec::new();

    let mut current: Option<usize> = None;
    // Whether the current atom was written as aromatic (lowercase). Two
    // consecutive aromatic atoms share an implicit aromatic bond; any other
    // pair gets an implicit single bond.
    let mut current_aromatic = false;
    let mut last_bond: Option<BondOrder> = None;
    // Saves (current atom, aromaticity) at each branch open.
    let mut branch_stack: Vec<(Option<usize>, bool)> = Vec::new();
    // ring_idx -> (atom index, explicit bond at open (None = implicit), aromatic at open)
    let mut ring_map: HashMap<u32, (usize, Option<BondOrder>, bool)> = HashMap::new();

    let mut chars = data.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            // Explicit bond types
            '-' => {
                last_bond = Some(BondOrder::Single);
                chars.next();
            }
            '=' => {
                last_bond = Some(BondOrder::Double);
                chars.next();
            }
            '#' => {
                last_bond = Some(BondOrder::Triple);
                chars.next();
            }
            ':' => {
                last_bond = Some(BondOrder::Aromatic);
                chars.next();
            }
            // Stereo bonds count as single for connectivity purposes
            '/' | '\\' => {
                last_bond = Some(BondOrder::Single);
                chars.next();
            }

            '(' => {
                branch_stack.push((current, current_aromatic));
                chars.next();
            }
            ')' => {
                let (prev, prev_ar) = branch_stack
                    .pop()
                    .ok_or_else(|| invalid("unmatched ')'"))?;
                current = prev;
                current_aromatic = prev_ar;
                last_bond = None;
                chars.next();
            }

            // Disconnected component separator
            '.' => {
                current = None;
                current_aromatic = false;
                last_bond = None;
                chars.next();
            }

            // Two-digit ring closure: %NN
            '%' => {
                chars.next();
                let d1 = consume_digit(&mut chars)?;
                let d2 = consume_digit(&mut chars)?;
                handle_ring(
                    d1 * 10 + d2,
                    current,
                    current_aromatic,
                    last_bond.take(),
                    &mut ring_map,
                    &mut bonds,
                )?;
            }

            '0'..='9' => {
                let d = ch as u32 - '0' as u32;
                chars.next();
                handle_ring(
                    d,
                    current,
                    current_aromatic,
                    last_bond.take(),
                    &mut ring_map,
                    &mut bonds,
                )?;
            }

            '[' => {
                let atom = parse_bracket_atom(&mut chars)?;
                let aromatic = atom.is_aromatic;
                let idx = push_atom(atom, current, last_bond.take(), current_aromatic, &mut atoms, &mut bonds);
                current = Some(idx);
                current_aromatic = aromatic;
            }

            _ => match parse_organic_atom(&mut chars)? {
                Some((element, is_aromatic)) => {
                    let atom = Atom {
                        element,
                        formal_charge: 0,
                        is_aromatic,
                        explicit_h: None,
                        implicit_h: 0,
                    };
                    let idx =
                        push_atom(atom, current, last_bond.take(), current_aromatic, &mut atoms, &mut bonds);
                    current = Some(idx);
                    current_aromatic = is_aromatic;
                }
                None => {
                    return Err(invalid(&format!("unrecognized character '{ch}'")));
                }
            },
        }
    }

    if !ring_map.is_empty() {
        return Err(invalid("unclosed ring bond"));
    }
    if !branch_stack.is_empty() {
        return Err(invalid("unclosed '('"));
    }
    if atoms.is_empty() {
        return Err(invalid("no atoms"));
    }

    let mut mol = Molecule::new(atoms, bonds);
    assign_implicit_hydrogens(&mut mol)?;
    Ok(mol)
}

fn invalid(msg: &str) -> MalarixError {
    MalarixError::InvalidStructure(msg.to_string())
}

/// Implicit bond between two adjacent atoms: aromatic if both were written
/// lowercase, single otherwise.
fn implicit_order(prev_aromatic: bool, new_aromatic: bool) -> BondOrder {
    if prev_aromatic && new_aromatic {
        BondOrder::Aromatic
    } else {
        BondOrder::Single
    }
}

/// Append an atom, bonding it to `prev` if present. Returns its index.
fn push_atom(
    atom: Atom,
    prev: Option<usize>,
    explicit_bond: Option<BondOrder>,
    prev_aromatic: bool,
    atoms: &mut Vec<Atom>,
    bonds: &mut Vec<Bond>,
) -> usize {
    let idx = atoms.len();
    let new_aromatic = atom.is_aromatic;
    atoms.push(atom);

    if let Some(p) = prev {
        let order = explicit_bond.unwrap_or_else(|| implicit_order(prev_aromatic, new_aromatic));
        add_bond(p, idx, order, bonds);
    }
    idx
}

/// Open or close a ring-closure bond.
///
/// An explicit bond character at either end takes priority; an implicit ring
/// closure is aromatic when both endpoints were written aromatic, single
/// otherwise.
fn handle_ring(
    ring_idx: u32,
    current: Option<usize>,
    current_aromatic: bool,
    explicit_order: Option<BondOrder>,
    ring_map: &mut HashMap<u32, (usize, Option<BondOrder>, bool)>,
    bonds: &mut Vec<Bond>,
) -> Result<()> {
    let cur = current.ok_or_else(|| invalid("ring closure digit without a current atom"))?;

    match ring_map.remove(&ring_idx) {
        Some((other, order_at_open, open_aromatic)) => {
            if other == cur {
                return Err(invalid("ring bond connects an atom to itself"));
            }
            let order = explicit_order.or(order_at_open).unwrap_or_else(|| {
                implicit_order(open_aromatic, current_aromatic)
            });
            add_bond(cur, other, order, bonds);
        }
        None => {
            ring_map.insert(ring_idx, (cur, explicit_order, current_aromatic));
        }
    }
    Ok(())
}

fn add_bond(a: usize, b: usize, order: BondOrder, bonds: &mut Vec<Bond>) {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    bonds.push(Bond { atom_0: lo, atom_1: hi, order });
}

/// Parse a bracket atom `[isotope? symbol chirality? Hcount? charge? :map?]`.
/// Isotope, chirality, and atom map are consumed and discarded; the H count
/// and formal charge are kept.
fn parse_bracket_atom(chars: &mut Peekable<Chars<'_>>) -> Result<Atom> {
    chars.next(); // consume '['

    // Optional isotope
    while chars.peek().map_or(false, |c| c.is_ascii_digit()) {
        chars.next();
    }

    // Element symbol: first letter's case determines aromaticity
    let first = chars
        .next()
        .ok_or_else(|| invalid("unexpected end of input inside bracket atom"))?;
    if !first.is_ascii_alphabetic() {
        return Err(invalid(&format!("unexpected '{first}' inside bracket atom")));
    }
    let aromatic = first.is_ascii_lowercase();
    let mut sym = String::from(first.to_ascii_uppercase());

    // Optional second letter (always lowercase: 'l' in Cl, 'r' in Br)
    // 'H' inside a bracket is the hydrogen-count marker, never a second letter.
    if chars.peek().map_or(false, |c| c.is_ascii_lowercase() && *c != 'h') {
        // Only extend when the two-letter symbol is a known element;
        // otherwise 'c' followed by an aromatic neighbor stays one letter.
        let mut two = sym.clone();
        two.push(*chars.peek().unwrap());
        if Element::from_symbol(&two).is_some() {
            sym = two;
            chars.next();
        }
    }

    let element = Element::from_symbol(&sym)
        .ok_or_else(|| invalid(&format!("unknown element '{sym}'")))?;
    if aromatic && !element.supports_aromatic() {
        return Err(invalid(&format!("element '{sym}' cannot be aromatic")));
    }

    // Optional chirality: @ or @@
    while chars.peek().copied() == Some('@') {
        chars.next();
    }

    // Optional H count: H or Hn. Nothing real carries more than single-digit
    // hydrogens; longer runs are malformed input, not big molecules.
    let mut h_count: u8 = 0;
    if chars.peek().copied() == Some('H') {
        chars.next();
        if chars.peek().map_or(false, |c| c.is_ascii_digit()) {
            let mut n: u32 = 0;
            while chars.peek().map_or(false, |c| c.is_ascii_digit()) {
                n = n * 10 + (chars.next().unwrap() as u32 - '0' as u32);
                if n > 9 {
                    return Err(invalid("hydrogen count out of range"));
                }
            }
            h_count = n as u8;
        } else {
            h_count = 1;
        }
    }

    // Optional charge: +, -, ++, --, +n, -n. Bounded the same way.
    let mut charge: i8 = 0;
    if let Some(&sign) = chars.peek().filter(|&&c| c == '+' || c == '-') {
        chars.next();
        let unit: i8 = if sign == '+' { 1 } else { -1 };
        charge = unit;
        if chars.peek().map_or(false, |c| c.is_ascii_digit()) {
            let mut n: i16 = 0;
            while chars.peek().map_or(false, |c| c.is_ascii_digit()) {
                n = n * 10 + (chars.next().unwrap() as i16 - b'0' as i16);
                if n > 9 {
                    return Err(invalid("formal charge out of range"));
                }
            }
            charge = unit * n as i8;
        } else {
            let mut magnitude: i16 = 1;
            while chars.peek().copied() == Some(sign) {
                chars.next();
                magnitude += 1;
                if magnitude > 9 {
                    return Err(invalid("formal charge out of range"));
                }
            }
            charge = unit * magnitude as i8;
        }
    }

    // Optional atom map: :n
    if chars.peek().copied() == Some(':') {
        chars.next();
        while chars.peek().map_or(false, |c| c.is_ascii_digit()) {
            chars.next();
        }
    }

    match chars.next() {
        Some(']') => {}
        other => {
            return Err(invalid(&format!(
                "expected ']' to close bracket atom, found {:?}",
                other
            )));
        }
    }

    Ok(Atom {
        element,
        formal_charge: charge,
        is_aromatic: aromatic,
        explicit_h: Some(h_count),
        implicit_h: 0,
    })
}

/// Parse an organic-subset atom (no brackets). Advances past the token;
/// returns `None` for unrecognized characters.
fn parse_organic_atom(chars: &mut Peekable<Chars<'_>>) -> Result<Option<(Element, bool)>> {
    let ch = match chars.peek().copied() {
        Some(c) => c,
        None => return Ok(None),
    };

    let parsed = match ch {
        'C' => {
            chars.next();
            if chars.peek().copied() == Some('l') {
                chars.next();
                (Element::Chlorine, false)
            } else {
                (Element::Carbon, false)
            }
        }
        'B' => {
            chars.next();
            if chars.peek().copied() == Some('r') {
                chars.next();
                (Element::Bromine, false)
            } else {
                (Element::Boron, false)
            }
        }
        'N' => {
            chars.next();
            (Element::Nitrogen, false)
        }
        'O' => {
            chars.next();
            (Element::Oxygen, false)
        }
        'S' => {
            chars.next();
            (Element::Sulfur, false)
        }
        'P' => {
            chars.next();
            (Element::Phosphorus, false)
        }
        'F' => {
            chars.next();
            (Element::Fluorine, false)
        }
        'I' => {
            chars.next();
            (Element::Iodine, false)
        }
        // Aromatic organic subset
        'b' => {
            chars.next();
            (Element::Boron, true)
        }
        'c' => {
            chars.next();
            (Element::Carbon, true)
        }
        'n' => {
            chars.next();
            (Element::Nitrogen, true)
        }
        'o' => {
            chars.next();
            (Element::Oxygen, true)
        }
        's' => {
            chars.next();
            (Element::Sulfur, true)
        }
        'p' => {
            chars.next();
            (Element::Phosphorus, true)
        }
        _ => return Ok(None),
    };

    Ok(Some(parsed))
}

fn consume_digit(chars: &mut Peekable<Chars<'_>>) -> Result<u32> {
    match chars.next() {
        Some(c) if c.is_ascii_digit() => Ok(c as u32 - '0' as u32),
        Some(c) => Err(invalid(&format!("expected digit after '%', found '{c}'"))),
        None => Err(invalid("expected digit after '%', found end of input")),
    }
}

/// Fill in implicit hydrogens and reject valence-impossible structures.
///
/// Bracket atoms state their own H count and are taken at face value. For
/// organic-subset atoms the bond valence sum (plus one unit for aromatic
/// C/N/B/P, standing in for the Kekulé double bond) is matched against the
/// element's allowed valences; the smallest that fits determines the
/// hydrogen count, and none fitting means the structure is chemically
/// impossible.
///
/// The Kekulé bump applies only while the bumped sum still fits the
/// element's lowest valence. A three-connected aromatic nitrogen is
/// pyrrole-type: its lone pair sits in the ring pi system, so it carries
/// neither a formal double bond nor a hydrogen.
fn assign_implicit_hydrogens(mol: &mut Molecule) -> Result<()> {
    for i in 0..mol.atom_count() {
        let sum = mol.bond_valence_sum(i);
        let atom = &mol.atoms[i];

        if let Some(h) = atom.explicit_h {
            mol.atoms[i].implicit_h = h;
            continue;
        }

        let aromatic_bump = u8::from(
            atom.is_aromatic
                && atom.element.aromatic_double_bond()
                && sum < atom.element.valences()[0],
        );
        let effective = sum + aromatic_bump;

        let fit = atom
            .element
            .valences()
            .iter()
            .copied()
            .find(|&v| v >= effective);
        match fit {
            Some(v) => mol.atoms[i].implicit_h = v - effective,
            None => {
                return Err(invalid(&format!(
                    "valence of {} exceeded ({} bonds)",
                    atom.element.symbol(),
                    effective
                )));
            }
        }
    }
    Ok(())
}
