//! Canonical SMILES writer
//!
//! Atoms are ranked by iterative refinement of local invariants, with ties
//! broken one atom at a time until every rank is unique. The writer then
//! walks each fragment depth-first from its lowest-ranked atom, always taking
//! neighbours in rank order, so permutations of the same graph produce the
//! same string.

use crate::element;
use crate::molecule::{BondOrder, Molecule};
use std::fmt::Write;

/// Canonical SMILES for a molecule; fragments are sorted and joined by `.`
pub fn canonical_smiles(mol: &Molecule) -> String {
    if mol.is_empty() {
        return String::new();
    }

    let ranks = canonical_ranks(mol);
    let mut parts: Vec<String> = mol
        .components()
        .iter()
        .map(|component| write_component(mol, &ranks, component))
        .collect();
    parts.sort();
    parts.join(".")
}

/// Unique canonical rank per atom
pub fn canonical_ranks(mol: &Molecule) -> Vec<usize> {
    let n = mol.atom_count();
    let initial: Vec<_> = mol
        .atoms
        .iter()
        .enumerate()
        .map(|(i, a)| {
            (
                a.atomic_number,
                a.isotope.unwrap_or(0),
                a.charge,
                a.aromatic,
                mol.degree(i),
                a.hydrogens,
            )
        })
        .collect();
    let mut ranks = dense_ranks(&initial);

    loop {
        ranks = refine(mol, ranks);
        if class_count(&ranks) == n {
            return ranks;
        }

        // break the first tie: lowest tied rank, lowest atom index
        let mut counts = vec![0usize; n];
        for &r in &ranks {
            counts[r] += 1;
        }
        let Some(tied) = (0..n).find(|&r| counts[r] > 1) else {
            return ranks;
        };
        let chosen = ranks.iter().position(|&r| r == tied).unwrap_or(0);
        let keys: Vec<_> = ranks.iter().enumerate().map(|(i, &r)| (r, i != chosen)).collect();
        ranks = dense_ranks(&keys);
    }
}

fn refine(mol: &Molecule, mut ranks: Vec<usize>) -> Vec<usize> {
    loop {
        let keys: Vec<(usize, Vec<(usize, u8)>)> = (0..mol.atom_count())
            .map(|i| {
                let mut env: Vec<(usize, u8)> = mol
                    .neighbors(i)
                    .iter()
                    .map(|&(nbr, bi)| (ranks[nbr], mol.bonds[bi].order.code()))
                    .collect();
                env.sort_unstable();
                (ranks[i], env)
            })
            .collect();
        let refined = dense_ranks(&keys);
        if class_count(&refined) == class_count(&ranks) {
            return refined;
        }
        ranks = refined;
    }
}

/// Dense 0-based ranks of `keys` (equal keys share a rank)
fn dense_ranks<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let mut ranks = vec![0usize; keys.len()];
    let mut current = 0;
    for (pos, &idx) in order.iter().enumerate() {
        if pos > 0 && keys[idx] != keys[order[pos - 1]] {
            current += 1;
        }
        ranks[idx] = current;
    }
    ranks
}

fn class_count(ranks: &[usize]) -> usize {
    ranks.iter().max().map_or(0, |&m| m + 1)
}

// Writer ==============================================================================================================

struct Walk {
    /// Depth-first visiting order of atoms
    preorder: Vec<usize>,
    /// Tree children per atom with the connecting bond, in rank order
    children: Vec<Vec<(usize, usize)>>,
    /// Ring-closure bonds per atom: (partner, bond index)
    closures: Vec<Vec<(usize, usize)>>,
}

fn walk(mol: &Molecule, ranks: &[usize], start: usize) -> Walk {
    let n = mol.atom_count();
    let mut walk = Walk {
        preorder: vec![usize::MAX; n],
        children: vec![Vec::new(); n],
        closures: vec![Vec::new(); n],
    };
    let mut bond_used = vec![false; mol.bond_count()];
    let mut counter = 0;
    visit(mol, ranks, start, &mut counter, &mut bond_used, &mut walk);
    walk
}

fn visit(
    mol: &Molecule,
    ranks: &[usize],
    atom: usize,
    counter: &mut usize,
    bond_used: &mut [bool],
    walk: &mut Walk,
) {
    walk.preorder[atom] = *counter;
    *counter += 1;

    let mut nbrs: Vec<(usize, usize)> = mol.neighbors(atom).to_vec();
    nbrs.sort_by_key(|&(n, _)| ranks[n]);

    for (nbr, bi) in nbrs {
        if bond_used[bi] {
            continue;
        }
        bond_used[bi] = true;
        if walk.preorder[nbr] == usize::MAX {
            walk.children[atom].push((nbr, bi));
            visit(mol, ranks, nbr, counter, bond_used, walk);
        } else {
            walk.closures[atom].push((nbr, bi));
            walk.closures[nbr].push((atom, bi));
        }
    }
}

fn write_component(mol: &Molecule, ranks: &[usize], component: &[usize]) -> String {
    let start = component
        .iter()
        .copied()
        .min_by_key(|&a| ranks[a])
        .unwrap_or(component[0]);
    let walk = walk(mol, ranks, start);

    let mut out = String::new();
    let mut digits: Vec<Option<usize>> = Vec::new();
    write_atom(mol, &walk, start, &mut digits, &mut out);
    out
}

fn write_atom(
    mol: &Molecule,
    walk: &Walk,
    atom: usize,
    digits: &mut Vec<Option<usize>>,
    out: &mut String,
) {
    out.push_str(&atom_symbol(mol, atom));

    let mut closures = walk.closures[atom].clone();
    closures.sort_by_key(|&(partner, _)| walk.preorder[partner]);

    // closings first so their digits can be reused by openings
    for &(partner, bi) in &closures {
        if walk.preorder[partner] < walk.preorder[atom] {
            if let Some(slot) = digits.iter().position(|d| *d == Some(bi)) {
                digits[slot] = None;
                push_ring_digit(out, slot + 1);
            }
        }
    }
    for &(partner, bi) in &closures {
        if walk.preorder[partner] > walk.preorder[atom] {
            let slot = match digits.iter().position(Option::is_none) {
                Some(slot) => slot,
                None => {
                    digits.push(None);
                    digits.len() - 1
                }
            };
            digits[slot] = Some(bi);
            out.push_str(bond_symbol(mol, bi));
            push_ring_digit(out, slot + 1);
        }
    }

    let children = &walk.children[atom];
    for (pos, &(child, bi)) in children.iter().enumerate() {
        let last = pos + 1 == children.len();
        if !last {
            out.push('(');
        }
        out.push_str(bond_symbol(mol, bi));
        write_atom(mol, walk, child, digits, out);
        if !last {
            out.push(')');
        }
    }
}

fn push_ring_digit(out: &mut String, digit: usize) {
    if digit < 10 {
        let _ = write!(out, "{}", digit);
    } else {
        let _ = write!(out, "%{:02}", digit);
    }
}

fn bond_symbol(mol: &Molecule, bond: usize) -> &'static str {
    let b = &mol.bonds[bond];
    let both_aromatic = mol.atoms[b.atom1].aromatic && mol.atoms[b.atom2].aromatic;
    match b.order {
        BondOrder::Single if both_aromatic => "-",
        BondOrder::Single => "",
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Aromatic if both_aromatic => "",
        BondOrder::Aromatic => ":",
    }
}

fn atom_symbol(mol: &Molecule, atom: usize) -> String {
    let a = &mol.atoms[atom];
    let symbol = if a.aromatic {
        a.symbol().to_lowercase()
    } else {
        a.symbol().to_string()
    };

    let organic = element::default_valences(a.atomic_number).is_some();
    let implicit = element::implicit_hydrogens(a.atomic_number, a.aromatic, mol.bond_valence(atom));
    if organic && a.charge == 0 && a.isotope.is_none() && a.hydrogens == implicit {
        return symbol;
    }

    let mut out = String::from("[");
    if let Some(isotope) = a.isotope {
        let _ = write!(out, "{}", isotope);
    }
    out.push_str(&symbol);
    match a.hydrogens {
        0 => {}
        1 => out.push('H'),
        h => {
            let _ = write!(out, "H{}", h);
        }
    }
    match a.charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        c if c > 0 => {
            let _ = write!(out, "+{}", c);
        }
        c => {
            let _ = write!(out, "-{}", -c);
        }
    }
    out.push(']');
    out
}
