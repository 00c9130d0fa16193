//! Substructure search by backtracking subgraph matching

use crate::molecule::{Atom, Molecule};

/// Whether `query` occurs as a substructure of `target`
///
/// Atoms match on element, aromaticity and isotope (when the query sets one);
/// a charged query atom only matches an atom with the same charge. Bonds match
/// on order. Hydrogen counts are not compared.
pub fn has_substructure(target: &Molecule, query: &Molecule) -> bool {
    if query.is_empty() {
        return true;
    }
    if query.atom_count() > target.atom_count() || query.bond_count() > target.bond_count() {
        return false;
    }

    let order = match_order(query);
    let mut mapping = vec![usize::MAX; query.atom_count()];
    let mut used = vec![false; target.atom_count()];
    extend(target, query, &order, 0, &mut mapping, &mut used)
}

/// Query atoms in breadth-first order so each atom after the first of its
/// component has an already-mapped neighbour
fn match_order(query: &Molecule) -> Vec<usize> {
    let mut order = Vec::with_capacity(query.atom_count());
    let mut seen = vec![false; query.atom_count()];
    for root in 0..query.atom_count() {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut queue = std::collections::VecDeque::from([root]);
        while let Some(atom) = queue.pop_front() {
            order.push(atom);
            for &(n, _) in query.neighbors(atom) {
                if !seen[n] {
                    seen[n] = true;
                    queue.push_back(n);
                }
            }
        }
    }
    order
}

fn extend(
    target: &Molecule,
    query: &Molecule,
    order: &[usize],
    depth: usize,
    mapping: &mut [usize],
    used: &mut [bool],
) -> bool {
    let Some(&q) = order.get(depth) else {
        return true;
    };

    let anchor = query
        .neighbors(q)
        .iter()
        .find(|&&(n, _)| mapping[n] != usize::MAX)
        .map(|&(n, _)| mapping[n]);

    let candidates: Vec<usize> = match anchor {
        Some(t) => target.neighbors(t).iter().map(|&(n, _)| n).collect(),
        None => (0..target.atom_count()).collect(),
    };

    for t in candidates {
        if used[t] || !atoms_match(&query.atoms[q], &target.atoms[t]) || !bonds_match(target, query, q, t, mapping) {
            continue;
        }
        mapping[q] = t;
        used[t] = true;
        if extend(target, query, order, depth + 1, mapping, used) {
            return true;
        }
        mapping[q] = usize::MAX;
        used[t] = false;
    }
    false
}

fn atoms_match(query: &Atom, target: &Atom) -> bool {
    query.atomic_number == target.atomic_number
        && query.aromatic == target.aromatic
        && (query.charge == 0 || query.charge == target.charge)
        && (query.isotope.is_none() || query.isotope == target.isotope)
}

/// Every bond from `q` to an already-mapped query atom must exist in the
/// target with the same order
fn bonds_match(target: &Molecule, query: &Molecule, q: usize, t: usize, mapping: &[usize]) -> bool {
    query.neighbors(q).iter().all(|&(qn, qb)| {
        let tn = mapping[qn];
        if tn == usize::MAX {
            return true;
        }
        target
            .bond_between(t, tn)
            .is_some_and(|tb| tb.order == query.bonds[qb].order)
    })
}
