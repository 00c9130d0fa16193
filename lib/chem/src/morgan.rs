//! Morgan (circular) count fingerprints

use crate::molecule::Molecule;
use cockatoo_core::{FeatureId, Fingerprint};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of<T: Hash>(value: &T) -> FeatureId {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Count fingerprint of circular atom environments up to `radius` bonds
///
/// Every atom contributes one feature per iteration `0..=radius`, so
/// repeated environments raise the count of the same feature.
pub fn morgan_fingerprint(mol: &Molecule, radius: u32) -> Fingerprint {
    let in_ring = mol.ring_atoms();
    let mut identifiers: Vec<FeatureId> = mol
        .atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            hash_of(&(
                atom.atomic_number,
                mol.degree(i),
                atom.hydrogens,
                atom.charge,
                atom.isotope,
                atom.aromatic,
                in_ring[i],
            ))
        })
        .collect();

    let mut fp = Fingerprint::new();
    for &id in &identifiers {
        fp.add(id, 1);
    }

    for iteration in 1..=radius {
        let next: Vec<FeatureId> = (0..mol.atom_count())
            .map(|i| {
                let mut env: Vec<(u8, FeatureId)> = mol
                    .neighbors(i)
                    .iter()
                    .map(|&(n, bi)| (mol.bonds[bi].order.code(), identifiers[n]))
                    .collect();
                env.sort_unstable();
                hash_of(&(iteration, identifiers[i], env))
            })
            .collect();
        for &id in &next {
            fp.add(id, 1);
        }
        identifiers = next;
    }

    fp
}
