//! Molecular graph representation

use crate::element;
use smallvec::SmallVec;

/// Bond order classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to an atom's bond valence (aromatic counts as one)
    pub fn valence(self) -> u32 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 4,
        }
    }
}

/// An atom in a molecular graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub atomic_number: u8,
    pub aromatic: bool,
    pub charge: i8,
    pub isotope: Option<u16>,
    /// Total attached hydrogens (implicit or bracket count)
    pub hydrogens: u8,
}

impl Atom {
    pub fn symbol(&self) -> &'static str {
        element::symbol(self.atomic_number)
    }
}

/// A bond between two atoms
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

impl Bond {
    /// The other end of the bond
    #[inline]
    pub fn partner(&self, atom: usize) -> usize {
        if self.atom1 == atom { self.atom2 } else { self.atom1 }
    }
}

/// adjacency entry: (neighbor atom index, bond index)
pub type Neighbors = SmallVec<[(usize, usize); 4]>;

/// A molecular graph, possibly made of several disconnected fragments
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    adjacency: Vec<Neighbors>,
}

impl Molecule {
    /// Build a molecule, deriving the adjacency list from atoms and bonds
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Neighbors::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        Self { atoms, bonds, adjacency }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Bond between two atoms, if any
    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.adjacency[a]
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, bi)| &self.bonds[bi])
    }

    /// Sum of bond valences around an atom
    pub fn bond_valence(&self, atom: usize) -> u32 {
        self.adjacency[atom]
            .iter()
            .map(|&(_, bi)| self.bonds[bi].order.valence())
            .sum()
    }

    /// Connected components as sorted atom index lists, ordered by their lowest atom
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.atoms.len()];
        let mut components = Vec::new();

        for start in 0..self.atoms.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut stack = vec![start];
            let mut members = Vec::new();
            while let Some(atom) = stack.pop() {
                members.push(atom);
                for &(n, _) in self.neighbors(atom) {
                    if !seen[n] {
                        seen[n] = true;
                        stack.push(n);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }

        components
    }

    /// Sub-molecule induced by the given atoms, renumbered in the given order
    pub fn extract(&self, atoms: &[usize]) -> Molecule {
        let mut index = vec![usize::MAX; self.atoms.len()];
        for (new, &old) in atoms.iter().enumerate() {
            index[old] = new;
        }

        let new_atoms = atoms.iter().map(|&a| self.atoms[a].clone()).collect();
        let new_bonds = self
            .bonds
            .iter()
            .filter(|b| index[b.atom1] != usize::MAX && index[b.atom2] != usize::MAX)
            .map(|b| Bond {
                atom1: index[b.atom1],
                atom2: index[b.atom2],
                order: b.order,
            })
            .collect();

        Molecule::new(new_atoms, new_bonds)
    }

    /// Disconnected fragments, ordered by their lowest atom index
    pub fn fragments(&self) -> Vec<Molecule> {
        self.components().iter().map(|c| self.extract(c)).collect()
    }

    /// Per-atom ring membership (atom has at least one non-bridge bond)
    pub fn ring_atoms(&self) -> Vec<bool> {
        let n = self.atoms.len();
        let mut order = vec![usize::MAX; n];
        let mut low = vec![0usize; n];
        let mut ring_bond = vec![true; self.bonds.len()];
        let mut counter = 0;

        for root in 0..n {
            if order[root] == usize::MAX {
                self.mark_bridges(root, usize::MAX, &mut counter, &mut order, &mut low, &mut ring_bond);
            }
        }

        let mut in_ring = vec![false; n];
        for (bi, bond) in self.bonds.iter().enumerate() {
            if ring_bond[bi] {
                in_ring[bond.atom1] = true;
                in_ring[bond.atom2] = true;
            }
        }
        in_ring
    }

    fn mark_bridges(
        &self,
        atom: usize,
        parent_bond: usize,
        counter: &mut usize,
        order: &mut [usize],
        low: &mut [usize],
        ring_bond: &mut [bool],
    ) {
        order[atom] = *counter;
        low[atom] = *counter;
        *counter += 1;

        for &(n, bi) in self.neighbors(atom) {
            if bi == parent_bond {
                continue;
            }
            if order[n] == usize::MAX {
                self.mark_bridges(n, bi, counter, order, low, ring_bond);
                low[atom] = low[atom].min(low[n]);
                if low[n] > order[atom] {
                    ring_bond[bi] = false;
                }
            } else {
                low[atom] = low[atom].min(order[n]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn test_components_and_fragments() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.components(), vec![vec![0], vec![1]]);

        let frags = mol.fragments();
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0].atoms[0].atomic_number, 11);
        assert_eq!(frags[1].atoms[0].charge, -1);
    }

    #[test]
    fn test_extract_keeps_internal_bonds() {
        let mol = parse_smiles("CCO.[K+]").unwrap();
        let frags = mol.fragments();
        assert_eq!(frags[0].atom_count(), 3);
        assert_eq!(frags[0].bond_count(), 2);
        assert_eq!(frags[1].bond_count(), 0);
    }

    #[test]
    fn test_ring_atoms() {
        let mol = parse_smiles("C1CC1CO").unwrap();
        assert_eq!(mol.ring_atoms(), vec![true, true, true, false, false]);
    }

    #[test]
    fn test_bond_valence() {
        let mol = parse_smiles("C=O").unwrap();
        assert_eq!(mol.bond_valence(0), 2);
        assert_eq!(mol.atoms[0].hydrogens, 2);
    }
}
