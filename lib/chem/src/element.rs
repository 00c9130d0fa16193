//! Element data needed to read and write SMILES

/// (symbol, atomic number)
const ELEMENTS: &[(&str, u8)] = &[
    ("H", 1), ("He", 2), ("Li", 3), ("Be", 4), ("B", 5), ("C", 6), ("N", 7), ("O", 8),
    ("F", 9), ("Ne", 10), ("Na", 11), ("Mg", 12), ("Al", 13), ("Si", 14), ("P", 15),
    ("S", 16), ("Cl", 17), ("Ar", 18), ("K", 19), ("Ca", 20), ("Sc", 21), ("Ti", 22),
    ("V", 23), ("Cr", 24), ("Mn", 25), ("Fe", 26), ("Co", 27), ("Ni", 28), ("Cu", 29),
    ("Zn", 30), ("Ga", 31), ("Ge", 32), ("As", 33), ("Se", 34), ("Br", 35), ("Kr", 36),
    ("Rb", 37), ("Sr", 38), ("Y", 39), ("Zr", 40), ("Nb", 41), ("Mo", 42), ("Tc", 43),
    ("Ru", 44), ("Rh", 45), ("Pd", 46), ("Ag", 47), ("Cd", 48), ("In", 49), ("Sn", 50),
    ("Sb", 51), ("Te", 52), ("I", 53), ("Xe", 54), ("Cs", 55), ("Ba", 56), ("La", 57),
    ("Ce", 58), ("Pr", 59), ("Nd", 60), ("Sm", 62), ("Eu", 63), ("Gd", 64), ("Tb", 65),
    ("Dy", 66), ("Ho", 67), ("Er", 68), ("Tm", 69), ("Yb", 70), ("Lu", 71), ("Hf", 72),
    ("Ta", 73), ("W", 74), ("Re", 75), ("Os", 76), ("Ir", 77), ("Pt", 78), ("Au", 79),
    ("Hg", 80), ("Tl", 81), ("Pb", 82), ("Bi", 83), ("U", 92),
];

/// Atomic number for a (case-sensitive, capitalised) element symbol
pub fn atomic_number(symbol: &str) -> Option<u8> {
    ELEMENTS.iter().find(|(s, _)| *s == symbol).map(|&(_, n)| n)
}

/// Capitalised element symbol for an atomic number
pub fn symbol(atomic_number: u8) -> &'static str {
    ELEMENTS
        .iter()
        .find(|&&(_, n)| n == atomic_number)
        .map(|&(s, _)| s)
        .unwrap_or("*")
}

/// Default valences of the SMILES organic subset, `None` for other elements
pub fn default_valences(atomic_number: u8) -> Option<&'static [u8]> {
    match atomic_number {
        5 => Some(&[3]),
        6 => Some(&[4]),
        7 => Some(&[3, 5]),
        8 => Some(&[2]),
        15 => Some(&[3, 5]),
        16 => Some(&[2, 4, 6]),
        9 | 17 | 35 | 53 => Some(&[1]),
        _ => None,
    }
}

/// Elements that may appear aromatic (lowercase) in SMILES
pub fn can_be_aromatic(atomic_number: u8) -> bool {
    matches!(atomic_number, 5 | 6 | 7 | 8 | 15 | 16 | 33 | 34 | 52)
}

/// Implicit hydrogen count of an organic-subset atom
///
/// `bond_valence` counts aromatic bonds as one; aromatic atoms get one extra
/// unit for their share of the delocalised system.
pub fn implicit_hydrogens(atomic_number: u8, aromatic: bool, bond_valence: u32) -> u8 {
    let Some(valences) = default_valences(atomic_number) else {
        return 0;
    };
    let used = bond_valence + u32::from(aromatic);
    valences
        .iter()
        .map(|&v| u32::from(v))
        .find(|&v| v >= used)
        .map(|v| (v - used) as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(atomic_number("Na"), Some(11));
        assert_eq!(atomic_number("Cl"), Some(17));
        assert_eq!(atomic_number("Xx"), None);
        assert_eq!(symbol(12), "Mg");
    }

    #[test]
    fn test_implicit_hydrogens() {
        // methane carbon
        assert_eq!(implicit_hydrogens(6, false, 0), 4);
        // benzene carbon: two aromatic bonds
        assert_eq!(implicit_hydrogens(6, true, 2), 1);
        // pyridine nitrogen
        assert_eq!(implicit_hydrogens(7, true, 2), 0);
        // hypervalent phosphorus in phosphate
        assert_eq!(implicit_hydrogens(15, false, 5), 0);
        // sulfate sulfur
        assert_eq!(implicit_hydrogens(16, false, 6), 0);
        // metals never get implicit hydrogens
        assert_eq!(implicit_hydrogens(11, false, 0), 0);
    }
}
