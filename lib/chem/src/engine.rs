//! The cheminformatics capability consumed by ion classification

use crate::canon::canonical_smiles;
use crate::error::Result;
use crate::molecule::Molecule;
use crate::morgan::morgan_fingerprint;
use crate::smiles::parse_smiles;
use crate::substructure::has_substructure;
use cockatoo_core::Fingerprint;
use serde::{Deserialize, Serialize};

/// Structure parsing, fragmenting, matching and fingerprinting
///
/// Implementations must be shareable across threads: one engine serves a
/// whole classification pass, possibly from several workers.
pub trait ChemEngine: Sync {
    /// Parsed structure handle
    type Structure: Send + Sync;

    fn parse_structure(&self, text: &str) -> Result<Self::Structure>;

    /// Disconnected sub-structures in engine-defined order
    fn fragments(&self, structure: &Self::Structure) -> Vec<Self::Structure>;

    /// Whether `fragment` contains `reference`
    fn substructure_match(&self, fragment: &Self::Structure, reference: &Self::Structure) -> bool;

    fn canonical_string(&self, structure: &Self::Structure) -> String;

    fn fingerprint(&self, structure: &Self::Structure) -> Fingerprint;
}

/// Configuration for [`SmilesEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Morgan fingerprint radius in bonds
    #[serde(default = "default_radius")]
    pub fingerprint_radius: u32,
}

fn default_radius() -> u32 {
    2
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fingerprint_radius: default_radius(),
        }
    }
}

/// Built-in engine over SMILES strings and [`Molecule`] graphs
#[derive(Debug, Clone, Default)]
pub struct SmilesEngine {
    config: EngineConfig,
}

impl SmilesEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl ChemEngine for SmilesEngine {
    type Structure = Molecule;

    fn parse_structure(&self, text: &str) -> Result<Molecule> {
        parse_smiles(text)
    }

    fn fragments(&self, structure: &Molecule) -> Vec<Molecule> {
        structure.fragments()
    }

    fn substructure_match(&self, fragment: &Molecule, reference: &Molecule) -> bool {
        has_substructure(fragment, reference)
    }

    fn canonical_string(&self, structure: &Molecule) -> String {
        canonical_smiles(structure)
    }

    fn fingerprint(&self, structure: &Molecule) -> Fingerprint {
        morgan_fingerprint(structure, self.config.fingerprint_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_round() {
        let engine = SmilesEngine::default();
        let salt = engine.parse_structure("[Na+].[Cl-]").unwrap();
        let frags = engine.fragments(&salt);
        assert_eq!(frags.len(), 2);
        assert_eq!(engine.canonical_string(&frags[0]), "[Na+]");
        assert_eq!(engine.canonical_string(&frags[1]), "[Cl-]");

        let sodium = engine.parse_structure("[Na+]").unwrap();
        assert!(engine.substructure_match(&frags[0], &sodium));
        assert!(!engine.substructure_match(&frags[1], &sodium));
    }

    #[test]
    fn test_radius_config() {
        let small = SmilesEngine::new(EngineConfig { fingerprint_radius: 0 });
        let large = SmilesEngine::default();
        let mol = small.parse_structure("CCO").unwrap();
        assert_eq!(small.fingerprint(&mol).total(), 3);
        assert_eq!(large.fingerprint(&mol).total(), 9);
        assert_eq!(large.config().fingerprint_radius, 2);
    }

    #[test]
    fn test_parse_failure() {
        let engine = SmilesEngine::default();
        assert!(engine.parse_structure("C1CC").is_err());
    }
}
