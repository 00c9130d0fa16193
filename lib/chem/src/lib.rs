//! # Cockatoo Chem
//!
//! The cheminformatics capability used by cockatoo's ion classifier.
//!
//! Classification only needs five operations, captured by the
//! [`ChemEngine`] trait: parse a structure, split it into disconnected
//! fragments, test substructure containment, write a canonical string and
//! generate a count fingerprint. [`SmilesEngine`] implements them over a
//! plain molecular graph:
//!
//! - [`parse_smiles`] - `nom` based SMILES reader
//! - [`canonical_smiles`] - rank-refined canonical SMILES writer
//! - [`has_substructure`] - backtracking subgraph matching
//! - [`morgan_fingerprint`] - circular count fingerprint
//!
//! ## Example
//!
//! ```rust
//! use cockatoo_chem::{ChemEngine, SmilesEngine};
//!
//! let engine = SmilesEngine::default();
//! let salt = engine.parse_structure("[Cl-].[Na+]").unwrap();
//! let sodium = engine.parse_structure("[Na+]").unwrap();
//!
//! let fragments = engine.fragments(&salt);
//! let matched: Vec<String> = fragments
//!     .iter()
//!     .filter(|f| engine.substructure_match(f, &sodium))
//!     .map(|f| engine.canonical_string(f))
//!     .collect();
//! assert_eq!(matched, vec!["[Na+]".to_string()]);
//! ```

pub mod canon;
pub mod element;
pub mod engine;
pub mod error;
pub mod molecule;
pub mod morgan;
pub mod smiles;
pub mod substructure;

pub use canon::canonical_smiles;
pub use engine::{ChemEngine, EngineConfig, SmilesEngine};
pub use error::{ChemError, Result};
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use morgan::morgan_fingerprint;
pub use smiles::parse_smiles;
pub use substructure::has_substructure;
