//! # cockatoo
//!
//! Comparison of macromolecular crystallization screens.
//!
//! A screen is a set of cocktails, each a mix of chemical compounds at some
//! concentration and pH. cockatoo assigns ionic fragments to every compound by
//! substructure search against a reference ion table, then scores how
//! different two cocktails are from their pH and their composition
//! fingerprints.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cockatoo convert screen.csv --name "My Screen" --ions ions.tsv --summary summary.tsv -o screen.json
//! cockatoo distance screen.json A1 A2
//! cockatoo matrix screen.json --threshold 0.05
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use cockatoo::prelude::*;
//!
//! let csv = "A1,7.0,0.2,M,Sodium chloride,\nA2,7.0,1.0,M,Sodium chloride,\n";
//! let mut diags = Diagnostics::new();
//! let mut screen = read_csv_screen("demo", csv.as_bytes(), &mut diags).unwrap();
//! for compound in screen.cocktails.iter_mut().flat_map(|c| c.components.iter_mut()) {
//!     compound.smiles = Some("[Na+].[Cl-]".to_string());
//! }
//!
//! let engine = SmilesEngine::default();
//! let ions = vec![
//!     IonRecord::new("sodium", Charge::Cation, "[Na+]"),
//!     IonRecord::new("chloride", Charge::Anion, "[Cl-]"),
//! ];
//! classify_screen(&engine, ions, &mut screen, &mut diags);
//!
//! let a = screen.get("A1").unwrap();
//! let b = screen.get("A2").unwrap();
//! assert_eq!(a.cations(), vec!["[Na+]"]);
//! assert_eq!(distance(a, b, &Weights::default()).unwrap(), 0.0);
//! ```
//!
//! ## Crate Structure
//!
//! - [`cockatoo-core`](cockatoo_core) - Domain model, fingerprints, diagnostics
//! - [`cockatoo-chem`](cockatoo_chem) - Structure parsing, fragments, substructure search, fingerprints
//! - [`cockatoo-similarity`](cockatoo_similarity) - Ion classification and distances
//! - [`cockatoo-io`](cockatoo_io) - CSV screens, reference tables, JSON documents

use cockatoo_chem::ChemEngine;

// Re-export core types
pub use cockatoo_core::{
    Charge, Cocktail, Compound, Diagnostic, DiagnosticKind, Diagnostics, Error, FeatureId,
    Fingerprint, IonRecord, IonState, Result, Screen, ScreenStats, StructureInfo,
};

// Re-export the chemistry engine
pub use cockatoo_chem::{EngineConfig, SmilesEngine};

// Re-export classification and distances
pub use cockatoo_similarity::{
    bray_curtis, derive_structures, distance, explain, fp_distance, ph_distance, DistanceBreakdown,
    DistanceMatrix, IonClassifier, IonTable, Weights,
};

// Re-export loaders
pub use cockatoo_io::{
    apply_summary_stats, load_csv_screen, load_ion_records, load_summary_stats, read_csv_screen,
    read_screen, to_json_string, write_screen,
};

/// Build the ion table from `records` and classify every compound of `screen`
///
/// Table and classification problems are appended to `diags`.
pub fn classify_screen<E: ChemEngine>(
    engine: &E,
    records: Vec<IonRecord>,
    screen: &mut Screen,
    diags: &mut Diagnostics,
) {
    let table = IonTable::build(engine, records, diags);
    tracing::info!(ions = table.len(), "reference ion table built");
    let classifier = IonClassifier::new(engine, &table);
    diags.extend(classifier.classify_screen(screen));
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        apply_summary_stats, classify_screen, distance, explain, read_csv_screen, Charge, Cocktail,
        Compound, Diagnostics, DistanceMatrix, Error, IonRecord, IonState, Result, Screen,
        SmilesEngine, Weights,
    };
    pub use cockatoo_chem::ChemEngine;
}
