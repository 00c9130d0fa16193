//! # Cockatoo Similarity
//!
//! Ion classification and cocktail distances.
//!
//! This crate enriches a loaded [`Screen`](cockatoo_core::Screen) with ionic
//! fragment identities and compares cocktails by pH and composition.
//!
//! ## Features
//!
//! - **Reference ion table**: known cations and anions, parsed once
//! - **Ion classifier**: set-once fragment assignment per compound, parallel over a screen
//! - **Distance engine**: pH and Bray-Curtis terms with dynamic reweighting
//! - **Explainability**: per-term breakdown of any distance
//! - **Distance matrix**: all pairwise distances of a screen
//!
//! ## Example
//!
//! ```rust
//! use cockatoo_chem::SmilesEngine;
//! use cockatoo_core::{Charge, Cocktail, Compound, Diagnostics, IonRecord};
//! use cockatoo_similarity::{distance, IonClassifier, IonTable, Weights};
//!
//! let engine = SmilesEngine::default();
//! let mut diags = Diagnostics::new();
//! let table = IonTable::build(
//!     &engine,
//!     vec![
//!         IonRecord::new("sodium", Charge::Cation, "[Na+]"),
//!         IonRecord::new("chloride", Charge::Anion, "[Cl-]"),
//!     ],
//!     &mut diags,
//! );
//!
//! let mut a = Cocktail::new("A1", Some(7.0));
//! a.add_compound(Compound::new("sodium chloride", 0.2, "M", None).with_smiles("[Na+].[Cl-]"));
//! let mut b = Cocktail::new("A2", Some(7.0));
//! b.add_compound(Compound::new("sodium chloride", 1.0, "M", None).with_smiles("[Na+].[Cl-]"));
//!
//! let classifier = IonClassifier::new(&engine, &table);
//! classifier.classify_cocktail(&mut a, &mut diags);
//! classifier.classify_cocktail(&mut b, &mut diags);
//!
//! assert_eq!(a.cations(), vec!["[Na+]"]);
//! assert_eq!(distance(&a, &b, &Weights::default()).unwrap(), 0.0);
//! ```

pub mod classify;
pub mod distance;
pub mod explain;
pub mod ions;
pub mod matrix;

pub use classify::{derive_structure, derive_structures, name_tokens, IonClassifier};
pub use distance::{
    bray_curtis, distance, fp_distance, ph_distance, profile_distance, CocktailProfile, TermScore,
    Weights, PH_SCALE,
};
pub use explain::{explain, DistanceBreakdown};
pub use ions::{IonEntry, IonTable};
pub use matrix::DistanceMatrix;
