//! # Cockatoo Core
//!
//! Core domain model for comparing macromolecular crystallization screens.
//!
//! This crate provides the data structures every other cockatoo crate works on:
//!
//! - [`Compound`] - A chemical ingredient with concentration, pH and structure
//! - [`Cocktail`] - A named mixture of compounds with derived ion views
//! - [`Screen`] - A named collection of cocktails
//! - [`Fingerprint`] - Sparse count fingerprint of structural features
//! - [`Diagnostics`] - Collector for non-fatal data-quality problems
//!
//! ## Example
//!
//! ```rust
//! use cockatoo_core::{Cocktail, Compound, Diagnostics};
//!
//! let mut cocktail = Cocktail::new("A1", None);
//! cocktail.add_compound(Compound::new("Tris", 0.1, "M", Some(8.5)));
//! cocktail.add_compound(Compound::new("Sodium chloride", 0.2, "M", None));
//!
//! let mut diags = Diagnostics::new();
//! cocktail.resolve_ph(&mut diags);
//! assert_eq!(cocktail.ph, Some(8.5));
//! assert_eq!(cocktail.components[1].name, "sodium chloride");
//! ```

pub mod cocktail;
pub mod compound;
pub mod diagnostics;
pub mod error;
pub mod fingerprint;
pub mod ion;
pub mod screen;

pub use cocktail::{checked_ph, Cocktail, PH_RANGE};
pub use compound::{Compound, IonState, StructureInfo};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{Error, Result};
pub use fingerprint::{FeatureId, Fingerprint};
pub use ion::{Charge, IonRecord};
pub use screen::{Screen, ScreenStats};
