//! Cocktails and the derived views over their classified compounds

use crate::{Compound, DiagnosticKind, Diagnostics, Fingerprint};
use ahash::AHashMap;
use std::ops::RangeInclusive;

/// Values a pH may take
pub const PH_RANGE: RangeInclusive<f64> = 0.0..=14.0;

/// Keep `ph` when it lies in [`PH_RANGE`]
///
/// An out-of-range value is recorded as a `ValidationFailure` for `subject`
/// and dropped, leaving the pH unset.
pub fn checked_ph(ph: Option<f64>, subject: &str, diags: &mut Diagnostics) -> Option<f64> {
    let ph = ph?;
    if PH_RANGE.contains(&ph) {
        return Some(ph);
    }
    diags.push(
        DiagnosticKind::ValidationFailure,
        subject,
        format!("pH {} outside {}..={}, left unset", ph, PH_RANGE.start(), PH_RANGE.end()),
    );
    None
}

/// A named mixture of compounds with an overall pH
#[derive(Debug, Clone, PartialEq)]
pub struct Cocktail {
    pub name: String,
    pub ph: Option<f64>,
    pub components: Vec<Compound>,
}

impl Cocktail {
    pub fn new(name: impl Into<String>, ph: Option<f64>) -> Self {
        Self {
            name: name.into(),
            ph,
            components: Vec::new(),
        }
    }

    pub fn with_components(name: impl Into<String>, ph: Option<f64>, components: Vec<Compound>) -> Self {
        Self {
            name: name.into(),
            ph,
            components,
        }
    }

    pub fn add_compound(&mut self, compound: Compound) {
        self.components.push(compound);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Adopt a pH from the compounds when the overall pH is unset
    ///
    /// A single distinct compound pH is adopted as is. With several distinct
    /// values the first compound's pH (insertion order) wins and the
    /// ambiguity is recorded.
    pub fn resolve_ph(&mut self, diags: &mut Diagnostics) {
        if self.ph.is_some() {
            return;
        }

        let values: Vec<f64> = self.components.iter().filter_map(|c| c.ph).collect();
        let Some(&first) = values.first() else {
            return;
        };

        let ambiguous = values.iter().any(|&v| v != first);
        if ambiguous {
            diags.push(
                DiagnosticKind::AmbiguousPh,
                self.name.clone(),
                format!("multiple pH values found, using the first one ({})", first),
            );
        }
        self.ph = Some(first);
    }

    /// Compounds keyed by name; later duplicates replace earlier ones
    pub fn map_by_name(&self) -> AHashMap<&str, &Compound> {
        self.components.iter().map(|c| (c.name.as_str(), c)).collect()
    }

    /// Cation fragments of all compounds, in compound order
    pub fn cations(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter_map(|c| c.ions.cations())
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Anion fragments of all compounds, in compound order
    pub fn anions(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter_map(|c| c.ions.anions())
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Salts: compounds with a parsed structure and at least one ion fragment
    pub fn ions(&self) -> Vec<&Compound> {
        self.components
            .iter()
            .filter(|c| c.has_structure() && (c.has_cations() || c.has_anions()))
            .collect()
    }

    /// Compounds with a parsed structure and no ion fragments
    pub fn nonsalts(&self) -> Vec<&Compound> {
        self.components
            .iter()
            .filter(|c| c.has_structure() && c.is_nonsalt())
            .collect()
    }

    /// Compounds with a parsed structure
    pub fn all(&self) -> Vec<&Compound> {
        self.components.iter().filter(|c| c.has_structure()).collect()
    }

    /// Aggregate fingerprint of every compound with a parsed structure
    ///
    /// `None` when no compound has one; an empty fingerprint is still `Some`.
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        let mut fingerprints = self.components.iter().filter_map(Compound::fingerprint);
        let mut total = fingerprints.next()?.clone();
        for fp in fingerprints {
            total.merge(fp);
        }
        Some(total)
    }
}
