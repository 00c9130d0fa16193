//! Ion classification
//!
//! Assigns cation and anion fragments to each compound by substructure search
//! against the reference ion table, and flags reference ion names that appear
//! in the compound name. Failures are isolated to the compound concerned and
//! recorded as diagnostics; classification itself never fails.

use crate::ions::IonTable;
use cockatoo_chem::ChemEngine;
use cockatoo_core::{
    Charge, Cocktail, Compound, DiagnosticKind, Diagnostics, IonState, Screen, StructureInfo,
};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

static NAME_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s+,\-/]+").expect("valid separator pattern"));

/// Classifies compounds against a reference ion table
pub struct IonClassifier<'a, E: ChemEngine> {
    engine: &'a E,
    table: &'a IonTable<E::Structure>,
}

impl<'a, E: ChemEngine> IonClassifier<'a, E> {
    pub fn new(engine: &'a E, table: &'a IonTable<E::Structure>) -> Self {
        Self { engine, table }
    }

    pub fn table(&self) -> &IonTable<E::Structure> {
        self.table
    }

    /// Classify a single compound
    ///
    /// The ion state is written only while the compound is still
    /// `NotClassified`. Structure info and name flags are derived data and
    /// are filled in whenever they are missing.
    pub fn classify_compound(&self, compound: &mut Compound, diags: &mut Diagnostics) {
        self.flag_names(compound);

        let Some(structure) = derive_structure(self.engine, compound, diags) else {
            if !compound.ions.is_classified() {
                compound.ions = IonState::empty();
            }
            return;
        };

        if compound.ions.is_classified() {
            tracing::debug!(compound = %compound.name, "already classified, keeping ion state");
            return;
        }
        compound.ions = self.match_fragments(&structure);
    }

    /// Classify every compound of a cocktail in order
    pub fn classify_cocktail(&self, cocktail: &mut Cocktail, diags: &mut Diagnostics) {
        for compound in &mut cocktail.components {
            self.classify_compound(compound, diags);
        }
    }

    /// Classify a whole screen, cocktails in parallel
    ///
    /// Diagnostics are returned in cocktail order.
    pub fn classify_screen(&self, screen: &mut Screen) -> Diagnostics {
        let diags = for_each_cocktail(screen, |cocktail, diags| self.classify_cocktail(cocktail, diags));
        tracing::debug!(
            screen = %screen.name,
            cocktails = screen.len(),
            problems = diags.len(),
            "screen classified"
        );
        diags
    }

    /// Test every fragment against every table entry, keeping duplicates
    fn match_fragments(&self, structure: &E::Structure) -> IonState {
        let mut cations = Vec::new();
        let mut anions = Vec::new();

        for fragment in self.engine.fragments(structure) {
            let mut canonical: Option<String> = None;
            for entry in self.table.iter() {
                let Some(reference) = entry.structure.as_ref() else {
                    continue;
                };
                if !self.engine.substructure_match(&fragment, reference) {
                    continue;
                }
                let smiles = canonical
                    .get_or_insert_with(|| self.engine.canonical_string(&fragment))
                    .clone();
                match entry.charge {
                    Charge::Cation => cations.push(smiles),
                    Charge::Anion => anions.push(smiles),
                }
            }
        }

        IonState::Classified { cations, anions }
    }

    fn flag_names(&self, compound: &mut Compound) {
        for token in NAME_SEPARATORS.split(&compound.name) {
            if token.is_empty() {
                continue;
            }
            if let Some(entry) = self.table.get(token) {
                compound.name_flags.insert(entry.name.clone());
            }
        }
    }
}

/// Parse a compound's structure string and record its structure info
///
/// Returns the parsed structure, or `None` when the compound has no
/// structure string or it fails to parse (reported as `ParseFailure`).
/// Existing structure info is kept.
pub fn derive_structure<E: ChemEngine>(
    engine: &E,
    compound: &mut Compound,
    diags: &mut Diagnostics,
) -> Option<E::Structure> {
    let smiles = compound.smiles.as_deref()?;
    let structure = match engine.parse_structure(smiles) {
        Ok(structure) => structure,
        Err(e) => {
            diags.push(
                DiagnosticKind::ParseFailure,
                compound.name.clone(),
                format!("failed to parse structure '{}': {}", smiles, e),
            );
            return None;
        }
    };

    if compound.structure.is_none() {
        compound.structure = Some(StructureInfo {
            canonical: engine.canonical_string(&structure),
            fingerprint: engine.fingerprint(&structure),
        });
    }
    Some(structure)
}

/// Derive structure info for every compound of a screen, leaving ion state
/// untouched
pub fn derive_structures<E: ChemEngine>(engine: &E, screen: &mut Screen) -> Diagnostics {
    for_each_cocktail(screen, |cocktail, diags| {
        for compound in &mut cocktail.components {
            derive_structure(engine, compound, diags);
        }
    })
}

/// Run `f` over the cocktails in parallel, merging diagnostics in cocktail order
fn for_each_cocktail<F>(screen: &mut Screen, f: F) -> Diagnostics
where
    F: Fn(&mut Cocktail, &mut Diagnostics) + Sync,
{
    let per_cocktail: Vec<Diagnostics> = screen
        .cocktails
        .par_iter_mut()
        .map(|cocktail| {
            let mut diags = Diagnostics::new();
            f(cocktail, &mut diags);
            diags
        })
        .collect();

    let mut diags = Diagnostics::new();
    for d in per_cocktail {
        diags.extend(d);
    }
    diags
}

/// Tokens of a compound name as used for name matching
pub fn name_tokens(name: &str) -> Vec<String> {
    NAME_SEPARATORS
        .split(name)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cockatoo_chem::SmilesEngine;
    use cockatoo_core::IonRecord;

    fn table(engine: &SmilesEngine) -> IonTable<cockatoo_chem::Molecule> {
        let records = vec![
            IonRecord::new("sodium", Charge::Cation, "[Na+]"),
            IonRecord::new("chloride", Charge::Anion, "[Cl-]"),
            IonRecord::new("ammonium", Charge::Cation, "[NH4+]"),
            IonRecord::new("sulfate", Charge::Anion, "[O-]S(=O)(=O)[O-]"),
            IonRecord::new("acetate", Charge::Anion, "CC(=O)[O-]"),
            IonRecord::new("carboxylate", Charge::Anion, "C(=O)[O-]"),
        ];
        let mut diags = Diagnostics::new();
        IonTable::build(engine, records, &mut diags)
    }

    #[test]
    fn test_no_structure_yields_classified_empty() {
        let engine = SmilesEngine::default();
        let table = table(&engine);
        let classifier = IonClassifier::new(&engine, &table);

        let mut compound = Compound::new("polyethylene glycol 3350", 25.0, "% w/v", None);
        let mut diags = Diagnostics::new();
        classifier.classify_compound(&mut compound, &mut diags);

        assert_eq!(compound.ions, IonState::empty());
        assert!(compound.structure.is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_salt_fragments() {
        let engine = SmilesEngine::default();
        let table = table(&engine);
        let classifier = IonClassifier::new(&engine, &table);

        let mut compound = Compound::new("ammonium sulfate", 2.0, "M", None)
            .with_smiles("[NH4+].[NH4+].[O-]S(=O)(=O)[O-]");
        let mut diags = Diagnostics::new();
        classifier.classify_compound(&mut compound, &mut diags);

        assert_eq!(compound.ions.cations().unwrap(), &["[NH4+]", "[NH4+]"]);
        let sulfate = engine.parse_structure("[O-]S(=O)(=O)[O-]").unwrap();
        assert_eq!(
            compound.ions.anions().unwrap(),
            &[engine.canonical_string(&sulfate)]
        );
        assert!(compound.structure.is_some());
    }

    #[test]
    fn test_fragment_matching_two_entries_is_not_deduplicated() {
        let engine = SmilesEngine::default();
        let table = table(&engine);
        let classifier = IonClassifier::new(&engine, &table);

        let mut compound =
            Compound::new("sodium acetate", 0.1, "M", None).with_smiles("CC(=O)[O-].[Na+]");
        let mut diags = Diagnostics::new();
        classifier.classify_compound(&mut compound, &mut diags);

        let anions = compound.ions.anions().unwrap();
        assert_eq!(anions.len(), 2);
        assert_eq!(anions[0], anions[1]);
        assert_eq!(compound.ions.cations().unwrap(), &["[Na+]"]);
    }

    #[test]
    fn test_fragment_matching_two_cations_is_not_deduplicated() {
        let engine = SmilesEngine::default();
        let records = vec![
            IonRecord::new("ammonium", Charge::Cation, "[NH4+]"),
            IonRecord::new("chloride", Charge::Anion, "[Cl-]"),
            IonRecord::new("amine", Charge::Cation, "N"),
        ];
        let mut diags = Diagnostics::new();
        let table = IonTable::build(&engine, records, &mut diags);
        let classifier = IonClassifier::new(&engine, &table);

        let mut compound =
            Compound::new("ammonium chloride", 1.0, "M", None).with_smiles("[NH4+].[Cl-]");
        classifier.classify_compound(&mut compound, &mut diags);

        let ammonium = engine.canonical_string(&engine.parse_structure("[NH4+]").unwrap());
        let cations = compound.ions.cations().unwrap();
        assert_eq!(cations, &[ammonium.clone(), ammonium]);
        assert_eq!(compound.ions.anions().unwrap().len(), 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_parse_failure_is_isolated() {
        let engine = SmilesEngine::default();
        let table = table(&engine);
        let classifier = IonClassifier::new(&engine, &table);

        let mut cocktail = Cocktail::with_components(
            "A1",
            None,
            vec![
                Compound::new("garbage", 1.0, "M", None).with_smiles("C1CC"),
                Compound::new("sodium chloride", 0.2, "M", None).with_smiles("[Na+].[Cl-]"),
            ],
        );
        let mut diags = Diagnostics::new();
        classifier.classify_cocktail(&mut cocktail, &mut diags);

        assert_eq!(diags.count(DiagnosticKind::ParseFailure), 1);
        assert_eq!(cocktail.components[0].ions, IonState::empty());
        assert!(cocktail.components[0].structure.is_none());
        assert!(cocktail.components[1].has_cations());
        assert!(cocktail.components[1].has_anions());
    }

    #[test]
    fn test_name_flags() {
        let engine = SmilesEngine::default();
        let table = table(&engine);
        let classifier = IonClassifier::new(&engine, &table);

        let mut compound = Compound::new("Sodium/Ammonium-chloride+water", 1.0, "M", None);
        let mut diags = Diagnostics::new();
        classifier.classify_compound(&mut compound, &mut diags);

        let flags: Vec<_> = compound.name_flags.iter().map(String::as_str).collect();
        assert_eq!(flags, vec!["ammonium", "chloride", "sodium"]);
    }

    #[test]
    fn test_classification_is_set_once() {
        let engine = SmilesEngine::default();
        let table = table(&engine);
        let classifier = IonClassifier::new(&engine, &table);

        let mut compound = Compound::new("sodium chloride", 0.2, "M", None).with_smiles("[Na+].[Cl-]");
        compound.ions = IonState::Classified {
            cations: vec!["[K+]".to_string()],
            anions: vec![],
        };
        let mut diags = Diagnostics::new();
        classifier.classify_compound(&mut compound, &mut diags);

        assert_eq!(compound.ions.cations().unwrap(), &["[K+]"]);
        // structure info is still derived
        assert!(compound.structure.is_some());
    }

    #[test]
    fn test_classify_screen_parallel() {
        let engine = SmilesEngine::default();
        let table = table(&engine);
        let classifier = IonClassifier::new(&engine, &table);

        let mut screen = Screen::new("test");
        for i in 0..8 {
            screen.add_cocktail(Cocktail::with_components(
                format!("W{}", i),
                Some(7.0),
                vec![
                    Compound::new("sodium chloride", 0.2, "M", None).with_smiles("[Na+].[Cl-]"),
                    Compound::new("bad", 1.0, "M", None).with_smiles("(("),
                ],
            ));
        }

        let diags = classifier.classify_screen(&mut screen);
        assert_eq!(diags.count(DiagnosticKind::ParseFailure), 8);
        assert!(screen.cocktails.iter().all(|c| c.components[0].has_cations()));
        assert_eq!(diags.entries()[0].subject, "bad");
    }

    #[test]
    fn test_derive_structures_keeps_ion_state() {
        let engine = SmilesEngine::default();
        let mut screen = Screen::new("s");
        screen.add_cocktail(Cocktail::with_components(
            "A1",
            None,
            vec![
                Compound::new("sodium chloride", 0.2, "M", None).with_smiles("[Na+].[Cl-]"),
                Compound::new("water", 1.0, "M", None),
            ],
        ));

        let diags = derive_structures(&engine, &mut screen);
        assert!(diags.is_empty());
        let compounds = &screen.cocktails[0].components;
        assert!(compounds[0].structure.is_some());
        assert!(compounds[1].structure.is_none());
        assert_eq!(compounds[0].ions, IonState::NotClassified);
        assert!(screen.cocktails[0].fingerprint().is_some());
    }

    #[test]
    fn test_name_tokens() {
        assert_eq!(
            name_tokens("Tris-HCl, pH 8/NaCl + PEG"),
            vec!["tris", "hcl", "ph", "8", "nacl", "peg"]
        );
    }
}
