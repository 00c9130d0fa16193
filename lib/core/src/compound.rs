use crate::Fingerprint;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static PEG_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:peg|polyethylene\sglycol)[^\d]+)(\d+)").expect("valid PEG pattern")
});

/// Classification state of a compound's ionic fragments
///
/// `NotClassified` and `Classified` with empty lists are different states:
/// the first means no classification pass has run, the second means one ran
/// and found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IonState {
    #[default]
    NotClassified,
    Classified {
        cations: Vec<String>,
        anions: Vec<String>,
    },
}

impl IonState {
    /// Classified with no fragments found
    pub fn empty() -> Self {
        IonState::Classified {
            cations: Vec::new(),
            anions: Vec::new(),
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, IonState::Classified { .. })
    }

    /// Cation fragments, `None` when not classified
    pub fn cations(&self) -> Option<&[String]> {
        match self {
            IonState::NotClassified => None,
            IonState::Classified { cations, .. } => Some(cations),
        }
    }

    /// Anion fragments, `None` when not classified
    pub fn anions(&self) -> Option<&[String]> {
        match self {
            IonState::NotClassified => None,
            IonState::Classified { anions, .. } => Some(anions),
        }
    }
}

/// A parsed structure attached to a compound
#[derive(Debug, Clone, PartialEq)]
pub struct StructureInfo {
    /// Canonical structure string of the whole compound
    pub canonical: String,
    pub fingerprint: Fingerprint,
}

/// A chemical ingredient of a cocktail
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    /// Canonical lowercase name
    pub name: String,
    pub conc: f64,
    pub unit: String,
    pub ph: Option<f64>,
    pub conc_min: Option<f64>,
    pub conc_max: Option<f64>,
    pub molecular_weight: Option<f64>,
    /// Structure string (SMILES) as supplied by the summary data
    pub smiles: Option<String>,
    pub ions: IonState,
    /// Reference ion names found in the compound name
    pub name_flags: BTreeSet<String>,
    pub is_peg: bool,
    /// Set once the structure string has been parsed successfully
    pub structure: Option<StructureInfo>,
}

impl Compound {
    /// Create a compound; the name is trimmed and lowercased
    pub fn new(name: &str, conc: f64, unit: impl Into<String>, ph: Option<f64>) -> Self {
        let name = name.trim().to_lowercase();
        let is_peg = PEG_NAME.is_match(&name);
        Self {
            name,
            conc,
            unit: unit.into(),
            ph,
            conc_min: None,
            conc_max: None,
            molecular_weight: None,
            smiles: None,
            ions: IonState::NotClassified,
            name_flags: BTreeSet::new(),
            is_peg,
            structure: None,
        }
    }

    #[must_use]
    pub fn with_smiles(mut self, smiles: impl Into<String>) -> Self {
        self.smiles = Some(smiles.into());
        self
    }

    pub fn has_cations(&self) -> bool {
        self.ions.cations().is_some_and(|c| !c.is_empty())
    }

    pub fn has_anions(&self) -> bool {
        self.ions.anions().is_some_and(|a| !a.is_empty())
    }

    /// No cation and no anion fragments (including the not-classified state)
    pub fn is_nonsalt(&self) -> bool {
        !self.has_cations() && !self.has_anions()
    }

    /// Whether the structure string was parsed successfully
    pub fn has_structure(&self) -> bool {
        self.structure.is_some()
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.structure.as_ref().map(|s| &s.fingerprint)
    }
}
