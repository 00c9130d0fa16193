use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Charge tag of a reference ion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charge {
    Cation,
    Anion,
}

impl FromStr for Charge {
    type Err = String;

    /// Accepts the single-letter tags of the ion table files (`c`, `a`)
    /// as well as the full words, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "cation" => Ok(Charge::Cation),
            "a" | "anion" => Ok(Charge::Anion),
            other => Err(format!("unknown ion type '{}'", other)),
        }
    }
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Charge::Cation => f.write_str("cation"),
            Charge::Anion => f.write_str("anion"),
        }
    }
}

/// One row of a reference ion source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IonRecord {
    pub name: String,
    pub charge: Charge,
    /// Structure string (SMILES) of the ionic fragment
    pub structure: String,
}

impl IonRecord {
    pub fn new(name: impl Into<String>, charge: Charge, structure: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            charge,
            structure: structure.into(),
        }
    }
}
