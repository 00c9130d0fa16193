use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChemError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChemError {
    #[error("Empty structure string")]
    Empty,

    #[error("Invalid SMILES at position {position}: {reason}")]
    Syntax { position: usize, reason: String },

    #[error("Unknown element symbol: {0}")]
    UnknownElement(String),

    #[error("Unclosed ring bond: {0}")]
    UnclosedRing(u16),

    #[error("Unbalanced branch parentheses")]
    UnbalancedBranch,
}
