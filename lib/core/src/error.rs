use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid weight for {term}: {value} (weights must be finite and non-negative)")]
    InvalidWeight { term: &'static str, value: f64 },

    #[error("Cocktail not found: {0}")]
    CocktailNotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Unsupported schema version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
