//! Diagnostics collected while loading and classifying screens
//!
//! Data-quality problems never abort a batch. Instead they are recorded in a
//! [`Diagnostics`] collector that the caller threads through and inspects
//! afterwards. Every recorded entry is also emitted as a `tracing` event.

use serde::Serialize;
use std::fmt;

/// Category of a recorded problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A structure string could not be parsed
    ParseFailure,
    /// An input record was malformed and rejected
    ValidationFailure,
    /// An optional attribute was absent from its source
    MissingData,
    /// A cocktail carried several distinct compound pH values
    AmbiguousPh,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::ParseFailure => "parse failure",
            DiagnosticKind::ValidationFailure => "validation failure",
            DiagnosticKind::MissingData => "missing data",
            DiagnosticKind::AmbiguousPh => "ambiguous pH",
        };
        f.write_str(s)
    }
}

/// A single recorded problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// What the problem is about (compound, cocktail, ion or row)
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.kind, self.subject, self.message)
    }
}

/// Ordered collector of diagnostics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem and emit it as a tracing event
    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let entry = Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        };

        match kind {
            DiagnosticKind::ParseFailure | DiagnosticKind::ValidationFailure => {
                tracing::warn!(kind = %kind, subject = %entry.subject, "{}", entry.message);
            }
            DiagnosticKind::MissingData | DiagnosticKind::AmbiguousPh => {
                tracing::info!(kind = %kind, subject = %entry.subject, "{}", entry.message);
            }
        }

        self.entries.push(entry);
    }

    /// Append all entries of another collector, keeping their order
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_count() {
        let mut diags = Diagnostics::new();
        diags.push(DiagnosticKind::ParseFailure, "sodium chloride", "bad smiles");
        diags.push(DiagnosticKind::MissingData, "tris", "missing conc_max");
        diags.push(DiagnosticKind::ParseFailure, "hepes", "bad smiles");

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.count(DiagnosticKind::ParseFailure), 2);
        assert_eq!(diags.count(DiagnosticKind::AmbiguousPh), 0);
        assert_eq!(diags.entries()[1].subject, "tris");
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = Diagnostics::new();
        first.push(DiagnosticKind::MissingData, "a", "one");
        let mut second = Diagnostics::new();
        second.push(DiagnosticKind::MissingData, "b", "two");

        first.extend(second);
        let subjects: Vec<_> = first.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(subjects, vec!["a", "b"]);
    }

    #[test]
    fn test_display() {
        let mut diags = Diagnostics::new();
        diags.push(DiagnosticKind::AmbiguousPh, "A1", "using first pH 7");
        assert_eq!(diags.entries()[0].to_string(), "ambiguous pH [A1]: using first pH 7");
    }
}
