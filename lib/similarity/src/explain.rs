//! Explainable distances
//!
//! A [`DistanceBreakdown`] reports each term of a combined distance with the
//! weight it effectively received, so callers can see which data drove the
//! score and which term was dropped for missing data.

use crate::distance::{combine, CocktailProfile, TermScore, Weights};
use cockatoo_core::{Cocktail, Result};
use serde::Serialize;
use std::fmt;

/// Per-term view of a distance between two cocktails
#[derive(Debug, Clone, Serialize)]
pub struct DistanceBreakdown {
    pub a: String,
    pub b: String,
    pub ph: TermScore,
    pub fingerprint: TermScore,
    /// Weights as requested, before undefined terms were dropped
    pub weights: Weights,
    pub score: f64,
}

impl DistanceBreakdown {
    /// Whether the score is the fallback for no usable term
    pub fn is_fallback(&self) -> bool {
        self.ph.weight + self.fingerprint.weight == 0.0
    }
}

/// Compute a distance together with its breakdown
pub fn explain(a: &Cocktail, b: &Cocktail, weights: &Weights) -> Result<DistanceBreakdown> {
    weights.validate()?;
    let (ph, fingerprint, score) = combine(&CocktailProfile::of(a), &CocktailProfile::of(b), weights);
    Ok(DistanceBreakdown {
        a: a.name.clone(),
        b: b.name.clone(),
        ph,
        fingerprint,
        weights: *weights,
        score,
    })
}

fn fmt_term(f: &mut fmt::Formatter<'_>, label: &str, term: &TermScore) -> fmt::Result {
    match term.distance {
        Some(d) => writeln!(
            f,
            "  {:<12} {:.4} (weight {:.2}, contribution {:.4})",
            label,
            d,
            term.weight,
            term.contribution()
        ),
        None => writeln!(f, "  {:<12} undefined", label),
    }
}

impl fmt::Display for DistanceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} <-> {}", self.a, self.b)?;
        fmt_term(f, "pH", &self.ph)?;
        fmt_term(f, "fingerprint", &self.fingerprint)?;
        if self.is_fallback() {
            write!(f, "  distance     {:.4} (no usable term)", self.score)
        } else {
            write!(f, "  distance     {:.4}", self.score)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::distance;
    use cockatoo_core::{Compound, StructureInfo};

    fn structured(pairs: &[(u64, u32)]) -> Compound {
        let mut c = Compound::new("x", 1.0, "M", None);
        c.structure = Some(StructureInfo {
            canonical: "x".to_string(),
            fingerprint: pairs.iter().copied().collect(),
        });
        c
    }

    #[test]
    fn test_breakdown_matches_distance() {
        let a = Cocktail::with_components("A1", Some(4.0), vec![structured(&[(1, 3)])]);
        let b = Cocktail::with_components("A2", Some(8.0), vec![structured(&[(1, 1)])]);
        let w = Weights::default();

        let breakdown = explain(&a, &b, &w).unwrap();
        assert_eq!(breakdown.score, distance(&a, &b, &w).unwrap());
        assert!((breakdown.ph.distance.unwrap() - 4.0 / 14.0).abs() < 1e-12);
        assert_eq!(breakdown.fingerprint.distance, Some(0.5));
        assert!(!breakdown.is_fallback());
    }

    #[test]
    fn test_dropped_term() {
        let a = Cocktail::with_components("A1", None, vec![structured(&[(1, 1)])]);
        let b = Cocktail::with_components("A2", Some(8.0), vec![structured(&[(1, 1)])]);

        let breakdown = explain(&a, &b, &Weights::default()).unwrap();
        assert_eq!(breakdown.ph.distance, None);
        assert_eq!(breakdown.ph.weight, 0.0);
        assert_eq!(breakdown.weights.ph, 1.0);
        assert_eq!(breakdown.score, 0.0);

        let text = breakdown.to_string();
        let ph_line = text.lines().nth(1).unwrap().trim();
        assert!(ph_line.starts_with("pH"));
        assert!(ph_line.ends_with("undefined"));
    }

    #[test]
    fn test_fallback_serializes() {
        let a = Cocktail::new("A1", None);
        let b = Cocktail::new("A2", None);
        let breakdown = explain(&a, &b, &Weights::default()).unwrap();
        assert!(breakdown.is_fallback());
        assert_eq!(breakdown.score, 1.0);

        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["score"], 1.0);
        assert!(json["ph"]["distance"].is_null());
    }
}
