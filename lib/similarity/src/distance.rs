//! Distance functions between cocktails
//!
//! Two terms are combined: the pH difference scaled to the pH range and the
//! Bray-Curtis dissimilarity of the cocktails' count fingerprints. Either term
//! may be undefined for a given pair, in which case its weight is dropped for
//! that comparison. Every distance lies in [0.0, 1.0], where 0.0 means
//! identical.

use cockatoo_core::{Cocktail, Error, Fingerprint, Result};
use serde::{Deserialize, Serialize};

/// Span of the pH scale
pub const PH_SCALE: f64 = 14.0;

/// Relative weights of the distance terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default = "default_weight")]
    pub ph: f64,
    #[serde(default = "default_weight")]
    pub fingerprint: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            ph: default_weight(),
            fingerprint: default_weight(),
        }
    }
}

impl Weights {
    /// Create validated weights
    pub fn new(ph: f64, fingerprint: f64) -> Result<Self> {
        let weights = Self { ph, fingerprint };
        weights.validate()?;
        Ok(weights)
    }

    /// Reject negative or non-finite weights
    pub fn validate(&self) -> Result<()> {
        for (term, value) in [("ph", self.ph), ("fingerprint", self.fingerprint)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight { term, value });
            }
        }
        Ok(())
    }
}

/// Bray-Curtis dissimilarity over the union of features
///
/// Missing features count as zero. When both fingerprints carry no mass the
/// result is 1.0.
pub fn bray_curtis(a: &Fingerprint, b: &Fingerprint) -> f64 {
    let mut diff = 0u64;
    let mut total = 0u64;

    for (feature, ca) in a.iter() {
        let cb = b.get(feature);
        diff += u64::from(ca.abs_diff(cb));
        total += u64::from(ca) + u64::from(cb);
    }
    for (feature, cb) in b.iter() {
        if !a.contains(feature) {
            diff += u64::from(cb);
            total += u64::from(cb);
        }
    }

    if total == 0 {
        return 1.0;
    }
    diff as f64 / total as f64
}

/// Scaled pH difference, `None` unless both pH values are set
pub fn ph_distance(a: &Cocktail, b: &Cocktail) -> Option<f64> {
    ph_term(a.ph, b.ph)
}

/// Fingerprint dissimilarity, `None` unless both fingerprints are defined
pub fn fp_distance(a: &Cocktail, b: &Cocktail) -> Option<f64> {
    fp_term(a.fingerprint().as_ref(), b.fingerprint().as_ref())
}

fn ph_term(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some((a? - b?).abs() / PH_SCALE)
}

fn fp_term(a: Option<&Fingerprint>, b: Option<&Fingerprint>) -> Option<f64> {
    Some(bray_curtis(a?, b?))
}

/// Distance inputs of one cocktail, computed once
///
/// Building a cocktail fingerprint merges every compound's fingerprint, so
/// repeated comparisons go through profiles.
#[derive(Debug, Clone, Default)]
pub struct CocktailProfile {
    pub ph: Option<f64>,
    pub fingerprint: Option<Fingerprint>,
}

impl CocktailProfile {
    pub fn of(cocktail: &Cocktail) -> Self {
        Self {
            ph: cocktail.ph,
            fingerprint: cocktail.fingerprint(),
        }
    }
}

/// One term of a combined distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermScore {
    /// `None` when the term is undefined for the pair
    pub distance: Option<f64>,
    /// Weight after dropping undefined terms
    pub weight: f64,
}

impl TermScore {
    fn new(distance: Option<f64>, weight: f64) -> Self {
        Self {
            distance,
            weight: if distance.is_some() { weight } else { 0.0 },
        }
    }

    /// Weighted contribution to the numerator
    pub fn contribution(&self) -> f64 {
        self.distance.map_or(0.0, |d| d * self.weight)
    }
}

/// Combine both terms of two profiles
pub(crate) fn combine(a: &CocktailProfile, b: &CocktailProfile, weights: &Weights) -> (TermScore, TermScore, f64) {
    let ph = TermScore::new(ph_term(a.ph, b.ph), weights.ph);
    let fp = TermScore::new(
        fp_term(a.fingerprint.as_ref(), b.fingerprint.as_ref()),
        weights.fingerprint,
    );

    let total = ph.weight + fp.weight;
    let score = if total == 0.0 {
        1.0
    } else {
        (ph.contribution() + fp.contribution()) / total
    };
    (ph, fp, score)
}

/// Distance between two precomputed profiles
pub fn profile_distance(a: &CocktailProfile, b: &CocktailProfile, weights: &Weights) -> Result<f64> {
    weights.validate()?;
    Ok(combine(a, b, weights).2)
}

/// Weighted distance between two cocktails
///
/// # Arguments
/// * `a` - First cocktail
/// * `b` - Second cocktail
/// * `weights` - Term weights, see [`Weights`]
///
/// # Returns
/// Distance in [0.0, 1.0]. When neither term is usable the distance is 1.0.
/// Fails only for invalid weights.
pub fn distance(a: &Cocktail, b: &Cocktail, weights: &Weights) -> Result<f64> {
    profile_distance(&CocktailProfile::of(a), &CocktailProfile::of(b), weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cockatoo_core::{Compound, StructureInfo};

    fn fp(pairs: &[(u64, u32)]) -> Fingerprint {
        pairs.iter().copied().collect()
    }

    fn compound_with_fp(name: &str, pairs: &[(u64, u32)]) -> Compound {
        let mut c = Compound::new(name, 1.0, "M", None);
        c.structure = Some(StructureInfo {
            canonical: name.to_string(),
            fingerprint: fp(pairs),
        });
        c
    }

    fn cocktail(ph: Option<f64>, components: Vec<Compound>) -> Cocktail {
        Cocktail::with_components("c", ph, components)
    }

    #[test]
    fn test_bray_curtis_basic() {
        let a = fp(&[(1, 2), (2, 1)]);
        let b = fp(&[(1, 1), (3, 1)]);
        // |2-1| + |1-0| + |0-1| = 3 over 3 + 1 + 1 = 5
        assert!((bray_curtis(&a, &b) - 0.6).abs() < 1e-12);
        assert_eq!(bray_curtis(&a, &b), bray_curtis(&b, &a));
    }

    #[test]
    fn test_bray_curtis_identity_and_degenerate() {
        let a = fp(&[(7, 4), (9, 1)]);
        assert_eq!(bray_curtis(&a, &a), 0.0);
        assert_eq!(bray_curtis(&Fingerprint::new(), &Fingerprint::new()), 1.0);
        assert_eq!(bray_curtis(&a, &Fingerprint::new()), 1.0);
    }

    #[test]
    fn test_bray_curtis_zero_counts() {
        let a = fp(&[(1, 0), (2, 1)]);
        let b = fp(&[(1, 2), (2, 1)]);
        // |0-2| + |1-1| = 2 over 0 + 2 + 1 + 1 = 4
        assert_eq!(bray_curtis(&a, &b), 0.5);
        assert_eq!(bray_curtis(&b, &a), 0.5);

        let zeros = fp(&[(4, 0)]);
        assert_eq!(bray_curtis(&zeros, &Fingerprint::new()), 1.0);
        assert_eq!(bray_curtis(&zeros, &fp(&[(4, 3)])), 1.0);
    }

    #[test]
    fn test_ph_distance() {
        let a = cocktail(Some(7.0), vec![]);
        let b = cocktail(Some(7.0), vec![]);
        assert_eq!(ph_distance(&a, &b), Some(0.0));

        let low = cocktail(Some(0.0), vec![]);
        let high = cocktail(Some(14.0), vec![]);
        assert_eq!(ph_distance(&low, &high), Some(1.0));

        let unset = cocktail(None, vec![]);
        assert_eq!(ph_distance(&a, &unset), None);
    }

    #[test]
    fn test_both_undefined_is_maximal() {
        let a = cocktail(None, vec![Compound::new("peg 400", 10.0, "%", None)]);
        let b = cocktail(None, vec![]);
        assert_eq!(distance(&a, &b, &Weights::default()).unwrap(), 1.0);
    }

    #[test]
    fn test_same_ph_no_structures() {
        let a = cocktail(Some(7.0), vec![Compound::new("water", 1.0, "M", None)]);
        let b = cocktail(Some(7.0), vec![]);
        assert_eq!(distance(&a, &b, &Weights::default()).unwrap(), 0.0);
    }

    #[test]
    fn test_weight_redistribution() {
        // a lacks pH, b lacks a fingerprint: no term is usable
        let a = cocktail(None, vec![compound_with_fp("x", &[(1, 1)])]);
        let b = cocktail(Some(5.0), vec![]);
        assert_eq!(distance(&a, &b, &Weights::default()).unwrap(), 1.0);

        // only the fingerprint term is usable
        let c = cocktail(Some(4.0), vec![compound_with_fp("y", &[(1, 1), (2, 1)])]);
        let d = distance(&a, &c, &Weights::default()).unwrap();
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_combination() {
        let a = cocktail(Some(7.0), vec![compound_with_fp("x", &[(1, 1)])]);
        let b = cocktail(Some(0.0), vec![compound_with_fp("y", &[(1, 1)])]);
        let weights = Weights::new(3.0, 1.0).unwrap();
        // ph term 0.5, fingerprint term 0.0
        let d = distance(&a, &b, &weights).unwrap();
        assert!((d - 0.375).abs() < 1e-12);
        assert_eq!(d, distance(&b, &a, &weights).unwrap());
    }

    #[test]
    fn test_zero_weights() {
        let a = cocktail(Some(7.0), vec![compound_with_fp("x", &[(1, 1)])]);
        let b = cocktail(Some(3.0), vec![compound_with_fp("x", &[(1, 1)])]);

        let ph_off = Weights::new(0.0, 1.0).unwrap();
        assert_eq!(distance(&a, &b, &ph_off).unwrap(), 0.0);

        let all_off = Weights::new(0.0, 0.0).unwrap();
        assert_eq!(distance(&a, &b, &all_off).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(Weights::new(-1.0, 1.0).is_err());
        assert!(Weights::new(1.0, f64::NAN).is_err());
        let a = cocktail(Some(7.0), vec![]);
        let bad = Weights {
            ph: 1.0,
            fingerprint: f64::INFINITY,
        };
        assert!(matches!(
            distance(&a, &a, &bad),
            Err(Error::InvalidWeight { term: "fingerprint", .. })
        ));
    }

    #[test]
    fn test_weights_from_json() {
        let weights: Weights = serde_json::from_str(r#"{"ph": 2.5}"#).unwrap();
        assert_eq!(weights.ph, 2.5);
        assert_eq!(weights.fingerprint, 1.0);
    }
}
