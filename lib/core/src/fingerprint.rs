use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structural feature identifier produced by a fingerprint generator
pub type FeatureId = u64;

/// Sparse count fingerprint: feature identifier -> occurrence count
///
/// An empty fingerprint is a valid, defined value. Whether a fingerprint
/// exists at all is expressed with `Option<Fingerprint>` by its owners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint {
    counts: BTreeMap<FeatureId, u32>,
}

impl Fingerprint {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a feature, zero when absent
    #[inline]
    pub fn get(&self, feature: FeatureId) -> u32 {
        self.counts.get(&feature).copied().unwrap_or(0)
    }

    /// Whether the feature is stored, even with a zero count
    #[inline]
    pub fn contains(&self, feature: FeatureId) -> bool {
        self.counts.contains_key(&feature)
    }

    /// Add `count` occurrences of a feature
    pub fn add(&mut self, feature: FeatureId, count: u32) {
        *self.counts.entry(feature).or_insert(0) += count;
    }

    /// Element-wise sum with another fingerprint
    pub fn merge(&mut self, other: &Fingerprint) {
        for (&feature, &count) in &other.counts {
            self.add(feature, count);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn features(&self) -> impl Iterator<Item = FeatureId> + '_ {
        self.counts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, u32)> + '_ {
        self.counts.iter().map(|(&f, &c)| (f, c))
    }
}

impl FromIterator<(FeatureId, u32)> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = (FeatureId, u32)>>(iter: I) -> Self {
        let mut fp = Fingerprint::new();
        for (feature, count) in iter {
            fp.add(feature, count);
        }
        fp
    }
}
