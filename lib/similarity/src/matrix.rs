//! Pairwise distance matrix over a screen
//!
//! Profiles are built once per cocktail and the upper triangle is computed in
//! parallel, then mirrored.

use crate::distance::{combine, CocktailProfile, Weights};
use cockatoo_core::{Cocktail, Result};
use rayon::prelude::*;
use serde::Serialize;

/// Symmetric matrix of cocktail distances
#[derive(Debug, Clone, Serialize)]
pub struct DistanceMatrix {
    names: Vec<String>,
    /// Row-major, `names.len()` squared
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn compute(cocktails: &[Cocktail], weights: &Weights) -> Result<Self> {
        weights.validate()?;

        let profiles: Vec<CocktailProfile> = cocktails.par_iter().map(CocktailProfile::of).collect();
        let n = cocktails.len();

        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| combine(&profiles[i], &profiles[j], weights).2)
                    .collect()
            })
            .collect();

        let mut values = vec![0.0; n * n];
        for (i, row) in rows.into_iter().enumerate() {
            for (offset, d) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }
        // self-distance follows the same fallback rules as any other pair
        for (i, profile) in profiles.iter().enumerate() {
            values[i * n + i] = combine(profile, profile, weights).2;
        }

        tracing::debug!(cocktails = n, "distance matrix computed");
        Ok(Self {
            names: cocktails.iter().map(|c| c.name.clone()).collect(),
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let n = self.len();
        if i >= n || j >= n {
            return None;
        }
        Some(self.values[i * n + j])
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        let n = self.len();
        (i < n).then(|| &self.values[i * n..(i + 1) * n])
    }

    /// Distinct pairs `(i, j, d)` with `i < j` and `d <= threshold`
    ///
    /// Sorted by ascending distance, ties by index.
    pub fn pairs_below(&self, threshold: f64) -> Vec<(usize, usize, f64)> {
        let n = self.len();
        let mut pairs: Vec<(usize, usize, f64)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, self.values[i * n + j]))
            .filter(|&(_, _, d)| d <= threshold)
            .collect();
        pairs.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)).then(a.1.cmp(&b.1)));
        pairs
    }
}
