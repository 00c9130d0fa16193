use crate::{Cocktail, Error, Result};
use ahash::AHashMap;
use serde::Serialize;
use std::fmt;

/// A macromolecular crystallization screen: a named collection of cocktails
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Screen {
    pub name: String,
    pub cocktails: Vec<Cocktail>,
}

impl Screen {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cocktails: Vec::new(),
        }
    }

    pub fn add_cocktail(&mut self, cocktail: Cocktail) {
        self.cocktails.push(cocktail);
    }

    pub fn len(&self) -> usize {
        self.cocktails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cocktails.is_empty()
    }

    /// First cocktail with the given name
    pub fn get(&self, name: &str) -> Option<&Cocktail> {
        self.cocktails.iter().find(|c| c.name == name)
    }

    /// Like [`Screen::get`], failing when the cocktail is absent
    pub fn require(&self, name: &str) -> Result<&Cocktail> {
        self.get(name)
            .ok_or_else(|| Error::CocktailNotFound(name.to_string()))
    }

    /// Summary of compound usage across the screen
    pub fn stats(&self) -> ScreenStats {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for cocktail in &self.cocktails {
            for compound in &cocktail.components {
                *counts.entry(compound.name.as_str()).or_insert(0) += 1;
            }
        }

        let mut compound_counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        compound_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        ScreenStats {
            name: self.name.clone(),
            wells: self.cocktails.len(),
            distinct_compounds: compound_counts.len(),
            compound_counts,
        }
    }
}

/// Compound usage statistics for a screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenStats {
    pub name: String,
    pub wells: usize,
    pub distinct_compounds: usize,
    /// (compound name, number of occurrences), most frequent first
    pub compound_counts: Vec<(String, usize)>,
}

impl fmt::Display for ScreenStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Wells: {}", self.wells)?;
        writeln!(f, "Distinct Compounds: {}", self.distinct_compounds)?;
        for (name, count) in &self.compound_counts {
            writeln!(f, "{}: {}", name, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Compound;

    fn cocktail(name: &str, compounds: &[&str]) -> Cocktail {
        Cocktail::with_components(
            name,
            None,
            compounds.iter().map(|c| Compound::new(c, 0.1, "M", None)).collect(),
        )
    }

    #[test]
    fn test_stats_counts_and_order() {
        let mut screen = Screen::new("test screen");
        screen.add_cocktail(cocktail("A1", &["tris", "sodium chloride"]));
        screen.add_cocktail(cocktail("A2", &["tris", "peg 3350"]));
        screen.add_cocktail(cocktail("A3", &["hepes", "peg 3350", "tris"]));

        let stats = screen.stats();
        assert_eq!(stats.wells, 3);
        assert_eq!(stats.distinct_compounds, 4);
        assert_eq!(stats.compound_counts[0], ("tris".to_string(), 3));
        assert_eq!(stats.compound_counts[1], ("peg 3350".to_string(), 2));
        // ties are ordered by name
        assert_eq!(stats.compound_counts[2].0, "hepes");
        assert_eq!(stats.compound_counts[3].0, "sodium chloride");
    }

    #[test]
    fn test_stats_display() {
        let mut screen = Screen::new("mini");
        screen.add_cocktail(cocktail("A1", &["tris"]));
        let text = screen.stats().to_string();
        assert_eq!(text, "Name: mini\nWells: 1\nDistinct Compounds: 1\ntris: 1\n");
    }

    #[test]
    fn test_get_by_name() {
        let mut screen = Screen::new("s");
        screen.add_cocktail(cocktail("A1", &["tris"]));
        assert!(screen.get("A1").is_some());
        assert!(screen.get("B1").is_none());
        assert!(screen.require("A1").is_ok());
        assert!(matches!(screen.require("B1"), Err(Error::CocktailNotFound(n)) if n == "B1"));
    }
}
