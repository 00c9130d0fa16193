//! Reference ion table
//!
//! Known ionic fragments keyed case-insensitively by name. The table is built
//! once per classification pass and is read-only afterwards. Entry order is
//! the order of the source records, which fixes the order in which matches are
//! appended to a compound's fragment lists.

use ahash::AHashMap;
use cockatoo_chem::ChemEngine;
use cockatoo_core::{Charge, DiagnosticKind, Diagnostics, IonRecord};

/// A reference ion with its parsed structure
#[derive(Debug, Clone)]
pub struct IonEntry<S> {
    /// Lowercase ion name
    pub name: String,
    pub charge: Charge,
    /// Structure string as given in the source
    pub smiles: String,
    /// `None` when the structure could not be parsed; such entries only take
    /// part in name matching
    pub structure: Option<S>,
}

/// Read-only lookup of reference ions
#[derive(Debug, Clone)]
pub struct IonTable<S> {
    entries: Vec<IonEntry<S>>,
    index: AHashMap<String, usize>,
}

impl<S> IonTable<S> {
    /// Build the table, parsing every structure with `engine`
    ///
    /// A later record with an already-seen name replaces the earlier entry's
    /// data but keeps its position.
    pub fn build<E>(engine: &E, records: impl IntoIterator<Item = IonRecord>, diags: &mut Diagnostics) -> Self
    where
        E: ChemEngine<Structure = S>,
    {
        let mut table = IonTable {
            entries: Vec::new(),
            index: AHashMap::new(),
        };

        for record in records {
            let name = record.name.trim().to_lowercase();
            if name.is_empty() {
                diags.push(
                    DiagnosticKind::ValidationFailure,
                    record.structure.clone(),
                    "ion record without a name",
                );
                continue;
            }

            let structure = match engine.parse_structure(&record.structure) {
                Ok(s) => Some(s),
                Err(e) => {
                    diags.push(
                        DiagnosticKind::ParseFailure,
                        name.clone(),
                        format!("failed to parse ion structure '{}': {}", record.structure, e),
                    );
                    None
                }
            };

            let entry = IonEntry {
                name: name.clone(),
                charge: record.charge,
                smiles: record.structure,
                structure,
            };

            match table.index.get(&name) {
                Some(&pos) => table.entries[pos] = entry,
                None => {
                    table.index.insert(name, table.entries.len());
                    table.entries.push(entry);
                }
            }
        }

        table
    }

    /// Look up an entry by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&IonEntry<S>> {
        self.index
            .get(&name.to_lowercase())
            .map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in table order
    pub fn iter(&self) -> impl Iterator<Item = &IonEntry<S>> {
        self.entries.iter()
    }
}
