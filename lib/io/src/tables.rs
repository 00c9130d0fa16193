//! Tab-separated reference tables
//!
//! - ion table: `name`, `type` (`c`/`a`), `smiles`
//! - summary table: `name`, `conc_min`, `conc_max`, `molecular_weight`, `smiles`
//!
//! Names are matched case-insensitively. Empty cells count as missing.

use cockatoo_core::{Charge, DiagnosticKind, Diagnostics, Error, IonRecord, Result, Screen};
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn csv_error(e: csv::Error) -> Error {
    Error::Serialization(e.to_string())
}

fn require_columns(headers: &StringRecord, table: &str, columns: &[&str]) -> Result<()> {
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(Error::InvalidRecord(format!(
                "{} table is missing the '{}' column",
                table, column
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct IonRow {
    name: String,
    #[serde(rename = "type")]
    charge: String,
    smiles: String,
}

/// Read reference ion records
///
/// Rows with an unknown charge tag are reported and skipped.
pub fn read_ion_records<R: Read>(reader: R, diags: &mut Diagnostics) -> Result<Vec<IonRecord>> {
    let mut reader = tsv_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    require_columns(&headers, "ion", &["name", "type", "smiles"])?;

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let row: IonRow = match result.and_then(|r| r.deserialize(Some(&headers))) {
            Ok(row) => row,
            Err(e) => {
                diags.push(
                    DiagnosticKind::ValidationFailure,
                    format!("ion row {}", line + 1),
                    e.to_string(),
                );
                continue;
            }
        };
        match row.charge.parse::<Charge>() {
            Ok(charge) => records.push(IonRecord::new(row.name, charge, row.smiles)),
            Err(e) => diags.push(DiagnosticKind::ValidationFailure, row.name, e),
        }
    }
    Ok(records)
}

pub fn load_ion_records(path: impl AsRef<Path>, diags: &mut Diagnostics) -> Result<Vec<IonRecord>> {
    read_ion_records(std::fs::File::open(path)?, diags)
}

/// Per-compound summary data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    pub conc_min: Option<f64>,
    pub conc_max: Option<f64>,
    pub molecular_weight: Option<f64>,
    pub smiles: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryRow {
    name: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    conc_min: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    conc_max: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    molecular_weight: Option<f64>,
    #[serde(default)]
    smiles: Option<String>,
}

/// Summary data keyed by lowercase compound name
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    rows: BTreeMap<String, SummaryStats>,
}

impl SummaryTable {
    pub fn get(&self, name: &str) -> Option<&SummaryStats> {
        self.rows.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read a summary table; later rows override earlier ones with the same name
pub fn read_summary_stats<R: Read>(reader: R, diags: &mut Diagnostics) -> Result<SummaryTable> {
    let mut reader = tsv_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    require_columns(&headers, "summary", &["name"])?;

    let mut table = SummaryTable::default();
    for (line, result) in reader.records().enumerate() {
        match result.and_then(|r| r.deserialize::<SummaryRow>(Some(&headers))) {
            Ok(row) if !row.name.is_empty() => {
                let stats = SummaryStats {
                    conc_min: row.conc_min,
                    conc_max: row.conc_max,
                    molecular_weight: row.molecular_weight,
                    smiles: row.smiles,
                };
                table.rows.insert(row.name.to_lowercase(), stats);
            }
            Ok(_) => diags.push(
                DiagnosticKind::ValidationFailure,
                format!("summary row {}", line + 1),
                "summary row without a name",
            ),
            Err(e) => diags.push(
                DiagnosticKind::ValidationFailure,
                format!("summary row {}", line + 1),
                e.to_string(),
            ),
        }
    }
    Ok(table)
}

pub fn load_summary_stats(path: impl AsRef<Path>, diags: &mut Diagnostics) -> Result<SummaryTable> {
    read_summary_stats(std::fs::File::open(path)?, diags)
}

/// Copy summary data onto every compound of the screen
///
/// Each missing statistic, a missing structure string and compounds absent
/// from the table are reported as `MissingData`. Statistics are overwritten,
/// a missing one clears the compound's value.
pub fn apply_summary_stats(screen: &mut Screen, table: &SummaryTable, diags: &mut Diagnostics) {
    for compound in screen.cocktails.iter_mut().flat_map(|c| c.components.iter_mut()) {
        let Some(stats) = table.get(&compound.name) else {
            diags.push(
                DiagnosticKind::MissingData,
                compound.name.clone(),
                "no summary data for compound",
            );
            continue;
        };

        compound.conc_min = stats.conc_min;
        compound.conc_max = stats.conc_max;
        compound.molecular_weight = stats.molecular_weight;
        for (field, value) in [
            ("conc_min", stats.conc_min),
            ("conc_max", stats.conc_max),
            ("molecular_weight", stats.molecular_weight),
        ] {
            if value.is_none() {
                diags.push(
                    DiagnosticKind::MissingData,
                    compound.name.clone(),
                    format!("missing summary statistic '{}'", field),
                );
            }
        }

        match stats.smiles.as_deref().filter(|s| !s.is_empty()) {
            Some(smiles) => compound.smiles = Some(smiles.to_string()),
            None => diags.push(
                DiagnosticKind::MissingData,
                compound.name.clone(),
                "missing structure string",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cockatoo_core::{Cocktail, Compound};

    const IONS: &str = "name\ttype\tsmiles
Sodium\tc\t[Na+]
chloride\ta\t[Cl-]
mystery\tx\t[K+]
";

    const SUMMARY: &str = "name\tconc_min\tconc_max\tmolecular_weight\tsmiles
sodium chloride\t0.1\t4.0\t58.44\t[Na+].[Cl-]
Tris\t0.05\t\t121.14\tOCC(N)(CO)CO
peg 3350\t5\t30\tabc\t
";

    #[test]
    fn test_read_ion_records() {
        let mut diags = Diagnostics::new();
        let records = read_ion_records(IONS.as_bytes(), &mut diags).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Sodium");
        assert_eq!(records[0].charge, Charge::Cation);
        assert_eq!(records[1].structure, "[Cl-]");
        assert_eq!(diags.count(DiagnosticKind::ValidationFailure), 1);
        assert_eq!(diags.entries()[0].subject, "mystery");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut diags = Diagnostics::new();
        let result = read_ion_records("name\tsmiles\nsodium\t[Na+]\n".as_bytes(), &mut diags);
        assert!(matches!(result, Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn test_read_summary_stats() {
        let mut diags = Diagnostics::new();
        let table = read_summary_stats(SUMMARY.as_bytes(), &mut diags).unwrap();

        assert_eq!(table.len(), 3);
        let tris = table.get("TRIS").unwrap();
        assert_eq!(tris.conc_min, Some(0.05));
        assert_eq!(tris.conc_max, None);
        assert_eq!(tris.smiles.as_deref(), Some("OCC(N)(CO)CO"));

        let peg = table.get("peg 3350").unwrap();
        assert_eq!(peg.molecular_weight, None);
        assert_eq!(peg.smiles, None);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_apply_summary_stats() {
        let mut diags = Diagnostics::new();
        let table = read_summary_stats(SUMMARY.as_bytes(), &mut diags).unwrap();

        let mut screen = Screen::new("s");
        screen.add_cocktail(Cocktail::with_components(
            "A1",
            Some(8.0),
            vec![
                Compound::new("Sodium Chloride", 0.2, "M", None),
                Compound::new("tris", 0.1, "M", Some(8.0)),
                Compound::new("glycerol", 10.0, "% v/v", None),
            ],
        ));
        apply_summary_stats(&mut screen, &table, &mut diags);

        let nacl = &screen.cocktails[0].components[0];
        assert_eq!(nacl.conc_max, Some(4.0));
        assert_eq!(nacl.molecular_weight, Some(58.44));
        assert_eq!(nacl.smiles.as_deref(), Some("[Na+].[Cl-]"));

        let tris = &screen.cocktails[0].components[1];
        assert_eq!(tris.conc_max, None);

        // tris lacks conc_max, glycerol has no row at all
        assert_eq!(diags.count(DiagnosticKind::MissingData), 2);
        let subjects: Vec<_> = diags.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(subjects, vec!["tris", "glycerol"]);
    }

    #[test]
    fn test_load_tables_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let ions = dir.path().join("ions.tsv");
        let summary = dir.path().join("summary.tsv");
        std::fs::write(&ions, IONS).unwrap();
        std::fs::write(&summary, SUMMARY).unwrap();

        let mut diags = Diagnostics::new();
        assert_eq!(load_ion_records(&ions, &mut diags).unwrap().len(), 2);
        assert_eq!(load_summary_stats(&summary, &mut diags).unwrap().len(), 3);
    }
}
