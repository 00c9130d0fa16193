//! Row-oriented CSV screens
//!
//! Each row describes one cocktail:
//!
//! ```text
//! name, overall_ph, [conc, unit, compound_name, compound_ph]+
//! ```
//!
//! Rows starting with `#` are comments. pH columns may carry a `pH` prefix,
//! which is stripped before parsing; a pH that still fails to parse is unset.
//! A pH outside 0..=14 is reported and unset.
//! A malformed row is reported and skipped, loading carries on with the next.

use cockatoo_core::{checked_ph, Cocktail, Compound, DiagnosticKind, Diagnostics, Error, Result, Screen};
use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use std::path::Path;

static PH_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ph\s*").expect("valid pH pattern"));

/// Number of leading cocktail columns
pub const COCKTAIL_FIELDS: usize = 2;
/// Number of columns per compound group
pub const COMPOUND_FIELDS: usize = 4;

/// Check a row's column count and return its number of compound groups
pub fn validate_arity(len: usize) -> std::result::Result<usize, String> {
    if len < COCKTAIL_FIELDS {
        return Err(format!(
            "expected at least {} leading fields, found {}",
            COCKTAIL_FIELDS, len
        ));
    }
    let rest = len - COCKTAIL_FIELDS;
    if rest == 0 || rest % COMPOUND_FIELDS != 0 {
        return Err(format!(
            "expected a positive multiple of {} compound fields, found {}",
            COMPOUND_FIELDS, rest
        ));
    }
    Ok(rest / COMPOUND_FIELDS)
}

/// Float parsing used for every numeric column; non-finite values are rejected
fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// pH column: optional `pH` prefix, unset when unparseable
pub fn parse_ph(text: &str) -> Option<f64> {
    parse_float(&PH_PREFIX.replace_all(text.trim(), ""))
}

/// One compound group of a row, as raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundFields {
    pub conc: String,
    pub unit: String,
    pub name: String,
    pub ph: String,
}

/// A cocktail row split into its named parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CocktailRow {
    pub name: String,
    pub ph: String,
    pub compounds: Vec<CompoundFields>,
}

impl CocktailRow {
    pub fn from_record(record: &StringRecord) -> std::result::Result<Self, String> {
        let groups = validate_arity(record.len())?;
        let field = |i: usize| record.get(i).unwrap_or_default().trim().to_string();

        let compounds = (0..groups)
            .map(|g| {
                let base = COCKTAIL_FIELDS + g * COMPOUND_FIELDS;
                CompoundFields {
                    conc: field(base),
                    unit: field(base + 1),
                    name: field(base + 2),
                    ph: field(base + 3),
                }
            })
            .collect();

        Ok(Self {
            name: field(0),
            ph: field(1),
            compounds,
        })
    }

    /// Build the cocktail, resolving its pH from the compounds when unset
    pub fn into_cocktail(self, diags: &mut Diagnostics) -> std::result::Result<Cocktail, String> {
        if self.name.is_empty() {
            return Err("missing cocktail name".to_string());
        }

        let ph = checked_ph(parse_ph(&self.ph), &self.name, diags);
        let mut cocktail = Cocktail::new(self.name, ph);
        for fields in self.compounds {
            if fields.name.is_empty() {
                return Err("missing compound name".to_string());
            }
            let Some(conc) = parse_float(&fields.conc) else {
                return Err(format!("missing concentration value for '{}'", fields.name));
            };
            let subject = format!("{}/{}", cocktail.name, fields.name);
            let ph = checked_ph(parse_ph(&fields.ph), &subject, diags);
            cocktail.add_compound(Compound::new(&fields.name, conc, fields.unit, ph));
        }

        cocktail.resolve_ph(diags);
        Ok(cocktail)
    }
}

/// Read a screen from CSV text
///
/// Only I/O and encoding problems fail; malformed rows become
/// `ValidationFailure` diagnostics.
pub fn read_csv_screen<R: Read>(name: &str, reader: R, diags: &mut Diagnostics) -> Result<Screen> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut screen = Screen::new(name);
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::Serialization(e.to_string()))?;
        let subject = record
            .position()
            .map_or_else(|| format!("row {}", line + 1), |p| format!("line {}", p.line()));

        let cocktail = CocktailRow::from_record(&record).and_then(|row| row.into_cocktail(diags));
        match cocktail {
            Ok(cocktail) => screen.add_cocktail(cocktail),
            Err(reason) => diags.push(
                DiagnosticKind::ValidationFailure,
                subject,
                format!("malformed row, {}: {:?}", reason, record.iter().collect::<Vec<_>>()),
            ),
        }
    }

    tracing::debug!(screen = %screen.name, cocktails = screen.len(), "loaded CSV screen");
    Ok(screen)
}

/// Read a screen from a CSV file
pub fn load_csv_screen(name: &str, path: impl AsRef<Path>, diags: &mut Diagnostics) -> Result<Screen> {
    let file = std::fs::File::open(path)?;
    read_csv_screen(name, file, diags)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: &str = "\
# name,ph,conc,unit,compound,ph
A1,,0.1,M,Tris,pH 8.5,2.0,M,Ammonium sulfate,
A2,pH 6.5,0.1,M,MES,6.5,30,% w/v,PEG 3350,
A3,,0.1,M,HEPES,7.5,0.1,M,Tris,8.5
A4,,0.1,M,HEPES,7.0,0.1,M,Tris,7.0
";

    fn load(text: &str) -> (Screen, Diagnostics) {
        let mut diags = Diagnostics::new();
        let screen = read_csv_screen("test", text.as_bytes(), &mut diags).unwrap();
        (screen, diags)
    }

    #[test]
    fn test_validate_arity() {
        assert_eq!(validate_arity(6), Ok(1));
        assert_eq!(validate_arity(10), Ok(2));
        assert!(validate_arity(1).is_err());
        assert!(validate_arity(2).is_err());
        assert!(validate_arity(7).is_err());
    }

    #[test]
    fn test_parse_ph() {
        assert_eq!(parse_ph("pH 7.5"), Some(7.5));
        assert_eq!(parse_ph("PH7"), Some(7.0));
        assert_eq!(parse_ph(" 6.0 "), Some(6.0));
        assert_eq!(parse_ph(""), None);
        assert_eq!(parse_ph("neutral"), None);
        assert_eq!(parse_ph("NaN"), None);
    }

    #[test]
    fn test_load_screen() {
        let (screen, diags) = load(SCREEN);
        assert_eq!(screen.name, "test");
        assert_eq!(screen.len(), 4);

        let a1 = screen.get("A1").unwrap();
        assert_eq!(a1.ph, Some(8.5));
        assert_eq!(a1.components[1].name, "ammonium sulfate");
        assert_eq!(a1.components[1].conc, 2.0);
        assert_eq!(a1.components[1].ph, None);

        let a2 = screen.get("A2").unwrap();
        assert_eq!(a2.ph, Some(6.5));
        assert!(a2.components[1].is_peg);
        assert_eq!(a2.components[1].unit, "% w/v");

        // differing component pH values: the first wins
        assert_eq!(screen.get("A3").unwrap().ph, Some(7.5));
        assert_eq!(screen.get("A4").unwrap().ph, Some(7.0));
        assert_eq!(diags.count(DiagnosticKind::AmbiguousPh), 1);
        assert_eq!(diags.count(DiagnosticKind::ValidationFailure), 0);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "\
B1,7.0,0.1,M,Tris,7.0
,7.0,0.1,M,Tris,7.0
B3,7.0,0.1,M,,7.0
B4,7.0,lots,M,Tris,7.0
B5,7.0,0.1,M
B6,7.0,0.2,M,NaCl,
";
        let (screen, diags) = load(text);
        let names: Vec<_> = screen.cocktails.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B1", "B6"]);
        assert_eq!(diags.count(DiagnosticKind::ValidationFailure), 4);
        assert_eq!(diags.entries()[0].subject, "line 2");
    }

    #[test]
    fn test_out_of_range_ph_is_unset() {
        let text = "\
C1,pH 15,0.1,M,Tris,8.0
C2,,0.1,M,Tris,-2,0.2,M,NaCl,6.5
C3,14,0.1,M,Tris,0
";
        let (screen, diags) = load(text);
        assert_eq!(screen.len(), 3);

        // the overall pH is dropped, the compound pH takes over
        assert_eq!(screen.get("C1").unwrap().ph, Some(8.0));
        let c2 = screen.get("C2").unwrap();
        assert_eq!(c2.components[0].ph, None);
        assert_eq!(c2.ph, Some(6.5));
        assert_eq!(screen.get("C3").unwrap().ph, Some(14.0));

        assert_eq!(diags.count(DiagnosticKind::ValidationFailure), 2);
        assert_eq!(diags.entries()[0].subject, "C1");
        assert_eq!(diags.entries()[1].subject, "C2/Tris");
        assert_eq!(diags.count(DiagnosticKind::AmbiguousPh), 0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.csv");
        std::fs::write(&path, SCREEN).unwrap();

        let mut diags = Diagnostics::new();
        let screen = load_csv_screen("file", &path, &mut diags).unwrap();
        assert_eq!(screen.len(), 4);

        let missing = load_csv_screen("file", dir.path().join("nope.csv"), &mut diags);
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
