//! Versioned JSON screen documents
//!
//! The document shape is described by explicit field tables rather than by
//! walking struct fields. Each [`FieldSpec`] names a field, its JSON kind,
//! whether it must be present and the value used when it is absent. Encoding
//! emits every field of the table; decoding checks every field against it.
//!
//! ```text
//! { "version": 1, "name": "...", "cocktails": [
//!     { "name": "...", "ph": 7.0, "components": [ { "name": "...", ... } ] } ] }
//! ```
//!
//! Ion lists keep the classification state: `null` means the compound has not
//! been classified, an array (possibly empty) means it has.

use cockatoo_core::{
    checked_ph, Cocktail, Compound, DiagnosticKind, Diagnostics, Error, IonState, Result, Screen,
};
use serde_json::{json, Map, Value};
use std::path::Path;

/// Document format version written by [`encode_screen`]
pub const SCHEMA_VERSION: u32 = 1;

pub const COMPONENTS_FIELD: &str = "components";
pub const COCKTAILS_FIELD: &str = "cocktails";

/// JSON kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Float,
    Bool,
    StringList,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Float => value.as_f64().is_some_and(f64::is_finite),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// Presence policy of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent or mistyped: the record is rejected
    Required,
    /// Absent: the default is used. `null` is allowed.
    Optional,
}

/// Value taken by an absent optional field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    None,
    Null,
    False,
    EmptyList,
}

impl FieldDefault {
    fn value(self) -> Option<Value> {
        match self {
            FieldDefault::None => None,
            FieldDefault::Null => Some(Value::Null),
            FieldDefault::False => Some(Value::Bool(false)),
            FieldDefault::EmptyList => Some(Value::Array(Vec::new())),
        }
    }
}

/// One entry of a record's field table
pub struct FieldSpec<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub default: FieldDefault,
    get: fn(&T) -> Value,
    set: fn(&mut T, &Value),
}

impl<T> FieldSpec<T> {
    const fn required(name: &'static str, kind: FieldKind, get: fn(&T) -> Value, set: fn(&mut T, &Value)) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
            default: FieldDefault::None,
            get,
            set,
        }
    }

    const fn optional(
        name: &'static str,
        kind: FieldKind,
        default: FieldDefault,
        get: fn(&T) -> Value,
        set: fn(&mut T, &Value),
    ) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
            default,
            get,
            set,
        }
    }
}

fn text(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
}

/// Compound record fields, in document order
///
/// `name` comes first: setting it rebuilds the compound so that flags derived
/// from the name are recomputed before later fields override them.
pub static COMPOUND_FIELDS: &[FieldSpec<Compound>] = &[
    FieldSpec::required(
        "name",
        FieldKind::String,
        |c| json!(c.name),
        |c, v| *c = Compound::new(&text(v), c.conc, c.unit.clone(), c.ph),
    ),
    FieldSpec::required("conc", FieldKind::Float, |c| json!(c.conc), |c, v| {
        c.conc = v.as_f64().unwrap_or_default()
    }),
    FieldSpec::required("unit", FieldKind::String, |c| json!(c.unit), |c, v| c.unit = text(v)),
    FieldSpec::optional("ph", FieldKind::Float, FieldDefault::Null, |c| json!(c.ph), |c, v| {
        c.ph = v.as_f64()
    }),
    FieldSpec::optional(
        "conc_min",
        FieldKind::Float,
        FieldDefault::Null,
        |c| json!(c.conc_min),
        |c, v| c.conc_min = v.as_f64(),
    ),
    FieldSpec::optional(
        "conc_max",
        FieldKind::Float,
        FieldDefault::Null,
        |c| json!(c.conc_max),
        |c, v| c.conc_max = v.as_f64(),
    ),
    FieldSpec::optional(
        "molecular_weight",
        FieldKind::Float,
        FieldDefault::Null,
        |c| json!(c.molecular_weight),
        |c, v| c.molecular_weight = v.as_f64(),
    ),
    FieldSpec::optional(
        "smiles",
        FieldKind::String,
        FieldDefault::Null,
        |c| json!(c.smiles),
        |c, v| c.smiles = v.as_str().map(str::to_string),
    ),
    FieldSpec::optional(
        "cations",
        FieldKind::StringList,
        FieldDefault::Null,
        |c| json!(c.ions.cations()),
        |c, v| {
            if let Some(cations) = strings(v) {
                let anions = c.ions.anions().map(<[String]>::to_vec).unwrap_or_default();
                c.ions = IonState::Classified { cations, anions };
            }
        },
    ),
    FieldSpec::optional(
        "anions",
        FieldKind::StringList,
        FieldDefault::Null,
        |c| json!(c.ions.anions()),
        |c, v| {
            if let Some(anions) = strings(v) {
                let cations = c.ions.cations().map(<[String]>::to_vec).unwrap_or_default();
                c.ions = IonState::Classified { cations, anions };
            }
        },
    ),
    FieldSpec::optional(
        "name_flags",
        FieldKind::StringList,
        FieldDefault::EmptyList,
        |c| json!(c.name_flags),
        |c, v| c.name_flags = strings(v).unwrap_or_default().into_iter().collect(),
    ),
    FieldSpec::optional(
        "is_peg",
        FieldKind::Bool,
        FieldDefault::None,
        |c| json!(c.is_peg),
        |c, v| {
            if let Some(flag) = v.as_bool() {
                c.is_peg = flag;
            }
        },
    ),
];

/// Cocktail record fields; components are handled separately
pub static COCKTAIL_FIELDS: &[FieldSpec<Cocktail>] = &[
    FieldSpec::required("name", FieldKind::String, |c| json!(c.name), |c, v| c.name = text(v)),
    FieldSpec::optional("ph", FieldKind::Float, FieldDefault::Null, |c| json!(c.ph), |c, v| {
        c.ph = v.as_f64()
    }),
];

fn encode_record<T>(record: &T, fields: &[FieldSpec<T>]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| (field.name.to_string(), (field.get)(record)))
        .collect()
}

/// Fill `record` from `object`, or explain why it is rejected
fn decode_record<T>(
    record: &mut T,
    object: &Map<String, Value>,
    fields: &[FieldSpec<T>],
    subject: &str,
    diags: &mut Diagnostics,
) -> std::result::Result<(), String> {
    for field in fields {
        let value = match (object.get(field.name), field.presence) {
            (Some(value), _) if field.kind.accepts(value) => value.clone(),
            (Some(Value::Null), Presence::Optional) => Value::Null,
            (Some(value), _) => {
                return Err(format!("field '{}' has the wrong type: {}", field.name, value));
            }
            (None, Presence::Required) => {
                return Err(format!("missing required field '{}'", field.name));
            }
            (None, Presence::Optional) => {
                diags.push(
                    DiagnosticKind::MissingData,
                    subject.to_string(),
                    format!("missing field '{}', using default", field.name),
                );
                match field.default.value() {
                    Some(default) => default,
                    None => continue,
                }
            }
        };
        (field.set)(record, &value);
    }
    Ok(())
}

pub fn encode_compound(compound: &Compound) -> Value {
    Value::Object(encode_record(compound, COMPOUND_FIELDS))
}

pub fn encode_cocktail(cocktail: &Cocktail) -> Value {
    let mut object = encode_record(cocktail, COCKTAIL_FIELDS);
    object.insert(
        COMPONENTS_FIELD.to_string(),
        cocktail.components.iter().map(encode_compound).collect(),
    );
    Value::Object(object)
}

/// Encode a screen as a versioned document
pub fn encode_screen(screen: &Screen) -> Value {
    json!({
        "version": SCHEMA_VERSION,
        "name": screen.name,
        "cocktails": screen.cocktails.iter().map(encode_cocktail).collect::<Vec<_>>(),
    })
}

/// Decode one compound; `None` when the record is rejected
pub fn decode_compound(value: &Value, subject: &str, diags: &mut Diagnostics) -> Option<Compound> {
    let reject = |diags: &mut Diagnostics, reason: String| {
        diags.push(DiagnosticKind::ValidationFailure, subject.to_string(), reason);
        None
    };

    let Some(object) = value.as_object() else {
        return reject(diags, "compound is not an object".to_string());
    };

    let mut compound = Compound::new("", 0.0, "", None);
    if let Err(reason) = decode_record(&mut compound, object, COMPOUND_FIELDS, subject, diags) {
        return reject(diags, reason);
    }
    if compound.name.is_empty() {
        return reject(diags, "compound name is empty".to_string());
    }
    compound.ph = checked_ph(compound.ph, subject, diags);
    Some(compound)
}

/// Decode one cocktail; rejected components are skipped
pub fn decode_cocktail(value: &Value, subject: &str, diags: &mut Diagnostics) -> Option<Cocktail> {
    let reject = |diags: &mut Diagnostics, reason: String| {
        diags.push(DiagnosticKind::ValidationFailure, subject.to_string(), reason);
        None
    };

    let Some(object) = value.as_object() else {
        return reject(diags, "cocktail is not an object".to_string());
    };

    let mut cocktail = Cocktail::new("", None);
    if let Err(reason) = decode_record(&mut cocktail, object, COCKTAIL_FIELDS, subject, diags) {
        return reject(diags, reason);
    }
    if cocktail.name.is_empty() {
        return reject(diags, "cocktail name is empty".to_string());
    }
    cocktail.ph = checked_ph(cocktail.ph, subject, diags);

    let components = match object.get(COMPONENTS_FIELD) {
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => return reject(diags, format!("'{}' is not a list", COMPONENTS_FIELD)),
        None => return reject(diags, format!("missing required field '{}'", COMPONENTS_FIELD)),
    };
    for (i, item) in components.iter().enumerate() {
        let subject = format!("{}/{}", cocktail.name, i);
        if let Some(compound) = decode_compound(item, &subject, diags) {
            cocktail.add_compound(compound);
        }
    }
    Some(cocktail)
}

/// Decode a versioned screen document
///
/// Fails when the document is not an object, has no screen name or carries
/// an unsupported version. Individual records are validated on their own and
/// rejected with a diagnostic.
pub fn decode_screen(document: &Value, diags: &mut Diagnostics) -> Result<Screen> {
    let object = document
        .as_object()
        .ok_or_else(|| Error::InvalidRecord("screen document is not an object".to_string()))?;

    let version = object
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::InvalidRecord("screen document has no version".to_string()))?;
    if version != u64::from(SCHEMA_VERSION) {
        return Err(Error::UnsupportedVersion {
            expected: SCHEMA_VERSION,
            actual: u32::try_from(version).unwrap_or(u32::MAX),
        });
    }

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidRecord("screen document has no name".to_string()))?;
    let cocktails = object
        .get(COCKTAILS_FIELD)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::InvalidRecord(format!("screen document has no '{}' list", COCKTAILS_FIELD)))?;

    let mut screen = Screen::new(name);
    for (i, item) in cocktails.iter().enumerate() {
        let subject = item
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| format!("cocktail {}", i), str::to_string);
        if let Some(cocktail) = decode_cocktail(item, &subject, diags) {
            screen.add_cocktail(cocktail);
        }
    }

    tracing::debug!(screen = %screen.name, cocktails = screen.len(), "decoded screen document");
    Ok(screen)
}

pub fn to_json_string(screen: &Screen) -> Result<String> {
    serde_json::to_string_pretty(&encode_screen(screen)).map_err(|e| Error::Serialization(e.to_string()))
}

pub fn from_json_str(text: &str, diags: &mut Diagnostics) -> Result<Screen> {
    let document: Value = serde_json::from_str(text).map_err(|e| Error::Serialization(e.to_string()))?;
    decode_screen(&document, diags)
}

pub fn write_screen(screen: &Screen, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, to_json_string(screen)?)?;
    Ok(())
}

pub fn read_screen(path: impl AsRef<Path>, diags: &mut Diagnostics) -> Result<Screen> {
    let text = std::fs::read_to_string(path)?;
    from_json_str(&text, diags)
}
