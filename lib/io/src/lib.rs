//! # Cockatoo IO
//!
//! Loading and saving screens.
//!
//! - [`csv_screen`] - row-oriented CSV screens with an explicit row shape
//! - [`tables`] - tab-separated ion and summary tables
//! - [`schema`] - versioned JSON documents described by field tables
//!
//! Malformed records never abort a load: they are reported through the
//! [`Diagnostics`](cockatoo_core::Diagnostics) collector passed in by the
//! caller and skipped. Only unreadable input and malformed documents fail.

pub mod csv_screen;
pub mod schema;
pub mod tables;

pub use csv_screen::{load_csv_screen, parse_ph, read_csv_screen, validate_arity, CocktailRow, CompoundFields};
pub use schema::{
    decode_screen, encode_screen, from_json_str, read_screen, to_json_string, write_screen, FieldDefault,
    FieldKind, FieldSpec, Presence, SCHEMA_VERSION,
};
pub use tables::{
    apply_summary_stats, load_ion_records, load_summary_stats, read_ion_records, read_summary_stats,
    SummaryStats, SummaryTable,
};
