//! Typed readers for the monthly CMS extracts.
//!
//! Every extract is a single-byte (Latin-1) CSV whose header row is thrown
//! away: columns are mapped by position onto a fixed schema, and each field
//! is coerced on its own so a bad value never rejects a row.

pub mod contract;
pub mod enrollment;
pub mod penetration;
pub mod service_area;

pub use contract::{ContractRecord, read_contract};
pub use enrollment::{EnrollmentRecord, read_enroll};
pub use penetration::{PenetrationRecord, read_penetration};
pub use service_area::{ServiceAreaRecord, read_service_area};

use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::coerce::MissingValues;
use crate::error::{IngestError, Result};

/// One data row of an extract, decoded but not yet typed.
#[derive(Debug, Clone, Default)]
pub struct RawRow(Vec<String>);

impl RawRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    /// Field at `idx`; `None` when the row is short.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    /// Number of fields actually present in the file.
    pub fn width(&self) -> usize {
        self.0.len()
    }
}

/// A record type with a fixed positional column schema.
pub trait PositionalRecord: Sized {
    /// Canonical column names, in file order. Matches the serialized field
    /// names, so exported tables carry the same header.
    const COLUMNS: &'static [&'static str];

    /// Label used in missing-file errors.
    const KIND: &'static str;

    /// Literals this format treats as missing.
    fn missing_values() -> MissingValues;

    /// Types one raw row. Never fails.
    fn from_raw(row: &RawRow, missing: &MissingValues) -> Self;
}

/// Decodes Latin-1 bytes. Every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Fails with [`IngestError::MissingFile`] when `path` does not exist.
pub fn ensure_exists(kind: &'static str, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(IngestError::MissingFile {
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// Reads every data row of a headered CSV, ignoring the header's contents.
pub fn read_raw_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        rows.push(RawRow(record.iter().map(decode_latin1).collect()));
    }
    Ok(rows)
}

/// Reads `path` into records of type `R`.
pub fn read_records<R: PositionalRecord>(path: &Path) -> Result<Vec<R>> {
    ensure_exists(R::KIND, path)?;
    let missing = R::missing_values();
    let raw = read_raw_rows(path)?;

    let short = raw.iter().filter(|r| r.width() < R::COLUMNS.len()).count();
    debug!(
        path = %path.display(),
        kind = R::KIND,
        rows = raw.len(),
        short_rows = short,
        "Read extract"
    );

    Ok(raw.iter().map(|row| R::from_raw(row, &missing)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(b"Dona Ana"), "Dona Ana");
        assert_eq!(decode_latin1(&[0x44, 0x6f, 0xf1, 0x61]), "Do\u{f1}a");
    }

    #[test]
    fn test_read_raw_rows_skips_header_and_keeps_short_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"whatever,header\na,b,c\nd\n").unwrap();

        let rows = read_raw_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(2), Some("c"));
        assert_eq!(rows[1].get(0), Some("d"));
        assert_eq!(rows[1].get(1), None);
    }

    #[test]
    fn test_read_raw_rows_non_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"h\n\"Pe\xf1a Health\"\n").unwrap();

        let rows = read_raw_rows(file.path()).unwrap();
        assert_eq!(rows[0].get(0), Some("Pe\u{f1}a Health"));
    }

    fn exported_header<R: PositionalRecord + Default + serde::Serialize>() -> Vec<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(R::default()).unwrap();
        let bytes = wtr.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        header.split(',').map(str::to_string).collect()
    }

    #[test]
    fn test_contract_columns_match_exported_header() {
        assert_eq!(exported_header::<ContractRecord>(), ContractRecord::COLUMNS);
    }

    #[test]
    fn test_enrollment_columns_match_exported_header() {
        assert_eq!(exported_header::<EnrollmentRecord>(), EnrollmentRecord::COLUMNS);
    }

    #[test]
    fn test_service_area_columns_match_exported_header() {
        assert_eq!(exported_header::<ServiceAreaRecord>(), ServiceAreaRecord::COLUMNS);
    }

    #[test]
    fn test_penetration_columns_match_exported_header() {
        assert_eq!(exported_header::<PenetrationRecord>(), PenetrationRecord::COLUMNS);
    }

    #[test]
    fn test_raw_row_width() {
        let row = RawRow::new(vec!["a".into(), "b".into()]);
        assert_eq!(row.width(), 2);
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_ensure_exists() {
        let err = ensure_exists("contract", Path::new("/no/such/file.csv")).unwrap_err();
        assert!(err.is_missing_file());
        assert_eq!(err.to_string(), "missing contract file: /no/such/file.csv");
    }
}
