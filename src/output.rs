//! Export of produced tables and summaries.
//!
//! Tables go to CSV (optionally gzip-compressed), summaries to JSON.

use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

/// Pretty-printed JSON for a summary.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn serialize_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<W> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| crate::error::IngestError::Io(e.into_error()))
}

/// Writes `rows` as CSV with a header row; absent values are empty fields.
///
/// With `gzip`, `.gz` is appended to the path and the file is compressed.
/// Returns the path actually written.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T], gzip: bool) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let written = if gzip {
        let mut gz_path = path.as_os_str().to_owned();
        gz_path.push(".gz");
        let gz_path = PathBuf::from(gz_path);

        let encoder = GzEncoder::new(File::create(&gz_path)?, Compression::default());
        serialize_rows(encoder, rows)?.finish()?;
        gz_path
    } else {
        serialize_rows(File::create(path)?, rows)?;
        path.to_path_buf()
    };

    info!(path = %written.display(), rows = rows.len(), gzip, "Wrote table");
    Ok(written)
}
