//! JSON product document
//!
//! The whole accumulated sequence is written in one shot at the end of the
//! run: pretty-printed with 2-space indentation, non-ASCII text left unescaped.

use crate::product::ProductRecord;
use crate::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `records` to `destination`, replacing any existing file
///
/// The document is written to a temporary file next to `destination` and
/// renamed over it, so a failed write leaves the previous file untouched.
pub fn persist(records: &[ProductRecord], destination: &Path) -> Result<()> {
    let dir = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    tmp.persist(destination).map_err(|e| e.error)?;
    Ok(())
}

/// Reads a product document written by [`persist`]
pub fn load_products(source: &Path) -> Result<Vec<ProductRecord>> {
    let reader = BufReader::new(File::open(source)?);
    Ok(serde_json::from_reader(reader)?)
}
