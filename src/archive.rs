//! Packaging selected logos into a single downloadable archive.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::store::{LogoPosition, ResultStore};

/// A named file to place in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Turns a set of files into one archive buffer. Synchronous, no network I/O.
pub trait ArchiveBuilder {
    fn build(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>>;
}

/// Zip archive builder.
#[derive(Debug, Clone, Copy)]
pub struct ZipArchiveBuilder {
    compression: CompressionMethod,
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Store entries uncompressed.
    pub fn stored() -> Self {
        Self {
            compression: CompressionMethod::Stored,
        }
    }
}

impl Default for ZipArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(self.compression);

        for entry in entries {
            zip.start_file(entry.filename.as_str(), options)?;
            zip.write_all(&entry.bytes)?;
        }

        let buffer = zip.finish()?.into_inner();
        tracing::debug!(entries = entries.len(), bytes = buffer.len(), "Built logo archive");
        Ok(buffer)
    }
}

/// Build archive entries for the selected records.
///
/// Files are named `<company>.<format>`. Path separators in names are replaced,
/// and a name already emitted gets the lowest free ` (2)`, ` (3)`, ... suffix,
/// so every entry in the archive is unique. Failed records are skipped.
pub fn archive_entries(store: &ResultStore, positions: &[LogoPosition]) -> Vec<ArchiveEntry> {
    let mut emitted: HashSet<String> = HashSet::new();

    store
        .select(positions)
        .into_iter()
        .filter_map(|(_, logo)| {
            let format = logo.format()?;
            let bytes = logo.raw_bytes()?.to_vec();
            let stem = sanitize(logo.company_name());

            let mut filename = format!("{}.{}", stem, format);
            let mut copy = 1;
            while emitted.contains(&filename) {
                copy += 1;
                filename = format!("{} ({}).{}", stem, copy, format);
            }
            emitted.insert(filename.clone());

            Some(ArchiveEntry { filename, bytes })
        })
        .collect()
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    if cleaned.trim().is_empty() {
        "logo".to_string()
    } else {
        cleaned
    }
}
