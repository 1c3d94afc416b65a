//! Append-only, index-suffixed output files.
//!
//! Every run writes `<dir>/<n>.json`. The index starts at the number of JSON
//! files already present and is claimed with `create_new`, so two concurrent
//! runs can never end up with the same file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use sb_core::{Error, Result};

#[derive(Debug)]
pub struct IndexedFile {
    pub index: usize,
    pub path: PathBuf,
    pub file: File,
}

fn json_stems(dir: &Path) -> Result<Vec<String>> {
    let mut stems = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }
    Ok(stems)
}

/// Claim the next free `<n>.json` in `dir`, creating the directory if needed.
pub fn allocate_indexed(dir: &Path) -> Result<IndexedFile> {
    fs::create_dir_all(dir)?;
    let mut index = json_stems(dir)?.len();
    loop {
        let path = dir.join(format!("{}.json", index));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok(IndexedFile { index, path, file }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => index += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Serialize `value` as pretty JSON into a freshly allocated file.
///
/// The claimed file is removed again if writing fails.
pub fn write_indexed<T: Serialize + ?Sized>(dir: &Path, value: &T) -> Result<PathBuf> {
    let slot = allocate_indexed(dir)?;
    let path = slot.path;
    if let Err(e) = write_pretty(slot.file, value) {
        let _ = fs::remove_file(&path);
        return Err(e);
    }
    Ok(path)
}

pub(crate) fn write_pretty<T: Serialize + ?Sized>(file: File, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(file);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush().map_err(Error::from)
}

/// Highest-numbered `<n>.json` in `dir`, or `None` when there is none.
pub fn latest_indexed(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let latest = json_stems(dir)?
        .iter()
        .filter_map(|stem| stem.parse::<usize>().ok())
        .max();
    Ok(latest.map(|n| dir.join(format!("{}.json", n))))
}
