//! Whole-file JSON reading and writing of entity collections

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

use crate::domain::Entity;

/// Indentation of the published country datasets
pub const DEFAULT_INDENT: usize = 2;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Read a JSON array of entities
pub fn read_entities(path: &Path) -> Result<Vec<Entity>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write entities as indented JSON
///
/// Output goes to a sibling temporary file that is renamed over `path` once
/// fully written, so a failed run never leaves a truncated dataset behind.
pub fn write_entities(path: &Path, entities: &[Entity], indent: usize) -> Result<(), DatasetError> {
    let tmp_path = temp_path_for(path);
    let write_err = |source| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Err(source) = write_json(&tmp_path, entities, indent) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        write_err(source)
    })
}

fn write_json(path: &Path, entities: &[Entity], indent: usize) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let indent = " ".repeat(indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    entities.serialize(&mut serializer).map_err(io::Error::from)?;

    writer.write_all(b"\n")?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
