//! JSON file helpers shared by the roster store and the activity registry.
//!
//! Files are written pretty-printed with a 4-space indent, through a `.tmp`
//! sibling renamed into place, so readers never observe a half-written file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Failure reading or writing a JSON file.
#[derive(Debug)]
pub(crate) enum JsonFileError {
    NotFound,
    Io(io::Error),
    Json(serde_json::Error),
}

pub(crate) fn read<T: DeserializeOwned>(path: &Path) -> Result<T, JsonFileError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(JsonFileError::NotFound),
        Err(e) => return Err(JsonFileError::Io(e)),
    };
    serde_json::from_str(&content).map_err(JsonFileError::Json)
}

pub(crate) fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), JsonFileError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(JsonFileError::Json)?;
    buf.push(b'\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(JsonFileError::Io)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, &buf).map_err(JsonFileError::Io)?;
    fs::rename(&tmp, path).map_err(JsonFileError::Io)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
