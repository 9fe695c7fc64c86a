use crate::document::Document;
use crate::error::{RecordsError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const DATA_FILE_SUFFIX: &str = ".json";

/// Load every `*.json` file directly inside `dir` and flatten their contents.
///
/// Files are read in file-name order. A file holding an array contributes
/// each element; a file holding a single object contributes that object.
/// Any unreadable or malformed file, or a record that is not a JSON object,
/// fails the whole load.
pub fn load_directory(dir: impl AsRef<Path>) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    let files = data_files(dir)?;

    let mut docs = Vec::new();
    for path in &files {
        let loaded = load_file(path)?;
        log::debug!("Loaded {} records from {}", loaded.len(), path.display());
        docs.extend(loaded);
    }

    log::info!(
        "Loaded {} records from {} files in {}",
        docs.len(),
        files.len(),
        dir.display()
    );
    Ok(docs)
}

fn data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let fs_err = |source| RecordsError::Filesystem {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(fs_err)? {
        let entry = entry.map_err(fs_err)?;
        let is_data_file = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(DATA_FILE_SUFFIX));
        if !is_data_file {
            continue;
        }
        let path = entry.path();
        // follows symlinks, so a linked data file counts as a file
        let metadata = fs::metadata(&path).map_err(|source| RecordsError::Filesystem {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn load_file(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path).map_err(|source| RecordsError::Filesystem {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |source| RecordsError::Parse {
        path: path.to_path_buf(),
        source,
    };

    match serde_json::from_str::<Value>(&raw).map_err(parse_err)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(parse_err))
            .collect(),
        other => Ok(vec![serde_json::from_value(other).map_err(parse_err)?]),
    }
}
