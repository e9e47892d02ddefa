use crate::error::{Error, Result};
use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn io_error(path: &Path, source: std::io::Error) -> Error {
    if source.kind() == ErrorKind::NotFound {
        Error::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Size in bytes of a regular file, from metadata only.
pub fn file_size(path: &Path) -> Result<u64> {
    let meta = fs::metadata(path).map_err(|e| io_error(path, e))?;
    if !meta.is_file() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(meta.len())
}

/// Read a whole file as bytes.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| io_error(path, e))
}

/// Read a whole file as UTF-8 text.
///
/// Content that is not valid UTF-8 is reported as
/// [`Error::UndecodableContent`] so the caller can point at the binary path.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|_| Error::UndecodableContent {
        path: path.to_path_buf(),
    })
}

/// Create the parent directory of `path` (and any missing ancestors).
///
/// Returns the directory when it had to be created, `None` when the path has
/// no directory component or it already exists.
pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<Option<PathBuf>> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => return Ok(None),
    };
    if dir.exists() {
        return Ok(None);
    }
    fs::create_dir_all(dir).with_context(|| format!("create output directory {:?}", dir))?;
    Ok(Some(dir.to_path_buf()))
}
