use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SplitError};

/// Chunk files in a chunk directory, in chunk order.
///
/// Sub-directories are ignored. Names are ordered by numeric index so that
/// `1000` follows `999`; non-numeric names come last.
pub fn chunk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(SplitError::io(dir))? {
        let path = entry.map_err(SplitError::io(dir))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let index = name.parse::<usize>().ok();
        (index.is_none(), index, name)
    });
    Ok(files)
}

/// Per-document chunk directories under `out_root`, sorted by name. A
/// missing root means nothing has been chunked yet.
pub fn chunk_dirs(out_root: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(out_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SplitError::io(out_root)(e)),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry.map_err(SplitError::io(out_root))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
