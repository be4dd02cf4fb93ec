use std::fs;
use std::path::{Path, PathBuf};

use mdsplit::Chunk;
use tracing::{debug, info, warn};

use crate::config::MAX_INDEX_WIDTH;
use crate::error::{Result, SplitError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The directory already existed; nothing was touched.
    Skipped,
    /// Files written, in chunk order.
    Written(Vec<PathBuf>),
}

/// File name for the chunk at `index`, e.g. `007` for width 3.
///
/// Indices that need more digits than `width` are written in full, so names
/// stay unique but stop sorting lexically.
pub fn chunk_file_name(index: usize, width: usize) -> String {
    format!("{:0width$}", index, width = width)
}

/// Write each chunk as its own file in `dir`.
///
/// Existing output is never overwritten or merged: if `dir` is already a
/// directory this is a no-op. The directory is created even for an empty
/// chunk list so that a rerun skips the document.
pub fn write_chunks(chunks: &[Chunk], dir: &Path, index_width: usize) -> Result<WriteOutcome> {
    if dir.is_dir() {
        info!(path = %dir.display(), "skipping, chunks already exist");
        return Ok(WriteOutcome::Skipped);
    }

    if !(1..=MAX_INDEX_WIDTH).contains(&index_width) {
        return Err(SplitError::InvalidConfig(format!(
            "index_width must be between 1 and {}, got {}",
            MAX_INDEX_WIDTH, index_width
        )));
    }

    fs::create_dir_all(dir).map_err(SplitError::io(dir))?;

    let capacity = 10usize.checked_pow(index_width as u32).unwrap_or(usize::MAX);
    if chunks.len() > capacity {
        warn!(
            path = %dir.display(),
            chunks = chunks.len(),
            index_width,
            "chunk count exceeds the index width; file names will not sort lexically"
        );
    }

    let mut files = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let path = dir.join(chunk_file_name(i, index_width));
        fs::write(&path, chunk.to_markdown()).map_err(SplitError::io(&path))?;
        debug!(path = %path.display(), blocks = chunk.len(), "wrote chunk");
        files.push(path);
    }

    Ok(WriteOutcome::Written(files))
}
