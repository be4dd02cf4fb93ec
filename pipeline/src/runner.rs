use std::fs;
use std::path::{Path, PathBuf};

use mdsplit::parser::Parser;
use mdsplit::{GroupWarning, group_with};
use tracing::{debug, info, warn};

use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::writer::{WriteOutcome, write_chunks};

/// Sub-directory of the docs directory that receives chunk output by default.
pub const DEFAULT_CHUNKS_DIR: &str = "chunks";

/// Source id used for a document's warnings; each report is its own
/// single-file source database.
pub const REPORT_SOURCE_ID: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Written { dir: PathBuf, chunks: usize },
    Skipped { dir: PathBuf },
}

#[derive(Debug)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub outcome: DocumentOutcome,
    /// Grouping warnings, with spans into `source`.
    pub warnings: Vec<GroupWarning>,
    /// Markdown text of the document. Empty when the document was skipped.
    pub source: String,
}

impl DocumentReport {
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, DocumentOutcome::Skipped { .. })
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    /// Per-document failures, only collected when `keep_going` is set.
    pub failures: Vec<(PathBuf, SplitError)>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.documents.iter().filter(|d| !d.is_skipped()).count()
    }

    pub fn skipped(&self) -> usize {
        self.documents.iter().filter(|d| d.is_skipped()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives discovery, grouping and writing for a docs directory.
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Self {
        Splitter { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Markdown files directly inside `docs_dir`, sorted by name.
    pub fn discover(&self, docs_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(docs_dir).map_err(SplitError::io(docs_dir))? {
            let path = entry.map_err(SplitError::io(docs_dir))?.path();
            let is_markdown = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".md"));
            if is_markdown && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        debug!(dir = %docs_dir.display(), count = files.len(), "discovered markdown files");
        Ok(files)
    }

    pub fn output_root(&self, docs_dir: &Path) -> PathBuf {
        self.config
            .output_dir
            .clone()
            .unwrap_or_else(|| docs_dir.join(DEFAULT_CHUNKS_DIR))
    }

    /// Chunk directory for one source document: `<out_root>/<file stem>`.
    pub fn chunk_dir(&self, path: &Path, out_root: &Path) -> PathBuf {
        let stem = path.file_stem().unwrap_or(path.as_os_str());
        out_root.join(stem)
    }

    /// Split one document into `<out_root>/<stem>/`.
    ///
    /// An existing chunk directory short-circuits before the file is read.
    pub fn split_file(&self, path: &Path, out_root: &Path) -> Result<DocumentReport> {
        let dir = self.chunk_dir(path, out_root);
        if dir.is_dir() {
            info!(path = %dir.display(), "skipping, chunks already exist");
            return Ok(DocumentReport {
                path: path.to_path_buf(),
                outcome: DocumentOutcome::Skipped { dir },
                warnings: Vec::new(),
                source: String::new(),
            });
        }

        let bytes = fs::read(path).map_err(SplitError::io(path))?;
        let source = String::from_utf8(bytes).map_err(|_| SplitError::InvalidUtf8 {
            path: path.to_path_buf(),
        })?;

        let document = Parser::new(source.clone(), REPORT_SOURCE_ID).parse();
        let grouping = group_with(document.nodes, self.config.leading_content);
        let warnings = grouping.warnings(document.source_id);

        let outcome = match write_chunks(&grouping.chunks, &dir, self.config.index_width)? {
            WriteOutcome::Written(files) => {
                info!(path = %dir.display(), chunks = files.len(), "wrote chunks");
                DocumentOutcome::Written {
                    dir,
                    chunks: files.len(),
                }
            }
            WriteOutcome::Skipped => DocumentOutcome::Skipped { dir },
        };

        Ok(DocumentReport {
            path: path.to_path_buf(),
            outcome,
            warnings,
            source,
        })
    }

    /// Split every markdown file in `docs_dir`.
    ///
    /// The first failure aborts the batch unless `keep_going` is set, in
    /// which case it is recorded and the next document is processed.
    pub fn split_directory(&self, docs_dir: &Path) -> Result<BatchReport> {
        let out_root = self.output_root(docs_dir);
        let mut report = BatchReport::default();

        for path in self.discover(docs_dir)? {
            match self.split_file(&path, &out_root) {
                Ok(document) => report.documents.push(document),
                Err(err) if self.config.keep_going => {
                    warn!(path = %path.display(), error = %err, "failed to split document");
                    report.failures.push((path, err));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }
}
