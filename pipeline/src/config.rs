use std::fs;
use std::path::{Path, PathBuf};

use mdsplit::LeadingContent;
use serde::Deserialize;

use crate::error::{Result, SplitError};

/// Config file looked up in the docs directory when none is given.
pub const CONFIG_FILE_NAME: &str = "mdsplit.toml";

/// Chunk file names are the chunk index padded to this many digits.
pub const DEFAULT_INDEX_WIDTH: usize = 3;

/// Widest useful index: `usize::MAX` has 20 digits.
pub const MAX_INDEX_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Root of the per-document chunk directories. Defaults to
    /// `<docs>/chunks`. Relative paths in a config file resolve against the
    /// file's directory.
    pub output_dir: Option<PathBuf>,

    /// Policy for blocks before the first heading.
    pub leading_content: LeadingContent,

    /// Digits in chunk file names.
    pub index_width: usize,

    /// Record per-document failures and continue instead of aborting.
    pub keep_going: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            output_dir: None,
            leading_content: LeadingContent::Drop,
            index_width: DEFAULT_INDEX_WIDTH,
            keep_going: false,
        }
    }
}

impl SplitConfig {
    /// Parse config text. `path` is used for error messages and to resolve a
    /// relative `output_dir`.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let mut config: SplitConfig = toml::from_str(text).map_err(|e| SplitError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let (Some(out), Some(base)) = (&config.output_dir, path.parent()) {
            if out.is_relative() {
                config.output_dir = Some(base.join(out));
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(SplitError::io(path))?;
        Self::from_toml(&text, path)
    }

    /// Load `mdsplit.toml` from `docs_dir` if present, defaults otherwise.
    pub fn discover(docs_dir: &Path) -> Result<Self> {
        let path = docs_dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_INDEX_WIDTH).contains(&self.index_width) {
            return Err(SplitError::InvalidConfig(format!(
                "index_width must be between 1 and {}, got {}",
                MAX_INDEX_WIDTH, self.index_width
            )));
        }
        Ok(())
    }
}
