mod blocks;

use crate::document::Document;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Split the source Markdown into its top-level blocks.
    ///
    /// CommonMark has no invalid documents, so this never fails.
    pub fn parse(&self) -> Document {
        Document {
            nodes: blocks::parse_blocks(&self.source),
            source_id: self.file_id,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
