use std::fmt;

use crate::document::BlockNode;

/// One output section: a run of blocks anchored by its depth-1 and/or
/// depth-2 heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub nodes: Vec<BlockNode>,
}

impl Chunk {
    pub fn new(nodes: Vec<BlockNode>) -> Self {
        Chunk { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True for a chunk holding nothing but a depth-1 heading.
    pub fn is_bare_top_heading(&self) -> bool {
        matches!(self.nodes.as_slice(), [only] if only.is_heading(1))
    }

    /// Titles of the anchoring headings, outermost first. Empty for a
    /// leading chunk that has no heading.
    pub fn heading_path(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .take(2)
            .take_while(|n| n.is_heading(1) || n.is_heading(2))
            .filter_map(|n| n.title())
            .collect()
    }

    /// Render the chunk back to Markdown.
    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}

/// Blocks are separated by one blank line and the text ends with a newline.
impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}
