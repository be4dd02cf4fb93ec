mod warning;

pub use warning::GroupWarning;

use serde::Deserialize;

use crate::chunk::Chunk;
use crate::document::BlockNode;

/// What to do with blocks that appear before the first depth-1 or depth-2
/// heading, when no chunk exists yet to receive them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadingContent {
    /// Discard them.
    #[default]
    Drop,
    /// Collect them into a leading chunk without a heading.
    Keep,
}

/// Result of grouping one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub chunks: Vec<Chunk>,
    /// Leading blocks that ended up in no chunk.
    pub discarded: Vec<BlockNode>,
}

impl Grouping {
    /// Warnings about content that was left out of every chunk.
    pub fn warnings(&self, file_id: usize) -> Vec<GroupWarning> {
        GroupWarning::leading_content(&self.discarded, self.chunks.len(), file_id)
            .into_iter()
            .collect()
    }
}

/// Group a flat block sequence into heading sections, dropping leading
/// content.
pub fn group(nodes: Vec<BlockNode>) -> Vec<Chunk> {
    group_with(nodes, LeadingContent::Drop).chunks
}

/// Group a flat block sequence into heading sections.
///
/// A depth-1 heading opens a chunk and becomes the current parent. A depth-2
/// heading opens a chunk seeded with a copy of the parent; if the parent's
/// own chunk is still just the bare heading, that chunk is removed. Any
/// other block (including deeper headings) joins the last chunk.
pub fn group_with(nodes: Vec<BlockNode>, leading: LeadingContent) -> Grouping {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut parent: Option<BlockNode> = None;
    let mut discarded = Vec::new();

    for node in nodes {
        if node.is_heading(1) {
            parent = Some(node.clone());
            chunks.push(Chunk::new(vec![node]));
        } else if node.is_heading(2) {
            if chunks.last().is_some_and(Chunk::is_bare_top_heading) {
                chunks.pop();
            }
            let seed = match &parent {
                Some(top) => vec![top.clone(), node],
                None => vec![node],
            };
            chunks.push(Chunk::new(seed));
        } else if let Some(current) = chunks.last_mut() {
            current.nodes.push(node);
        } else {
            match leading {
                LeadingContent::Drop => discarded.push(node),
                LeadingContent::Keep => chunks.push(Chunk::new(vec![node])),
            }
        }
    }

    Grouping { chunks, discarded }
}
