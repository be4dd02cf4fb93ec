pub mod chunk;
pub mod document;
pub mod grouper;
pub mod parser;

pub use chunk::Chunk;
pub use document::{BlockKind, BlockNode, Document};
pub use grouper::{GroupWarning, Grouping, LeadingContent, group, group_with};
