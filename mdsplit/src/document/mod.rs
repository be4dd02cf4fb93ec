use std::fmt;
use std::ops::Range;

/// A parsed markdown file as a flat sequence of top-level blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub nodes: Vec<BlockNode>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Document {
    pub fn empty(source_id: usize) -> Self {
        Document {
            nodes: Vec::new(),
            source_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of heading nodes at `depth`.
    pub fn heading_count(&self, depth: u8) -> usize {
        self.nodes.iter().filter(|n| n.is_heading(depth)).count()
    }
}

/// One top-level markdown block.
///
/// Only the heading depth matters for grouping; everything else is an opaque
/// payload carried through to the output verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub kind: BlockKind,
    /// Markdown text of the block, without trailing line breaks.
    pub source: String,
    /// Byte span in source. Empty for nodes that were not parsed from a file.
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading { depth: u8, title: String },
    Paragraph,
    CodeBlock,
    List,
    BlockQuote,
    Table,
    Html,
    Rule,
    FootnoteDefinition,
    /// Link reference definition (not reported by the event stream).
    Definition,
    Other,
}

impl BlockNode {
    pub fn new(kind: BlockKind, source: impl Into<String>, span: Range<usize>) -> Self {
        BlockNode {
            kind,
            source: source.into(),
            span,
        }
    }

    /// Build an ATX heading node, e.g. `heading(2, "Usage")` renders as `## Usage`.
    pub fn heading(depth: u8, title: impl Into<String>) -> Self {
        let title = title.into();
        let source = format!("{} {}", "#".repeat(depth as usize), title);
        BlockNode::new(BlockKind::Heading { depth, title }, source, 0..0)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        BlockNode::new(BlockKind::Paragraph, text, 0..0)
    }

    pub fn heading_depth(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Heading { depth, .. } => Some(depth),
            _ => None,
        }
    }

    pub fn is_heading(&self, depth: u8) -> bool {
        self.heading_depth() == Some(depth)
    }

    pub fn title(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Heading { title, .. } => Some(title),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Heading { depth, .. } => write!(f, "heading (depth {})", depth),
            BlockKind::Paragraph => write!(f, "paragraph"),
            BlockKind::CodeBlock => write!(f, "code block"),
            BlockKind::List => write!(f, "list"),
            BlockKind::BlockQuote => write!(f, "blockquote"),
            BlockKind::Table => write!(f, "table"),
            BlockKind::Html => write!(f, "html"),
            BlockKind::Rule => write!(f, "thematic break"),
            BlockKind::FootnoteDefinition => write!(f, "footnote definition"),
            BlockKind::Definition => write!(f, "definition"),
            BlockKind::Other => write!(f, "block"),
        }
    }
}

impl fmt::Display for BlockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
