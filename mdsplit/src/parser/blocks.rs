use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd};

use crate::document::{BlockKind, BlockNode};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse Markdown source text into its flat list of top-level blocks.
pub fn parse_blocks(source: &str) -> Vec<BlockNode> {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS;
    let parser = CmarkParser::new_ext(source, options);
    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = BlockState::new(source);
    state.process_events(&events);
    state.finalize()
}

// ---------------------------------------------------------------------------
// Block state
// ---------------------------------------------------------------------------

struct BlockState<'a> {
    source: &'a str,
    nodes: Vec<BlockNode>,
    /// End of the last emitted block. Text between this and the next block
    /// start is not reported by the event stream.
    cursor: usize,
}

impl<'a> BlockState<'a> {
    fn new(source: &'a str) -> Self {
        BlockState {
            source,
            nodes: Vec::new(),
            cursor: 0,
        }
    }

    fn process_events(&mut self, events: &[(Event<'_>, Range<usize>)]) {
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];

            match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    let depth = heading_level_to_u8(level);
                    i += 1;
                    let (title, end) = collect_heading_text(events, &mut i);
                    let title = normalize_title(&title);
                    self.push(BlockKind::Heading { depth, title }, range.start..end.max(range.end));
                }

                Event::Start(tag) => {
                    let kind = block_kind(tag);
                    i += 1;
                    let end = skip_to_block_end(events, &mut i);
                    self.push(kind, range.start..end.max(range.end));
                }

                Event::Rule => {
                    self.push(BlockKind::Rule, range.clone());
                    i += 1;
                }

                Event::Html(_) => {
                    self.push(BlockKind::Html, range.clone());
                    i += 1;
                }

                _ => {
                    i += 1;
                }
            }
        }
    }

    fn push(&mut self, kind: BlockKind, span: Range<usize>) {
        let span = self.extend_to_indent(span);
        self.flush_gap(span.start);
        let source = self.source;
        let text = trim_trailing_blank_lines(&source[span.clone()]);
        self.nodes.push(BlockNode::new(kind, text, span.clone()));
        self.cursor = self.cursor.max(span.end);
    }

    /// Offsets start after any indentation, which is significant for
    /// indented code and nested list content. Pull the start back to the
    /// beginning of the line when only whitespace precedes the block.
    fn extend_to_indent(&self, span: Range<usize>) -> Range<usize> {
        let before = &self.source[..span.start];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1).max(self.cursor);
        if line_start < span.start && before[line_start..].chars().all(|c| c == ' ' || c == '\t') {
            line_start..span.end
        } else {
            span
        }
    }

    /// Emit non-blank text skipped by the event stream (link reference
    /// definitions) as a definition node.
    fn flush_gap(&mut self, until: usize) {
        if until <= self.cursor {
            return;
        }
        let source = self.source;
        let gap = &source[self.cursor..until];
        let trimmed = gap.trim();
        if !trimmed.is_empty() {
            let start = self.cursor + (gap.len() - gap.trim_start().len());
            let span = start..start + trimmed.len();
            self.nodes
                .push(BlockNode::new(BlockKind::Definition, trimmed, span));
        }
        self.cursor = until;
    }

    fn finalize(mut self) -> Vec<BlockNode> {
        self.flush_gap(self.source.len());
        self.nodes
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn block_kind(tag: &Tag<'_>) -> BlockKind {
    match tag {
        Tag::Paragraph => BlockKind::Paragraph,
        Tag::CodeBlock(_) => BlockKind::CodeBlock,
        Tag::List(_) => BlockKind::List,
        Tag::BlockQuote(_) => BlockKind::BlockQuote,
        Tag::Table(_) => BlockKind::Table,
        Tag::HtmlBlock => BlockKind::Html,
        Tag::FootnoteDefinition(_) => BlockKind::FootnoteDefinition,
        _ => BlockKind::Other,
    }
}

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Collect heading text until End(Heading). Returns the text and the end
/// offset of the heading.
fn collect_heading_text(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> (String, usize) {
    let mut title = String::new();
    let mut end = 0;
    while *i < events.len() {
        let (ref ev, ref range) = events[*i];
        *i += 1;
        match ev {
            Event::End(TagEnd::Heading(_)) => {
                end = range.end;
                break;
            }
            Event::Text(s) | Event::Code(s) => title.push_str(s),
            Event::SoftBreak | Event::HardBreak => title.push(' '),
            _ => {}
        }
    }
    (title, end)
}

/// Advance past the End event closing the block whose Start was just
/// consumed. Returns the end offset of the block.
fn skip_to_block_end(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> usize {
    let mut depth = 1u32;
    let mut end = 0;
    while *i < events.len() {
        let (ref ev, ref range) = events[*i];
        *i += 1;
        match ev {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    end = range.end;
                    break;
                }
            }
            _ => {}
        }
    }
    end
}

/// Strip surrounding whitespace and collapse interior runs.
fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop trailing line breaks and any whitespace-only lines before them.
fn trim_trailing_blank_lines(text: &str) -> &str {
    let mut text = text.trim_end_matches(['\n', '\r']);
    while let Some(pos) = text.rfind('\n') {
        if !text[pos + 1..].trim().is_empty() {
            break;
        }
        text = text[..pos].trim_end_matches(['\n', '\r']);
    }
    if text.trim().is_empty() { "" } else { text }
}
