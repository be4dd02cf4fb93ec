use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

use crate::document::BlockNode;

/// Content that the grouper could not place in any chunk, located in the
/// source file.
#[derive(Debug, Clone)]
pub struct GroupWarning {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl GroupWarning {
    /// Warning for blocks dropped before the first heading. `None` when
    /// nothing was dropped.
    pub fn leading_content(
        discarded: &[BlockNode],
        chunk_count: usize,
        file_id: usize,
    ) -> Option<Self> {
        let (first, last) = (discarded.first()?, discarded.last()?);

        let message = if chunk_count == 0 {
            "document has no depth-1 or depth-2 heading; nothing was chunked".to_string()
        } else {
            format!(
                "{} block(s) before the first heading belong to no chunk",
                discarded.len()
            )
        };

        Some(GroupWarning {
            message,
            span: first.span.start..last.span.end,
            file_id,
            severity: Severity::Warning,
            notes: vec![
                "set `leading_content = \"keep\"` to write them as a leading chunk".to_string(),
            ],
        })
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![
                Label::primary(self.file_id, self.span.clone()).with_message("not in any chunk"),
            ])
            .with_notes(self.notes.clone())
    }
}
