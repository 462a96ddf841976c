//! Source text with a line index, for turning byte offsets into spans

use crate::diagnostics::Span;
use std::path::{Path, PathBuf};

/// A Skol source file and the byte offset at which each of its lines starts
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: PathBuf, content: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            path,
            content,
            line_starts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Span covering the byte range `start..end`
    pub fn span(&self, start: usize, end: usize) -> Span {
        let (start_line, start_col) = self.line_col(start);
        let (end_line, end_col) = self.line_col(end);
        Span::new(
            self.path.clone(),
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        )
    }

    /// Zero-width span just past the last byte, where end-of-file errors point
    pub fn eof_span(&self) -> Span {
        let end = self.content.len();
        self.span(end, end)
    }

    /// 1-indexed line and column of a byte offset
    fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.line_starts[line] + 1)
    }
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
