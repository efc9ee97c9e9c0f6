//! Source position tracking, used by every diagnostic the checker emits.
//!
//! The checker never tokenizes or parses; `Span`s arrive already attached to
//! AST nodes produced by the upstream parser. We only need to carry them
//! around and render them for error messages.

use std::fmt::Display;

/// A `(line, column)` pair, both zero-indexed, matching how the upstream
/// parser reports positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A half-open source range plus the byte offsets it covers. `source` is an
/// optional copy of the file text, kept only so diagnostics can quote the
/// offending line; it is absent for synthesized spans (e.g. a builtin
/// initializer defining a global with no source location).
#[derive(Debug, Clone, Default, Eq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
    pub start_offset: u32,
    pub end_offset: u32,
    #[serde(skip)]
    pub source: Option<std::rc::Rc<str>>,
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Span {
    pub fn new(start: Position, end: Position, start_offset: u32, end_offset: u32) -> Self {
        Span {
            start,
            end,
            start_offset,
            end_offset,
            source: None,
        }
    }

    pub fn with_source(mut self, source: std::rc::Rc<str>) -> Self {
        self.source = Some(source);
        self
    }

    /// Render `msg` with the offending source line quoted underneath, or
    /// fall back to a bare position if no source text is attached.
    pub fn to_string(&self, msg: impl ToString) -> String {
        let msg = msg.to_string();
        let Some(source) = &self.source else {
            return format!("{}: {}", self.start, msg);
        };

        let lines: Vec<&str> = source.lines().collect();
        let Some(line_str) = lines.get(self.start.line) else {
            return format!("{}: {}", self.start, msg);
        };

        let caret_column = self.start.column.min(line_str.len());
        let caret_len = if self.start.line == self.end.line {
            (self.end.column.saturating_sub(self.start.column)).max(1)
        } else {
            1
        };
        let padding = " ".repeat(caret_column);
        let carets = "^".repeat(caret_len);

        format!(
            "{pos}: {msg}\n  {line}\n  {padding}{carets}",
            pos = self.start,
            msg = msg,
            line = line_str,
            padding = padding,
            carets = carets,
        )
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_without_source() {
        let span = Span::new(Position::new(0, 0), Position::new(0, 3), 0, 3);
        assert_eq!(span.to_string("bad"), "1:1: bad");
    }

    #[test]
    fn renders_with_source() {
        let span = Span::new(Position::new(1, 4), Position::new(1, 7), 5, 8)
            .with_source(std::rc::Rc::from("let x = 1;\nlet bar = 2;\n"));
        let rendered = span.to_string("oops");
        assert!(rendered.contains("let bar = 2;"));
        assert!(rendered.contains('^'));
    }
}
