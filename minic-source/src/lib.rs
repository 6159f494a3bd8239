//! Source positions and error management.

use std::fmt;

use thiserror::Error;

/// A 1-based line/column location in source code.
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of any source.
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Converts byte offsets into [`Position`]s by walking the text between them.
///
/// The cursor only moves forward. Seeking to an offset behind the cursor is a no-op.
pub struct LineCursor<'a> {
    content: &'a str,
    offset: usize,
    position: Position,
}

impl<'a> LineCursor<'a> {
    /// Create a new `LineCursor` at the start of `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            offset: 0,
            position: Position::START,
        }
    }

    /// Moves the cursor to the byte `offset` and returns the position there.
    /// `offset` must lie on a char boundary.
    pub fn seek(&mut self, offset: usize) -> Position {
        let offset = offset.min(self.content.len());
        if offset > self.offset {
            for ch in self.content[self.offset..offset].chars() {
                if ch == '\n' {
                    self.position.line += 1;
                    self.position.column = 1;
                } else {
                    self.position.column += 1;
                }
            }
            self.offset = offset;
        }
        self.position
    }
}

/// Represents a lexical error (unrecognized character).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} @ {line}:{column}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl LexError {
    /// Create a new lexical error with the specified `message` at `position`.
    pub fn new(message: impl ToString, position: Position) -> Self {
        Self {
            message: message.to_string(),
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Represents a syntax error (compile time error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} @ {line}:{column}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    /// Create a new syntax error with the specified `message` at `position`.
    pub fn new(message: impl ToString, position: Position) -> Self {
        Self {
            message: message.to_string(),
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Either kind of error the front-end can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

impl Diagnostic {
    pub fn position(&self) -> Position {
        match self {
            Diagnostic::Lex(error) => error.position(),
            Diagnostic::Syntax(error) => error.position(),
        }
    }
}

/// Manages all the errors of one run, in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty `Diagnostics`.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error.
    pub fn push(&mut self, error: impl Into<Diagnostic>) {
        self.errors.push(error.into());
    }

    /// Returns `true` if no errors were reported.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter()
    }
}

impl<E: Into<Diagnostic>> Extend<E> for Diagnostics {
    fn extend<T: IntoIterator<Item = E>>(&mut self, iter: T) {
        self.errors.extend(iter.into_iter().map(Into::into));
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in self.errors.iter() {
            writeln!(f, "ERROR: {}", error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_counts_lines_and_columns() {
        let source = "int x;\ny;\n";
        let mut cursor = LineCursor::new(source);
        assert_eq!(cursor.seek(4), Position::new(1, 5));
        assert_eq!(cursor.seek(7), Position::new(2, 1));
        assert_eq!(cursor.seek(source.len()), Position::new(3, 1));
    }

    #[test]
    fn cursor_never_moves_backwards() {
        let mut cursor = LineCursor::new("abc");
        cursor.seek(2);
        assert_eq!(cursor.seek(1), Position::new(1, 3));
        // the cursor stayed at offset 2, so one more char is counted
        assert_eq!(cursor.seek(3), Position::new(1, 4));
    }

    #[test]
    fn cursor_counts_chars_not_bytes() {
        let source = "é=1";
        let mut cursor = LineCursor::new(source);
        assert_eq!(cursor.seek('é'.len_utf8()), Position::new(1, 2));
    }

    #[test]
    fn error_display() {
        let error = SyntaxError::new("Expected expression after '='", Position::new(1, 9));
        assert_eq!(error.to_string(), "Expected expression after '=' @ 1:9");

        let mut diagnostics = Diagnostics::new();
        diagnostics.push(LexError::new("Unexpected symbol '@'", Position::START));
        diagnostics.push(error);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.to_string(),
            "ERROR: lexical error: Unexpected symbol '@' @ 1:1\n\
             ERROR: syntax error: Expected expression after '=' @ 1:9\n"
        );
    }
}
