pub mod render;

use minic_parser::ast::Program;
use minic_parser::{lex, parse, Token};
use minic_source::{Diagnostics, LexError, SyntaxError};

/// The outcome of running the front-end over one source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// Lexing found errors, so parsing was skipped.
    LexFailed {
        tokens: Vec<Token>,
        errors: Vec<LexError>,
    },
    /// Parsing stopped at its first error.
    ParseFailed { tokens: Vec<Token>, error: SyntaxError },
    Parsed { tokens: Vec<Token>, program: Program },
}

impl Analysis {
    pub fn tokens(&self) -> &[Token] {
        match self {
            Analysis::LexFailed { tokens, .. }
            | Analysis::ParseFailed { tokens, .. }
            | Analysis::Parsed { tokens, .. } => tokens,
        }
    }

    /// Returns the program if the source was free of errors.
    pub fn program(&self) -> Option<&Program> {
        match self {
            Analysis::Parsed { program, .. } => Some(program),
            _ => None,
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        match self {
            Analysis::LexFailed { errors, .. } => diagnostics.extend(errors.iter().cloned()),
            Analysis::ParseFailed { error, .. } => diagnostics.push(error.clone()),
            Analysis::Parsed { .. } => {}
        }
        diagnostics
    }
}

/// Lexes and parses `source`. Parsing only happens when lexing reported no errors.
pub fn analyze(source: &str) -> Analysis {
    let (tokens, errors) = lex(source);
    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "skipping parse after lexical errors");
        return Analysis::LexFailed { tokens, errors };
    }

    match parse(&tokens) {
        Ok(program) => Analysis::Parsed { tokens, program },
        Err(error) => Analysis::ParseFailed { tokens, error },
    }
}
