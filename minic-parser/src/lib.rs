//! Lexer and recursive descent parser for a small C-like language.
//!
//! Source text goes through [`lex`] to get tokens and lexical errors. When there are no
//! lexical errors the tokens go through [`parse`], which yields either a complete
//! [`ast::Program`] or the first syntax error.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod visitor;

pub use lexer::{lex, Token, TokenKind};
pub use parser::{parse, ParseResult, Parser};
