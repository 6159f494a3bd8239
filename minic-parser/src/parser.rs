use crate::ast::{Block, BinaryOp, Expr, ForInit, Param, Program, Stmt, VarDecl};
use crate::lexer::{Token, TokenKind};
use minic_source::SyntaxError;

mod expr;
mod stmt;

/// Every grammar function either builds a complete node or stops at the first syntax error.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Returned by [`Parser::current`] when reading past the end of the tokens.
static EOF: Token = Token {
    kind: TokenKind::Eof,
    text: String::new(),
    line: 0,
    column: 0,
};

/// How deeply statements and expressions may nest before parsing gives up.
const MAX_DEPTH: usize = 100;

pub struct Parser<'t> {
    tokens: &'t [Token],
    /// Index of the current token.
    pos: usize,
    /// Number of nested statements and expressions being parsed.
    depth: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }
}

impl<'t> Parser<'t> {
    /// Parses the whole token stream.
    /// The first syntax error aborts parsing and no program is returned.
    #[tracing::instrument(skip_all, fields(token_count = self.tokens.len()))]
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut body = Vec::new();

        while !self.check(TokenKind::Eof) {
            if self.eat(TokenKind::Eol) {
                continue;
            }
            if self.current().kind.is_type_keyword() {
                body.push(self.parse_declaration()?);
            } else {
                body.push(self.parse_stmt()?);
            }
        }

        Ok(Program { body })
    }
}

/// Parse utilities
impl<'t> Parser<'t> {
    /// Returns the current token without consuming it.
    fn current(&self) -> &'t Token {
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    /// Consumes the current token and returns it.
    fn advance(&mut self) -> &'t Token {
        let token = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current().kind)
    }

    /// Predicate that tests whether the current token is of `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Eats the current token if it is one of `operators`, returning the operator.
    fn eat_operator(&mut self, operators: &[TokenKind]) -> Option<BinaryOp> {
        let kind = self.current().kind;
        if !operators.contains(&kind) {
            return None;
        }
        let op = BinaryOp::from_token(kind)?;
        self.advance();
        Some(op)
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<&'t Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!(
                "Expected {} but found '{}'",
                kind,
                self.current().describe()
            )))
        }
    }

    /// Creates a syntax error anchored at the current token.
    fn error_here(&self, message: impl ToString) -> SyntaxError {
        self.error_at(self.current(), message)
    }

    /// Creates a syntax error anchored at `token`.
    fn error_at(&self, token: &Token, message: impl ToString) -> SyntaxError {
        let error = SyntaxError::new(message, token.position());
        tracing::debug!(position = %error.position(), message = %error.message, "syntax error");
        error
    }

    /// Runs `rule` one nesting level deeper, failing once [`MAX_DEPTH`] is reached.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_here("Nesting too deep"));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Creates the error reported when the current token cannot start a statement.
    fn unexpected(&self) -> SyntaxError {
        self.error_here(format!(
            "Unexpected token in statement: '{}'",
            self.current().describe()
        ))
    }
}

/// Parses `tokens` into a [`Program`], or returns the first syntax error.
pub fn parse(tokens: &[Token]) -> ParseResult<Program> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use insta::assert_debug_snapshot;
    use minic_source::Position;

    fn program(source: &str) -> ParseResult<Program> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        parse(&tokens)
    }

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Var(name.to_string()))
    }

    #[test]
    fn test_function_declaration() {
        let ast = program("int add(int a, int b) { return a + b; }").unwrap();
        assert_eq!(
            ast,
            Program {
                body: vec![Stmt::FunctionDecl {
                    return_type: "int".to_string(),
                    name: "add".to_string(),
                    params: vec![
                        Param {
                            ty: "int".to_string(),
                            name: "a".to_string(),
                        },
                        Param {
                            ty: "int".to_string(),
                            name: "b".to_string(),
                        },
                    ],
                    body: Block {
                        body: vec![Stmt::Return(Some(Expr::BinOp {
                            op: BinaryOp::Add,
                            left: var("a"),
                            right: var("b"),
                        }))],
                    },
                }],
            }
        );
    }

    #[test]
    fn test_top_level_var_decl() {
        assert_debug_snapshot!(program("int x = 5;\nfloat y;").unwrap(), @r###"
        Program {
            body: [
                VarDecl(
                    VarDecl {
                        ty: "int",
                        name: "x",
                        init: Some(
                            Num(
                                "5",
                            ),
                        ),
                    },
                ),
                VarDecl(
                    VarDecl {
                        ty: "float",
                        name: "y",
                        init: None,
                    },
                ),
            ],
        }
        "###);
    }

    #[test]
    fn test_blank_lines_and_statements() {
        let ast = program("\n\nx = 1;\n\nprint(x);\n").unwrap();
        assert_eq!(ast.body.len(), 2);
        assert!(matches!(ast.body[0], Stmt::Expr(Expr::Assign { .. })));
        assert!(matches!(ast.body[1], Stmt::Expr(Expr::Call { .. })));
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(program("").unwrap(), Program { body: vec![] });
        assert_eq!(parse(&[]).unwrap(), Program { body: vec![] });
    }

    #[test]
    fn test_halts_on_first_error() {
        let error = program("int x = ;").unwrap_err();
        assert_eq!(error.message, "Expected expression after '='");
        assert_eq!(error.position(), Position::new(1, 9));

        // the second statement is broken too, only the first error is reported
        let error = program("int = 1;\nfoo(;").unwrap_err();
        assert_eq!(error.message, "Expected identifier after type");
        assert_eq!(error.position(), Position::new(1, 1));
    }

    #[test]
    fn test_nesting_limit() {
        let nested_ifs = format!("{}x = 1;", "if (a) ".repeat(1000));
        let error = program(&nested_ifs).unwrap_err();
        assert_eq!(error.message, "Nesting too deep");
        assert_eq!(error.position().line, 1);

        let nested_blocks = format!("{}x = 1;{}", "while (a) {\n".repeat(20), "}".repeat(20));
        assert!(program(&nested_blocks).is_ok());
    }

    #[test]
    fn test_missing_semicolon() {
        let error = program("int x = 1\nint y;").unwrap_err();
        assert_eq!(error.message, "Expected SEMI but found 'EOL'");
        assert_eq!(error.position(), Position::new(1, 10));
    }
}
