use std::fmt;

use logos::{Filter, Lexer, Logos};
use minic_source::{LexError, LineCursor, Position};

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r]+")]
pub enum TokenKind {
    // keywords
    #[token("int")]
    Int,
    #[token("float")]
    Float,
    #[token("char")]
    CharType,
    #[token("void")]
    Void,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // identifiers
    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Id,

    // literals
    #[regex("[0-9]+", number)]
    Num,
    #[regex(r"'[^\n]'")]
    Char,
    #[regex(r#""([^"\\]|\\[^\n])*""#)]
    String,

    // binary operators
    // - two characters, always preferred over their one character prefix
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    // - one character
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Equal,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Star,
    #[token("/", slash_or_comment)]
    Slash,

    // punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // misc
    #[token("\n")]
    Eol,
    /// Only generated once, after the last token, by [`lex`].
    Eof,
}

/// Extends an integer literal with its fractional part when a digit follows the `.`.
fn number(lex: &mut Lexer<TokenKind>) {
    let rest = lex.remainder();
    if let Some(fraction) = rest.strip_prefix('.') {
        let digits = fraction
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(fraction.len());
        if digits > 0 {
            lex.bump(1 + digits);
        }
    }
}

/// Skips `//` and `/* */` comments. A `/` that does not open a terminated comment is a `Slash`.
fn slash_or_comment(lex: &mut Lexer<TokenKind>) -> Filter<()> {
    let rest = lex.remainder();
    if rest.starts_with('/') {
        let len = rest.find('\n').unwrap_or(rest.len());
        lex.bump(len);
        return Filter::Skip;
    }
    if let Some(body) = rest.strip_prefix('*') {
        if let Some(end) = body.find("*/") {
            lex.bump(1 + end + 2);
            return Filter::Skip;
        }
    }
    Filter::Emit(())
}

impl TokenKind {
    /// Returns the name used in diagnostics and token listings.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::CharType => "CHAR_TYPE",
            TokenKind::Void => "VOID",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Id => "ID",
            TokenKind::Num => "NUM",
            TokenKind::Char => "CHAR",
            TokenKind::String => "STRING",
            TokenKind::Eq => "EQ",
            TokenKind::Ne => "NE",
            TokenKind::Le => "LE",
            TokenKind::Ge => "GE",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Equal => "EQUAL",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBrack => "LBRACK",
            TokenKind::RBrack => "RBRACK",
            TokenKind::Semi => "SEMI",
            TokenKind::Comma => "COMMA",
            TokenKind::Eol => "EOL",
            TokenKind::Eof => "EOF",
        }
    }

    /// Type keywords that start a declaration.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::CharType | TokenKind::Void
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified lexeme with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The matched lexeme. Empty for `Eol` and `Eof`.
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// The text shown when this token is unexpected: the lexeme, or the kind name if there is none.
    pub fn describe(&self) -> &str {
        if self.text.is_empty() {
            self.kind.name()
        } else {
            &self.text
        }
    }
}

/// Converts `source` into tokens, collecting every lexical error on the way.
///
/// The returned tokens always end with an `Eol` token followed by a single `Eof` token,
/// no matter how many errors were found.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut cursor = LineCursor::new(source);

    // Byte offset of the slice the logos lexer is currently running on.
    let mut base = 0;
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let (start, end) = (base + span.start, base + span.end);
        let position = cursor.seek(start);

        match result {
            Ok(kind) => {
                let text = match kind {
                    TokenKind::Eol => "",
                    _ => &source[start..end],
                };
                tokens.push(Token::new(kind, text, position));
                cursor.seek(end);
            }
            Err(()) => {
                let ch = match source[start..].chars().next() {
                    Some(ch) => ch,
                    None => break,
                };
                tracing::debug!(%ch, %position, "unexpected symbol");
                errors.push(LexError::new(format!("Unexpected symbol '{}'", ch), position));

                // Exactly one character is consumed per error.
                let resume = start + ch.len_utf8();
                cursor.seek(resume);
                if end != resume {
                    base = resume;
                    lexer = TokenKind::lexer(&source[resume..]);
                }
            }
        }
    }

    let end = cursor.seek(source.len());
    if tokens.last().map(|token| token.kind) != Some(TokenKind::Eol) {
        tokens.push(Token::new(TokenKind::Eol, "", end));
    }
    tokens.push(Token::new(TokenKind::Eof, "", end));

    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_two_char_operators() {
        use TokenKind::*;
        assert_eq!(kinds("<="), vec![Le, Eol, Eof]);
        assert_eq!(kinds("&&"), vec![And, Eol, Eof]);
        assert_eq!(
            kinds("== != <= >= && || < > ="),
            vec![Eq, Ne, Le, Ge, And, Or, Lt, Gt, Equal, Eol, Eof]
        );
        assert_eq!(kinds("a<=b"), vec![Id, Le, Id, Eol, Eof]);
        assert_eq!(kinds("x==-1"), vec![Id, Eq, Minus, Num, Eol, Eof]);
    }

    #[test]
    fn test_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("int float char void if else while for return true false"),
            vec![Int, Float, CharType, Void, If, Else, While, For, Return, True, False, Eol, Eof]
        );
        assert_eq!(kinds("iffy"), vec![Id, Eol, Eof]);
        assert_eq!(kinds("return_value int2 _if"), vec![Id, Id, Id, Eol, Eof]);
    }

    #[test]
    fn test_literals() {
        let (tokens, _) = lex(r#"42 3.14 'a' "hi \"there\"" 7."#);
        let texts: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            texts[..4],
            [
                (TokenKind::Num, "42"),
                (TokenKind::Num, "3.14"),
                (TokenKind::Char, "'a'"),
                (TokenKind::String, r#""hi \"there\"""#),
            ]
        );
        // `7.` is a number followed by an unsupported `.`
        assert_eq!(texts[4], (TokenKind::Num, "7"));
    }

    #[test]
    fn test_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("( ) { } [ ] ; , + - * /"),
            vec![
                LParen, RParen, LBrace, RBrace, LBrack, RBrack, Semi, Comma, Plus, Minus, Star,
                Slash, Eol, Eof
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("a // b c\nd"), vec![Id, Eol, Id, Eol, Eof]);
        assert_eq!(kinds("a /* b \n c */ d"), vec![Id, Id, Eol, Eof]);
        assert_eq!(kinds("a / b"), vec![Id, Slash, Id, Eol, Eof]);
        // an unterminated block comment is just a slash and a star
        assert_eq!(kinds("/* a"), vec![Slash, Star, Id, Eol, Eof]);
    }

    #[test]
    fn test_line_and_column() {
        let (tokens, _) = lex("int x;\ny;\n");
        let y = &tokens[4];
        assert_eq!((y.kind, y.text.as_str()), (TokenKind::Id, "y"));
        assert_eq!(y.position(), Position::new(2, 1));

        let eol = &tokens[3];
        assert_eq!((eol.kind, eol.position()), (TokenKind::Eol, Position::new(1, 7)));
    }

    #[test]
    fn test_block_comment_moves_lines() {
        let (tokens, _) = lex("/* one\ntwo */ x");
        assert_eq!(tokens[0].text, "x");
        assert_eq!(tokens[0].position(), Position::new(2, 8));
    }

    #[test]
    fn test_unknown_character() {
        let (tokens, errors) = lex("@");
        assert_eq!(errors, vec![LexError::new("Unexpected symbol '@'", Position::new(1, 1))]);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Eol, TokenKind::Eof]);
    }

    #[test]
    fn test_errors_are_collected() {
        let (tokens, errors) = lex("a # b $ c");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].position(), Position::new(1, 3));
        assert_eq!(errors[1].position(), Position::new(1, 7));
        let ids: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[2].position(), Position::new(1, 9));
    }

    #[test]
    fn test_unterminated_string_consumes_one_char() {
        let (tokens, errors) = lex("\"abc");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].position(), Position::START);
        assert_eq!(tokens[0].kind, TokenKind::Id);
        assert_eq!(tokens[0].text, "abc");
        assert_eq!(tokens[0].position(), Position::new(1, 2));
    }

    #[test]
    fn test_stream_termination() {
        use TokenKind::*;
        assert_eq!(kinds(""), vec![Eol, Eof]);
        assert_eq!(kinds("x\n"), vec![Id, Eol, Eof]);
        assert_eq!(kinds("x"), vec![Id, Eol, Eof]);

        let (tokens, _) = lex("ab  ");
        let eof = tokens.last().unwrap();
        assert_eq!(eof.position(), Position::new(1, 5));
    }

    proptest! {
        #[test]
        fn lex_is_total(source in any::<String>()) {
            let (tokens, _) = lex(&source);
            let n = tokens.len();
            prop_assert!(n >= 2);
            prop_assert_eq!(tokens[n - 1].kind, TokenKind::Eof);
            prop_assert_eq!(tokens[n - 2].kind, TokenKind::Eol);
            prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
        }

        #[test]
        fn positions_are_monotonic(source in "[a-z0-9 +*/;@#\n]{0,64}") {
            let (tokens, errors) = lex(&source);
            let positions: Vec<_> = tokens.iter().map(Token::position).collect();
            prop_assert!(positions.windows(2).all(|w| w[0] <= w[1]));
            for error in errors {
                prop_assert!(error.line >= 1 && error.column >= 1);
            }
        }
    }
}
