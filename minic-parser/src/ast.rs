use std::fmt;

use crate::lexer::TokenKind;

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// A `{ ... }` block, or a single statement used as a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub body: Vec<Stmt>,
}

/// A function parameter (e.g. `int a`).
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

/// A variable declaration (e.g. `int x = 1;`).
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: String,
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FunctionDecl {
        return_type: String,
        name: String,
        params: Vec<Param>,
        body: Block,
    },
    VarDecl(VarDecl),
    If {
        test: Expr,
        then: Block,
        otherwise: Option<Block>,
    },
    While {
        test: Expr,
        body: Block,
    },
    For {
        init: Option<ForInit>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Block,
    },
    Return(Option<Expr>),
    /// An expression statement (e.g. `foo(1);` or `x = 2;`).
    Expr(Expr),
}

/// The first clause of a `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An assignment (e.g. `x = 1`). `target` is always an [`Expr::Var`].
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// A binary expression (e.g. `1+1`). Unary minus is `0 - operand`.
    BinOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A call expression (e.g. `foo(1, 2)`).
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// An index expression (e.g. `a[i]`).
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// An identifier (e.g. `foo`).
    Var(String),
    Num(String),
    /// A character literal, quotes included.
    Char(String),
    /// A string literal, quotes included.
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Returns the operator a token stands for, or `None` if it is not a binary operator.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Or => BinaryOp::Or,
            TokenKind::And => BinaryOp::And,
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::Ne => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
