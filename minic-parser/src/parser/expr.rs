use super::*;

/// Operators of each binary precedence level, loosest first.
const LOGICAL_OR: &[TokenKind] = &[TokenKind::Or];
const LOGICAL_AND: &[TokenKind] = &[TokenKind::And];
const EQUALITY: &[TokenKind] = &[TokenKind::Eq, TokenKind::Ne];
const RELATIONAL: &[TokenKind] = &[TokenKind::Lt, TokenKind::Le, TokenKind::Gt, TokenKind::Ge];
const ADDITIVE: &[TokenKind] = &[TokenKind::Plus, TokenKind::Minus];
const MULTIPLICATIVE: &[TokenKind] = &[TokenKind::Star, TokenKind::Slash];

/// A grammar rule producing an optional expression.
type Rule<'t> = fn(&mut Parser<'t>) -> ParseResult<Option<Expr>>;

impl<'t> Parser<'t> {
    /* Expressions */
    /// Parses any expression.
    /// Returns `Ok(None)` when no expression starts at the current token.
    pub fn parse_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.nested(Self::parse_assignment_expr)
    }

    /// Parses an expression that must be present, failing with `message` otherwise.
    pub(super) fn expect_expr(&mut self, message: &str) -> ParseResult<Expr> {
        match self.parse_expr()? {
            Some(expr) => Ok(expr),
            None => Err(self.error_here(message)),
        }
    }

    /// Parses `or_expr (= assignment_expr)?`. Assignment is right associative.
    fn parse_assignment_expr(&mut self) -> ParseResult<Option<Expr>> {
        let target = match self.parse_or_expr()? {
            Some(target) => target,
            None => return Ok(None),
        };
        if !self.eat(TokenKind::Equal) {
            return Ok(Some(target));
        }

        let value = match self.parse_expr()? {
            Some(value) => value,
            None => return Err(self.error_here("Expected expression after '='")),
        };
        if !matches!(target, Expr::Var(_)) {
            return Err(self.error_here("Left side of assignment must be a variable"));
        }

        Ok(Some(Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }))
    }

    fn parse_or_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_expr(LOGICAL_OR, Self::parse_and_expr)
    }

    fn parse_and_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_expr(LOGICAL_AND, Self::parse_equality_expr)
    }

    fn parse_equality_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_expr(EQUALITY, Self::parse_relational_expr)
    }

    fn parse_relational_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_expr(RELATIONAL, Self::parse_additive_expr)
    }

    fn parse_additive_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_expr(ADDITIVE, Self::parse_multiplicative_expr)
    }

    fn parse_multiplicative_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_expr(MULTIPLICATIVE, Self::parse_unary_expr)
    }

    /// Parses one left associative precedence level: `operand (op operand)*`.
    fn parse_binary_expr(
        &mut self,
        operators: &[TokenKind],
        operand: Rule<'t>,
    ) -> ParseResult<Option<Expr>> {
        let mut left = match operand(self)? {
            Some(left) => left,
            None => return Ok(None),
        };

        while let Some(op) = self.eat_operator(operators) {
            let right = match operand(self)? {
                Some(right) => right,
                None => return Err(self.error_here(format!("Expected expression after '{}'", op))),
            };
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(Some(left))
    }

    /// Parses prefix `-`, which becomes `0 - operand`.
    fn parse_unary_expr(&mut self) -> ParseResult<Option<Expr>> {
        if !self.eat(TokenKind::Minus) {
            return self.parse_postfix_expr();
        }

        match self.nested(Self::parse_unary_expr)? {
            Some(operand) => Ok(Some(Expr::BinOp {
                op: BinaryOp::Sub,
                left: Box::new(Expr::Num("0".to_string())),
                right: Box::new(operand),
            })),
            None => Err(self.error_here("Expected expression after unary '-'")),
        }
    }

    /// Parses a primary expression followed by any number of call or index suffixes.
    fn parse_postfix_expr(&mut self) -> ParseResult<Option<Expr>> {
        let mut expr = match self.parse_primary_expr()? {
            Some(expr) => expr,
            None => return Ok(None),
        };

        loop {
            if self.eat(TokenKind::LParen) {
                let args = self.parse_call_args()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if self.eat(TokenKind::LBrack) {
                let index = self.expect_expr("Expected expression inside '[]'")?;
                self.expect(TokenKind::RBrack)?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                break;
            }
        }

        Ok(Some(expr))
    }

    /// Parses call arguments after the `(`, including the closing `)`.
    fn parse_call_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.expect_expr("Expected expression in call argument")?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Option<Expr>> {
        let token = self.current();
        let expr = match token.kind {
            TokenKind::Num => Expr::Num(token.text.clone()),
            TokenKind::Char => Expr::Char(token.text.clone()),
            TokenKind::String => Expr::Str(token.text.clone()),
            TokenKind::Id => Expr::Var(token.text.clone()),
            TokenKind::LParen => {
                self.advance();
                let expr = self.expect_expr("Expected expression inside parentheses")?;
                self.expect(TokenKind::RParen)?;
                return Ok(Some(expr));
            }
            _ => return Ok(None),
        };
        self.advance(); // eat parsed token

        Ok(Some(expr))
    }
}
