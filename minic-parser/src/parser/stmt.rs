use super::*;

impl<'t> Parser<'t> {
    /// Parses a top level declaration: a function or a variable declaration.
    /// The current token must be a type keyword.
    pub fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        let ty = self.advance();
        if !self.check(TokenKind::Id) {
            return Err(self.error_at(ty, "Expected identifier after type"));
        }
        let name = self.advance();

        if self.eat(TokenKind::LParen) {
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            return Ok(Stmt::FunctionDecl {
                return_type: ty.text.clone(),
                name: name.text.clone(),
                params,
                body,
            });
        }

        let init = self.parse_initializer()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::VarDecl(VarDecl {
            ty: ty.text.clone(),
            name: name.text.clone(),
            init,
        }))
    }

    /// Parses a comma separated parameter list, including the closing `)`.
    /// Empty slots such as `f(a,)` are skipped.
    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.extend(self.parse_param());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// Parses `type name`, `name name` or a lone `type`/`name`.
    /// Untyped parameters are `int`, and a lone token names an `int` parameter.
    fn parse_param(&mut self) -> Option<Param> {
        let first = self.current();
        if !matches!(
            first.kind,
            TokenKind::Int | TokenKind::Float | TokenKind::CharType | TokenKind::Id
        ) {
            return None;
        }
        self.advance();

        if self.check(TokenKind::Id) {
            let ty = if first.kind == TokenKind::Id {
                "int".to_string()
            } else {
                first.text.clone()
            };
            return Some(Param {
                ty,
                name: self.advance().text.clone(),
            });
        }

        Some(Param {
            ty: "int".to_string(),
            name: first.text.clone(),
        })
    }

    /// Parses an optional `= expr` initializer.
    fn parse_initializer(&mut self) -> ParseResult<Option<Expr>> {
        if self.eat(TokenKind::Equal) {
            self.expect_expr("Expected expression after '='").map(Some)
        } else {
            Ok(None)
        }
    }

    /// Parses a `{ ... }` block, or a single statement wrapped into a block.
    pub fn parse_block(&mut self) -> ParseResult<Block> {
        if !self.eat(TokenKind::LBrace) {
            let stmt = self.parse_stmt()?;
            return Ok(Block { body: vec![stmt] });
        }

        let mut body = Vec::new();
        while !self.check_any(&[TokenKind::RBrace, TokenKind::Eof]) {
            if self.eat(TokenKind::Eol) {
                continue;
            }
            body.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Block { body })
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        self.nested(|p| match p.current().kind {
            kind if kind.is_type_keyword() => p.parse_var_decl().map(Stmt::VarDecl),
            TokenKind::If => p.parse_if_stmt(),
            TokenKind::While => p.parse_while_stmt(),
            TokenKind::For => p.parse_for_stmt(),
            TokenKind::Return => p.parse_return_stmt(),
            TokenKind::Id => p.parse_assign_or_expr_stmt(),
            _ => p.parse_expr_stmt(),
        })
    }

    /// Parses `type name (= expr)? ;`.
    fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let ty = self.advance();
        if !self.check(TokenKind::Id) {
            return Err(self.error_here("Expected identifier after type"));
        }
        let name = self.advance();
        let init = self.parse_initializer()?;
        self.expect(TokenKind::Semi)?;

        Ok(VarDecl {
            ty: ty.text.clone(),
            name: name.text.clone(),
            init,
        })
    }

    /// Parses `name = expr ;`, or rewinds and parses an expression statement
    /// when the identifier is not followed by `=`.
    fn parse_assign_or_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let checkpoint = self.pos;
        let target = self.advance();

        if self.eat(TokenKind::Equal) {
            let value = self.expect_expr("Expected expression after '='")?;
            self.expect(TokenKind::Semi)?;
            return Ok(Stmt::Expr(Expr::Assign {
                target: Box::new(Expr::Var(target.text.clone())),
                value: Box::new(value),
            }));
        }

        self.pos = checkpoint;
        self.parse_expr_stmt()
    }

    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        match self.parse_expr()? {
            Some(expr) => {
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::Expr(expr))
            }
            None => Err(self.unexpected()),
        }
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let test = self.expect_expr("Expected expression in 'if' condition")?;
        self.expect(TokenKind::RParen)?;
        let then = self.parse_block()?;

        // binds to the nearest `if`, the inner one has already claimed its `else`
        let otherwise = if self.eat(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            test,
            then,
            otherwise,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let test = self.expect_expr("Expected expression in 'while' condition")?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(Stmt::While { test, body })
    }

    /// Parses `for ( init? ; cond? ; step? ) block`.
    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let init = if self.eat(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_for_init()?)
        };

        let cond = if self.check(TokenKind::Semi) {
            None
        } else {
            Some(self.expect_expr("Expected expression in for-loop condition")?)
        };
        self.expect(TokenKind::Semi)?;

        let step = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.expect_expr("Expected expression in for-loop step")?)
        };
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;

        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
        })
    }

    /// Parses the initializer clause of a `for` loop, including its `;`.
    fn parse_for_init(&mut self) -> ParseResult<ForInit> {
        let current = self.current();
        if current.kind.is_type_keyword() {
            return self.parse_var_decl().map(ForInit::VarDecl);
        }

        let init = if current.kind == TokenKind::Id {
            self.advance();
            self.expect(TokenKind::Equal)?;
            let value = self.expect_expr("Expected expression in for-loop initializer")?;
            Expr::Assign {
                target: Box::new(Expr::Var(current.text.clone())),
                value: Box::new(value),
            }
        } else {
            self.expect_expr("Expected expression in for-loop initializer")?
        };
        self.expect(TokenKind::Semi)?;

        Ok(ForInit::Expr(init))
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Return)?;
        if self.eat(TokenKind::Semi) {
            return Ok(Stmt::Return(None));
        }
        let value = self.expect_expr("Expected expression after 'return'")?;
        self.expect(TokenKind::Semi)?;

        Ok(Stmt::Return(Some(value)))
    }
}
