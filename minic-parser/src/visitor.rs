//! Visitor pattern for AST nodes.

use crate::ast::{Block, Expr, ForInit, Program, Stmt, VarDecl};

pub trait Visitor<'ast>: Sized {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }
    fn visit_var_decl(&mut self, decl: &'ast VarDecl) {
        walk_var_decl(self, decl);
    }
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

/// Iteratively visit all statements in a `Vec<Stmt>`.
macro_rules! visit_stmt_list {
    ($visitor: expr, $body: expr) => {
        for stmt in $body {
            Visitor::visit_stmt($visitor, stmt);
        }
    };
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    visit_stmt_list!(visitor, &program.body);
}

pub fn walk_block<'ast>(visitor: &mut impl Visitor<'ast>, block: &'ast Block) {
    visit_stmt_list!(visitor, &block.body);
}

pub fn walk_var_decl<'ast>(visitor: &mut impl Visitor<'ast>, decl: &'ast VarDecl) {
    if let Some(init) = &decl.init {
        visitor.visit_expr(init);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Assign { target, value } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Expr::BinOp { op: _, left, right } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Call { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Index { target, index } => {
            visitor.visit_expr(target);
            visitor.visit_expr(index);
        }
        Expr::Var(_) => {}
        Expr::Num(_) => {}
        Expr::Char(_) => {}
        Expr::Str(_) => {}
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    match stmt {
        Stmt::FunctionDecl {
            return_type: _,
            name: _,
            params: _,
            body,
        } => visitor.visit_block(body),
        Stmt::VarDecl(decl) => visitor.visit_var_decl(decl),
        Stmt::If {
            test,
            then,
            otherwise,
        } => {
            visitor.visit_expr(test);
            visitor.visit_block(then);
            if let Some(otherwise) = otherwise {
                visitor.visit_block(otherwise);
            }
        }
        Stmt::While { test, body } => {
            visitor.visit_expr(test);
            visitor.visit_block(body);
        }
        Stmt::For {
            init,
            cond,
            step,
            body,
        } => {
            match init {
                Some(ForInit::VarDecl(decl)) => visitor.visit_var_decl(decl),
                Some(ForInit::Expr(expr)) => visitor.visit_expr(expr),
                None => {}
            }
            if let Some(cond) = cond {
                visitor.visit_expr(cond);
            }
            if let Some(step) = step {
                visitor.visit_expr(step);
            }
            visitor.visit_block(body);
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Expr(expr) => visitor.visit_expr(expr),
    }
}
