//! Renders a [`Program`] as a Graphviz DOT graph.

use minic_parser::ast::{Block, Expr, Program, Stmt, VarDecl};
use minic_parser::visitor::{walk_block, walk_expr, walk_program, walk_stmt, walk_var_decl, Visitor};

/// Returns the DOT source of the tree rooted at `program`.
/// Node ids are assigned in pre-order, so the output is deterministic.
pub fn to_dot(program: &Program) -> String {
    let mut renderer = DotRenderer::new();
    renderer.visit_program(program);
    renderer.finish()
}

struct DotRenderer {
    out: String,
    next_id: usize,
    /// Ids of the nodes enclosing the one being visited.
    parents: Vec<usize>,
}

impl DotRenderer {
    fn new() -> Self {
        Self {
            out: String::from("digraph ast {\n    node [shape=box, style=rounded];\n"),
            next_id: 0,
            parents: Vec::new(),
        }
    }

    /// Emits a node linked to the current parent and makes it the parent of everything `walk` visits.
    fn node(&mut self, label: &str, walk: impl FnOnce(&mut Self)) {
        let id = self.next_id;
        self.next_id += 1;

        self.out
            .push_str(&format!("    n{} [label=\"{}\"];\n", id, escape(label)));
        if let Some(parent) = self.parents.last() {
            self.out.push_str(&format!("    n{} -> n{};\n", parent, id));
        }

        self.parents.push(id);
        walk(self);
        self.parents.pop();
    }

    fn finish(mut self) -> String {
        self.out.push_str("}\n");
        self.out
    }
}

impl<'ast> Visitor<'ast> for DotRenderer {
    fn visit_program(&mut self, program: &'ast Program) {
        self.node("Program", |r| walk_program(r, program));
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        let label = match stmt {
            Stmt::FunctionDecl { name, .. } => format!("Func({})", name),
            Stmt::If { .. } => "If".to_string(),
            Stmt::While { .. } => "While".to_string(),
            Stmt::For { .. } => "For".to_string(),
            Stmt::Return(_) => "Return".to_string(),
            // the declaration or expression is the node itself
            Stmt::VarDecl(_) | Stmt::Expr(_) => return walk_stmt(self, stmt),
        };
        self.node(&label, |r| walk_stmt(r, stmt));
    }

    fn visit_block(&mut self, block: &'ast Block) {
        self.node("Block", |r| walk_block(r, block));
    }

    fn visit_var_decl(&mut self, decl: &'ast VarDecl) {
        self.node(&format!("VarDecl({})", decl.name), |r| walk_var_decl(r, decl));
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        let label = match expr {
            Expr::Assign { .. } => "Assign".to_string(),
            Expr::BinOp { op, .. } => op.to_string(),
            Expr::Call { .. } => "Call".to_string(),
            Expr::Index { .. } => "Index".to_string(),
            Expr::Var(name) => format!("Id({})", name),
            Expr::Num(value) => format!("Num({})", value),
            Expr::Char(value) => format!("Char({})", value),
            Expr::Str(_) => "Str".to_string(),
        };
        self.node(&label, |r| walk_expr(r, expr));
    }
}

fn escape(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for ch in label.chars() {
        match ch {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_parser::{lex, parse};

    fn dot(source: &str) -> String {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty());
        to_dot(&parse(&tokens).unwrap())
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(
            dot(""),
            "digraph ast {\n    node [shape=box, style=rounded];\n    n0 [label=\"Program\"];\n}\n"
        );
    }

    #[test]
    fn test_function() {
        insta::assert_snapshot!(dot("int add(int a, int b) { return a + b; }"), @r###"
        digraph ast {
            node [shape=box, style=rounded];
            n0 [label="Program"];
            n1 [label="Func(add)"];
            n0 -> n1;
            n2 [label="Block"];
            n1 -> n2;
            n3 [label="Return"];
            n2 -> n3;
            n4 [label="+"];
            n3 -> n4;
            n5 [label="Id(a)"];
            n4 -> n5;
            n6 [label="Id(b)"];
            n4 -> n6;
        }
        "###);
    }

    #[test]
    fn test_omits_absent_children() {
        let out = dot("for (;;) x = 'q';\nint y;");
        assert!(out.contains("n1 [label=\"For\"];"));
        // For -> Block -> Assign -> (Id, Char), then the declaration
        assert!(out.contains("n1 -> n2;\n"));
        assert!(out.contains("n2 [label=\"Block\"];"));
        assert!(out.contains("n5 [label=\"Char('q')\"];"));
        assert!(out.contains("n6 [label=\"VarDecl(y)\"];\n    n0 -> n6;\n"));
        assert_eq!(out.matches("[label=").count(), 7);
    }

    #[test]
    fn test_escapes_labels() {
        assert_eq!(escape(r#"Char('"')"#), r#"Char('\"')"#);
        assert_eq!(escape(r"a\b"), r"a\\b");
    }
}
