//! Lint rules (W0001-W0002).
//!
//! Rules look at one statement at a time. The linter applies every enabled rule
//! to each statement of each function body, descending into `?` and `*` blocks
//! and nested functions.

use tracing::debug;

use crate::diagnostics::error_codes::warnings;
use crate::diagnostics::{Diagnostic, DiagnosticBag};
use crate::parser::ast::*;

pub type Rule = fn(&MetaNode) -> Option<Diagnostic>;

/// Every rule by the name config files use for it
pub const RULES: &[(&str, Rule)] = &[("new_array", new_array), ("infinite_loop", infinite_loop)];

pub fn is_rule(name: &str) -> bool {
    RULES.iter().any(|(n, _)| *n == name)
}

/// Runs a set of lint rules over a program
pub struct Linter {
    rules: Vec<(&'static str, Rule)>,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Linter {
    /// Enable every rule except those named in `disabled`
    pub fn new(disabled: &[String]) -> Self {
        let rules = RULES
            .iter()
            .filter(|(name, _)| !disabled.iter().any(|d| d == name))
            .copied()
            .collect();
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|(name, _)| *name).collect()
    }

    pub fn lint_program(&self, program: &Program) -> DiagnosticBag {
        let mut bag = DiagnosticBag::new();
        let mut funcs: Vec<&(FuncDef, _)> = program.funcs.values().collect();
        funcs.sort_by_key(|(_, span)| span.start);
        for (def, _) in funcs {
            debug!(function = %def.name, "linting");
            self.lint_block(&def.body, &mut bag);
        }
        bag
    }

    fn lint_block(&self, block: &[MetaNode], bag: &mut DiagnosticBag) {
        for stmt in block {
            for (_, rule) in &self.rules {
                if let Some(diag) = rule(stmt) {
                    bag.push(diag);
                }
            }
            match &stmt.node {
                Node::If(if_node) => {
                    for branch in std::iter::once(&if_node.main).chain(&if_node.other) {
                        self.lint_block(&branch.block, bag);
                    }
                    if let Some(else_block) = &if_node.else_block {
                        self.lint_block(else_block, bag);
                    }
                }
                Node::While { block, .. } => self.lint_block(block, bag),
                Node::FuncDef(def) => self.lint_block(&def.body, bag),
                _ => {}
            }
        }
    }
}

/// `append!`/`concat!` as a statement: the new array is thrown away.
fn new_array(stmt: &MetaNode) -> Option<Diagnostic> {
    let Node::FuncCall { name, .. } = &stmt.node else {
        return None;
    };
    if name != "append" && name != "concat" {
        return None;
    }
    Some(
        Diagnostic::warning(warnings::NEW_ARRAY)
            .message(format!(
                "{} does not modify the array in-place, its result is discarded",
                name
            ))
            .span(stmt.span.clone())
            .node(NodeKind::FuncCall)
            .build(),
    )
}

/// `*` loop whose condition is the literal true
fn infinite_loop(stmt: &MetaNode) -> Option<Diagnostic> {
    let Node::While { cond, .. } = &stmt.node else {
        return None;
    };
    if !matches!(cond.node, Node::Bool(true)) {
        return None;
    }
    Some(
        Diagnostic::warning(warnings::INFINITE_LOOP)
            .message("loop condition is always true")
            .span(stmt.span.clone())
            .node(NodeKind::While)
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::build::*;
    use crate::types::Type;

    fn program_with_body(body: Block) -> Program {
        let mut program = Program::new();
        program
            .insert(func("main", vec![], Type::Nothing, body))
            .unwrap();
        program
    }

    fn while_loop(cond: MetaNode, block: Block) -> MetaNode {
        meta(Node::While {
            cond: Box::new(cond),
            block,
        })
    }

    #[test]
    fn test_discarded_append_warns() {
        let program = program_with_body(vec![call("append", vec![var("xs"), int(1)])]);
        let bag = Linter::default().lint_program(&program);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.diagnostics()[0].code, "W0001");
        assert!(!bag.has_errors());
    }

    #[test]
    fn test_used_append_is_fine() {
        let program = program_with_body(vec![set(
            "xs",
            call("append", vec![var("xs"), int(1)]),
        )]);
        assert!(Linter::default().lint_program(&program).is_empty());
    }

    #[test]
    fn test_rules_reach_nested_blocks() {
        let inner = while_loop(
            meta(Node::Bool(true)),
            vec![call("concat", vec![var("a"), var("b")])],
        );
        let program = program_with_body(vec![inner]);
        let bag = Linter::default().lint_program(&program);
        let codes: Vec<&str> = bag.diagnostics().iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["W0002", "W0001"]);
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let program = program_with_body(vec![while_loop(meta(Node::Bool(true)), vec![])]);
        let linter = Linter::new(&["infinite_loop".to_string()]);
        assert_eq!(linter.rule_names(), vec!["new_array"]);
        assert!(linter.lint_program(&program).is_empty());
    }

    #[test]
    fn test_rule_names() {
        assert!(is_rule("new_array"));
        assert!(!is_rule("unused_variable"));
    }
}
