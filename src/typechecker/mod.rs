//! Type checker for Skol
//!
//! A two-pass walk over a [`Program`]. The first pass registers every function
//! signature and global binding in the root scope without looking at bodies, so
//! functions may call each other regardless of order. The second pass checks each
//! function body against its declared return type.
//!
//! Problems are collected in a [`DiagnosticBag`]; the walk never stops early
//! except inside a subtree whose type could not be determined.

pub mod builtins;
pub mod lint;
pub mod scope;
mod selector;

use std::fmt;

use tracing::{debug, trace};

use crate::diagnostics::error_codes::types as codes;
use crate::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticBuilder, Note, Span};
use crate::parser::ast::*;
use crate::types::Type;

pub use builtins::BuiltinError;
pub use scope::{ScopeArena, ScopeId, Signature};

/// Check a whole program and return every diagnostic in report order.
pub fn check(program: &Program) -> Vec<Diagnostic> {
    let mut checker = TypeChecker::new();
    match checker.check_program(program) {
        Ok(()) => checker.diagnostics.take(),
        Err(bag) => bag.take(),
    }
}

/// Type checker state
pub struct TypeChecker {
    scopes: ScopeArena,
    current: ScopeId,
    diagnostics: DiagnosticBag,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        let scopes = ScopeArena::new();
        let current = scopes.root();
        Self {
            scopes,
            current,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Get diagnostics
    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    /// Type currently bound to a variable, as seen from the current scope
    pub fn var_type(&self, name: &str) -> Option<&Type> {
        self.scopes.get_var(self.current, name)
    }

    /// Check a program
    pub fn check_program(&mut self, program: &Program) -> Result<(), DiagnosticBag> {
        let root = self.scopes.root();

        // First pass: signatures and globals
        debug!(
            funcs = program.funcs.len(),
            externs = program.externs.len(),
            globals = program.vars.len() + program.typedefs.len(),
            "registering top-level definitions"
        );
        let mut funcs: Vec<&(FuncDef, Span)> = program.funcs.values().collect();
        funcs.sort_by_key(|(_, span)| span.start);
        for (def, span) in &funcs {
            self.declare_function(def, span);
        }
        for (alias, (ext, _)) in &program.externs {
            self.scopes.set_func(root, alias, signature(&ext.params, &ext.ret));
        }

        let mut globals: Vec<&GlobalVar> = program.vars.values().collect();
        globals.sort_by_key(|g| g.span.start);
        for global in globals {
            self.check_global(global);
        }

        let mut typedefs: Vec<_> = program.typedefs.values().collect();
        typedefs.sort_by_key(|decl| decl.span.start);
        for decl in typedefs {
            self.bind_declared(&decl.name, &decl.ty, NodeKind::VarDef, &decl.span);
        }

        // Second pass: function bodies
        for (def, _) in funcs {
            self.check_function(def);
        }

        debug!(diagnostics = self.diagnostics.len(), "check finished");
        if self.diagnostics.has_errors() {
            Err(self.diagnostics.clone())
        } else {
            Ok(())
        }
    }

    fn check_global(&mut self, global: &GlobalVar) {
        let actual = self.type_of(&global.value);
        let ty = match (&global.declared, actual) {
            (Some(declared), None) => declared.clone(),
            // Already reported; later uses stay quiet
            (None, None) => Type::Undefined,
            (Some(declared), Some(actual)) => {
                if !declared.equals(&actual) {
                    self.mismatch(
                        &global.value,
                        declared,
                        &actual,
                        format_args!("initial value of {}", global.name),
                    );
                }
                declared.clone()
            }
            (None, Some(actual)) => actual,
        };
        if let Some(declared) = &global.declared {
            self.reject_any(declared, &global.span, NodeKind::VarSetTyped, || {
                format!("variable {} cannot be declared Any", global.name)
            });
        }
        let root = self.scopes.root();
        self.scopes.set_var(root, &global.name, ty);
    }

    /// Register a user function's signature. Only extern signatures may use `Any`.
    fn declare_function(&mut self, def: &FuncDef, span: &Span) {
        self.reject_any(&def.ret, span, NodeKind::FuncDef, || {
            format!("function {} cannot return Any", def.name)
        });
        for param in &def.params {
            self.reject_any(&param.ty, span, NodeKind::FuncDef, || {
                format!("parameter {} of {} cannot be Any", param.name, def.name)
            });
        }
        self.scopes
            .set_func(self.current, &def.name, signature(&def.params, &def.ret));
    }

    fn reject_any(
        &mut self,
        ty: &Type,
        span: &Span,
        node: NodeKind,
        message: impl FnOnce() -> String,
    ) {
        if matches!(ty, Type::Any) {
            let diag = Diagnostic::error(codes::ILLEGAL_TYPE)
                .message(message())
                .span(span.clone())
                .node(node)
                .build();
            self.diagnostics.push(diag);
        }
    }

    /// Check a function body in a fresh scope holding its parameters.
    fn check_function(&mut self, def: &FuncDef) {
        debug!(function = %def.name, "checking function body");
        self.in_child_scope(|this| {
            for param in &def.params {
                this.scopes.define_var(this.current, &param.name, param.ty.clone());
            }
            this.check_block(&def.body, &def.ret);
        });
    }

    fn in_child_scope(&mut self, f: impl FnOnce(&mut Self)) {
        let parent = self.current;
        let child = self.scopes.child(parent);
        trace!(depth = self.scopes.depth(), "enter scope");
        self.current = child;
        f(self);
        self.scopes.discard(child);
        self.current = parent;
        trace!(depth = self.scopes.depth(), "leave scope");
    }

    fn check_block(&mut self, block: &[MetaNode], ret: &Type) {
        for node in block {
            self.check_node(node, ret);
        }
    }

    fn check_scoped_block(&mut self, block: &[MetaNode], ret: &Type) {
        self.in_child_scope(|this| this.check_block(block, ret));
    }

    /// Check a statement inside a function whose declared return type is `ret`.
    pub fn check_node(&mut self, meta: &MetaNode, ret: &Type) {
        match &meta.node {
            Node::If(if_node) => {
                for branch in std::iter::once(&if_node.main).chain(&if_node.other) {
                    self.check_condition(&branch.cond);
                    self.check_scoped_block(&branch.block, ret);
                }
                let else_block = if_node.else_block.as_deref().unwrap_or_default();
                self.check_scoped_block(else_block, ret);
            }
            Node::While { cond, block } => {
                self.check_condition(cond);
                self.check_scoped_block(block, ret);
            }
            Node::Return(value) => {
                if let Some(actual) = self.type_of(value) {
                    if !ret.equals(&actual) {
                        self.mismatch(value, ret, &actual, "return value");
                    }
                }
            }
            Node::VarSet { name, value } => {
                let Some(actual) = self.type_of(value) else {
                    if self.scopes.get_var(self.current, name).is_none() {
                        self.scopes.set_var(self.current, name, Type::Undefined);
                    }
                    return;
                };
                match self.scopes.get_var(self.current, name) {
                    Some(Type::Undefined) | None => {
                        self.scopes.set_var(self.current, name, actual)
                    }
                    Some(bound) => {
                        if !bound.equals(&actual) {
                            let bound = bound.clone();
                            let diag = mismatch_diagnostic(
                                meta,
                                &bound,
                                &actual,
                                format_args!("assignment to {}", name),
                            )
                            .note(Note::new(format!("{} keeps the type {}", name, bound)))
                            .build();
                            self.diagnostics.push(diag);
                        }
                    }
                }
            }
            Node::VarDef { name, ty } => {
                self.bind_declared(name, ty, NodeKind::VarDef, &meta.span);
            }
            Node::VarSetTyped { name, ty, value } => {
                if let Some(actual) = self.type_of(value) {
                    if !ty.equals(&actual) {
                        self.mismatch(
                            value,
                            ty,
                            &actual,
                            format_args!("initial value of {}", name),
                        );
                    }
                }
                self.bind_declared(name, ty, NodeKind::VarSetTyped, &meta.span);
            }
            Node::FuncDef(def) => {
                self.declare_function(def, &meta.span);
                self.check_function(def);
            }
            Node::FuncExtern(ext) => {
                self.scopes
                    .set_func(self.current, &ext.alias, signature(&ext.params, &ext.ret));
            }
            Node::StructDef(_) => {}
            Node::Bool(_)
            | Node::Char(_)
            | Node::Int(_)
            | Node::Float(_)
            | Node::String(_)
            | Node::Struct(_)
            | Node::Array(_)
            | Node::Selector(_)
            | Node::FuncCall { .. } => {
                self.type_of(meta);
            }
        }
    }

    fn check_condition(&mut self, cond: &MetaNode) {
        if let Some(actual) = self.type_of(cond) {
            if !Type::BOOL.equals(&actual) {
                self.mismatch(cond, &Type::BOOL, &actual, "condition");
            }
        }
    }

    /// Bind an explicitly typed variable, reporting a retype if the name is
    /// already bound to something else.
    fn bind_declared(&mut self, name: &str, ty: &Type, node: NodeKind, span: &Span) {
        self.reject_any(ty, span, node, || {
            format!("variable {} cannot be declared Any", name)
        });
        match self.scopes.get_var(self.current, name) {
            Some(Type::Undefined) | None => self.scopes.set_var(self.current, name, ty.clone()),
            Some(bound) if !bound.equals(ty) => {
                let diag = Diagnostic::error(codes::VARIABLE_RETYPED)
                    .message(format!(
                        "variable {} is already {}, cannot redeclare it as {}",
                        name, bound, ty
                    ))
                    .span(span.clone())
                    .node(node)
                    .expected(bound.describe())
                    .actual(ty.describe())
                    .build();
                self.diagnostics.push(diag);
            }
            Some(_) => {}
        }
    }

    /// Infer the type of a value node. `None` means the type could not be
    /// determined and a diagnostic has already been reported.
    pub fn type_of(&mut self, meta: &MetaNode) -> Option<Type> {
        match &meta.node {
            Node::Struct(lit) => {
                self.check_arity(meta, lit.ty.fields.len(), lit.args.len());
                for (field, arg) in lit.ty.fields.iter().zip(&lit.args) {
                    if let Some(actual) = self.type_of(arg) {
                        if !field.ty.equals(&actual) {
                            self.mismatch(
                                arg,
                                &field.ty,
                                &actual,
                                format_args!("field {} of {}", field.name, lit.ty.name),
                            );
                        }
                    }
                }
                Some(Type::Structure(lit.ty.clone()))
            }
            Node::Array(lit) => {
                for elem in &lit.elems {
                    if let Some(actual) = self.type_of(elem) {
                        if !lit.elem.equals(&actual) {
                            self.mismatch(elem, &lit.elem, &actual, "array element");
                        }
                    }
                }
                Some(Type::array(lit.elem.clone()))
            }
            Node::Selector(sel) => self.type_of_selector(sel, meta),
            Node::FuncCall { name, args } => self.type_of_call(meta, name, args),
            node => {
                if let Some(ty) = node.literal_type() {
                    return Some(ty);
                }
                self.report(
                    codes::UNSUPPORTED_NODE,
                    meta,
                    format!("{} cannot be used as a value", node.kind()),
                );
                None
            }
        }
    }

    fn type_of_call(&mut self, meta: &MetaNode, name: &str, args: &[MetaNode]) -> Option<Type> {
        let arg_types: Vec<Option<Type>> = args.iter().map(|a| self.type_of(a)).collect();

        if let Some(sig) = self.scopes.get_func(self.current, name).cloned() {
            self.check_arity(meta, sig.params.len(), args.len());
            for ((param, arg), actual) in sig.params.iter().zip(args).zip(&arg_types) {
                if let Some(actual) = actual {
                    if !param.equals(actual) {
                        self.mismatch(arg, param, actual, format_args!("argument to {}", name));
                    }
                }
            }
            return Some(sig.ret);
        }

        let Some(rule) = builtins::lookup(name) else {
            self.report(
                codes::UNKNOWN_FUNCTION,
                meta,
                format!("unknown function {}", name),
            );
            return None;
        };

        // An argument that failed to type has already been reported.
        let arg_types: Vec<Type> = arg_types.into_iter().collect::<Option<_>>()?;
        match rule(&arg_types) {
            Ok(ty) => Some(ty),
            Err(BuiltinError::NeedMoreArgs { expected, got }) => {
                self.report(
                    codes::NEED_MORE_ARGUMENTS,
                    meta,
                    format!("{} needs {} argument(s), got {}", name, expected, got),
                );
                None
            }
            Err(BuiltinError::Mismatch { expected, actual }) => {
                self.mismatch(meta, &expected, &actual, format_args!("call to {}", name));
                None
            }
        }
    }

    fn check_arity(&mut self, meta: &MetaNode, expected: usize, got: usize) {
        let code = if got < expected {
            codes::NEED_MORE_ARGUMENTS
        } else if got > expected {
            codes::TOO_MANY_ARGUMENTS
        } else {
            return;
        };
        self.report(
            code,
            meta,
            format!("expected {} argument(s), got {}", expected, got),
        );
    }

    fn report(&mut self, code: &str, meta: &MetaNode, message: String) {
        let diag = Diagnostic::error(code)
            .message(message)
            .span(meta.span.clone())
            .node(meta.kind())
            .build();
        self.diagnostics.push(diag);
    }

    fn mismatch(
        &mut self,
        meta: &MetaNode,
        expected: &Type,
        actual: &Type,
        context: impl fmt::Display,
    ) {
        let diag = mismatch_diagnostic(meta, expected, actual, context).build();
        self.diagnostics.push(diag);
    }
}

fn mismatch_diagnostic(
    meta: &MetaNode,
    expected: &Type,
    actual: &Type,
    context: impl fmt::Display,
) -> DiagnosticBuilder {
    Diagnostic::error(codes::TYPE_MISMATCH)
        .message(format!(
            "type mismatch in {}: expected {}, got {}",
            context, expected, actual
        ))
        .span(meta.span.clone())
        .node(meta.kind())
        .expected(expected.describe())
        .actual(actual.describe())
}

fn signature(params: &[Param], ret: &Type) -> Signature {
    Signature::new(params.iter().map(|p| p.ty.clone()).collect(), ret.clone())
}
