//! Lexical scopes for the checker
//!
//! Scopes live in an arena and point at their parent by index. A scope is pushed
//! when a function body or block is entered and discarded, with everything pushed
//! after it, when the walk leaves that region.

use std::collections::HashMap;

use crate::types::Type;

/// Names with this prefix are never visible from nested scopes.
pub const LOCAL_PREFIX: char = '_';

/// Index of a scope in a [`ScopeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A function prototype: parameter types and return type
#[derive(Debug, Clone)]
pub struct Signature {
    pub params: Vec<Type>,
    pub ret: Type,
}

impl Signature {
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        Self { params, ret }
    }
}

#[derive(Debug, Default)]
struct Scope {
    vars: HashMap<String, Type>,
    funcs: HashMap<String, Signature>,
    parent: Option<ScopeId>,
}

#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeArena {
    /// Create an arena holding only the root scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Push a new scope whose parent is `parent`
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Drop `scope` and every scope created after it. The root is never dropped.
    pub fn discard(&mut self, scope: ScopeId) {
        self.scopes.truncate(scope.0.max(1));
    }

    /// Number of live scopes, root included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn get_var(&self, scope: ScopeId, name: &str) -> Option<&Type> {
        self.find(scope, name, |s| s.vars.contains_key(name))
            .and_then(|id| self.scopes[id.0].vars.get(name))
    }

    pub fn get_func(&self, scope: ScopeId, name: &str) -> Option<&Signature> {
        self.find(scope, name, |s| s.funcs.contains_key(name))
            .and_then(|id| self.scopes[id.0].funcs.get(name))
    }

    /// Rebind `name` in the nearest scope that already defines it, or bind it in
    /// `scope` when no enclosing scope does.
    pub fn set_var(&mut self, scope: ScopeId, name: &str, ty: Type) {
        let target = self
            .find(scope, name, |s| s.vars.contains_key(name))
            .unwrap_or(scope);
        self.scopes[target.0].vars.insert(name.to_string(), ty);
    }

    /// Bind `name` in `scope` itself, shadowing any outer binding
    pub fn define_var(&mut self, scope: ScopeId, name: &str, ty: Type) {
        self.scopes[scope.0].vars.insert(name.to_string(), ty);
    }

    pub fn set_func(&mut self, scope: ScopeId, name: &str, sig: Signature) {
        self.scopes[scope.0].funcs.insert(name.to_string(), sig);
    }

    /// Walk outward from `scope` to the first scope satisfying `has`.
    /// Local names are only searched for in `scope` itself.
    fn find(
        &self,
        scope: ScopeId,
        name: &str,
        has: impl Fn(&Scope) -> bool,
    ) -> Option<ScopeId> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            let s = &self.scopes[id.0];
            if has(s) {
                return Some(id);
            }
            if name.starts_with(LOCAL_PREFIX) {
                return None;
            }
            cur = s.parent;
        }
        None
    }
}
