//! Abstract Syntax Tree definitions for Skol
//!
//! Every node is wrapped in a [`MetaNode`] carrying its source span. A parsed file
//! becomes a [`Program`]: five name-keyed collections of top-level definitions.

use crate::diagnostics::Span;
use crate::types::{Field, StructType, Type};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A node together with where it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaNode {
    pub node: Node,
    pub span: Span,
}

impl MetaNode {
    pub fn new(node: Node, span: Span) -> Self {
        Self { node, span }
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }
}

/// A sequence of statements
pub type Block = Vec<MetaNode>;

/// A named, typed parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Structure literal: declared type plus one argument per field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructLit {
    pub ty: StructType,
    pub args: Vec<MetaNode>,
}

/// Array literal: declared element type plus elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayLit {
    pub elem: Type,
    pub elems: Vec<MetaNode>,
}

/// A condition guarding a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub cond: Box<MetaNode>,
    pub block: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfNode {
    pub main: Branch,
    /// `:?cond(...)` arms, in source order
    pub other: Vec<Branch>,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDef {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Type,
    pub body: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncExtern {
    /// Name the program calls it by
    pub alias: String,
    /// Symbol the implementation is provided under
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Type,
}

/// One link of a selector chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum SelectorElem {
    /// `#field` (or the root variable)
    Name(String),
    /// `#@type`
    Cast(Type),
    /// `#0`
    IndexConst(i32),
    /// `#(other#selector)`
    IndexSelector(Box<Selector>),
}

/// Right-recursive selector chain: `parent#elem`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selector {
    pub parent: Option<Box<Selector>>,
    pub elem: SelectorElem,
}

impl Selector {
    /// A bare variable reference
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            parent: None,
            elem: SelectorElem::Name(name.into()),
        }
    }

    /// Extend this chain with one more element
    pub fn then(self, elem: SelectorElem) -> Self {
        Self {
            parent: Some(Box::new(self)),
            elem,
        }
    }

    /// Flatten the chain into elements from the root outward.
    pub fn path(&self) -> Vec<&SelectorElem> {
        let mut path = Vec::new();
        let mut cur = Some(self);
        while let Some(sel) = cur {
            path.push(&sel.elem);
            cur = sel.parent.as_deref();
        }
        path.reverse();
        path
    }

    pub fn kind(&self) -> NodeKind {
        match self.elem {
            SelectorElem::Name(_) => NodeKind::Selector,
            SelectorElem::Cast(_) => NodeKind::Typecast,
            SelectorElem::IndexConst(_) => NodeKind::IndexConst,
            SelectorElem::IndexSelector(_) => NodeKind::IndexSelector,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{}#", parent)?;
        }
        match &self.elem {
            SelectorElem::Name(name) => write!(f, "{}", name),
            SelectorElem::Cast(ty) => write!(f, "@{}", ty),
            SelectorElem::IndexConst(i) => write!(f, "{}", i),
            SelectorElem::IndexSelector(sel) => write!(f, "({})", sel),
        }
    }
}

/// AST node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Node {
    Bool(bool),
    Char(char),
    Int(i32),
    Float(f32),
    String(String),
    Struct(StructLit),
    Array(ArrayLit),

    If(IfNode),
    While { cond: Box<MetaNode>, block: Block },
    Return(Box<MetaNode>),

    VarSet { name: String, value: Box<MetaNode> },
    VarDef { name: String, ty: Type },
    VarSetTyped { name: String, ty: Type, value: Box<MetaNode> },
    FuncDef(FuncDef),
    FuncExtern(FuncExtern),
    StructDef(StructType),

    Selector(Selector),
    FuncCall { name: String, args: Vec<MetaNode> },
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Bool(_) => NodeKind::Bool,
            Node::Char(_) => NodeKind::Char,
            Node::Int(_) => NodeKind::Int,
            Node::Float(_) => NodeKind::Float,
            Node::String(_) => NodeKind::String,
            Node::Struct(_) => NodeKind::Struct,
            Node::Array(_) => NodeKind::Array,
            Node::If(_) => NodeKind::If,
            Node::While { .. } => NodeKind::While,
            Node::Return(_) => NodeKind::Return,
            Node::VarSet { .. } => NodeKind::VarSet,
            Node::VarDef { .. } => NodeKind::VarDef,
            Node::VarSetTyped { .. } => NodeKind::VarSetTyped,
            Node::FuncDef(_) => NodeKind::FuncDef,
            Node::FuncExtern(_) => NodeKind::FuncExtern,
            Node::StructDef(_) => NodeKind::StructDef,
            Node::Selector(sel) => sel.kind(),
            Node::FuncCall { .. } => NodeKind::FuncCall,
        }
    }

    /// Literal values need no scope to type
    pub fn literal_type(&self) -> Option<Type> {
        let ty = match self {
            Node::Bool(_) => Type::BOOL,
            Node::Char(_) => Type::CHAR,
            Node::Int(_) => Type::INT,
            Node::Float(_) => Type::FLOAT,
            Node::String(_) => Type::STRING,
            Node::Struct(lit) => Type::Structure(lit.ty.clone()),
            Node::Array(lit) => Type::array(lit.elem.clone()),
            _ => return None,
        };
        Some(ty)
    }
}

/// Fieldless discriminant of [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Bool,
    Char,
    Int,
    Float,
    String,
    Struct,
    Array,
    If,
    While,
    Return,
    VarSet,
    VarDef,
    VarSetTyped,
    FuncDef,
    FuncExtern,
    StructDef,
    Selector,
    Typecast,
    IndexConst,
    IndexSelector,
    FuncCall,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Global with an initial value, optionally with a declared type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalVar {
    pub name: String,
    pub declared: Option<Type>,
    pub value: MetaNode,
    pub span: Span,
}

/// Global declared with a type and no value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalDecl {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

/// A parsed compilation unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub vars: BTreeMap<String, GlobalVar>,
    pub typedefs: BTreeMap<String, GlobalDecl>,
    pub funcs: BTreeMap<String, (FuncDef, Span)>,
    /// Keyed by alias
    pub externs: BTreeMap<String, (FuncExtern, Span)>,
    pub structs: BTreeMap<String, (StructType, Span)>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a top-level definition under its name, replacing any earlier entry.
    ///
    /// Returns the node back if it is not a definition.
    pub fn insert(&mut self, meta: MetaNode) -> Result<(), MetaNode> {
        let MetaNode { node, span } = meta;
        match node {
            Node::VarSet { name, value } => {
                self.vars.insert(
                    name.clone(),
                    GlobalVar {
                        name,
                        declared: None,
                        value: *value,
                        span,
                    },
                );
            }
            Node::VarSetTyped { name, ty, value } => {
                self.vars.insert(
                    name.clone(),
                    GlobalVar {
                        name,
                        declared: Some(ty),
                        value: *value,
                        span,
                    },
                );
            }
            Node::VarDef { name, ty } => {
                self.typedefs
                    .insert(name.clone(), GlobalDecl { name, ty, span });
            }
            Node::FuncDef(def) => {
                self.funcs.insert(def.name.clone(), (def, span));
            }
            Node::FuncExtern(ext) => {
                self.externs.insert(ext.alias.clone(), (ext, span));
            }
            Node::StructDef(def) => {
                self.structs.insert(def.name.clone(), (def, span));
            }
            other => return Err(MetaNode::new(other, span)),
        }
        Ok(())
    }

    /// Total number of top-level definitions
    pub fn len(&self) -> usize {
        self.vars.len()
            + self.typedefs.len()
            + self.funcs.len()
            + self.externs.len()
            + self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convenience constructors, mostly for building trees by hand in tests
pub mod build {
    use super::*;

    pub fn meta(node: Node) -> MetaNode {
        MetaNode::new(node, Span::default())
    }

    pub fn string(s: &str) -> MetaNode {
        meta(Node::String(s.to_string()))
    }

    pub fn int(i: i32) -> MetaNode {
        meta(Node::Int(i))
    }

    pub fn var(name: &str) -> MetaNode {
        meta(Node::Selector(Selector::root(name)))
    }

    pub fn select(sel: Selector) -> MetaNode {
        meta(Node::Selector(sel))
    }

    pub fn call(name: &str, args: Vec<MetaNode>) -> MetaNode {
        meta(Node::FuncCall {
            name: name.to_string(),
            args,
        })
    }

    pub fn set(name: &str, value: MetaNode) -> MetaNode {
        meta(Node::VarSet {
            name: name.to_string(),
            value: Box::new(value),
        })
    }

    pub fn ret(value: MetaNode) -> MetaNode {
        meta(Node::Return(Box::new(value)))
    }

    pub fn func(name: &str, params: Vec<Param>, ret: Type, body: Block) -> MetaNode {
        meta(Node::FuncDef(FuncDef {
            name: name.to_string(),
            params,
            ret,
            body,
        }))
    }

    pub fn structure(name: &str, fields: Vec<(&str, Type)>) -> StructType {
        StructType::new(
            name,
            fields
                .into_iter()
                .map(|(n, ty)| Field::new(n, ty))
                .collect(),
        )
    }
}
