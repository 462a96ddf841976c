//! Skol type algebra
//!
//! A closed set of type shapes plus the compatibility rule the checker relies on.
//! Equality here is not an equivalence relation: structures compare by directional
//! containment and `Nothing`/`Undefined` never compare equal. So [`Type`]
//! does not implement `PartialEq`; compare through [`Type::equals`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimKind {
    Bool,
    Char,
    Int,
    Float,
    String,
}

impl fmt::Display for PrimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimKind::Bool => "Bool",
            PrimKind::Char => "Char",
            PrimKind::Int => "Int",
            PrimKind::Float => "Float",
            PrimKind::String => "String",
        };
        f.write_str(name)
    }
}

/// Discriminant of a [`Type`], used for dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    Int,
    Float,
    String,
    Struct,
    Array,
    Any,
    Nothing,
    Undefined,
}

/// A named structure field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Structure type: a name (for display only) and ordered fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Look up a field's type by name
    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.ty)
    }

    /// Every field of `self` exists in `other` with an equal type.
    /// `other` may carry extra fields.
    fn contained_in(&self, other: &StructType) -> bool {
        self.fields.iter().all(|f| {
            other
                .field(&f.name)
                .is_some_and(|actual| f.ty.equals(actual))
        })
    }
}

/// A Skol type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Type {
    /// Bool, Char, Int, Float or String
    Primitive(PrimKind),
    /// Named structure compared by shape
    Structure(StructType),
    /// Homogeneous array
    Array(Box<Type>),
    /// Wildcard, only valid in built-in and extern signatures
    Any,
    /// No value (functions without a return value)
    Nothing,
    /// Placeholder for a type not yet known
    Undefined,
}

impl Type {
    pub const BOOL: Type = Type::Primitive(PrimKind::Bool);
    pub const CHAR: Type = Type::Primitive(PrimKind::Char);
    pub const INT: Type = Type::Primitive(PrimKind::Int);
    pub const FLOAT: Type = Type::Primitive(PrimKind::Float);
    pub const STRING: Type = Type::Primitive(PrimKind::String);

    /// Array of `elem`
    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    /// Fallible wrapper: `{ value: payload, ok: Bool, err: String }`
    pub fn result(payload: Type) -> Self {
        let name = format!("{}Result", payload.short_name());
        Type::Structure(StructType::new(
            name,
            vec![
                Field::new("value", payload),
                Field::new("ok", Type::BOOL),
                Field::new("err", Type::STRING),
            ],
        ))
    }

    /// Resolve one of the built-in type names (case-insensitive).
    pub fn builtin(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "bool" | "b" | "boolean" => Type::BOOL,
            "char" | "ch" | "c" => Type::CHAR,
            "int" | "i" | "i32" | "int32" | "integer" => Type::INT,
            "float" | "f" | "f32" | "float32" => Type::FLOAT,
            "string" | "str" | "s" => Type::STRING,
            "any" | "a" => Type::Any,
            _ => return None,
        };
        Some(ty)
    }

    /// Check whether a value of type `actual` is acceptable where `self` is expected.
    ///
    /// The order matters: for structures, every field of `self` must be present in
    /// `actual` with an equal type, but `actual` may have more fields.
    pub fn equals(&self, actual: &Type) -> bool {
        match (self, actual) {
            (Type::Nothing | Type::Undefined, _) => false,
            (_, Type::Nothing | Type::Undefined) => matches!(self, Type::Any),
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Structure(a), Type::Structure(b)) => a.contained_in(b),
            (Type::Array(a), Type::Array(b)) => a.equals(b),
            _ => false,
        }
    }

    pub fn primitive_tag(&self) -> Primitive {
        match self {
            Type::Primitive(PrimKind::Bool) => Primitive::Bool,
            Type::Primitive(PrimKind::Char) => Primitive::Char,
            Type::Primitive(PrimKind::Int) => Primitive::Int,
            Type::Primitive(PrimKind::Float) => Primitive::Float,
            Type::Primitive(PrimKind::String) => Primitive::String,
            Type::Structure(_) => Primitive::Struct,
            Type::Array(_) => Primitive::Array,
            Type::Any => Primitive::Any,
            Type::Nothing => Primitive::Nothing,
            Type::Undefined => Primitive::Undefined,
        }
    }

    /// Human description, listing structure fields recursively
    pub fn describe(&self) -> String {
        match self {
            Type::Structure(s) => {
                let fields: Vec<String> = s
                    .fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name, f.ty.describe()))
                    .collect();
                if fields.is_empty() {
                    format!("Structure {} {{}}", s.name)
                } else {
                    format!("Structure {} {{ {} }}", s.name, fields.join(", "))
                }
            }
            Type::Array(elem) => format!("Array of {}", elem.describe()),
            _ => self.to_string(),
        }
    }

    /// Name used when deriving `Result` structure names
    fn short_name(&self) -> String {
        match self {
            Type::Primitive(p) => p.to_string(),
            Type::Structure(s) => s.name.clone(),
            Type::Array(elem) => format!("{}Array", elem.short_name()),
            Type::Any => "Any".to_string(),
            Type::Nothing => "Nothing".to_string(),
            Type::Undefined => "Undefined".to_string(),
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Type::Structure(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Structure(s) => write!(f, "Structure {}", s.name),
            Type::Array(elem) => write!(f, "Array of {}", elem),
            Type::Any => f.write_str("Any"),
            Type::Nothing => f.write_str("Nothing"),
            Type::Undefined => f.write_str("Undefined"),
        }
    }
}

#[cfg(test)]
mod tests;
