//! Built-in operator table
//!
//! Each operator has a hand-written rule that inspects the argument types and
//! produces the result type. Several rules are polymorphic over strings and
//! arrays, which is why they cannot be plain signatures.

use thiserror::Error;

use crate::types::{Primitive, Type};

/// Why a built-in rejected its arguments
#[derive(Debug, Clone, Error)]
pub enum BuiltinError {
    #[error("expected {expected} argument(s), got {got}")]
    NeedMoreArgs { expected: usize, got: usize },

    #[error("expected {expected}, got {actual}")]
    Mismatch { expected: Type, actual: Type },
}

pub type Rule = fn(&[Type]) -> Result<Type, BuiltinError>;

/// Every built-in with its argument count and rule
const TABLE: &[(&str, usize, Rule)] = &[
    ("add", 2, math),
    ("sub", 2, math),
    ("mul", 2, math),
    ("div", 2, math),
    ("pow", 2, math),
    ("mod", 2, modulo),
    ("eq", 2, eq),
    ("gt", 2, compare),
    ("lt", 2, compare),
    ("not", 1, not),
    ("and", 2, logic),
    ("or", 2, logic),
    ("append", 2, append),
    ("concat", 2, concat),
    ("slice", 3, slice),
    ("at", 2, at),
    ("len", 1, len),
    ("str", 1, to_str),
    ("bool", 1, to_bool),
    ("parse_bool", 1, parse_bool),
    ("char", 1, parse_char),
    ("int", 1, parse_int),
    ("float", 1, parse_float),
    ("print", 1, print),
];

pub fn lookup(name: &str) -> Option<Rule> {
    TABLE
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, _, rule)| *rule)
}

/// How many arguments a call to the built-in consumes
pub fn arity(name: &str) -> Option<usize> {
    TABLE
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, arity, _)| *arity)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|(n, _, _)| *n)
}

fn need(args: &[Type], n: usize) -> Result<(), BuiltinError> {
    if args.len() < n {
        return Err(BuiltinError::NeedMoreArgs {
            expected: n,
            got: args.len(),
        });
    }
    Ok(())
}

fn expect(expected: &Type, actual: &Type) -> Result<(), BuiltinError> {
    if expected.equals(actual) {
        Ok(())
    } else {
        Err(BuiltinError::Mismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}

fn is_string(ty: &Type) -> bool {
    ty.primitive_tag() == Primitive::String
}

/// Element type of an array, or a mismatch against `Array of <hint>`
fn array_elem<'a>(ty: &'a Type, hint: &Type) -> Result<&'a Type, BuiltinError> {
    match ty {
        Type::Array(elem) => Ok(elem),
        _ => Err(BuiltinError::Mismatch {
            expected: Type::array(hint.clone()),
            actual: ty.clone(),
        }),
    }
}

/// Fixed-signature rule: check each parameter in order
fn simple(args: &[Type], params: &[Type], ret: Type) -> Result<Type, BuiltinError> {
    need(args, params.len())?;
    for (param, arg) in params.iter().zip(args) {
        expect(param, arg)?;
    }
    Ok(ret)
}

// No numeric restriction: any two equal types are accepted.
fn math(args: &[Type]) -> Result<Type, BuiltinError> {
    need(args, 2)?;
    expect(&args[0], &args[1])?;
    Ok(args[0].clone())
}

fn modulo(args: &[Type]) -> Result<Type, BuiltinError> {
    need(args, 2)?;
    expect(&Type::INT, &args[1])?;
    Ok(Type::INT)
}

fn eq(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::Any, Type::Any], Type::BOOL)
}

fn compare(args: &[Type]) -> Result<Type, BuiltinError> {
    need(args, 2)?;
    expect(&args[0], &args[1])?;
    Ok(Type::BOOL)
}

fn not(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::BOOL], Type::BOOL)
}

fn logic(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::BOOL, Type::BOOL], Type::BOOL)
}

fn append(args: &[Type]) -> Result<Type, BuiltinError> {
    need(args, 2)?;
    if is_string(&args[0]) && Type::CHAR.equals(&args[1]) {
        return Ok(Type::STRING);
    }
    let elem = array_elem(&args[0], &args[1])?;
    expect(elem, &args[1])?;
    Ok(args[0].clone())
}

fn concat(args: &[Type]) -> Result<Type, BuiltinError> {
    need(args, 2)?;
    if is_string(&args[0]) && is_string(&args[1]) {
        return Ok(Type::STRING);
    }
    let left = array_elem(&args[0], &Type::Any)?;
    let right = array_elem(&args[1], &Type::Any)?;
    expect(left, right)?;
    Ok(args[0].clone())
}

fn slice(args: &[Type]) -> Result<Type, BuiltinError> {
    need(args, 3)?;
    if !is_string(&args[0]) {
        array_elem(&args[0], &Type::Any)?;
    }
    expect(&Type::INT, &args[1])?;
    expect(&Type::INT, &args[2])?;
    Ok(args[0].clone())
}

fn at(args: &[Type]) -> Result<Type, BuiltinError> {
    need(args, 2)?;
    let item = if is_string(&args[0]) {
        Type::CHAR
    } else {
        array_elem(&args[0], &Type::Any)?.clone()
    };
    expect(&Type::INT, &args[1])?;
    Ok(item)
}

fn len(args: &[Type]) -> Result<Type, BuiltinError> {
    need(args, 1)?;
    if !is_string(&args[0]) {
        array_elem(&args[0], &Type::Any)?;
    }
    Ok(Type::INT)
}

fn to_str(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::Any], Type::STRING)
}

fn to_bool(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::Any], Type::BOOL)
}

fn parse_bool(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::STRING], Type::result(Type::BOOL))
}

fn parse_char(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::STRING], Type::result(Type::CHAR))
}

fn parse_int(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::STRING], Type::result(Type::INT))
}

fn parse_float(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::STRING], Type::result(Type::FLOAT))
}

fn print(args: &[Type]) -> Result<Type, BuiltinError> {
    simple(args, &[Type::STRING], Type::Nothing)
}

#[cfg(test)]
#[path = "builtins_tests.rs"]
mod tests;
