//! Recursive descent parser for Skol
//!
//! Calls carry no delimiters, so the parser must know every function's arity to
//! know where its arguments end. Top-level functions are found by a token
//! pre-scan so they can be called before their definition; nested functions
//! must be defined before use.
#![allow(clippy::result_large_err)]

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::diagnostics::error_codes::{syntax, types as type_codes};
use crate::diagnostics::{Diagnostic, DiagnosticBag, Span};
use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::parser::span::SourceFile;
use crate::typechecker::builtins;
use crate::typechecker::scope::LOCAL_PREFIX;
use crate::types::{Field, StructType, Type};

/// Names known at one lexical level while parsing
#[derive(Debug, Default)]
struct ParseScope {
    consts: HashMap<String, Node>,
    funcs: HashMap<String, usize>,
    structs: HashMap<String, StructType>,
}

/// Parser for Skol source code
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    source: SourceFile,
    errors: DiagnosticBag,
    scopes: Vec<ParseScope>,
    /// Parentheses opened and not yet closed
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser
    pub fn new(lexer: Lexer<'a>, source: SourceFile) -> Self {
        let root = ParseScope {
            funcs: prescan_functions(&source),
            ..ParseScope::default()
        };
        Self {
            lexer,
            source,
            errors: DiagnosticBag::new(),
            scopes: vec![root],
            depth: 0,
        }
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program, DiagnosticBag> {
        let mut program = Program::new();

        while !self.is_eof() {
            match self.parse_statement() {
                Ok(Some(meta)) => {
                    debug!(
                        kind = %meta.kind(),
                        line = meta.span.start_line,
                        file = %self.source.path().display(),
                        "parsed top-level item"
                    );
                    if let Err(meta) = program.insert(meta) {
                        self.errors.push(
                            Diagnostic::error(syntax::ILLEGAL_TOP_LEVEL)
                                .message(format!(
                                    "{} is not allowed at the top level",
                                    meta.kind()
                                ))
                                .span(meta.span.clone())
                                .node(meta.kind())
                                .build(),
                        );
                    }
                }
                Ok(None) => {}
                Err(diag) => {
                    self.errors.push(diag);
                    self.recover_to_next_item();
                }
            }
        }

        debug!(
            file = %self.source.path().display(),
            lines = self.source.line_count(),
            items = program.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        if self.errors.has_errors() {
            return Err(self.errors.clone());
        }
        Ok(program)
    }

    /// Parse one statement. Constant definitions produce no node.
    fn parse_statement(&mut self) -> Result<Option<MetaNode>, Diagnostic> {
        let token = self.advance()?;
        let span = token.span.clone();
        let node = match token.kind {
            TokenKind::Dollar => self.parse_function()?,
            TokenKind::Percent => self.parse_variable()?,
            TokenKind::At => Node::StructDef(self.parse_struct_def()?),
            TokenKind::Hash => {
                self.parse_constant()?;
                return Ok(None);
            }
            TokenKind::Question => self.parse_if()?,
            TokenKind::Star => {
                let cond = self.parse_value()?;
                let block = self.parse_scoped_block()?;
                Node::While {
                    cond: Box::new(cond),
                    block,
                }
            }
            TokenKind::Gt => Node::Return(Box::new(self.parse_value()?)),
            TokenKind::Call(name) => self.parse_call(name, &span)?,
            other => return Err(unexpected(&other, "a statement", span)),
        };
        Ok(Some(MetaNode::new(node, span)))
    }

    /// `%name: value`, `%name/type` or `%name/type: value`
    fn parse_variable(&mut self) -> Result<Node, Diagnostic> {
        let (name, name_span) = self.expect_name()?;

        let ty = if self.check(&TokenKind::Slash)? {
            self.advance()?;
            Some(self.parse_type()?)
        } else {
            None
        };
        let value = if self.check(&TokenKind::Colon)? {
            self.advance()?;
            Some(Box::new(self.parse_value()?))
        } else {
            None
        };

        match (ty, value) {
            (None, Some(value)) => Ok(Node::VarSet { name, value }),
            (Some(ty), None) => Ok(Node::VarDef { name, ty }),
            (Some(ty), Some(value)) => Ok(Node::VarSetTyped { name, ty, value }),
            (None, None) => Err(Diagnostic::error(syntax::NEED_TYPE_OR_VALUE)
                .message(format!("variable {} needs a type or a value", name))
                .span(name_span)
                .build()),
        }
    }

    /// `$Name[/ret] params... (body)`, `... ?["symbol"]` or `...: value`
    fn parse_function(&mut self) -> Result<Node, Diagnostic> {
        let (name, name_span) = self.expect_name()?;
        let ret = if self.check(&TokenKind::Slash)? {
            self.advance()?;
            self.parse_type()?
        } else {
            Type::Nothing
        };

        let mut params = Vec::new();
        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::Ident(param) => {
                    self.expect(&TokenKind::Slash, "`/` and a parameter type")?;
                    params.push(Param::new(param, self.parse_type()?));
                }
                TokenKind::LParen => {
                    self.declare_function(&name, params.len());
                    self.push_scope();
                    let body = self.parse_block_body()?;
                    self.pop_scope();
                    return Ok(Node::FuncDef(FuncDef {
                        name,
                        params,
                        ret,
                        body,
                    }));
                }
                TokenKind::Question => {
                    let has_symbol = matches!(self.peek()?.kind, TokenKind::StringLit(_));
                    let symbol = if has_symbol {
                        let token = self.advance()?;
                        match token.kind {
                            TokenKind::StringLit(raw) => unescape(strip_quotes(&raw), &token.span)?,
                            _ => name.clone(),
                        }
                    } else {
                        name.clone()
                    };
                    self.declare_function(&name, params.len());
                    return Ok(Node::FuncExtern(FuncExtern {
                        alias: name,
                        name: symbol,
                        params,
                        ret,
                    }));
                }
                TokenKind::Colon => {
                    self.declare_function(&name, params.len());
                    self.push_scope();
                    let value = self.parse_value()?;
                    self.pop_scope();
                    let body = if matches!(ret, Type::Nothing) {
                        vec![value]
                    } else {
                        let span = value.span.clone();
                        vec![MetaNode::new(Node::Return(Box::new(value)), span)]
                    };
                    return Ok(Node::FuncDef(FuncDef {
                        name,
                        params,
                        ret,
                        body,
                    }));
                }
                TokenKind::Eof => {
                    return Err(Diagnostic::error(syntax::NEED_BODY_OR_EXTERN)
                        .message(format!("function {} needs a body or an extern marker", name))
                        .span(name_span)
                        .build());
                }
                other => return Err(unexpected(&other, "a parameter or function body", token.span)),
            }
        }
    }

    /// `@Name(field/type ...)`
    fn parse_struct_def(&mut self) -> Result<StructType, Diagnostic> {
        let (name, _) = self.expect_name()?;
        self.expect(&TokenKind::LParen, "`(`")?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RParen)? {
            let (field, _) = self.expect_name()?;
            self.expect(&TokenKind::Slash, "`/` and a field type")?;
            fields.push(Field::new(field, self.parse_type()?));
        }
        self.advance()?;

        let def = StructType::new(name, fields);
        self.current_scope()
            .structs
            .insert(def.name.clone(), def.clone());
        Ok(def)
    }

    /// `#name: literal`
    fn parse_constant(&mut self) -> Result<(), Diagnostic> {
        let (name, name_span) = self.expect_name()?;
        self.expect(&TokenKind::Colon, "`:`")?;
        let value = self.parse_value()?;
        if value.node.literal_type().is_none() {
            return Err(Diagnostic::error(syntax::UNEXPECTED_TOKEN)
                .message(format!("constant {} must be a literal", name))
                .span(value.span)
                .node(value.node.kind())
                .build());
        }
        if self.current_scope().consts.contains_key(&name) {
            return Err(Diagnostic::error(syntax::CONSTANT_REDEFINED)
                .message(format!("constant {} is already defined", name))
                .span(name_span)
                .build());
        }
        self.current_scope().consts.insert(name, value.node);
        Ok(())
    }

    /// `?cond(...)` followed by any number of `:?cond(...)` and an optional `:(...)`
    fn parse_if(&mut self) -> Result<Node, Diagnostic> {
        let main = self.parse_branch()?;
        let mut other = Vec::new();
        let mut else_block = None;
        while self.check(&TokenKind::Colon)? {
            self.advance()?;
            if self.check(&TokenKind::Question)? {
                self.advance()?;
                other.push(self.parse_branch()?);
            } else {
                else_block = Some(self.parse_scoped_block()?);
                break;
            }
        }
        Ok(Node::If(IfNode {
            main,
            other,
            else_block,
        }))
    }

    fn parse_branch(&mut self) -> Result<Branch, Diagnostic> {
        let cond = Box::new(self.parse_value()?);
        let block = self.parse_scoped_block()?;
        Ok(Branch { cond, block })
    }

    fn parse_scoped_block(&mut self) -> Result<Block, Diagnostic> {
        self.expect(&TokenKind::LParen, "`(`")?;
        self.push_scope();
        let block = self.parse_block_body()?;
        self.pop_scope();
        Ok(block)
    }

    /// Statements up to and including the closing `)`
    fn parse_block_body(&mut self) -> Result<Block, Diagnostic> {
        let mut block = Vec::new();
        loop {
            let kind = self.peek()?.kind.clone();
            match kind {
                TokenKind::RParen => {
                    self.advance()?;
                    return Ok(block);
                }
                TokenKind::Eof => {
                    let span = self.peek()?.span.clone();
                    return Err(Diagnostic::error(syntax::MISSING_DELIMITER)
                        .message("Expected `)` to close the block")
                        .span(span)
                        .build());
                }
                _ => {
                    if let Some(stmt) = self.parse_statement()? {
                        block.push(stmt);
                    }
                }
            }
        }
    }

    fn parse_call(&mut self, name: String, span: &Span) -> Result<Node, Diagnostic> {
        let arity = self
            .lookup(&name, |s| s.funcs.get(&name).copied())
            .or_else(|| builtins::arity(&name))
            .ok_or_else(|| {
                Diagnostic::error(syntax::UNKNOWN_NAME)
                    .message(format!("unknown function {}", name))
                    .span(span.clone())
                    .node(NodeKind::FuncCall)
                    .build()
            })?;
        let args = (0..arity)
            .map(|_| self.parse_value())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Node::FuncCall { name, args })
    }

    /// Parse a value: literal, call, struct or array literal, constant or selector
    fn parse_value(&mut self) -> Result<MetaNode, Diagnostic> {
        let token = self.advance()?;
        let span = token.span.clone();
        let node = match token.kind {
            TokenKind::IntLit(raw) => Node::Int(parse_int(&raw, &span)?),
            TokenKind::FloatLit(raw) => Node::Float(parse_float(&raw, &span)?),
            TokenKind::StringLit(raw) => Node::String(unescape(strip_quotes(&raw), &span)?),
            TokenKind::CharLit(raw) => Node::Char(parse_char(&raw, &span)?),
            TokenKind::Star => Node::Bool(true),
            TokenKind::Slash => Node::Bool(false),
            TokenKind::Call(name) => self.parse_call(name, &span)?,
            TokenKind::At => self.parse_struct_literal()?,
            TokenKind::LBracket => self.parse_array_literal(&span)?,
            TokenKind::Ident(name) => match self.lookup(&name, |s| s.consts.get(&name).cloned()) {
                Some(node) => node,
                None => Node::Selector(self.parse_selector(name)?),
            },
            other => return Err(unexpected(&other, "a value", span)),
        };
        Ok(MetaNode::new(node, span))
    }

    /// `@Type v...` or `@Type(v...)`
    fn parse_struct_literal(&mut self) -> Result<Node, Diagnostic> {
        let (name, span) = self.expect_name()?;
        let ty = self.lookup_struct(&name, &span)?;
        let args = if self.check(&TokenKind::LParen)? {
            self.advance()?;
            let mut args = Vec::new();
            while !self.check(&TokenKind::RParen)? {
                if self.check(&TokenKind::Eof)? {
                    return Err(self.error_unexpected("`)`")?);
                }
                args.push(self.parse_value()?);
            }
            self.advance()?;
            args
        } else {
            (0..ty.fields.len())
                .map(|_| self.parse_value())
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(Node::Struct(StructLit { ty, args }))
    }

    /// `[type](v...)` or `[](v...)`
    fn parse_array_literal(&mut self, span: &Span) -> Result<Node, Diagnostic> {
        let declared = if self.check(&TokenKind::RBracket)? {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.expect(&TokenKind::RBracket, "`]`")?;
        self.expect(&TokenKind::LParen, "`(`")?;
        let mut elems = Vec::new();
        while !self.check(&TokenKind::RParen)? {
            if self.check(&TokenKind::Eof)? {
                return Err(self.error_unexpected("`)`")?);
            }
            elems.push(self.parse_value()?);
        }
        self.advance()?;

        let elem = match declared {
            Some(ty) => ty,
            None => elems
                .first()
                .and_then(|e| e.node.literal_type())
                .ok_or_else(|| {
                    Diagnostic::error(syntax::CANNOT_INFER_ELEMENT)
                        .message("cannot infer the element type, write it as [type](...)")
                        .span(span.clone())
                        .node(NodeKind::Array)
                        .build()
                })?,
        };
        Ok(Node::Array(ArrayLit { elem, elems }))
    }

    /// `name#field#0#@type#(other)`
    fn parse_selector(&mut self, root: String) -> Result<Selector, Diagnostic> {
        let mut sel = Selector::root(root);
        while self.check(&TokenKind::Hash)? && !self.constant_follows() {
            self.advance()?;
            let token = self.advance()?;
            let elem = match token.kind {
                TokenKind::Ident(field) => SelectorElem::Name(field),
                TokenKind::IntLit(raw) => SelectorElem::IndexConst(parse_int(&raw, &token.span)?),
                TokenKind::At => SelectorElem::Cast(self.parse_type()?),
                TokenKind::LParen => {
                    let (name, _) = self.expect_name()?;
                    let index = self.parse_selector(name)?;
                    self.expect(&TokenKind::RParen, "`)`")?;
                    SelectorElem::IndexSelector(Box::new(index))
                }
                other => return Err(unexpected(&other, "a selector element", token.span)),
            };
            sel = sel.then(elem);
        }
        Ok(sel)
    }

    /// A `#name:` ahead starts a constant definition, not a selector element.
    fn constant_follows(&self) -> bool {
        let mut probe = self.lexer.clone();
        matches!(probe.next_token(), Ok(Token { kind: TokenKind::Hash, .. }))
            && matches!(probe.next_token(), Ok(Token { kind: TokenKind::Ident(_), .. }))
            && matches!(probe.next_token(), Ok(Token { kind: TokenKind::Colon, .. }))
    }

    /// A built-in type name, a struct name or `[type]`
    fn parse_type(&mut self) -> Result<Type, Diagnostic> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::LBracket => {
                let elem = self.parse_type()?;
                self.expect(&TokenKind::RBracket, "`]`")?;
                Ok(Type::array(elem))
            }
            TokenKind::Ident(name) => match Type::builtin(&name) {
                Some(ty) => Ok(ty),
                None => self
                    .lookup_struct(&name, &token.span)
                    .map(Type::Structure),
            },
            other => Err(Diagnostic::error(syntax::EXPECTED_TYPE)
                .message(format!("Expected a type, found {}", other.describe()))
                .span(token.span)
                .build()),
        }
    }

    fn lookup_struct(&self, name: &str, span: &Span) -> Result<StructType, Diagnostic> {
        self.lookup(name, |s| s.structs.get(name).cloned())
            .ok_or_else(|| {
                Diagnostic::error(type_codes::UNKNOWN_TYPE)
                    .message(format!("unknown type {}", name))
                    .span(span.clone())
                    .build()
            })
    }

    // Scope helpers

    fn lookup<T>(&self, name: &str, get: impl Fn(&ParseScope) -> Option<T>) -> Option<T> {
        for scope in self.scopes.iter().rev() {
            if let Some(found) = get(scope) {
                return Some(found);
            }
            if name.starts_with(LOCAL_PREFIX) {
                return None;
            }
        }
        None
    }

    fn current_scope(&mut self) -> &mut ParseScope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    fn declare_function(&mut self, name: &str, arity: usize) {
        self.current_scope().funcs.insert(name.to_string(), arity);
    }

    fn push_scope(&mut self) {
        self.scopes.push(ParseScope::default());
        trace!(depth = self.scopes.len(), "push parse scope");
    }

    fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        trace!(depth = self.scopes.len(), "pop parse scope");
    }

    // Token helpers

    fn advance(&mut self) -> Result<Token, Diagnostic> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::LParen => self.depth += 1,
            TokenKind::RParen => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        Ok(token)
    }

    fn peek(&mut self) -> Result<&Token, Diagnostic> {
        self.lexer.peek()
    }

    fn is_eof(&mut self) -> bool {
        match self.lexer.peek() {
            Ok(token) => token.kind == TokenKind::Eof,
            Err(diag) => {
                self.errors.push(diag);
                false
            }
        }
    }

    fn check(&mut self, kind: &TokenKind) -> Result<bool, Diagnostic> {
        Ok(std::mem::discriminant(&self.peek()?.kind) == std::mem::discriminant(kind))
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, Diagnostic> {
        let token = self.advance()?;
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(kind) {
            return Ok(token);
        }
        let code = match kind {
            TokenKind::RParen | TokenKind::RBracket => syntax::MISSING_DELIMITER,
            _ => syntax::UNEXPECTED_TOKEN,
        };
        Err(unexpected_with(code, &token.kind, what, token.span))
    }

    fn expect_name(&mut self) -> Result<(String, Span), Diagnostic> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Ident(name) => Ok((name, token.span)),
            other => Err(unexpected_with(syntax::EXPECTED_NAME, &other, "a name", token.span)),
        }
    }

    fn error_unexpected(&mut self, expected: &str) -> Result<Diagnostic, Diagnostic> {
        let token = self.peek()?;
        Ok(unexpected(&token.kind, expected, token.span.clone()))
    }

    /// Skip to the next `$`, `%` or `@` outside any parentheses.
    fn recover_to_next_item(&mut self) {
        self.scopes.truncate(1);
        loop {
            let kind = match self.lexer.peek() {
                Ok(token) => token.kind.clone(),
                // the offending character has been consumed
                Err(_) => continue,
            };
            match kind {
                TokenKind::Eof => break,
                TokenKind::Dollar | TokenKind::Percent | TokenKind::At if self.depth == 0 => {
                    break
                }
                _ => {
                    let _ = self.advance();
                }
            }
        }
        self.depth = 0;
    }
}

fn unexpected(found: &TokenKind, expected: &str, span: Span) -> Diagnostic {
    let code = if *found == TokenKind::Eof {
        syntax::UNEXPECTED_EOF
    } else {
        syntax::UNEXPECTED_TOKEN
    };
    unexpected_with(code, found, expected, span)
}

fn unexpected_with(code: &str, found: &TokenKind, expected: &str, span: Span) -> Diagnostic {
    let code = if *found == TokenKind::Eof {
        syntax::UNEXPECTED_EOF
    } else {
        code
    };
    Diagnostic::error(code)
        .message(format!("Expected {}, found {}", expected, found.describe()))
        .span(span)
        .build()
}

/// Top-level function names and their parameter counts.
fn prescan_functions(source: &SourceFile) -> HashMap<String, usize> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => break,
            Ok(token) => tokens.push(token.kind),
            Err(_) => continue,
        }
    }

    let mut arities = HashMap::new();
    let mut depth = 0usize;
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Dollar if depth == 0 => {
                if let Some(TokenKind::Ident(name)) = tokens.get(i + 1) {
                    let mut j = i + 2;
                    if tokens.get(j) == Some(&TokenKind::Slash) {
                        j = skip_type(&tokens, j + 1);
                    }
                    let mut count = 0;
                    while let (Some(TokenKind::Ident(_)), Some(TokenKind::Slash)) =
                        (tokens.get(j), tokens.get(j + 1))
                    {
                        j = skip_type(&tokens, j + 2);
                        count += 1;
                    }
                    arities.insert(name.clone(), count);
                    i = j;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    arities
}

/// Index just past the type starting at `j`
fn skip_type(tokens: &[TokenKind], mut j: usize) -> usize {
    let mut brackets = 0usize;
    loop {
        match tokens.get(j) {
            Some(TokenKind::LBracket) => brackets += 1,
            Some(TokenKind::RBracket) if brackets > 0 => {
                brackets -= 1;
                if brackets == 0 {
                    return j + 1;
                }
            }
            Some(TokenKind::Ident(_)) if brackets == 0 => return j + 1,
            Some(TokenKind::Ident(_)) => {}
            _ => return j,
        }
        j += 1;
    }
}

fn strip_quotes(raw: &str) -> &str {
    &raw[1..raw.len() - 1]
}

fn invalid_number(raw: &str, span: &Span) -> Diagnostic {
    Diagnostic::error(syntax::INVALID_NUMBER)
        .message(format!("invalid number literal {}", raw))
        .span(span.clone())
        .build()
}

fn parse_int(raw: &str, span: &Span) -> Result<i32, Diagnostic> {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let body = body.replace('_', "");
    let (radix, digits) = if let Some(d) = body.strip_prefix("0x") {
        (16, d)
    } else if let Some(d) = body.strip_prefix("0b") {
        (2, d)
    } else if let Some(d) = body.strip_prefix("0o") {
        (8, d)
    } else {
        (10, body.as_str())
    };
    let value = i64::from_str_radix(digits, radix).map_err(|_| invalid_number(raw, span))?;
    let value = if negative { -value } else { value };
    i32::try_from(value).map_err(|_| invalid_number(raw, span))
}

fn parse_float(raw: &str, span: &Span) -> Result<f32, Diagnostic> {
    raw.replace('_', "")
        .parse::<f32>()
        .map_err(|_| invalid_number(raw, span))
}

fn parse_char(raw: &str, span: &Span) -> Result<char, Diagnostic> {
    let text = unescape(strip_quotes(raw), span)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Diagnostic::error(syntax::INVALID_ESCAPE)
            .message(format!("invalid char literal {}", raw))
            .span(span.clone())
            .build()),
    }
}

fn unescape(raw: &str, span: &Span) -> Result<String, Diagnostic> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            other => {
                return Err(Diagnostic::error(syntax::INVALID_ESCAPE)
                    .message(format!(
                        "invalid escape sequence \\{}",
                        other.map(String::from).unwrap_or_default()
                    ))
                    .span(span.clone())
                    .build())
            }
        };
        out.push(escaped);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
