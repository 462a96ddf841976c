//! Lexer for the Skol programming language

use crate::diagnostics::error_codes::syntax;
use crate::diagnostics::{Diagnostic, Span};
use crate::parser::span::SourceFile;
use logos::Logos;
use tracing::trace;

/// Token types for Skol
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    // Names. A trailing `!` marks a call.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*!", |lex| {
        let s = lex.slice();
        s[..s.len() - 1].to_string()
    })]
    Call(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Literals are kept raw; the parser validates them.
    #[regex(r"-?(0x[0-9A-Fa-f_]+|0b[01_]+|0o[0-7_]+|[0-9][0-9_]*)", |lex| lex.slice().to_string())]
    IntLit(String),

    #[regex(r"-?[0-9][0-9_]*\.[0-9][0-9_]*", |lex| lex.slice().to_string())]
    FloatLit(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLit(String),

    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"'([^'\\]|\\.)'", |lex| lex.slice().to_string())]
    CharLit(String),

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("$")]
    Dollar,
    #[token("%")]
    Percent,
    #[token(":")]
    Colon,
    #[token("/")]
    Slash,
    #[token(">")]
    Gt,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("#")]
    Hash,
    #[token("@")]
    At,

    // End of file
    Eof,
}

impl TokenKind {
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Call(name) => format!("call `{}!`", name),
            TokenKind::Ident(name) => format!("name `{}`", name),
            TokenKind::IntLit(s) | TokenKind::FloatLit(s) => format!("number `{}`", s),
            TokenKind::StringLit(_) | TokenKind::UnterminatedString => "string".to_string(),
            TokenKind::CharLit(_) => "char".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Dollar => "`$`".to_string(),
            TokenKind::Percent => "`%`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Slash => "`/`".to_string(),
            TokenKind::Gt => "`>`".to_string(),
            TokenKind::Question => "`?`".to_string(),
            TokenKind::Star => "`*`".to_string(),
            TokenKind::Hash => "`#`".to_string(),
            TokenKind::At => "`@`".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// A token with its span
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Lexer for Skol source code
#[derive(Clone)]
pub struct Lexer<'a> {
    source: &'a SourceFile,
    logos_lexer: logos::Lexer<'a, TokenKind>,
    peeked: Option<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source file
    pub fn new(source: &'a SourceFile) -> Self {
        Self {
            source,
            logos_lexer: TokenKind::lexer(source.content()),
            peeked: None,
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        if self.at_eof {
            return Ok(Token::new(TokenKind::Eof, self.source.eof_span()));
        }

        let Some(result) = self.logos_lexer.next() else {
            self.at_eof = true;
            return Ok(Token::new(TokenKind::Eof, self.source.eof_span()));
        };

        let range = self.logos_lexer.span();
        let span = self.source.span(range.start, range.end);
        match result {
            Ok(TokenKind::UnterminatedString) => Err(Diagnostic::error(syntax::UNTERMINATED_STRING)
                .message("Unterminated string literal")
                .span(span)
                .build()),
            Ok(kind) => {
                trace!(token = ?kind, line = span.start_line, "lexed");
                Ok(Token::new(kind, span))
            }
            Err(()) => Err(Diagnostic::error(syntax::UNEXPECTED_TOKEN)
                .message(format!(
                    "Unexpected character: {:?}",
                    self.logos_lexer.slice()
                ))
                .span(span)
                .build()),
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> Result<&Token, Diagnostic> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Check if we're at the end of the file
    pub fn is_eof(&mut self) -> bool {
        self.peek().map(|t| t.kind == TokenKind::Eof).unwrap_or(true)
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
