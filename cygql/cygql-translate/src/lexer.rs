//! Tokens of Cypher statement text.
//!
//! Only as much of Cypher is recognized as is needed to find clause
//! boundaries: anything that could hide a keyword is either skipped
//! (comments) or a single token (strings, backtick-quoted names).

use std::ops::Range;

use logos::{FilterResult, Lexer, Logos};

use crate::error::SpannedMsgError;

#[derive(Logos, Clone, Copy, PartialEq, Eq, Debug)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n\r]*")]
pub enum Token {
    /// Never emitted: the callback skips to the closing `*/`.
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[_A-Za-z][_0-9A-Za-z]*")]
    Word,

    #[regex(r"`([^`]|``)*`")]
    Quoted,

    #[regex(r"\$[_0-9A-Za-z]+")]
    Parameter,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    String,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[token("(")]
    #[token("[")]
    #[token("{")]
    Open,

    #[token(")")]
    #[token("]")]
    #[token("}")]
    Close,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("*")]
    Star,

    #[token(":")]
    Colon,

    #[regex(r"[-+/%^=<>!|;~&?]")]
    Symbol,
}

/// A significant token and its byte span
#[derive(Clone, Debug)]
pub struct Lexeme {
    pub token: Token,
    pub span: Range<usize>,
}

pub fn lex(source: &str) -> Result<Vec<Lexeme>, SpannedMsgError> {
    let mut lexer = Token::lexer(source);
    let mut lexemes = vec![];

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => lexemes.push(Lexeme {
                token,
                span: lexer.span(),
            }),
            Err(_) => {
                let span = lexer.span();
                let msg = match lexer.slice() {
                    "/*" => "unterminated comment".to_string(),
                    slice => format!("illegal character `{slice}`"),
                };
                return Err(SpannedMsgError { msg, span });
            }
        }
    }

    Ok(lexemes)
}

fn block_comment(lexer: &mut Lexer<'_, Token>) -> FilterResult<(), ()> {
    match lexer.remainder().find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            FilterResult::Skip
        }
        None => FilterResult::Error(()),
    }
}
