use std::{fmt::Display, ops::Range};

use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SpannedMsgError {
    pub msg: String,
    pub span: Range<usize>,
}

impl Display for SpannedMsgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.msg, self.span.start, self.span.end)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum TranslateError {
    #[error("lex error in statement of `{field}`: {error}")]
    Lex {
        field: String,
        error: SpannedMsgError,
    },
    #[error("mutation `{0}` has no @cypher statement")]
    NotACypherMutation(String),
    #[error("unknown input type `{0}`")]
    UnknownInputType(String),
    #[error("statement of `{0}` must not RETURN")]
    ReturnInNestedStatement(String),
    #[error("input nesting exceeds the maximum depth of {0}")]
    DepthLimitExceeded(usize),
}
