use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ParseError {
    /// Rejected by the SDL grammar, with the parser's position and expectation.
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("nesting exceeds the maximum depth of {0}")]
    DepthLimitExceeded(usize),
    #[error("integer out of range")]
    IntOutOfRange,
    #[error("variable `${0}` in a constant value")]
    Variable(String),
}

impl From<graphql_parser::schema::ParseError> for ParseError {
    fn from(error: graphql_parser::schema::ParseError) -> Self {
        Self::Syntax(error.to_string().trim().to_string())
    }
}
