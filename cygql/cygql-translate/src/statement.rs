//! Cypher statements split into top-level clauses.

use std::ops::Range;

use crate::{
    error::SpannedMsgError,
    lexer::{Lexeme, Token, lex},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClauseKind {
    With,
    Unwind,
    Return,
    Other,
}

#[derive(Clone, Debug)]
pub struct Clause {
    pub kind: ClauseKind,
    /// Byte span from the clause keyword to the end of its last token
    pub span: Range<usize>,
    lexemes: Range<usize>,
}

/// The role a WITH clause plays for the variables of an enclosing block
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScopeClauses {
    pub import: Option<usize>,
    pub export: Option<usize>,
}

#[derive(Debug)]
pub struct Statement<'a> {
    source: &'a str,
    lexemes: Vec<Lexeme>,
    clauses: Vec<Clause>,
}

impl<'a> Statement<'a> {
    pub fn parse(source: &'a str) -> Result<Self, SpannedMsgError> {
        let lexemes = lex(source)?;
        let clauses = split_clauses(source, &lexemes);

        Ok(Self {
            source,
            lexemes,
            clauses,
        })
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Index of the final top-level RETURN clause
    pub fn final_return(&self) -> Option<usize> {
        self.clauses
            .iter()
            .rposition(|clause| clause.kind == ClauseKind::Return)
    }

    /// Find `UNWIND $parameter AS variable`, returning the clause index and the variable
    pub fn unwound_parameter(&self, parameter: &str) -> Option<(usize, &'a str)> {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| clause.kind == ClauseKind::Unwind)
            .find_map(|(index, clause)| match self.lexemes(clause) {
                [_, param, as_, variable]
                    if param.token == Token::Parameter
                        && &self.text(param)[1..] == parameter
                        && self.text(as_).eq_ignore_ascii_case("AS")
                        && variable.token == Token::Word =>
                {
                    Some((index, self.text(variable)))
                }
                _ => None,
            })
    }

    /// Which WITH clauses import and export the variables of an enclosing block.
    ///
    /// With two or more WITH clauses the first imports and the last exports.
    /// A lone WITH imports when it opens the statement, otherwise it exports.
    pub fn scope_clauses(&self) -> ScopeClauses {
        let withs: Vec<usize> = self
            .clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| clause.kind == ClauseKind::With)
            .map(|(index, _)| index)
            .collect();

        match withs.as_slice() {
            [] => ScopeClauses {
                import: None,
                export: None,
            },
            [0] => ScopeClauses {
                import: Some(0),
                export: None,
            },
            [single] => ScopeClauses {
                import: None,
                export: Some(*single),
            },
            [first, .., last] => ScopeClauses {
                import: Some(*first),
                export: Some(*last),
            },
        }
    }

    /// Byte offset where more projection items can be appended to a WITH clause.
    ///
    /// That is after the last projection item, before any WHERE, ORDER BY,
    /// SKIP or LIMIT sub-clause.
    pub fn projection_end(&self, index: usize) -> usize {
        let clause = &self.clauses[index];
        let lexemes = self.lexemes(clause);
        let mut depth = 0usize;
        let mut end = clause.span.end;

        for (position, lexeme) in lexemes.iter().enumerate().skip(1) {
            match lexeme.token {
                Token::Open => depth += 1,
                Token::Close => depth = depth.saturating_sub(1),
                Token::Word if depth == 0 => {
                    let word = self.text(lexeme);
                    if ["WHERE", "ORDER", "SKIP", "LIMIT"]
                        .iter()
                        .any(|keyword| word.eq_ignore_ascii_case(keyword))
                    {
                        end = lexemes[position - 1].span.end;
                        break;
                    }
                }
                _ => {}
            }
        }

        end
    }

    /// Whether the projection of a WITH clause already carries `variable`,
    /// either as a bare item, as an alias or through `*`
    pub fn projects(&self, index: usize, variable: &str) -> bool {
        let clause = &self.clauses[index];
        let projection_end = self.projection_end(index);
        let projection: Vec<&Lexeme> = self
            .lexemes(clause)
            .iter()
            .skip(1)
            .take_while(|lexeme| lexeme.span.end <= projection_end)
            .collect();

        projection.iter().enumerate().any(|(position, lexeme)| {
            let previous = position.checked_sub(1).map(|position| projection[position]);
            let next = projection.get(position + 1);

            match lexeme.token {
                Token::Star => true,
                Token::Word if self.text(lexeme) == variable => {
                    let aliased = previous
                        .is_some_and(|previous| self.text(previous).eq_ignore_ascii_case("AS"));
                    let item_start = match previous {
                        None => true,
                        Some(previous) => {
                            previous.token == Token::Comma
                                || self.text(previous).eq_ignore_ascii_case("DISTINCT")
                        }
                    };
                    let item_end = next.is_none_or(|next| next.token == Token::Comma);

                    aliased || (item_start && item_end)
                }
                _ => false,
            }
        })
    }

    fn lexemes(&self, clause: &Clause) -> &[Lexeme] {
        &self.lexemes[clause.lexemes.clone()]
    }

    fn text(&self, lexeme: &Lexeme) -> &'a str {
        let source: &'a str = self.source;
        &source[lexeme.span.clone()]
    }
}

fn split_clauses(source: &str, lexemes: &[Lexeme]) -> Vec<Clause> {
    let mut clauses: Vec<Clause> = vec![];
    let mut depth = 0usize;

    for (index, lexeme) in lexemes.iter().enumerate() {
        let starts = match lexeme.token {
            Token::Open => {
                depth += 1;
                None
            }
            Token::Close => {
                depth = depth.saturating_sub(1);
                None
            }
            Token::Word if depth == 0 => clause_start(source, lexemes, index),
            _ => None,
        };

        if let (None, Some(clause)) = (starts, clauses.last_mut()) {
            clause.span.end = lexeme.span.end;
            clause.lexemes.end = index + 1;
            continue;
        }

        clauses.push(Clause {
            kind: starts.unwrap_or(ClauseKind::Other),
            span: lexeme.span.clone(),
            lexemes: index..index + 1,
        });
    }

    clauses
}

/// The kind of clause opened by the word at `index`, if it opens one
fn clause_start(source: &str, lexemes: &[Lexeme], index: usize) -> Option<ClauseKind> {
    let word = |index: usize| -> Option<String> {
        let lexeme = lexemes.get(index)?;
        match lexeme.token {
            Token::Word => Some(source[lexeme.span.clone()].to_ascii_uppercase()),
            _ => None,
        }
    };

    if index > 0 && matches!(lexemes[index - 1].token, Token::Dot | Token::Colon) {
        return None;
    }

    let current = word(index)?;
    let previous = index.checked_sub(1).and_then(word);
    let before_previous = index.checked_sub(2).and_then(word);

    match (current.as_str(), previous.as_deref(), before_previous.as_deref()) {
        ("WITH", Some("STARTS" | "ENDS"), _) => None,
        ("MATCH", Some("OPTIONAL"), _) => None,
        ("MATCH" | "CREATE", Some("ON"), _) => None,
        ("DELETE", Some("DETACH"), _) => None,
        ("SET", Some("CREATE" | "MATCH"), Some("ON")) => None,
        ("WITH", ..) => Some(ClauseKind::With),
        ("UNWIND", ..) => Some(ClauseKind::Unwind),
        ("RETURN", ..) => Some(ClauseKind::Return),
        (
            "MATCH" | "OPTIONAL" | "MERGE" | "CREATE" | "CALL" | "SET" | "DELETE" | "DETACH"
            | "REMOVE" | "FOREACH" | "LOAD" | "UNION" | "USE" | "FINISH",
            ..,
        ) => Some(ClauseKind::Other),
        _ => None,
    }
}

/// Insert text at byte offsets of `source`.
///
/// Insertions at the same offset keep their relative order.
pub fn apply_insertions(source: &str, mut insertions: Vec<(usize, String)>) -> String {
    insertions.sort_by_key(|(offset, _)| *offset);

    let mut output = String::with_capacity(
        source.len() + insertions.iter().map(|(_, text)| text.len()).sum::<usize>(),
    );
    let mut cursor = 0;

    for (offset, text) in insertions {
        output.push_str(&source[cursor..offset]);
        output.push_str(&text);
        cursor = offset;
    }
    output.push_str(&source[cursor..]);

    output
}
