use cygql_ast::{FieldDefinition, TypeDefinition, TypeKind};
use cygql_augment::{AugmentedSchema, directives::cypher_statement};
use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::{debug, debug_span, trace};
use unindent::unindent;

use crate::{
    error::TranslateError,
    statement::{ClauseKind, Statement, apply_insertions},
};

const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// A statement ready to run, with its parameters
#[derive(Clone, PartialEq, Debug)]
pub struct CypherQuery {
    pub statement: String,
    pub params: Map<String, Value>,
}

/// Expands a `@cypher` mutation with `CALL { ... }` blocks for the
/// `@cypher` input fields present in its arguments.
pub struct NestedMutationTranslator<'s> {
    schema: &'s AugmentedSchema,
    max_depth: usize,
}

/// Where the translation is inside the argument tree
struct Scope<'v> {
    /// Expression addressing the current input object
    access: String,
    /// Clauses that bind `access` inside a fresh block
    unwinds: Vec<String>,
    /// Field names from the root argument down
    path: Vec<String>,
    items: Vec<&'v Map<String, Value>>,
    depth: usize,
}

impl<'s> NestedMutationTranslator<'s> {
    pub fn new(schema: &'s AugmentedSchema) -> Self {
        Self {
            schema,
            max_depth: schema.config().max_depth,
        }
    }

    pub fn translate(
        &self,
        field: &FieldDefinition,
        args: &Map<String, Value>,
    ) -> Result<CypherQuery, TranslateError> {
        let _entered = debug_span!("translate", field = %field.name).entered();

        let source = cypher_statement(field)
            .ok_or_else(|| TranslateError::NotACypherMutation(field.name.clone()))?;
        let source = unindent(source);
        let root = Statement::parse(source.trim()).map_err(|error| TranslateError::Lex {
            field: field.name.clone(),
            error,
        })?;

        let mut blocks: Vec<String> = vec![];
        let mut insertions: Vec<(usize, String)> = vec![];
        let insertion_clause = root.final_return().unwrap_or(root.clauses().len());

        for argument in &field.arguments {
            let Some(value) = args.get(&argument.name) else {
                continue;
            };
            let Some(input_type) = self.input_type(argument.ty.base_name())? else {
                continue;
            };
            let items = objects(value);
            if items.is_empty() {
                continue;
            }

            let unwound = if argument.ty.is_list() {
                root.unwound_parameter(&argument.name)
            } else {
                None
            };

            let scope = match (argument.ty.is_list(), unwound) {
                (true, Some((_, variable))) => Scope {
                    access: variable.to_string(),
                    unwinds: vec![],
                    path: vec![argument.name.clone()],
                    items,
                    depth: 0,
                },
                (true, None) => {
                    let variable = format!("_{}", input_type.name);
                    Scope {
                        unwinds: vec![format!("UNWIND ${} AS {variable}", argument.name)],
                        access: variable,
                        path: vec![argument.name.clone()],
                        items,
                        depth: 0,
                    }
                }
                (false, _) => Scope {
                    access: format!("${}", argument.name),
                    unwinds: vec![],
                    path: vec![argument.name.clone()],
                    items,
                    depth: 0,
                },
            };

            let emitted = blocks.len();
            self.visit(input_type, &scope, &mut blocks)?;

            // The unwound variable must survive the root's own WITH clauses
            if let Some((unwind_clause, variable)) = unwound {
                if blocks.len() > emitted {
                    for index in unwind_clause + 1..insertion_clause {
                        if root.clauses()[index].kind == ClauseKind::With
                            && !root.projects(index, variable)
                        {
                            trace!("carry `{variable}` through clause {index}");
                            insertions.push((root.projection_end(index), format!(", {variable}")));
                        }
                    }
                }
            }
        }

        let source = root.source();
        if blocks.is_empty() {
            debug!("no nested statements");
            return Ok(CypherQuery {
                statement: source.to_string(),
                params: args.clone(),
            });
        }

        let blocks = blocks.join("\n");
        match root.clauses().get(insertion_clause) {
            Some(clause) => {
                let offset = clause.span.start;
                let separator = if source[..offset].ends_with('\n') {
                    ""
                } else {
                    "\n"
                };
                insertions.push((offset, format!("{separator}{blocks}\n")));
            }
            None => insertions.push((source.len(), format!("\n{blocks}"))),
        }

        Ok(CypherQuery {
            statement: apply_insertions(source, insertions),
            params: args.clone(),
        })
    }

    fn visit(
        &self,
        input_type: &TypeDefinition,
        scope: &Scope,
        blocks: &mut Vec<String>,
    ) -> Result<(), TranslateError> {
        if scope.depth > self.max_depth {
            return Err(TranslateError::DepthLimitExceeded(self.max_depth));
        }

        for field in input_type.input_fields() {
            let items = children(&scope.items, &field.name);
            if items.is_empty() {
                continue;
            }
            let Some(field_type) = self.input_type(field.ty.base_name())? else {
                continue;
            };

            let mut path = scope.path.clone();
            path.push(field.name.clone());
            let access = format!("{}.{}", scope.access, field.name);

            if let Some(statement) = cypher_statement(field) {
                let binding = if field.ty.is_list() {
                    format!("UNWIND {access} AS {}", field_type.name)
                } else {
                    format!("WITH *, {access} AS {}", field_type.name)
                };
                let mut unwinds = scope.unwinds.clone();
                unwinds.push(binding);

                let block = self.block(
                    statement,
                    field_type,
                    Scope {
                        access: format!("_{}", field_type.name),
                        unwinds,
                        path,
                        items,
                        depth: scope.depth + 1,
                    },
                )?;
                blocks.push(block);
            } else if field.ty.is_list() {
                let variable = format!("_{}", field_type.name);
                let mut unwinds = scope.unwinds.clone();
                unwinds.push(format!("UNWIND {access} AS {variable}"));

                self.visit(
                    field_type,
                    &Scope {
                        access: variable,
                        unwinds,
                        path,
                        items,
                        depth: scope.depth + 1,
                    },
                    blocks,
                )?;
            } else {
                self.visit(
                    field_type,
                    &Scope {
                        access,
                        unwinds: scope.unwinds.clone(),
                        path,
                        items,
                        depth: scope.depth + 1,
                    },
                    blocks,
                )?;
            }
        }

        Ok(())
    }

    /// One `CALL { ... }` block for a `@cypher` input field.
    ///
    /// `scope.unwinds` binds the item, `scope.access` is the name it is
    /// exported under for nested blocks.
    fn block(
        &self,
        statement: &str,
        item_type: &TypeDefinition,
        scope: Scope,
    ) -> Result<String, TranslateError> {
        let dotted = scope.path.iter().join(".");
        let _entered = debug_span!("block", path = %dotted).entered();

        let source = unindent(statement);
        let nested = Statement::parse(source.trim()).map_err(|error| TranslateError::Lex {
            field: dotted.clone(),
            error,
        })?;
        if nested.final_return().is_some() {
            return Err(TranslateError::ReturnInNestedStatement(dotted));
        }

        let mut inner_blocks = vec![];
        self.visit(
            item_type,
            &Scope {
                access: scope.access.clone(),
                unwinds: vec![],
                path: scope.path.clone(),
                items: scope.items,
                depth: scope.depth,
            },
            &mut inner_blocks,
        )?;

        let variable = item_type.name.as_str();
        let export = &scope.access;
        let scope_clauses = nested.scope_clauses();
        let mut insertions = vec![];

        if let Some(import) = scope_clauses.import {
            if !nested.projects(import, variable) {
                insertions.push((nested.projection_end(import), format!(", {variable}")));
            }
        }
        if !inner_blocks.is_empty() {
            match scope_clauses.export {
                Some(index) => insertions.push((
                    nested.projection_end(index),
                    format!(", {variable} AS {export}"),
                )),
                None => {
                    trace!("no export clause, append one");
                    insertions.push((
                        nested.source().len(),
                        format!("\nWITH *, {variable} AS {export}"),
                    ));
                }
            }
        }

        let body = apply_insertions(nested.source(), insertions);

        let mut lines = vec!["WITH *".to_string()];
        lines.extend(scope.unwinds);
        lines.extend(body.lines().map(ToString::to_string));
        for inner in &inner_blocks {
            lines.extend(inner.lines().map(ToString::to_string));
        }
        lines.push(format!("RETURN COUNT(*) AS _{}", scope.path.iter().join("_")));

        let mut block = String::from("CALL {\n");
        for line in lines {
            if !line.is_empty() {
                block.push_str("  ");
                block.push_str(&line);
            }
            block.push('\n');
        }
        block.push('}');

        Ok(block)
    }

    /// The input object definition behind a type name, `None` for leaf types
    fn input_type(&self, name: &str) -> Result<Option<&'s TypeDefinition>, TranslateError> {
        if BUILTIN_SCALARS.contains(&name) {
            return Ok(None);
        }

        match self.schema.type_definition(name) {
            Some(type_def) if matches!(type_def.kind, TypeKind::InputObject(_)) => {
                Ok(Some(type_def))
            }
            Some(_) => Ok(None),
            None => Err(TranslateError::UnknownInputType(name.to_string())),
        }
    }
}

/// The objects of an argument value, a list contributes its object items
fn objects(value: &Value) -> Vec<&Map<String, Value>> {
    match value {
        Value::Object(object) => vec![object],
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        _ => vec![],
    }
}

fn children<'v>(items: &[&'v Map<String, Value>], field_name: &str) -> Vec<&'v Map<String, Value>> {
    items
        .iter()
        .filter_map(|item| item.get(field_name))
        .flat_map(objects)
        .collect()
}
