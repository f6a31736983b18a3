use assert_matches::assert_matches;
use cygql_ast::{
    Type,
    build::{
        FieldDesc, InputValueDesc, build_directive, build_directive_argument, build_field,
        build_input_value,
    },
};
use cygql_augment::directives::CYPHER;
use cygql_macros::test;
use cygql_test_utils::assert_error_msg;
use cygql_translate::{NestedMutationTranslator, TranslateError};
use serde_json::json;

use crate::{TranslateMutation, arguments, nested_schema};

#[test]
fn generated_mutations_have_no_statement() {
    let schema = nested_schema(json!({}));

    assert_error_msg!(
        schema.translate_mutation("CreateCustomer", json!({ "id": "c1" })),
        "mutation `CreateCustomer` has no @cypher statement"
    );
}

#[test]
fn nested_statements_must_not_return() {
    let schema = nested_schema(json!({}));
    let args = json!({
        "warehouse": {
            "id": "w1",
            "docks": [{ "doors": [{ "number": 1, "notes": [{ "text": "stuck" }] }] }]
        }
    });

    assert_error_msg!(
        schema.translate_mutation("SaveWarehouse", args),
        "statement of `warehouse.docks.doors.notes` must not RETURN"
    );
}

#[test]
fn unterminated_string_in_statement() {
    let schema = nested_schema(json!({}));

    assert_matches!(
        schema.translate_mutation("SaveBroken", json!({})),
        Err(TranslateError::Lex { field, .. }) if field == "SaveBroken"
    );
}

#[test]
fn nesting_is_bounded() {
    let schema = nested_schema(json!({ "maxDepth": 1 }));
    let args = json!({
        "warehouse": { "id": "w1", "docks": [{ "doors": [{ "number": 1 }] }] }
    });

    assert_error_msg!(
        schema.translate_mutation("SaveWarehouse", args),
        "input nesting exceeds the maximum depth of 1"
    );
}

#[test]
fn argument_types_must_exist() {
    let schema = nested_schema(json!({}));
    let mut desc = FieldDesc::new("SaveGhost", Type::Named("Boolean".into()));
    desc.arguments.push(build_input_value(InputValueDesc::new(
        "ghost",
        Type::Named("GhostInput".into()),
    )));
    desc.directives.push(build_directive(
        CYPHER,
        [build_directive_argument(
            "statement",
            cygql_ast::Value::String("MERGE (g:Ghost)".into()),
        )],
    ));
    let field = build_field(desc);

    assert_matches!(
        NestedMutationTranslator::new(&schema)
            .translate(&field, &arguments(json!({ "ghost": { "name": "boo" } }))),
        Err(TranslateError::UnknownInputType(name)) if name == "GhostInput"
    );
}
