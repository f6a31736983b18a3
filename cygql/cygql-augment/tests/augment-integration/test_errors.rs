use cygql_ast::error::ParseError;
use cygql_augment::{AugmentError, AugmentationConfig, SchemaError, augment_schema};
use cygql_macros::test;
use cygql_test_utils::assert_error_msg;
use indoc::indoc;

use assert_matches::assert_matches;

fn augment(sdl: &str) -> Result<cygql_augment::AugmentedSchema, AugmentError> {
    augment_schema(sdl, &AugmentationConfig::default())
}

#[test]
fn parse_errors_pass_through() {
    assert_matches!(
        augment("type A { name String }"),
        Err(AugmentError::Parse(ParseError::Syntax(_)))
    );
}

#[test]
fn duplicate_type() {
    assert_error_msg!(
        augment("type A { a: Int } type A { b: Int }"),
        "type `A` is defined more than once"
    );
}

#[test]
fn conflicting_key_directives() {
    assert_error_msg!(
        augment("type A { a: ID @id @unique }"),
        "field `A.a` cannot carry both @id and @unique"
    );
}

#[test]
fn id_fields_are_counted_across_extensions() {
    let result = augment(indoc! {"
        type A {
          a: ID @id
        }

        extend type A {
          b: ID @id
        }
    "});

    assert_matches!(
        result,
        Err(AugmentError::Schema(SchemaError::MultipleIdFields { type_name, fields }))
            if type_name == "A" && fields == ["a", "b"]
    );
}

#[test]
fn computed_fields_cannot_be_keys() {
    assert_error_msg!(
        augment(r#"type A { a: ID @cypher(statement: "RETURN 1") @index }"#),
        "field `A.a` is computed by @cypher and cannot carry @index"
    );
}
