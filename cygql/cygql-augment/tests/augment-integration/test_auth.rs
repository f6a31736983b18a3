use cygql_ast::OperationKind;
use cygql_macros::test;
use cygql_test_utils::{assert_error_msg, expect_eq, fixtures::MOVIES_SDL};
use indoc::indoc;
use serde_json::json;

use crate::{SchemaExt, TestAugment};

#[test]
fn has_role_requires_role_enum() {
    let config = cygql_augment::AugmentationConfig::from_json(json!({ "auth": true })).unwrap();
    assert_error_msg!(
        cygql_augment::augment_schema("type A { a: Int }", &config),
        "the @hasRole directive requires an enum type named `Role`"
    );
}

#[test]
fn auth_directive_definitions() {
    let schema = indoc! {"
        enum Role {
          reader
          admin
        }

        type A {
          a: Int
        }
    "}
    .augment_with(json!({ "auth": true }));

    let printed: Vec<String> = schema
        .document()
        .directive_definitions()
        .filter(|directive| {
            ["isAuthenticated", "hasRole", "hasScope"].contains(&directive.name.as_str())
        })
        .map(ToString::to_string)
        .collect();

    expect_eq!(
        expected = vec![
            "directive @isAuthenticated on OBJECT | FIELD_DEFINITION",
            "directive @hasRole(roles: [Role]) on OBJECT | FIELD_DEFINITION",
            "directive @hasScope(scopes: [String]) on OBJECT | FIELD_DEFINITION",
        ],
        actual = printed
    );
}

#[test]
fn auth_flags_are_independent() {
    let schema = "type A { a: Int }".augment_with(json!({ "auth": { "hasScope": true } }));
    let names: Vec<_> = schema
        .document()
        .directive_definitions()
        .map(|directive| directive.name.as_str())
        .collect();

    assert!(names.contains(&"hasScope"));
    assert!(!names.contains(&"hasRole"));
    assert!(!names.contains(&"isAuthenticated"));
}

#[test]
fn scopes_on_generated_fields() {
    let schema = MOVIES_SDL.augment_with(json!({ "auth": { "hasScope": true } }));

    expect_eq!(
        expected = r#"DeleteGenre(name: String!): Genre @hasScope(scopes: ["Genre: Delete"])"#,
        actual = schema.print_root_field(OperationKind::Mutation, "DeleteGenre")
    );
    expect_eq!(
        expected = r#"RemoveMovieGenres(from: _MovieInput!, to: _GenreInput!): _RemoveMovieGenresPayload @MutationMeta(relationship: "IN_GENRE", from: "Movie", to: "Genre") @hasScope(scopes: ["Movie: Delete", "Genre: Delete"])"#,
        actual = schema.print_root_field(OperationKind::Mutation, "RemoveMovieGenres")
    );
    assert!(
        schema
            .print_root_field(OperationKind::Query, "Genre")
            .ends_with(r#"[Genre] @hasScope(scopes: ["Genre: Read"])"#)
    );
}
