use cygql_ast::{OperationKind, parse_document};
use cygql_macros::test;
use cygql_test_utils::{
    expect_eq,
    fixtures::{MOVIES_SDL, USER_SDL},
};
use indoc::indoc;
use serde_json::json;

use crate::{SchemaExt, TestAugment};

#[test]
fn user_query_and_mutations() {
    let schema = USER_SDL.augment_ok();

    expect_eq!(
        expected = indoc! {"
            type Query {
              User(id: ID, name: String, first: Int, offset: Int, orderBy: [_UserOrdering], filter: _UserFilter): [User]
            }"
        },
        actual = schema.print_type("Query")
    );
    expect_eq!(
        expected = indoc! {"
            type Mutation {
              CreateUser(id: ID, name: String): User
              UpdateUser(id: ID!, name: String): User
              DeleteUser(id: ID!): User
              MergeUser(id: ID!, name: String): User
            }"
        },
        actual = schema.print_type("Mutation")
    );
}

#[test]
fn user_generated_types() {
    let schema = USER_SDL.augment_ok();

    expect_eq!(
        expected = indoc! {"
            type User {
              id: ID! @id
              name: String
              _id: String
            }"
        },
        actual = schema.print_type("User")
    );
    expect_eq!(
        expected = indoc! {"
            enum _UserOrdering {
              id_asc
              id_desc
              name_asc
              name_desc
              _id_asc
              _id_desc
            }"
        },
        actual = schema.print_type("_UserOrdering")
    );
    expect_eq!(
        expected = indoc! {"
            input _UserInput {
              id: ID!
            }"
        },
        actual = schema.print_type("_UserInput")
    );
    expect_eq!(
        expected = indoc! {"
            input _UserFilter {
              AND: [_UserFilter!]
              OR: [_UserFilter!]
              id: ID
              id_not: ID
              id_in: [ID!]
              id_not_in: [ID!]
              id_contains: ID
              id_not_contains: ID
              id_starts_with: ID
              id_not_starts_with: ID
              id_ends_with: ID
              id_not_ends_with: ID
              name: String
              name_not: String
              name_in: [String!]
              name_not_in: [String!]
              name_contains: String
              name_not_contains: String
              name_starts_with: String
              name_not_starts_with: String
              name_ends_with: String
              name_not_ends_with: String
            }"
        },
        actual = schema.print_type("_UserFilter")
    );
}

#[test]
fn definition_order() {
    let schema = USER_SDL.augment_ok();
    let names: Vec<_> = schema
        .document()
        .type_definitions()
        .map(|type_def| type_def.name.as_str())
        .collect();

    expect_eq!(
        expected = vec!["User", "Query", "Mutation", "_RelationDirections"],
        actual = names[..4].to_vec()
    );
    expect_eq!(
        expected = vec!["_UserFilter", "_UserOrdering", "_UserInput"],
        actual = names[names.len() - 3..].to_vec()
    );

    let directives: Vec<_> = schema
        .document()
        .directive_definitions()
        .map(|directive| directive.name.as_str())
        .collect();
    expect_eq!(
        expected = vec![
            "cypher",
            "relation",
            "additionalLabels",
            "MutationMeta",
            "neo4j_ignore",
            "id",
            "unique",
            "index"
        ],
        actual = directives
    );
}

#[test]
fn augmentation_is_deterministic() {
    let first = MOVIES_SDL.augment_ok().to_sdl();
    let second = MOVIES_SDL.augment_ok().to_sdl();
    expect_eq!(expected = first, actual = second);
}

#[test]
fn augmented_schema_reparses() {
    let schema = MOVIES_SDL.augment_ok();
    let reparsed = parse_document(&schema.to_sdl()).unwrap();
    expect_eq!(expected = schema.document(), actual = &reparsed);
}

#[test]
fn experimental_inputs() {
    let schema = USER_SDL.augment_with(json!({ "experimental": true }));

    expect_eq!(
        expected = indoc! {"
            type Mutation {
              CreateUser(data: _UserData!): User
              UpdateUser(where: _UserWhere!, data: _UserData!): User
              DeleteUser(where: _UserWhere!): User
              MergeUser(where: _UserKeys!, data: _UserData!): User
            }"
        },
        actual = schema.print_type("Mutation")
    );
    expect_eq!(
        expected = indoc! {"
            input _UserData {
              id: ID
              name: String
            }"
        },
        actual = schema.print_type("_UserData")
    );
    expect_eq!(
        expected = indoc! {"
            input _UserWhere {
              AND: [_UserWhere!]
              OR: [_UserWhere!]
              id: ID
              id_in: [ID!]
            }"
        },
        actual = schema.print_type("_UserWhere")
    );
    expect_eq!(
        expected = indoc! {"
            input _UserKeys {
              id: ID
            }"
        },
        actual = schema.print_type("_UserKeys")
    );
}

#[test]
fn no_primary_key_leaves_only_create() {
    let schema = "type Tag { location: Point tags: [String] }".augment_ok();

    expect_eq!(
        expected = indoc! {"
            type Mutation {
              CreateTag(location: _Neo4jPointInput, tags: [String]): Tag
            }"
        },
        actual = schema.print_type("Mutation")
    );
    assert!(!schema.has_type("_TagInput"));
}

#[test]
fn update_needs_more_than_the_key() {
    let schema = "type Key { id: ID! }".augment_ok();

    expect_eq!(
        expected = vec!["CreateKey", "DeleteKey", "MergeKey"],
        actual = schema.root_field_names(OperationKind::Mutation)
    );
    expect_eq!(
        expected = "MergeKey(id: ID!): Key",
        actual = schema.print_root_field(OperationKind::Mutation, "MergeKey")
    );
}

#[test]
fn operation_policies() {
    let sdl = indoc! {"
        type User {
          id: ID!
        }

        type Secret {
          code: String!
          note: String
        }
    "};
    let schema = sdl.augment_with(json!({
        "query": { "exclude": ["Secret"] },
        "mutation": { "exclude": ["User"] },
    }));

    expect_eq!(
        expected = vec!["User"],
        actual = schema.root_field_names(OperationKind::Query)
    );
    expect_eq!(
        expected = vec!["CreateSecret", "UpdateSecret", "DeleteSecret", "MergeSecret"],
        actual = schema.root_field_names(OperationKind::Mutation)
    );
    assert!(!schema.has_type("_SecretFilter"));
    assert!(schema.has_type("_SecretInput"));

    let schema = sdl.augment_with(json!({ "query": false, "mutation": false }));
    assert!(!schema.has_type("Query"));
    assert!(!schema.has_type("Mutation"));
}

#[test]
fn ignored_types_get_no_api() {
    let schema = indoc! {"
        type Hidden {
          secret: String @neo4j_ignore
        }

        type Shown {
          name: String
        }
    "}
    .augment_ok();

    expect_eq!(
        expected = vec!["Shown"],
        actual = schema.root_field_names(OperationKind::Query)
    );
    assert!(!schema.has_type("_HiddenFilter"));
}

#[test]
fn interfaces_are_queryable_but_not_mutable() {
    let schema = indoc! {"
        interface Named {
          name: String!
        }

        type Person implements Named {
          name: String!
        }
    "}
    .augment_ok();

    expect_eq!(
        expected = vec!["Named", "Person"],
        actual = schema.root_field_names(OperationKind::Query)
    );
    expect_eq!(
        expected = vec!["CreatePerson", "DeletePerson", "MergePerson"],
        actual = schema.root_field_names(OperationKind::Mutation)
    );
    expect_eq!(
        expected = indoc! {"
            interface Named {
              name: String!
              _id: String
            }"
        },
        actual = schema.print_type("Named")
    );
}

#[test]
fn declared_query_fields_are_kept() {
    let schema = indoc! {r#"
        type User {
          id: ID!
        }

        type Query {
          User: [User] @cypher(statement: "MATCH (u:User) RETURN u")
          count: Int
        }
    "#}
    .augment_ok();

    expect_eq!(
        expected = indoc! {r#"
            type Query {
              User(first: Int, offset: Int, orderBy: [_UserOrdering], filter: _UserFilter): [User] @cypher(statement: "MATCH (u:User) RETURN u")
              count: Int
            }"#
        },
        actual = schema.print_type("Query")
    );
}

#[test]
fn extension_fields_take_part() {
    let schema = indoc! {"
        type Movie {
          id: ID!
        }

        extend type Movie {
          title: String
        }
    "}
    .augment_ok();

    expect_eq!(
        expected = "Movie(id: ID, title: String, first: Int, offset: Int, orderBy: [_MovieOrdering], filter: _MovieFilter): [Movie]",
        actual = schema.print_root_field(OperationKind::Query, "Movie")
    );
    expect_eq!(
        expected = "UpdateMovie(id: ID!, title: String): Movie",
        actual = schema.print_root_field(OperationKind::Mutation, "UpdateMovie")
    );
}

#[test]
fn schema_definition_renames_root_types() {
    let schema = indoc! {"
        schema {
          query: Root
        }

        type Root {
          version: String
        }

        type User {
          id: ID!
        }
    "}
    .augment_ok();

    expect_eq!(expected = "Root", actual = schema.operation_type_name(OperationKind::Query));
    expect_eq!(
        expected = vec!["version", "User"],
        actual = schema.root_field_names(OperationKind::Query)
    );
    assert!(!schema.has_type("Query"));
    assert!(!schema.has_type("_RootFilter"));
}
