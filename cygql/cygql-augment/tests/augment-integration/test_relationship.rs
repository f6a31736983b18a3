use cygql_ast::OperationKind;
use cygql_augment::AugmentedSchema;
use cygql_macros::test;
use cygql_test_utils::{expect_eq, fixtures::MOVIES_SDL};
use indoc::indoc;

use crate::{SchemaExt, TestAugment};

fn filter_fields_with_prefix(schema: &AugmentedSchema, filter: &str, prefix: &str) -> Vec<String> {
    schema
        .type_definition(filter)
        .unwrap()
        .input_fields()
        .iter()
        .filter(|field| field.name.starts_with(prefix))
        .map(ToString::to_string)
        .collect()
}

#[test]
fn relation_fields_get_query_arguments() {
    let schema = MOVIES_SDL.augment_ok();

    expect_eq!(
        expected = indoc! {r#"
            type Movie {
              movieId: ID!
              title: String
              year: Int
              imdbRating: Float
              released: _Neo4jDateTime
              location: _Neo4jPoint
              tags: [String]
              genres(first: Int, offset: Int, orderBy: [_GenreOrdering], filter: _GenreFilter): [Genre] @relation(name: "IN_GENRE", direction: OUT)
              ratings(first: Int, offset: Int, orderBy: [_RatedOrdering], filter: _MovieRatingsFilter): [_MovieRatings] @relation(name: "RATED", direction: IN)
              similar(first: Int = 3, offset: Int, orderBy: [_MovieOrdering], filter: _MovieFilter): [Movie] @cypher(statement: "MATCH (this)--(:Genre)--(o:Movie) RETURN o")
              _id: String
            }"#
        },
        actual = schema.print_type("Movie")
    );
}

#[test]
fn relation_filters() {
    let schema = MOVIES_SDL.augment_ok();

    expect_eq!(
        expected = vec![
            "genres: _GenreFilter",
            "genres_not: _GenreFilter",
            "genres_in: [_GenreFilter!]",
            "genres_not_in: [_GenreFilter!]",
            "genres_some: _GenreFilter",
            "genres_none: _GenreFilter",
            "genres_single: _GenreFilter",
            "genres_every: _GenreFilter",
        ],
        actual = filter_fields_with_prefix(&schema, "_MovieFilter", "genres")
    );
    expect_eq!(
        expected = vec!["ratings_in: [_MovieRatingsFilter!]"],
        actual = filter_fields_with_prefix(&schema, "_MovieFilter", "ratings_in")
    );
    assert!(filter_fields_with_prefix(&schema, "_MovieFilter", "similar").is_empty());
}

#[test]
fn relationship_field_types() {
    let schema = MOVIES_SDL.augment_ok();

    expect_eq!(
        expected = indoc! {r#"
            type _MovieRatings @relation(name: "RATED", from: "User", to: "Movie") {
              rating: Float
              created: _Neo4jDateTime
              User: User
            }"#
        },
        actual = schema.print_type("_MovieRatings")
    );
    expect_eq!(
        expected = indoc! {r#"
            type _UserRated @relation(name: "RATED", from: "User", to: "Movie") {
              rating: Float
              created: _Neo4jDateTime
              Movie: Movie
            }"#
        },
        actual = schema.print_type("_UserRated")
    );
    expect_eq!(
        expected = indoc! {"
            input _MovieRatingsFilter {
              AND: [_MovieRatingsFilter!]
              OR: [_MovieRatingsFilter!]
              rating: Float
              rating_not: Float
              rating_in: [Float!]
              rating_not_in: [Float!]
              rating_lt: Float
              rating_lte: Float
              rating_gt: Float
              rating_gte: Float
              created: _Neo4jDateTimeInput
              created_not: _Neo4jDateTimeInput
              created_in: [_Neo4jDateTimeInput!]
              created_not_in: [_Neo4jDateTimeInput!]
              created_lt: _Neo4jDateTimeInput
              created_lte: _Neo4jDateTimeInput
              created_gt: _Neo4jDateTimeInput
              created_gte: _Neo4jDateTimeInput
              User: _UserFilter
            }"
        },
        actual = schema.print_type("_MovieRatingsFilter")
    );
    expect_eq!(
        expected = indoc! {"
            input _RatedInput {
              rating: Float
              created: _Neo4jDateTimeInput
            }"
        },
        actual = schema.print_type("_RatedInput")
    );
    expect_eq!(
        expected = indoc! {"
            enum _RatedOrdering {
              rating_asc
              rating_desc
              created_asc
              created_desc
            }"
        },
        actual = schema.print_type("_RatedOrdering")
    );
}

#[test]
fn relation_mutation_order() {
    let schema = MOVIES_SDL.augment_ok();

    expect_eq!(
        expected = vec![
            "CreateMovie",
            "UpdateMovie",
            "DeleteMovie",
            "MergeMovie",
            "AddMovieGenres",
            "RemoveMovieGenres",
            "MergeMovieGenres",
            "AddMovieRatings",
            "RemoveMovieRatings",
            "UpdateMovieRatings",
            "MergeMovieRatings",
            "CreateGenre",
            "DeleteGenre",
            "MergeGenre",
            "AddGenreMovies",
            "RemoveGenreMovies",
            "MergeGenreMovies",
            "CreateUser",
            "UpdateUser",
            "DeleteUser",
            "MergeUser",
            "AddUserRated",
            "RemoveUserRated",
            "UpdateUserRated",
            "MergeUserRated",
            "AddUserFriends",
            "RemoveUserFriends",
            "UpdateUserFriends",
            "MergeUserFriends",
        ],
        actual = schema.root_field_names(OperationKind::Mutation)
    );
}

#[test]
fn relation_mutation_shapes() {
    let schema = MOVIES_SDL.augment_ok();
    let field = |name| schema.print_root_field(OperationKind::Mutation, name);

    expect_eq!(
        expected = r#"AddMovieGenres(from: _MovieInput!, to: _GenreInput!): _AddMovieGenresPayload @MutationMeta(relationship: "IN_GENRE", from: "Movie", to: "Genre")"#,
        actual = field("AddMovieGenres")
    );
    expect_eq!(
        expected = r#"AddGenreMovies(from: _MovieInput!, to: _GenreInput!): _AddGenreMoviesPayload @MutationMeta(relationship: "IN_GENRE", from: "Movie", to: "Genre")"#,
        actual = field("AddGenreMovies")
    );
    expect_eq!(
        expected = r#"AddMovieRatings(from: _UserInput!, to: _MovieInput!, data: _RatedInput): _AddMovieRatingsPayload @MutationMeta(relationship: "RATED", from: "User", to: "Movie")"#,
        actual = field("AddMovieRatings")
    );
    expect_eq!(
        expected = r#"RemoveMovieRatings(from: _UserInput!, to: _MovieInput!): _RemoveMovieRatingsPayload @MutationMeta(relationship: "RATED", from: "User", to: "Movie")"#,
        actual = field("RemoveMovieRatings")
    );
    expect_eq!(
        expected = r#"UpdateMovieRatings(from: _UserInput!, to: _MovieInput!, data: _RatedInput!): _UpdateMovieRatingsPayload @MutationMeta(relationship: "RATED", from: "User", to: "Movie")"#,
        actual = field("UpdateMovieRatings")
    );

    expect_eq!(
        expected = indoc! {r#"
            type _AddMovieGenresPayload @relation(name: "IN_GENRE", from: "Movie", to: "Genre") {
              from: Movie
              to: Genre
            }"#
        },
        actual = schema.print_type("_AddMovieGenresPayload")
    );
    expect_eq!(
        expected = indoc! {r#"
            type _AddMovieRatingsPayload @relation(name: "RATED", from: "User", to: "Movie") {
              from: User
              to: Movie
              rating: Float
              created: _Neo4jDateTime
            }"#
        },
        actual = schema.print_type("_AddMovieRatingsPayload")
    );
    expect_eq!(
        expected = indoc! {r#"
            type _RemoveMovieRatingsPayload @relation(name: "RATED", from: "User", to: "Movie") {
              from: User
              to: Movie
            }"#
        },
        actual = schema.print_type("_RemoveMovieRatingsPayload")
    );
}

#[test]
fn reflexive_relationship() {
    let schema = MOVIES_SDL.augment_ok();

    expect_eq!(
        expected = indoc! {r#"
            type _UserFriendsDirections @relation(name: "FRIEND_OF", from: "User", to: "User") {
              from(first: Int, offset: Int, orderBy: [_FriendOfOrdering], filter: _UserFriendsFilter): [_UserFriends]
              to(first: Int, offset: Int, orderBy: [_FriendOfOrdering], filter: _UserFriendsFilter): [_UserFriends]
            }"#
        },
        actual = schema.print_type("_UserFriendsDirections")
    );
    expect_eq!(
        expected = indoc! {"
            input _UserFriendsDirectionsFilter {
              from: _UserFriendsFilter
              to: _UserFriendsFilter
            }"
        },
        actual = schema.print_type("_UserFriendsDirectionsFilter")
    );
    expect_eq!(
        expected = indoc! {r#"
            type _UserFriends @relation(name: "FRIEND_OF", from: "User", to: "User") {
              since: Int
              User: User
            }"#
        },
        actual = schema.print_type("_UserFriends")
    );
    expect_eq!(
        expected = vec![
            "friends: _UserFriendsDirectionsFilter",
            "friends_not: _UserFriendsDirectionsFilter",
        ],
        actual = filter_fields_with_prefix(&schema, "_UserFilter", "friends")
    );
    expect_eq!(
        expected = r#"AddUserFriends(from: _UserInput!, to: _UserInput!, data: _FriendOfInput): _AddUserFriendsPayload @MutationMeta(relationship: "FRIEND_OF", from: "User", to: "User")"#,
        actual = schema.print_root_field(OperationKind::Mutation, "AddUserFriends")
    );
}

#[test]
fn reflexive_arguments_move_to_directions() {
    let schema = indoc! {r#"
        type Person {
          name: String! @id
          knows(since: Int): [Knows]
        }

        type Knows @relation(name: "KNOWS", from: "source", to: "target") {
          source: Person
          target: Person
          since: Int
        }
    "#}
    .augment_ok();

    expect_eq!(
        expected = indoc! {r#"
            type Person {
              name: String! @id
              knows: _PersonKnowsDirections
              _id: String
            }"#
        },
        actual = schema.print_type("Person")
    );
    expect_eq!(
        expected = indoc! {r#"
            type _PersonKnowsDirections @relation(name: "KNOWS", from: "Person", to: "Person") {
              source(since: Int, first: Int, offset: Int, orderBy: [_KnowsOrdering], filter: _PersonKnowsFilter): [_PersonKnows]
              target(since: Int, first: Int, offset: Int, orderBy: [_KnowsOrdering], filter: _PersonKnowsFilter): [_PersonKnows]
            }"#
        },
        actual = schema.print_type("_PersonKnowsDirections")
    );
    expect_eq!(
        expected = indoc! {r#"
            type _AddPersonKnowsPayload @relation(name: "KNOWS", from: "Person", to: "Person") {
              source: Person
              target: Person
              since: Int
            }"#
        },
        actual = schema.print_type("_AddPersonKnowsPayload")
    );
}

#[test]
fn relation_mutations_need_selectable_endpoints() {
    let schema = indoc! {r#"
        type A {
          id: ID!
          bs: [B] @relation(name: "HAS", direction: OUT)
          cs: [C] @relation(name: "HAS", direction: OUT)
        }

        type B {
          location: Point
        }

        extend type C {
          id: ID!
        }
    "#}
    .augment_ok();

    expect_eq!(
        expected = vec!["CreateA", "DeleteA", "MergeA", "CreateB"],
        actual = schema.root_field_names(OperationKind::Mutation)
    );
    expect_eq!(
        expected = "cs(first: Int, offset: Int, orderBy: [_COrdering], filter: _CFilter): [C] @relation(name: \"HAS\", direction: OUT)",
        actual = crate::print_field(schema.type_definition("A").unwrap().field("cs").unwrap())
    );
}
