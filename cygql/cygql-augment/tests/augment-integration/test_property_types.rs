use cygql_macros::test;
use cygql_test_utils::{expect_eq, fixtures::PROPERTIES_SDL};
use indoc::indoc;
use serde_json::json;

use crate::{SchemaExt, TestAugment};

fn filter_fields(schema: &cygql_augment::AugmentedSchema, prefix: &str) -> Vec<String> {
    schema
        .type_definition("_ThingFilter")
        .unwrap()
        .input_fields()
        .iter()
        .filter(|field| field.name == prefix || field.name.starts_with(&format!("{prefix}_")))
        .map(ToString::to_string)
        .collect()
}

#[test]
fn property_fields_are_retargeted() {
    let schema = PROPERTIES_SDL.augment_ok();

    expect_eq!(
        expected = indoc! {"
            type Thing {
              id: ID!
              name: String
              count: Int
              weight: Float
              active: Boolean
              color: Color
              homepage: Url
              time: _Neo4jTime
              date: _Neo4jDate
              datetime: _Neo4jDateTime
              localtime: _Neo4jLocalTime
              localdatetime: _Neo4jLocalDateTime
              location: _Neo4jPoint
              scores: [Int]
              _id: String
            }"
        },
        actual = schema.print_type("Thing")
    );
    expect_eq!(
        expected = indoc! {"
            type _Neo4jDate {
              year: Int
              month: Int
              day: Int
              formatted: String
            }"
        },
        actual = schema.print_type("_Neo4jDate")
    );
    expect_eq!(
        expected = indoc! {"
            input _Neo4jTimeInput {
              hour: Int
              minute: Int
              second: Int
              millisecond: Int
              microsecond: Int
              nanosecond: Int
              timezone: String
              formatted: String
            }"
        },
        actual = schema.print_type("_Neo4jTimeInput")
    );
    expect_eq!(
        expected = indoc! {"
            input _Neo4jPointDistanceFilter {
              point: _Neo4jPointInput!
              distance: Float!
            }"
        },
        actual = schema.print_type("_Neo4jPointDistanceFilter")
    );
}

#[test]
fn property_filters() {
    let schema = PROPERTIES_SDL.augment_ok();

    expect_eq!(
        expected = vec!["active: Boolean", "active_not: Boolean"],
        actual = filter_fields(&schema, "active")
    );
    expect_eq!(
        expected = vec![
            "color: Color",
            "color_not: Color",
            "color_in: [Color!]",
            "color_not_in: [Color!]",
        ],
        actual = filter_fields(&schema, "color")
    );
    expect_eq!(
        expected = vec![
            "homepage: Url",
            "homepage_not: Url",
            "homepage_in: [Url!]",
            "homepage_not_in: [Url!]",
        ],
        actual = filter_fields(&schema, "homepage")
    );
    expect_eq!(
        expected = vec![
            "scores: [Int!]",
            "scores_not: [Int!]",
            "scores_lt: Int",
            "scores_lte: Int",
            "scores_gt: Int",
            "scores_gte: Int",
        ],
        actual = filter_fields(&schema, "scores")
    );
    expect_eq!(
        expected = vec![
            "date: _Neo4jDateInput",
            "date_not: _Neo4jDateInput",
            "date_in: [_Neo4jDateInput!]",
            "date_not_in: [_Neo4jDateInput!]",
            "date_lt: _Neo4jDateInput",
            "date_lte: _Neo4jDateInput",
            "date_gt: _Neo4jDateInput",
            "date_gte: _Neo4jDateInput",
        ],
        actual = filter_fields(&schema, "date")
    );
    expect_eq!(
        expected = vec![
            "location: _Neo4jPointInput",
            "location_not: _Neo4jPointInput",
            "location_distance: _Neo4jPointDistanceFilter",
            "location_distance_lt: _Neo4jPointDistanceFilter",
            "location_distance_lte: _Neo4jPointDistanceFilter",
            "location_distance_gt: _Neo4jPointDistanceFilter",
            "location_distance_gte: _Neo4jPointDistanceFilter",
        ],
        actual = filter_fields(&schema, "location")
    );
}

#[test]
fn unorderable_properties() {
    let schema = PROPERTIES_SDL.augment_ok();
    let values: Vec<_> = schema
        .type_definition("_ThingOrdering")
        .unwrap()
        .enum_values()
        .iter()
        .map(|value| value.name.as_str())
        .collect();

    assert!(values.contains(&"localdatetime_desc"));
    assert!(!values.iter().any(|value| value.starts_with("location")));
    assert!(!values.iter().any(|value| value.starts_with("scores")));
}

#[test]
fn disabled_temporal_kind_stays_bare() {
    let schema = PROPERTIES_SDL.augment_with(json!({ "temporal": { "datetime": false } }));
    let thing = schema.type_definition("Thing").unwrap();

    expect_eq!(
        expected = "DateTime",
        actual = thing.field("datetime").unwrap().ty.to_string()
    );
    expect_eq!(
        expected = "_Neo4jDate",
        actual = thing.field("date").unwrap().ty.to_string()
    );
    assert!(!schema.has_type("_Neo4jDateTime"));
    assert!(!schema.has_type("_Neo4jDateTimeInput"));
    expect_eq!(expected = "scalar DateTime", actual = schema.print_type("DateTime"));
    expect_eq!(
        expected = vec![
            "datetime: DateTime",
            "datetime_not: DateTime",
            "datetime_in: [DateTime!]",
            "datetime_not_in: [DateTime!]",
            "datetime_lt: DateTime",
            "datetime_lte: DateTime",
            "datetime_gt: DateTime",
            "datetime_gte: DateTime",
        ],
        actual = filter_fields(&schema, "datetime")
    );
}

#[test]
fn disabled_spatial_kind_stays_bare() {
    let schema = PROPERTIES_SDL.augment_with(json!({ "spatial": false }));

    expect_eq!(
        expected = vec!["location: Point", "location_not: Point"],
        actual = filter_fields(&schema, "location")
    );
    expect_eq!(expected = "scalar Point", actual = schema.print_type("Point"));
    assert!(!schema.has_type("_Neo4jPointDistanceFilter"));
}

#[test]
fn declared_scalar_is_not_duplicated() {
    let schema = indoc! {"
        scalar DateTime

        type Event {
          at: DateTime
        }
    "}
    .augment_with(json!({ "temporal": false }));

    let scalars = schema
        .document()
        .type_definitions()
        .filter(|type_def| type_def.name == "DateTime")
        .count();
    expect_eq!(expected = 1, actual = scalars);
    assert!(!schema.has_type("_Neo4jTime"));
}
