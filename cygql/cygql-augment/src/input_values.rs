//! Filter, ordering and pagination inputs.

use cygql_ast::{
    EnumValueDefinition, InputValueDefinition, Wrappers,
    build::{InputValueDesc, build_enum_value, build_input_value, build_named_type},
};
use smallvec::SmallVec;
use thin_vec::ThinVec;

use crate::{
    classify::{FieldDescriptor, PropertyCategory},
    config::AugmentationConfig,
    naming::{self, FILTER_AND, FILTER_OR},
    property_types::POINT_DISTANCE_FILTER,
};

pub const FIRST: &str = "first";
pub const OFFSET: &str = "offset";
pub const ORDER_BY: &str = "orderBy";
pub const FILTER: &str = "filter";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FilterOperator {
    Equal,
    Not,
    In,
    NotIn,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    Lt,
    Lte,
    Gt,
    Gte,
    Distance,
    DistanceLt,
    DistanceLte,
    DistanceGt,
    DistanceGte,
    Some,
    None,
    Single,
    Every,
}

type Operators = SmallVec<[FilterOperator; 16]>;

impl FilterOperator {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Equal => "",
            Self::Not => "_not",
            Self::In => "_in",
            Self::NotIn => "_not_in",
            Self::Contains => "_contains",
            Self::NotContains => "_not_contains",
            Self::StartsWith => "_starts_with",
            Self::NotStartsWith => "_not_starts_with",
            Self::EndsWith => "_ends_with",
            Self::NotEndsWith => "_not_ends_with",
            Self::Lt => "_lt",
            Self::Lte => "_lte",
            Self::Gt => "_gt",
            Self::Gte => "_gte",
            Self::Distance => "_distance",
            Self::DistanceLt => "_distance_lt",
            Self::DistanceLte => "_distance_lte",
            Self::DistanceGt => "_distance_gt",
            Self::DistanceGte => "_distance_gte",
            Self::Some => "_some",
            Self::None => "_none",
            Self::Single => "_single",
            Self::Every => "_every",
        }
    }

    fn is_membership(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    fn is_distance(self) -> bool {
        matches!(
            self,
            Self::Distance | Self::DistanceLt | Self::DistanceLte | Self::DistanceGt | Self::DistanceGte
        )
    }
}

/// The operators of one property category.
///
/// List-typed properties have no membership operators.
pub fn property_operators(
    category: PropertyCategory,
    is_list: bool,
    config: &AugmentationConfig,
) -> Operators {
    use FilterOperator::*;

    let mut operators: Operators = match category {
        PropertyCategory::Id | PropertyCategory::String => [
            Equal,
            Not,
            In,
            NotIn,
            Contains,
            NotContains,
            StartsWith,
            NotStartsWith,
            EndsWith,
            NotEndsWith,
        ]
        .into_iter()
        .collect(),
        PropertyCategory::Int | PropertyCategory::Float | PropertyCategory::Temporal(_) => {
            [Equal, Not, In, NotIn, Lt, Lte, Gt, Gte].into_iter().collect()
        }
        PropertyCategory::Boolean => [Equal, Not].into_iter().collect(),
        PropertyCategory::Enum | PropertyCategory::Scalar => {
            [Equal, Not, In, NotIn].into_iter().collect()
        }
        PropertyCategory::Spatial(_) => {
            let mut operators: Operators = [Equal, Not].into_iter().collect();
            if config.point_enabled() {
                operators.extend([Distance, DistanceLt, DistanceLte, DistanceGt, DistanceGte]);
            }
            operators
        }
    };

    if is_list {
        operators.retain(|operator| !operator.is_membership());
    }

    operators
}

/// Filter fields for one stored property, named `<field><suffix>`.
pub fn property_filter_fields(
    field: &FieldDescriptor,
    category: PropertyCategory,
    config: &AugmentationConfig,
) -> Vec<InputValueDefinition> {
    property_operators(category, field.is_list(), config)
        .into_iter()
        .map(|operator| {
            let wrappers = if operator.is_membership()
                || (field.is_list() && matches!(operator, FilterOperator::Equal | FilterOperator::Not))
            {
                Wrappers::LIST | Wrappers::NON_NULL_NAMED
            } else {
                Wrappers::empty()
            };

            let ty = if operator.is_distance() {
                build_named_type(POINT_DISTANCE_FILTER, Wrappers::empty())
            } else {
                build_named_type(field.type_name, wrappers)
            };

            build_input_value(InputValueDesc::new(
                format!("{}{}", field.name, operator.suffix()),
                ty,
            ))
        })
        .collect()
}

/// Filter fields for a relation-valued field pointing at `filter_type`.
pub fn relation_filter_fields(
    field_name: &str,
    filter_type: &str,
    is_list: bool,
) -> Vec<InputValueDefinition> {
    const SINGULAR: &[FilterOperator] = &[
        FilterOperator::Equal,
        FilterOperator::Not,
        FilterOperator::In,
        FilterOperator::NotIn,
    ];
    const QUANTIFIERS: &[FilterOperator] = &[
        FilterOperator::Some,
        FilterOperator::None,
        FilterOperator::Single,
        FilterOperator::Every,
    ];

    let quantifiers = if is_list { QUANTIFIERS } else { &[] };
    let operators = SINGULAR.iter().chain(quantifiers);

    operators
        .map(|operator| {
            let wrappers = if operator.is_membership() {
                Wrappers::LIST | Wrappers::NON_NULL_NAMED
            } else {
                Wrappers::empty()
            };
            build_input_value(InputValueDesc::new(
                format!("{field_name}{}", operator.suffix()),
                build_named_type(filter_type, wrappers),
            ))
        })
        .collect()
}

/// `AND: [F!]` and `OR: [F!]`, present in every generated filter
pub fn logical_filter_fields(filter_type: &str) -> Vec<InputValueDefinition> {
    [FILTER_AND, FILTER_OR]
        .into_iter()
        .map(|name| {
            build_input_value(InputValueDesc::new(
                name,
                build_named_type(filter_type, Wrappers::LIST | Wrappers::NON_NULL_NAMED),
            ))
        })
        .collect()
}

/// Lists and spatial values have no defined order.
pub fn is_orderable(field: &FieldDescriptor, category: PropertyCategory) -> bool {
    !field.is_list() && !category.is_spatial()
}

pub fn ordering_values(field_name: &str) -> [EnumValueDefinition; 2] {
    [
        build_enum_value(naming::ordering_value(field_name, false)),
        build_enum_value(naming::ordering_value(field_name, true)),
    ]
}

/// The generated arguments of a list query field.
#[derive(Clone, Default, Debug)]
pub struct QueryArguments {
    pub pagination: bool,
    pub ordering: Option<String>,
    pub filter: Option<String>,
}

/// Add the generated arguments, idempotently per argument name.
///
/// Pagination arguments are only added when absent, so declared defaults
/// survive. `orderBy` and `filter` replace any earlier version in place.
pub fn build_query_field_arguments(
    arguments: &mut ThinVec<InputValueDefinition>,
    query_arguments: &QueryArguments,
) {
    if query_arguments.pagination {
        for name in [FIRST, OFFSET] {
            if !arguments.iter().any(|argument| argument.name == name) {
                arguments.push(build_input_value(InputValueDesc::new(
                    name,
                    build_named_type("Int", Wrappers::empty()),
                )));
            }
        }
    }

    if let Some(ordering) = &query_arguments.ordering {
        replace_or_push(
            arguments,
            build_input_value(InputValueDesc::new(
                ORDER_BY,
                build_named_type(ordering, Wrappers::LIST),
            )),
        );
    }

    if let Some(filter) = &query_arguments.filter {
        replace_or_push(
            arguments,
            build_input_value(InputValueDesc::new(
                FILTER,
                build_named_type(filter, Wrappers::empty()),
            )),
        );
    }
}

fn replace_or_push(arguments: &mut ThinVec<InputValueDefinition>, argument: InputValueDefinition) {
    match arguments
        .iter_mut()
        .find(|existing| existing.name == argument.name)
    {
        Some(existing) => *existing = argument,
        None => arguments.push(argument),
    }
}
