//! Query fields, mutations and inputs of Node types.

use cygql_ast::{
    Directive, FieldDefinition, InputValueDefinition, Type, Wrappers,
    build::{
        EnumTypeDesc, FieldDesc, InputObjectTypeDesc, InputValueDesc, build_enum_type,
        build_field, build_input_object_type, build_input_value, build_named_type,
    },
};
use thin_vec::ThinVec;
use tracing::{debug, trace};

use crate::{
    augment::Augmenter,
    classify::{FieldDescriptor, FieldFlags, FieldRole, PropertyCategory, SchemaIndex},
    directives::scope_directive,
    input_values::{
        QueryArguments, build_query_field_arguments, is_orderable, logical_filter_fields,
        ordering_values, property_filter_fields,
    },
    naming::{self, FILTER_AND, FILTER_OR, NodeMutation, SYSTEM_ID},
};

/// How the primary key of a Node type was chosen, in order of preference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PrimaryKeyStrategy {
    IdDirective,
    UniqueDirective,
    IndexDirective,
    NonNullIdentifier,
    Identifier,
    NonNullScalar,
    FirstEligible,
}

impl PrimaryKeyStrategy {
    pub const ORDER: [PrimaryKeyStrategy; 7] = [
        Self::IdDirective,
        Self::UniqueDirective,
        Self::IndexDirective,
        Self::NonNullIdentifier,
        Self::Identifier,
        Self::NonNullScalar,
        Self::FirstEligible,
    ];

    fn accepts(self, field: &FieldDescriptor) -> bool {
        match self {
            Self::IdDirective => field.flags.contains(FieldFlags::ID),
            Self::UniqueDirective => field.flags.contains(FieldFlags::UNIQUE),
            Self::IndexDirective => field.flags.contains(FieldFlags::INDEX),
            Self::NonNullIdentifier => field.type_name == "ID" && field.is_non_null(),
            Self::Identifier => field.type_name == "ID",
            Self::NonNullScalar => field.is_non_null(),
            Self::FirstEligible => true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PrimaryKey<'a> {
    pub field: FieldDescriptor<'a>,
    pub strategy: PrimaryKeyStrategy,
}

/// Choose the primary key among stored properties.
///
/// Lists and spatial values never identify a node.
pub fn primary_key<'a>(
    properties: &[(FieldDescriptor<'a>, PropertyCategory)],
) -> Option<PrimaryKey<'a>> {
    let eligible: Vec<FieldDescriptor<'a>> = properties
        .iter()
        .filter(|(field, category)| !field.is_list() && !category.is_spatial())
        .map(|(field, _)| *field)
        .collect();

    PrimaryKeyStrategy::ORDER.into_iter().find_map(|strategy| {
        eligible
            .iter()
            .find(|field| strategy.accepts(field))
            .map(|field| PrimaryKey {
                field: *field,
                strategy,
            })
    })
}

/// The stored properties among `fields`, in declaration order.
pub fn stored_properties<'a>(
    index: &SchemaIndex,
    fields: &'a [FieldDefinition],
) -> Vec<(FieldDescriptor<'a>, PropertyCategory)> {
    fields
        .iter()
        .map(FieldDescriptor::new)
        .filter_map(|field| match index.field_role(&field) {
            FieldRole::Property(category) => Some((field, category)),
            _ => None,
        })
        .collect()
}

/// Fields marked as keys, falling back to the primary key alone
fn key_fields<'a>(
    properties: &[(FieldDescriptor<'a>, PropertyCategory)],
    primary_key: &PrimaryKey<'a>,
) -> Vec<FieldDescriptor<'a>> {
    let keys: Vec<_> = properties
        .iter()
        .map(|(field, _)| *field)
        .filter(|field| {
            field
                .flags
                .intersects(FieldFlags::ID | FieldFlags::UNIQUE | FieldFlags::INDEX)
        })
        .collect();

    if keys.is_empty() {
        vec![primary_key.field]
    } else {
        keys
    }
}

fn input_value(name: impl Into<String>, ty: Type) -> InputValueDefinition {
    build_input_value(InputValueDesc::new(name, ty))
}

fn required(type_name: &str) -> Type {
    build_named_type(type_name, Wrappers::NON_NULL_NAMED)
}

impl Augmenter<'_> {
    /// `_<T>Filter` and `_<T>Ordering` for one Node type.
    pub(crate) fn augment_node_filter(&mut self, type_name: &str) {
        let fields = self.maps.merged_fields(type_name);
        let filter_name = naming::filter(type_name);

        let mut filter_fields = logical_filter_fields(&filter_name);
        let mut ordering = vec![];

        for (field, category) in stored_properties(&self.index, &fields) {
            filter_fields.extend(property_filter_fields(&field, category, self.config));
            if is_orderable(&field, category) {
                ordering.extend(ordering_values(field.name));
            }
        }
        ordering.extend(ordering_values(SYSTEM_ID));

        self.insert_generated(build_input_object_type(InputObjectTypeDesc {
            name: filter_name,
            fields: filter_fields,
            ..Default::default()
        }));
        self.insert_generated(build_enum_type(EnumTypeDesc {
            name: naming::ordering(type_name),
            values: ordering,
            ..Default::default()
        }));
    }

    /// Append fields to the filter of `type_name`, if it has one.
    pub(crate) fn extend_filter(
        &mut self,
        type_name: &str,
        fields: impl IntoIterator<Item = InputValueDefinition>,
    ) {
        if let Some(input_fields) = self
            .maps
            .generated
            .get_mut(&naming::filter(type_name))
            .and_then(|definition| definition.input_fields_mut())
        {
            input_fields.extend(fields);
        }
    }

    /// `@hasScope` when scopes are enabled
    pub(crate) fn scope<'a>(
        &self,
        scopes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Option<Directive> {
        if self.config.auth.flags().has_scope {
            Some(scope_directive(scopes))
        } else {
            None
        }
    }

    /// The input selecting one node of `type_name` in relation mutations
    pub(crate) fn selection_input(&self, type_name: &str) -> String {
        if self.config.experimental {
            naming::where_input(type_name)
        } else {
            naming::input(type_name)
        }
    }

    pub(crate) fn has_primary_key(&self, type_name: &str) -> bool {
        let fields = self.maps.merged_fields(type_name);
        primary_key(&stored_properties(&self.index, &fields)).is_some()
    }

    /// System id, query field, selection inputs and mutations of one Node type.
    pub(crate) fn augment_node_api(&mut self, type_name: &str) {
        let fields = self.maps.merged_fields(type_name);
        let properties = stored_properties(&self.index, &fields);
        let primary_key = primary_key(&properties);

        if !fields.iter().any(|field| field.name == SYSTEM_ID) {
            if let Some(own_fields) = self
                .maps
                .base_mut(type_name)
                .and_then(|definition| definition.fields_mut())
            {
                own_fields.push(build_field(FieldDesc::new(
                    SYSTEM_ID,
                    build_named_type("String", Wrappers::empty()),
                )));
            }
        }

        if self.config.query.includes(type_name) {
            let query_field = self.node_query_field(type_name, &properties);
            self.query_fields.push(query_field);
        }

        if !self.index.is_mutable_node(type_name) {
            return;
        }
        match &primary_key {
            Some(primary_key) => trace!(
                "primary key `{}` chosen by {:?}",
                primary_key.field.name, primary_key.strategy
            ),
            None => debug!("`{type_name}` has no primary key"),
        }

        self.insert_selection_inputs(type_name, &properties, primary_key.as_ref());

        if !self.config.mutation.includes(type_name) {
            debug!("`{type_name}` is excluded from mutations");
            return;
        }

        for mutation in NodeMutation::ALL {
            let field = if self.config.experimental {
                self.experimental_mutation_field(
                    mutation,
                    type_name,
                    &properties,
                    primary_key.as_ref(),
                )
            } else {
                self.node_mutation_field(mutation, type_name, &properties, primary_key.as_ref())
            };
            self.mutation_fields.extend(field);
        }
    }

    /// `T(<properties>, first, offset, orderBy, filter): [T]`
    fn node_query_field(
        &self,
        type_name: &str,
        properties: &[(FieldDescriptor, PropertyCategory)],
    ) -> FieldDefinition {
        let mut arguments: ThinVec<InputValueDefinition> = properties
            .iter()
            .map(|(field, _)| input_value(field.name, field.field.ty.clone().into_nullable()))
            .collect();

        build_query_field_arguments(
            &mut arguments,
            &QueryArguments {
                pagination: true,
                ordering: Some(naming::ordering(type_name)),
                filter: Some(naming::filter(type_name)),
            },
        );

        build_field(FieldDesc {
            arguments,
            directives: self.scope([(type_name, "Read")]).into_iter().collect(),
            ..FieldDesc::new(type_name, build_named_type(type_name, Wrappers::LIST))
        })
    }

    /// `_TInput`, plus `_TData`, `_TWhere` and `_TKeys` in experimental mode.
    ///
    /// Only `_TData` exists without a primary key.
    fn insert_selection_inputs(
        &mut self,
        type_name: &str,
        properties: &[(FieldDescriptor, PropertyCategory)],
        primary_key: Option<&PrimaryKey>,
    ) {
        if let Some(primary_key) = primary_key {
            self.insert_generated(build_input_object_type(InputObjectTypeDesc {
                name: naming::input(type_name),
                fields: vec![input_value(
                    primary_key.field.name,
                    required(primary_key.field.type_name),
                )],
                ..Default::default()
            }));
        }

        if !self.config.experimental {
            return;
        }

        if !properties.is_empty() {
            self.insert_generated(build_input_object_type(InputObjectTypeDesc {
                name: naming::data_input(type_name),
                fields: properties
                    .iter()
                    .map(|(field, _)| {
                        input_value(field.name, field.field.ty.clone().into_nullable())
                    })
                    .collect(),
                ..Default::default()
            }));
        }

        let Some(primary_key) = primary_key else {
            return;
        };
        let keys = key_fields(properties, primary_key);
        let where_name = naming::where_input(type_name);

        let mut where_fields = vec![];
        for name in [FILTER_AND, FILTER_OR] {
            where_fields.push(input_value(
                name,
                build_named_type(&where_name, Wrappers::LIST | Wrappers::NON_NULL_NAMED),
            ));
        }
        for key in &keys {
            where_fields.push(input_value(
                key.name,
                build_named_type(key.type_name, Wrappers::empty()),
            ));
            where_fields.push(input_value(
                format!("{}_in", key.name),
                build_named_type(key.type_name, Wrappers::LIST | Wrappers::NON_NULL_NAMED),
            ));
        }

        let keys_fields = keys
            .iter()
            .map(|key| input_value(key.name, build_named_type(key.type_name, Wrappers::empty())))
            .collect();

        self.insert_generated(build_input_object_type(InputObjectTypeDesc {
            name: where_name,
            fields: where_fields,
            ..Default::default()
        }));
        self.insert_generated(build_input_object_type(InputObjectTypeDesc {
            name: naming::keys_input(type_name),
            fields: keys_fields,
            ..Default::default()
        }));
    }

    /// A mutation taking flat property arguments.
    ///
    /// Create is skipped for types without properties, and Update for types
    /// with nothing but the primary key. Only Create exists without a key.
    fn node_mutation_field(
        &self,
        mutation: NodeMutation,
        type_name: &str,
        properties: &[(FieldDescriptor, PropertyCategory)],
        primary_key: Option<&PrimaryKey>,
    ) -> Option<FieldDefinition> {
        if mutation == NodeMutation::Create {
            if properties.is_empty() {
                return None;
            }
            let arguments = properties
                .iter()
                .map(|(field, _)| {
                    let generated_key = field.type_name == "ID"
                        && primary_key.is_some_and(|key| key.field.name == field.name);
                    let ty = if generated_key {
                        field.field.ty.clone().into_nullable()
                    } else {
                        field.field.ty.clone()
                    };
                    input_value(field.name, ty)
                })
                .collect();
            return Some(self.mutation_field(mutation, type_name, arguments));
        }

        let primary_key = primary_key?;
        let key_argument = input_value(primary_key.field.name, required(primary_key.field.type_name));
        let others: Vec<InputValueDefinition> = properties
            .iter()
            .filter(|(field, _)| field.name != primary_key.field.name)
            .map(|(field, _)| input_value(field.name, field.field.ty.clone().into_nullable()))
            .collect();

        let arguments: ThinVec<InputValueDefinition> = match mutation {
            NodeMutation::Update if others.is_empty() => return None,
            NodeMutation::Delete => [key_argument].into_iter().collect(),
            _ => std::iter::once(key_argument).chain(others).collect(),
        };

        Some(self.mutation_field(mutation, type_name, arguments))
    }

    /// A mutation taking `data`, `where` and `keys` inputs.
    fn experimental_mutation_field(
        &self,
        mutation: NodeMutation,
        type_name: &str,
        properties: &[(FieldDescriptor, PropertyCategory)],
        primary_key: Option<&PrimaryKey>,
    ) -> Option<FieldDefinition> {
        let data = || input_value("data", required(&naming::data_input(type_name)));
        let selection = || input_value("where", required(&naming::where_input(type_name)));

        if mutation == NodeMutation::Create {
            if properties.is_empty() {
                return None;
            }
            return Some(self.mutation_field(mutation, type_name, [data()].into_iter().collect()));
        }

        let primary_key = primary_key?;
        let arguments: ThinVec<InputValueDefinition> = match mutation {
            NodeMutation::Update => {
                let has_others = properties
                    .iter()
                    .any(|(field, _)| field.name != primary_key.field.name);
                if !has_others {
                    return None;
                }
                [selection(), data()].into_iter().collect()
            }
            NodeMutation::Delete => [selection()].into_iter().collect(),
            _ => [
                input_value("where", required(&naming::keys_input(type_name))),
                data(),
            ]
            .into_iter()
            .collect(),
        };

        Some(self.mutation_field(mutation, type_name, arguments))
    }

    fn mutation_field(
        &self,
        mutation: NodeMutation,
        type_name: &str,
        arguments: ThinVec<InputValueDefinition>,
    ) -> FieldDefinition {
        build_field(FieldDesc {
            arguments,
            directives: self
                .scope([(type_name, mutation.verb())])
                .into_iter()
                .collect(),
            ..FieldDesc::new(
                mutation.field_name(type_name),
                build_named_type(type_name, Wrappers::empty()),
            )
        })
    }
}
