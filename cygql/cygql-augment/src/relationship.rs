//! Relation fields, relationship types and relation mutations.
//!
//! A relation field is either anonymous, pointing straight at a Node type
//! and carrying `@relation(name, direction)`, or typed by a relationship
//! type whose endpoint fields decide the direction. Relationship types with
//! the same type at both ends are reflexive: the field then exposes the
//! relationship in both directions at once.

use cygql_ast::{
    FieldDefinition, HasDirectives, InputValueDefinition, Wrappers,
    build::{
        EnumTypeDesc, FieldDesc, InputObjectTypeDesc, InputValueDesc, ObjectTypeDesc,
        build_enum_type, build_field, build_input_object_type, build_input_value,
        build_named_type, build_object_type,
    },
};
use thin_vec::ThinVec;
use tracing::{debug, debug_span, trace};

use crate::{
    augment::Augmenter,
    classify::{FieldDescriptor, FieldFlags, FieldRole, PropertyCategory, RelationshipType},
    directives::{
        RELATION, RelationDirection, field_relation_directive, mutation_meta_directive,
        type_relation_directive,
    },
    input_values::{
        QueryArguments, build_query_field_arguments, is_orderable, logical_filter_fields,
        ordering_values, property_filter_fields, relation_filter_fields,
    },
    naming::{self, RelationMutation},
};

/// The participants of the relation behind one relation field
struct RelationEndpoints<'a> {
    relation_name: &'a str,
    from_type: &'a str,
    to_type: &'a str,
    /// Names of the endpoint fields in mutation payloads
    from_field: &'a str,
    to_field: &'a str,
    /// The relationship type carrying properties, if any
    relationship: Option<&'a RelationshipType>,
}

/// How a relationship-typed field relates its owner to the relationship
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum RelationshipShape {
    Directed(RelationDirection),
    Reflexive,
}

impl Augmenter<'_> {
    /// Stored properties of a relationship type, endpoints excluded
    fn relationship_properties(
        &self,
        relationship: &RelationshipType,
    ) -> Vec<(FieldDefinition, PropertyCategory)> {
        self.maps
            .merged_fields(&relationship.type_name)
            .into_iter()
            .filter(|field| !relationship.is_endpoint(&field.name))
            .filter_map(|field| {
                let role = self.index.field_role(&FieldDescriptor::new(&field));
                match role {
                    FieldRole::Property(category) => Some((field, category)),
                    _ => None,
                }
            })
            .collect()
    }

    /// `_<R>Input` and `_<R>Ordering` for one relationship type.
    pub(crate) fn augment_relationship_inputs(&mut self, relationship: &RelationshipType) {
        let properties = self.relationship_properties(relationship);
        if properties.is_empty() {
            return;
        }

        let input_fields = properties
            .iter()
            .map(|(field, _)| build_input_value(InputValueDesc::new(&field.name, field.ty.clone())))
            .collect();

        let ordering: Vec<_> = properties
            .iter()
            .filter(|(field, category)| is_orderable(&FieldDescriptor::new(field), *category))
            .flat_map(|(field, _)| ordering_values(&field.name))
            .collect();

        self.insert_generated(build_input_object_type(InputObjectTypeDesc {
            name: naming::relationship_input(&relationship.type_name),
            fields: input_fields,
            ..Default::default()
        }));

        if !ordering.is_empty() {
            self.insert_generated(build_enum_type(EnumTypeDesc {
                name: naming::ordering(&relationship.type_name),
                values: ordering,
                ..Default::default()
            }));
        }
    }

    /// Augment the relation fields of one Node type.
    ///
    /// Returns the relation mutations, which are emitted after the node's own.
    pub(crate) fn augment_node_fields(&mut self, type_name: &str) -> Vec<FieldDefinition> {
        let mut mutations = vec![];

        for field in self.maps.merged_fields(type_name) {
            let descriptor = FieldDescriptor::new(&field);
            match self.index.field_role(&descriptor) {
                FieldRole::NodeRelation => {
                    self.augment_node_relation(type_name, &field, &mut mutations)
                }
                FieldRole::RelationshipRelation => {
                    self.augment_relationship_field(type_name, &field, &mut mutations)
                }
                role => trace!("`{type_name}.{}` is {role:?}", field.name),
            }
        }

        mutations
    }

    /// A field pointing straight at a Node type.
    fn augment_node_relation(
        &mut self,
        owner: &str,
        field: &FieldDefinition,
        mutations: &mut Vec<FieldDefinition>,
    ) {
        let descriptor = FieldDescriptor::new(field);
        let target = descriptor.type_name;
        let computed = descriptor.flags.contains(FieldFlags::COMPUTED);

        if !computed && !descriptor.flags.contains(FieldFlags::RELATION) {
            debug!("`{owner}.{}` has neither @relation nor @cypher", field.name);
            return;
        }

        if self.config.query.includes(owner) {
            if let Some(query_arguments) = self.relation_query_arguments(target, descriptor.is_list())
            {
                if let Some(owned) = self.maps.field_mut(owner, &field.name) {
                    build_query_field_arguments(&mut owned.arguments, &query_arguments);
                }
                if !computed {
                    self.extend_filter(
                        owner,
                        relation_filter_fields(
                            &field.name,
                            &naming::filter(target),
                            descriptor.is_list(),
                        ),
                    );
                }
            }
        }

        if computed {
            return;
        }

        let Some(directive) = field.directive(RELATION) else {
            return;
        };
        let Some(relation_name) = directive.string_argument("name") else {
            debug!("`{owner}.{}` has @relation without a name", field.name);
            return;
        };
        let direction = RelationDirection::from_directive(directive).unwrap_or(RelationDirection::Out);
        let (from_type, to_type) = match direction {
            RelationDirection::Out => (owner, target),
            RelationDirection::In => (target, owner),
        };

        mutations.extend(self.relation_mutations(
            owner,
            &field.name,
            RelationEndpoints {
                relation_name,
                from_type,
                to_type,
                from_field: "from",
                to_field: "to",
                relationship: None,
            },
        ));
    }

    /// A field typed by a relationship type.
    fn augment_relationship_field(
        &mut self,
        owner: &str,
        field: &FieldDefinition,
        mutations: &mut Vec<FieldDefinition>,
    ) {
        let descriptor = FieldDescriptor::new(field);
        let Some(relationship) = self.index.relationship(descriptor.type_name).cloned() else {
            return;
        };
        let _entered = debug_span!("relationship", field = %field.name).entered();

        let shape = if relationship.is_reflexive() {
            if owner != relationship.from_type {
                debug!("`{owner}` is not an endpoint of `{}`", relationship.type_name);
                return;
            }
            RelationshipShape::Reflexive
        } else {
            let declared = field
                .directive(RELATION)
                .and_then(RelationDirection::from_directive);
            let direction = match declared {
                Some(direction) => direction,
                None if owner == relationship.from_type => RelationDirection::Out,
                None if owner == relationship.to_type => RelationDirection::In,
                None => {
                    debug!("`{owner}` is not an endpoint of `{}`", relationship.type_name);
                    return;
                }
            };
            RelationshipShape::Directed(direction)
        };

        let target = match shape {
            RelationshipShape::Directed(RelationDirection::Out) => relationship.to_type.as_str(),
            RelationshipShape::Directed(RelationDirection::In) => relationship.from_type.as_str(),
            RelationshipShape::Reflexive => owner,
        };

        let field_type = naming::relation_field_type(owner, &field.name);
        self.insert_relationship_output(&field_type, &relationship, target);

        let filter = self
            .config
            .query
            .includes(owner)
            .then(|| self.insert_relationship_filter(owner, &field.name, &relationship, target));

        let query_arguments = filter.as_ref().map(|filter| {
            let ordering = naming::ordering(&relationship.type_name);
            QueryArguments {
                pagination: descriptor.is_list(),
                ordering: (descriptor.is_list() && self.maps.generated.contains_key(&ordering))
                    .then_some(ordering),
                filter: Some(filter.clone()),
            }
        });

        match shape {
            RelationshipShape::Directed(direction) => {
                let mut arguments = field.arguments.clone();
                if let (Some(filter), Some(query_arguments)) = (&filter, &query_arguments) {
                    build_query_field_arguments(&mut arguments, query_arguments);
                    self.extend_filter(
                        owner,
                        relation_filter_fields(&field.name, filter, descriptor.is_list()),
                    );
                }

                if let Some(owned) = self.maps.field_mut(owner, &field.name) {
                    owned.ty = field.ty.with_base_name(&field_type);
                    owned.arguments = arguments;
                    if !owned.has_directive(RELATION) {
                        owned
                            .directives
                            .push(field_relation_directive(&relationship.relation_name, direction));
                    }
                }
            }
            RelationshipShape::Reflexive => {
                let directions = naming::directions(owner, &field.name);
                let mut arguments = field.arguments.clone();

                if let (Some(filter), Some(query_arguments)) = (&filter, &query_arguments) {
                    build_query_field_arguments(&mut arguments, query_arguments);

                    let directions_filter = naming::directions_filter(owner, &field.name);
                    self.insert_generated(build_input_object_type(InputObjectTypeDesc {
                        name: directions_filter.clone(),
                        fields: [&relationship.from_field, &relationship.to_field]
                            .into_iter()
                            .map(|name| {
                                build_input_value(InputValueDesc::new(
                                    name,
                                    build_named_type(filter, Wrappers::empty()),
                                ))
                            })
                            .collect(),
                        ..Default::default()
                    }));

                    // a single directions value: equality and negation only
                    self.extend_filter(
                        owner,
                        relation_filter_fields(&field.name, &directions_filter, false)
                            .into_iter()
                            .take(2),
                    );
                }

                let side_type = field.ty.with_base_name(&field_type);
                self.insert_generated(build_object_type(ObjectTypeDesc {
                    name: directions.clone(),
                    directives: [type_relation_directive(
                        &relationship.relation_name,
                        &relationship.from_type,
                        &relationship.to_type,
                    )]
                    .into_iter()
                    .collect(),
                    fields: [&relationship.from_field, &relationship.to_field]
                        .into_iter()
                        .map(|name| {
                            build_field(FieldDesc {
                                arguments: arguments.clone(),
                                ..FieldDesc::new(name, side_type.clone())
                            })
                        })
                        .collect(),
                    ..Default::default()
                }));

                if let Some(owned) = self.maps.field_mut(owner, &field.name) {
                    owned.ty = build_named_type(&directions, Wrappers::empty());
                    owned.arguments = ThinVec::new();
                }
            }
        }

        mutations.extend(self.relation_mutations(
            owner,
            &field.name,
            RelationEndpoints {
                relation_name: &relationship.relation_name,
                from_type: &relationship.from_type,
                to_type: &relationship.to_type,
                from_field: &relationship.from_field,
                to_field: &relationship.to_field,
                relationship: Some(&relationship),
            },
        ));
    }

    /// `_<Owner><Field>`: the relationship properties plus the node at the far end
    fn insert_relationship_output(
        &mut self,
        field_type: &str,
        relationship: &RelationshipType,
        target: &str,
    ) {
        let mut fields: Vec<FieldDefinition> = self
            .maps
            .merged_fields(&relationship.type_name)
            .into_iter()
            .filter(|field| !relationship.is_endpoint(&field.name))
            .filter(|field| !FieldDescriptor::new(field).flags.contains(FieldFlags::IGNORED))
            .collect();

        fields.push(build_field(FieldDesc::new(
            target,
            build_named_type(target, Wrappers::empty()),
        )));

        self.insert_generated(build_object_type(ObjectTypeDesc {
            name: field_type.to_string(),
            directives: [type_relation_directive(
                &relationship.relation_name,
                &relationship.from_type,
                &relationship.to_type,
            )]
            .into_iter()
            .collect(),
            fields,
            ..Default::default()
        }));
    }

    /// `_<Owner><Field>Filter`, returning its name
    fn insert_relationship_filter(
        &mut self,
        owner: &str,
        field_name: &str,
        relationship: &RelationshipType,
        target: &str,
    ) -> String {
        let filter_name = naming::relation_field_filter(owner, field_name);
        let mut filter_fields = logical_filter_fields(&filter_name);

        for (field, category) in self.relationship_properties(relationship) {
            filter_fields.extend(property_filter_fields(
                &FieldDescriptor::new(&field),
                category,
                self.config,
            ));
        }

        let target_filter = naming::filter(target);
        if self.maps.generated.contains_key(&target_filter) {
            filter_fields.push(build_input_value(InputValueDesc::new(
                target,
                build_named_type(&target_filter, Wrappers::empty()),
            )));
        }

        self.insert_generated(build_input_object_type(InputObjectTypeDesc {
            name: filter_name.clone(),
            fields: filter_fields,
            ..Default::default()
        }));

        filter_name
    }

    /// Add, Remove, Update and Merge mutations of one relation field.
    ///
    /// Both endpoints must be mutable Node types with a primary key.
    /// Update only exists when the relationship has properties.
    fn relation_mutations(
        &mut self,
        owner: &str,
        field_name: &str,
        endpoints: RelationEndpoints,
    ) -> Vec<FieldDefinition> {
        if !self.config.mutation.includes(owner) {
            return vec![];
        }

        for endpoint in [endpoints.from_type, endpoints.to_type] {
            if !self.index.is_mutable_node(endpoint)
                || self.index.is_ignored(endpoint)
                || !self.has_primary_key(endpoint)
            {
                debug!("`{endpoint}` cannot be selected, no mutations for `{owner}.{field_name}`");
                return vec![];
            }
        }

        let properties = endpoints
            .relationship
            .map(|relationship| self.relationship_properties(relationship))
            .unwrap_or_default();
        let data_input = endpoints
            .relationship
            .map(|relationship| naming::relationship_input(&relationship.type_name));
        let data_required = properties.iter().any(|(field, _)| field.ty.is_non_null());

        let mut fields = vec![];

        for mutation in RelationMutation::ALL {
            if mutation == RelationMutation::Update && properties.is_empty() {
                continue;
            }

            let mut arguments: ThinVec<InputValueDefinition> = [
                ("from", endpoints.from_type),
                ("to", endpoints.to_type),
            ]
            .into_iter()
            .map(|(name, type_name)| {
                build_input_value(InputValueDesc::new(
                    name,
                    build_named_type(&self.selection_input(type_name), Wrappers::NON_NULL_NAMED),
                ))
            })
            .collect();

            if let Some(data_input) = data_input.as_deref().filter(|_| !properties.is_empty()) {
                let data_wrappers = match mutation {
                    RelationMutation::Update => Some(Wrappers::NON_NULL_NAMED),
                    RelationMutation::Add | RelationMutation::Merge if data_required => {
                        Some(Wrappers::NON_NULL_NAMED)
                    }
                    RelationMutation::Add | RelationMutation::Merge => Some(Wrappers::empty()),
                    RelationMutation::Remove => None,
                };
                if let Some(wrappers) = data_wrappers {
                    arguments.push(build_input_value(InputValueDesc::new(
                        "data",
                        build_named_type(data_input, wrappers),
                    )));
                }
            }

            let payload = mutation.payload(owner, field_name);
            let mut payload_fields = vec![
                build_field(FieldDesc::new(
                    endpoints.from_field,
                    build_named_type(endpoints.from_type, Wrappers::empty()),
                )),
                build_field(FieldDesc::new(
                    endpoints.to_field,
                    build_named_type(endpoints.to_type, Wrappers::empty()),
                )),
            ];
            if mutation != RelationMutation::Remove {
                payload_fields.extend(properties.iter().map(|(field, _)| {
                    build_field(FieldDesc::new(&field.name, field.ty.clone()))
                }));
            }

            self.insert_generated(build_object_type(ObjectTypeDesc {
                name: payload.clone(),
                directives: [type_relation_directive(
                    endpoints.relation_name,
                    endpoints.from_type,
                    endpoints.to_type,
                )]
                .into_iter()
                .collect(),
                fields: payload_fields,
                ..Default::default()
            }));

            let action = mutation.scope_action();
            let directives = std::iter::once(mutation_meta_directive(
                endpoints.relation_name,
                endpoints.from_type,
                endpoints.to_type,
            ))
            .chain(self.scope([
                (endpoints.from_type, action),
                (endpoints.to_type, action),
            ]))
            .collect();

            fields.push(build_field(FieldDesc {
                arguments,
                directives,
                ..FieldDesc::new(
                    mutation.field_name(owner, field_name),
                    build_named_type(&payload, Wrappers::empty()),
                )
            }));
        }

        fields
    }
}
