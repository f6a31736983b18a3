//! The augmentation orchestrator.

use std::fmt::Display;

use cygql_ast::{
    Definition, DirectiveDefinition, Document, FieldDefinition, OperationKind, SchemaDefinition,
    TypeDefinition, TypeKind,
    build::{ObjectTypeDesc, build_object_type},
    parse_document,
};
use fnv::FnvHashSet;
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, debug_span, trace};

use crate::{
    classify::{DeclaredKind, FieldDescriptor, SchemaIndex, TypeClass},
    config::AugmentationConfig,
    directives::{self, ROLE_ENUM, augment_directive_definitions, relation_directions_enum},
    error::{AugmentError, SchemaError},
    input_values::{QueryArguments, build_query_field_arguments},
    naming,
    property_types::{
        PropertyTypeKind, collect_disabled_references, generate_property_types,
        rewrite_property_types,
    },
};

/// Parse `sdl` and augment it.
pub fn augment_schema(
    sdl: &str,
    config: &AugmentationConfig,
) -> Result<AugmentedSchema, AugmentError> {
    let document = parse_document(sdl)?;
    augment_document(document, config)
}

/// Augment a parsed document.
///
/// Every call builds its own maps, so independent calls share no state.
pub fn augment_document(
    document: Document,
    config: &AugmentationConfig,
) -> Result<AugmentedSchema, AugmentError> {
    let _entered = debug_span!("augment").entered();

    let maps = TypeMaps::ingest(document)?;
    let mut augmenter = Augmenter::new(config, maps)?;

    augmenter.register_fundamental_types();
    augmenter.augment_filter_pass();
    augmenter.augment_api_pass();
    augmenter.augment_query_cypher_fields();
    augmenter.finish_operation_types();
    augmenter.rewrite_property_types();

    Ok(AugmentedSchema {
        document: augmenter.maps.into_document(),
        config: config.clone(),
    })
}

/// The result of augmentation: a complete schema document.
#[derive(Clone, Debug)]
pub struct AugmentedSchema {
    document: Document,
    config: AugmentationConfig,
}

impl AugmentedSchema {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    /// The non-extension definition of a type
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.document.type_definition(name)
    }

    /// The name of the root type of an operation, honouring a schema definition
    pub fn operation_type_name(&self, kind: OperationKind) -> &str {
        self.document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                Definition::Schema(schema) => Some(schema),
                _ => None,
            })
            .flat_map(|schema| &schema.operations)
            .find(|operation| operation.kind == kind)
            .map(|operation| operation.type_name.as_str())
            .unwrap_or(kind.default_type_name())
    }

    /// A field of a root operation type, looking through extensions
    pub fn operation_field(&self, kind: OperationKind, field_name: &str) -> Option<&FieldDefinition> {
        let type_name = self.operation_type_name(kind);
        self.document
            .type_definitions()
            .filter(|definition| definition.name == type_name)
            .flat_map(|definition| definition.fields())
            .find(|field| field.name == field_name)
    }

    pub fn to_sdl(&self) -> String {
        self.document.to_string()
    }
}

impl Display for AugmentedSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.document.fmt(f)
    }
}

/// Position of an original definition in the source document
enum Slot {
    Schema(SchemaDefinition),
    Type(String),
    Extension(String, usize),
    Operation(OperationKind),
    Directive(String),
}

/// The root type of one operation kind.
struct OperationType {
    name: String,
    definition: Option<TypeDefinition>,
    /// Whether the definition came from the source document
    declared: bool,
}

/// The accumulator maps of one augmentation call.
pub(crate) struct TypeMaps {
    /// Non-operation type definitions
    pub types: IndexMap<String, TypeDefinition>,
    /// Extensions per type, in declaration order
    pub extensions: IndexMap<String, Vec<TypeDefinition>>,
    operations: [OperationType; 3],
    pub generated: IndexMap<String, TypeDefinition>,
    pub directives: IndexMap<String, DirectiveDefinition>,
    declared_directives: usize,
    order: Vec<Slot>,
}

impl TypeMaps {
    fn ingest(document: Document) -> Result<Self, SchemaError> {
        let mut operation_names = OperationKind::ALL.map(|kind| kind.default_type_name().to_string());
        for definition in &document.definitions {
            if let Definition::Schema(schema) = definition {
                for operation in &schema.operations {
                    let index = operation_index(operation.kind);
                    operation_names[index] = operation.type_name.clone();
                }
            }
        }

        let mut maps = Self {
            types: IndexMap::new(),
            extensions: IndexMap::new(),
            operations: operation_names.map(|name| OperationType {
                name,
                definition: None,
                declared: false,
            }),
            generated: IndexMap::new(),
            directives: IndexMap::new(),
            declared_directives: 0,
            order: vec![],
        };

        for definition in document.definitions {
            match definition {
                Definition::Schema(schema) => maps.order.push(Slot::Schema(schema)),
                Definition::Directive(directive) => {
                    maps.order.push(Slot::Directive(directive.name.clone()));
                    maps.directives.insert(directive.name.clone(), directive);
                }
                Definition::Type(type_def) if type_def.extend => {
                    let extensions = maps.extensions.entry(type_def.name.clone()).or_default();
                    maps.order
                        .push(Slot::Extension(type_def.name.clone(), extensions.len()));
                    extensions.push(type_def);
                }
                Definition::Type(type_def) => {
                    let name = type_def.name.clone();
                    if maps.types.contains_key(&name) || maps.operation_by_name(&name).is_some() {
                        return Err(SchemaError::DuplicateType(name));
                    }

                    match maps.operations.iter_mut().position(|operation| operation.name == name) {
                        Some(index) => {
                            maps.operations[index].definition = Some(type_def);
                            maps.operations[index].declared = true;
                            maps.order.push(Slot::Operation(OperationKind::ALL[index]));
                        }
                        None => {
                            maps.order.push(Slot::Type(name.clone()));
                            maps.types.insert(name, type_def);
                        }
                    }
                }
            }
        }

        maps.declared_directives = maps.directives.len();
        Ok(maps)
    }

    fn operation_by_name(&self, name: &str) -> Option<&TypeDefinition> {
        self.operations
            .iter()
            .find(|operation| operation.name == name)
            .and_then(|operation| operation.definition.as_ref())
    }

    pub fn operation_name(&self, kind: OperationKind) -> &str {
        &self.operations[operation_index(kind)].name
    }

    pub fn is_operation_type(&self, name: &str) -> bool {
        self.operations.iter().any(|operation| operation.name == name)
    }

    /// The base definition, wherever it is stored
    pub fn base(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name).or_else(|| self.operation_by_name(name))
    }

    pub fn base_mut(&mut self, name: &str) -> Option<&mut TypeDefinition> {
        if let Some(type_def) = self.types.get_mut(name) {
            return Some(type_def);
        }
        self.operations
            .iter_mut()
            .find(|operation| operation.name == name)
            .and_then(|operation| operation.definition.as_mut())
    }

    /// The base definition followed by the extensions of a type
    pub fn definitions_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a TypeDefinition> {
        self.base(name)
            .into_iter()
            .chain(self.extensions.get(name).into_iter().flatten())
    }

    /// All output fields of a type, extensions included, as owned copies
    pub fn merged_fields(&self, name: &str) -> Vec<FieldDefinition> {
        self.definitions_of(name)
            .flat_map(|definition| definition.fields())
            .cloned()
            .collect()
    }

    pub fn field_mut(&mut self, type_name: &str, field_name: &str) -> Option<&mut FieldDefinition> {
        let in_base = self
            .base(type_name)
            .is_some_and(|definition| definition.field(field_name).is_some());

        if in_base {
            return self
                .base_mut(type_name)
                .and_then(|definition| definition.fields_mut())
                .and_then(|fields| fields.iter_mut().find(|field| field.name == field_name));
        }

        self.extensions
            .get_mut(type_name)?
            .iter_mut()
            .filter_map(|extension| extension.fields_mut())
            .flatten()
            .find(|field| field.name == field_name)
    }

    /// Every definition that takes part in the rewrite pass
    fn all_definitions_mut(&mut self) -> impl Iterator<Item = &mut TypeDefinition> {
        self.types
            .values_mut()
            .chain(self.extensions.values_mut().flatten())
            .chain(
                self.operations
                    .iter_mut()
                    .filter_map(|operation| operation.definition.as_mut()),
            )
            .chain(self.generated.values_mut())
    }

    fn all_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types
            .values()
            .chain(self.extensions.values().flatten())
            .chain(
                self.operations
                    .iter()
                    .filter_map(|operation| operation.definition.as_ref()),
            )
            .chain(self.generated.values())
    }

    /// Original definitions in source order, then new root types, then
    /// generated types, then synthesized directive definitions.
    fn into_document(mut self) -> Document {
        let mut definitions = Vec::with_capacity(
            self.order.len() + self.generated.len() + self.directives.len(),
        );

        for slot in std::mem::take(&mut self.order) {
            let definition = match slot {
                Slot::Schema(schema) => Some(Definition::Schema(schema)),
                Slot::Type(name) => self.types.swap_remove(&name).map(Definition::Type),
                Slot::Extension(name, index) => self
                    .extensions
                    .get_mut(&name)
                    .and_then(|extensions| extensions.get_mut(index))
                    .map(|extension| Definition::Type(extension.clone())),
                Slot::Operation(kind) => self.operations[operation_index(kind)]
                    .definition
                    .take()
                    .map(Definition::Type),
                Slot::Directive(name) => self.directives.get(&name).cloned().map(Definition::Directive),
            };
            definitions.extend(definition);
        }

        for operation in &mut self.operations {
            if !operation.declared {
                definitions.extend(operation.definition.take().map(Definition::Type));
            }
        }

        definitions.extend(self.generated.into_values().map(Definition::Type));
        definitions.extend(
            self.directives
                .into_values()
                .skip(self.declared_directives)
                .map(Definition::Directive),
        );

        Document { definitions }
    }
}

fn operation_index(kind: OperationKind) -> usize {
    match kind {
        OperationKind::Query => 0,
        OperationKind::Mutation => 1,
        OperationKind::Subscription => 2,
    }
}

/// Drives the augmentation passes over one document.
pub(crate) struct Augmenter<'c> {
    pub config: &'c AugmentationConfig,
    pub index: SchemaIndex,
    pub maps: TypeMaps,
    /// Node types in source order, extension-only types last
    pub node_types: Vec<String>,
    /// Generated root fields, appended to the root types at the end
    pub query_fields: Vec<FieldDefinition>,
    pub mutation_fields: Vec<FieldDefinition>,
}

impl<'c> Augmenter<'c> {
    fn new(config: &'c AugmentationConfig, mut maps: TypeMaps) -> Result<Self, AugmentError> {
        let mut index = SchemaIndex::default();
        let mut node_types = vec![];

        let names: Vec<String> = maps
            .types
            .keys()
            .chain(maps.extensions.keys())
            .chain(maps.operations.iter().map(|operation| &operation.name))
            .unique()
            .cloned()
            .collect();

        for name in names {
            let Some(representative) = maps.definitions_of(&name).next() else {
                continue;
            };
            let fields: Vec<&FieldDefinition> = maps
                .definitions_of(&name)
                .flat_map(|definition| definition.fields())
                .collect();

            directives::validate_field_directives(&name, &fields)?;

            let external = maps.base(&name).is_none();
            let operation = maps.is_operation_type(&name);
            index.register(representative, &fields, external, operation);

            if index.class(&name) == TypeClass::Node {
                node_types.push(name);
            }
        }

        let has_role_enum = index.declared_kind(ROLE_ENUM) == Some(DeclaredKind::Enum);
        augment_directive_definitions(&mut maps.directives, has_role_enum, config)?;

        Ok(Self {
            config,
            index,
            maps,
            node_types,
            query_fields: vec![],
            mutation_fields: vec![],
        })
    }

    /// Types every augmented schema carries
    fn register_fundamental_types(&mut self) {
        if self.maps.base(directives::RELATION_DIRECTIONS).is_none() {
            self.insert_generated(relation_directions_enum());
        }
        for property_type in generate_property_types(self.config) {
            self.insert_generated(property_type);
        }
    }

    /// Filters and orderings of every Node type, and the inputs of every
    /// relationship type. These must exist before relation fields refer to them.
    fn augment_filter_pass(&mut self) {
        let _entered = debug_span!("filters").entered();

        for type_name in self.node_types.clone() {
            if self.index.is_ignored(&type_name) {
                debug!("`{type_name}` is ignored");
                continue;
            }
            if !self.config.query.includes(&type_name) {
                debug!("`{type_name}` is excluded from queries");
                continue;
            }
            self.augment_node_filter(&type_name);
        }

        let relationships: Vec<_> = self.index.relationships().cloned().collect();
        for relationship in relationships {
            self.augment_relationship_inputs(&relationship);
        }
    }

    /// Relation fields first, then the generated API of each Node type.
    fn augment_api_pass(&mut self) {
        let _entered = debug_span!("api").entered();

        for type_name in self.node_types.clone() {
            let _entered = debug_span!("node", name = %type_name).entered();

            if self.index.is_ignored(&type_name) {
                debug!("skip API of ignored type");
                continue;
            }

            let relation_mutations = self.augment_node_fields(&type_name);
            self.augment_node_api(&type_name);
            self.mutation_fields.extend(relation_mutations);
        }
    }

    /// Pagination, ordering and filter arguments for user `@cypher` query
    /// fields returning lists of Node types.
    fn augment_query_cypher_fields(&mut self) {
        let query_name = self.maps.operation_name(OperationKind::Query).to_string();

        for field in self.maps.merged_fields(&query_name) {
            let descriptor = FieldDescriptor::new(&field);
            if !directives::is_cypher_field(&field)
                || !descriptor.is_list()
                || !self.index.is_node(descriptor.type_name)
            {
                continue;
            }

            let Some(query_arguments) = self.relation_query_arguments(descriptor.type_name, true)
            else {
                continue;
            };

            trace!("add query arguments to `{query_name}.{}`", field.name);
            if let Some(field) = self.maps.field_mut(&query_name, &field.name) {
                build_query_field_arguments(&mut field.arguments, &query_arguments);
            }
        }
    }

    /// Generated arguments of a field returning `target`, when its filter exists
    pub(crate) fn relation_query_arguments(
        &self,
        target: &str,
        is_list: bool,
    ) -> Option<QueryArguments> {
        let filter = naming::filter(target);
        if !self.maps.generated.contains_key(&filter) {
            return None;
        }

        let ordering = naming::ordering(target);
        Some(QueryArguments {
            pagination: is_list,
            ordering: (is_list && self.maps.generated.contains_key(&ordering)).then_some(ordering),
            filter: Some(filter),
        })
    }

    /// Append generated root fields, never replacing a declared field.
    fn finish_operation_types(&mut self) {
        let fields = [
            (OperationKind::Query, std::mem::take(&mut self.query_fields)),
            (OperationKind::Mutation, std::mem::take(&mut self.mutation_fields)),
        ];

        for (kind, generated_fields) in fields {
            if generated_fields.is_empty() {
                continue;
            }

            let type_name = self.maps.operation_name(kind).to_string();
            let declared: FnvHashSet<String> = self
                .maps
                .definitions_of(&type_name)
                .flat_map(|definition| definition.fields())
                .map(|field| field.name.clone())
                .collect();

            let operation = &mut self.maps.operations[operation_index(kind)];
            let definition = operation.definition.get_or_insert_with(|| {
                build_object_type(ObjectTypeDesc {
                    name: type_name.clone(),
                    ..Default::default()
                })
            });

            let Some(fields) = definition.fields_mut() else {
                continue;
            };

            for field in generated_fields {
                if declared.contains(&field.name) || fields.iter().any(|f| f.name == field.name) {
                    debug!("keep declared field `{type_name}.{}`", field.name);
                    continue;
                }
                fields.push(field);
            }
        }
    }

    /// Retarget temporal and spatial references, and declare the bare
    /// names of disabled kinds that remain referenced.
    fn rewrite_property_types(&mut self) {
        let _entered = debug_span!("property_types").entered();

        for definition in self.maps.all_definitions_mut() {
            rewrite_property_types(definition, self.config);
        }

        let mut disabled = FnvHashSet::default();
        for definition in self.maps.all_definitions() {
            collect_disabled_references(definition, self.config, &mut disabled);
        }

        for kind in PropertyTypeKind::all() {
            let name = kind.type_name();
            if disabled.contains(name) && self.maps.base(name).is_none() {
                trace!("declare disabled property type `{name}` as scalar");
                self.insert_generated(TypeDefinition {
                    extend: false,
                    description: None,
                    name: name.to_string(),
                    directives: Default::default(),
                    kind: TypeKind::Scalar,
                });
            }
        }
    }

    /// Add a generated type. Declared types of the same name win.
    pub(crate) fn insert_generated(&mut self, definition: TypeDefinition) {
        if self.maps.base(&definition.name).is_some() {
            debug!("`{}` is declared, not generated", definition.name);
            return;
        }
        if self.maps.generated.contains_key(&definition.name) {
            trace!("regenerate `{}`", definition.name);
        }
        self.maps.generated.insert(definition.name.clone(), definition);
    }
}
