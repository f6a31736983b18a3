//! Type reference unwrapping and type/field classification.

use bitflags::bitflags;
use cygql_ast::{
    Directive, FieldDefinition, HasDirectives, Type, TypeDefinition, TypeKind, Wrappers,
};
use fnv::FnvHashSet;
use indexmap::IndexMap;

use crate::{
    directives::{self, RELATION},
    property_types::{PropertyTypeKind, SpatialKind, TemporalKind, is_property_type_name},
};

/// The named type at the core of a type reference, and how it was wrapped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UnwrappedType<'a> {
    pub name: &'a str,
    pub wrappers: Wrappers,
}

impl UnwrappedType<'_> {
    pub fn is_list(&self) -> bool {
        self.wrappers.contains(Wrappers::LIST)
    }
}

/// Descend through list and non-null wrappers.
///
/// Flags are decided on the way back up, so a non-null wrapper applies to
/// the list if one was found below it and to the name otherwise.
pub fn unwrap_named_type(ty: &Type) -> UnwrappedType<'_> {
    match ty {
        Type::Named(name) => UnwrappedType {
            name,
            wrappers: Wrappers::empty(),
        },
        Type::List(inner) => {
            let mut unwrapped = unwrap_named_type(inner);
            unwrapped.wrappers |= Wrappers::LIST;
            unwrapped
        }
        Type::NonNull(inner) => {
            let mut unwrapped = unwrap_named_type(inner);
            if unwrapped.wrappers.contains(Wrappers::LIST) {
                unwrapped.wrappers |= Wrappers::NON_NULL_LIST;
            } else {
                unwrapped.wrappers |= Wrappers::NON_NULL_NAMED;
            }
            unwrapped
        }
    }
}

/// The category of a property-typed field, which selects its filter operators.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PropertyCategory {
    Id,
    String,
    Int,
    Float,
    Boolean,
    Enum,
    /// A user declared scalar
    Scalar,
    Temporal(TemporalKind),
    Spatial(SpatialKind),
}

impl PropertyCategory {
    pub fn is_spatial(self) -> bool {
        matches!(self, Self::Spatial(_))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TypeClass {
    Node,
    Relationship,
    Other,
}

/// A relationship type: two endpoint fields plus properties.
#[derive(Clone, Debug)]
pub struct RelationshipType {
    pub type_name: String,
    /// The relationship name, defaulting to the type name
    pub relation_name: String,
    pub from_field: String,
    pub to_field: String,
    pub from_type: String,
    pub to_type: String,
}

impl RelationshipType {
    pub fn is_reflexive(&self) -> bool {
        self.from_type == self.to_type
    }

    pub fn is_endpoint(&self, field_name: &str) -> bool {
        field_name == self.from_field || field_name == self.to_field
    }
}

/// The declared endpoint field names of a relationship type
fn endpoint_names(directive: &Directive) -> (&str, &str) {
    (
        directive.string_argument("from").unwrap_or("from"),
        directive.string_argument("to").unwrap_or("to"),
    )
}

/// Classify a type definition, given all of its fields (extensions included).
///
/// A type carrying `@relation` without both endpoint fields degrades to Node.
pub fn interpret_type(definition: &TypeDefinition, fields: &[&FieldDefinition]) -> TypeClass {
    if !matches!(definition.kind, TypeKind::Object(_) | TypeKind::Interface(_)) {
        return TypeClass::Other;
    }

    if let Some(directive) = definition.directive(RELATION) {
        let (from, to) = endpoint_names(directive);
        let has_endpoint = |name: &str| fields.iter().any(|field| field.name == name);

        if has_endpoint(from) && has_endpoint(to) {
            return TypeClass::Relationship;
        }
    }

    if is_property_type_name(&definition.name) {
        TypeClass::Other
    } else {
        TypeClass::Node
    }
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
    pub struct FieldFlags: u8 {
        const COMPUTED = 0b000001;
        const IGNORED = 0b000010;
        const ID = 0b000100;
        const UNIQUE = 0b001000;
        const INDEX = 0b010000;
        const RELATION = 0b100000;
    }
}

/// Transient view of a field, derived fresh from the AST on each visit.
#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor<'a> {
    pub name: &'a str,
    pub type_name: &'a str,
    pub wrappers: Wrappers,
    pub flags: FieldFlags,
    pub field: &'a FieldDefinition,
}

impl<'a> FieldDescriptor<'a> {
    pub fn new(field: &'a FieldDefinition) -> Self {
        let unwrapped = unwrap_named_type(&field.ty);
        let mut flags = FieldFlags::empty();
        flags.set(FieldFlags::COMPUTED, directives::is_cypher_field(field));
        flags.set(FieldFlags::IGNORED, directives::is_ignored_field(field));
        flags.set(FieldFlags::ID, directives::is_id_field(field));
        flags.set(FieldFlags::UNIQUE, directives::is_unique_field(field));
        flags.set(FieldFlags::INDEX, directives::is_index_field(field));
        flags.set(FieldFlags::RELATION, directives::is_relation_field(field));

        Self {
            name: &field.name,
            type_name: unwrapped.name,
            wrappers: unwrapped.wrappers,
            flags,
            field,
        }
    }

    pub fn is_list(&self) -> bool {
        self.wrappers.contains(Wrappers::LIST)
    }

    pub fn is_non_null(&self) -> bool {
        self.field.ty.is_non_null()
    }
}

/// What a field of a Node type means for augmentation
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FieldRole {
    /// A stored property
    Property(PropertyCategory),
    /// A property computed by `@cypher`
    ComputedProperty(PropertyCategory),
    /// A relation to another Node type
    NodeRelation,
    /// A field typed as a relationship type
    RelationshipRelation,
    /// Anything the augmentation leaves alone
    Other,
}

/// Lookup of declared types by name, shared by every augmenter.
#[derive(Default, Debug)]
pub struct SchemaIndex {
    kinds: IndexMap<String, DeclaredKind>,
    classes: IndexMap<String, TypeClass>,
    relationships: IndexMap<String, RelationshipType>,
    /// Types only present as extensions
    external: FnvHashSet<String>,
    /// Types whose every field is ignored
    ignored: FnvHashSet<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeclaredKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl DeclaredKind {
    fn of(kind: &TypeKind) -> Self {
        match kind {
            TypeKind::Scalar => Self::Scalar,
            TypeKind::Object(_) => Self::Object,
            TypeKind::Interface(_) => Self::Interface,
            TypeKind::Union(_) => Self::Union,
            TypeKind::Enum(_) => Self::Enum,
            TypeKind::InputObject(_) => Self::InputObject,
        }
    }
}

impl SchemaIndex {
    /// Register a type with all of its fields, extensions included.
    ///
    /// `external` marks a type that only exists as an extension.
    pub fn register(
        &mut self,
        definition: &TypeDefinition,
        fields: &[&FieldDefinition],
        external: bool,
        operation: bool,
    ) {
        let name = definition.name.clone();
        self.kinds.insert(name.clone(), DeclaredKind::of(&definition.kind));

        if external {
            self.external.insert(name.clone());
        }

        if !fields.is_empty() && fields.iter().all(|field| directives::is_ignored_field(*field)) {
            self.ignored.insert(name.clone());
        }

        let class = if operation {
            TypeClass::Other
        } else {
            interpret_type(definition, fields)
        };

        if class == TypeClass::Relationship {
            if let Some(relationship) = relationship_type(definition, fields) {
                self.relationships.insert(name.clone(), relationship);
            }
        }

        self.classes.insert(name, class);
    }

    pub fn declared_kind(&self, name: &str) -> Option<DeclaredKind> {
        self.kinds.get(name).copied()
    }

    pub fn class(&self, name: &str) -> TypeClass {
        self.classes.get(name).copied().unwrap_or(TypeClass::Other)
    }

    pub fn is_node(&self, name: &str) -> bool {
        self.class(name) == TypeClass::Node
    }

    /// Node object types that are fully defined in this schema
    pub fn is_mutable_node(&self, name: &str) -> bool {
        self.is_node(name)
            && self.declared_kind(name) == Some(DeclaredKind::Object)
            && !self.is_external(name)
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.external.contains(name)
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipType> {
        self.relationships.get(name)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipType> {
        self.relationships.values()
    }

    pub fn property_category(&self, type_name: &str) -> Option<PropertyCategory> {
        let category = match type_name {
            "ID" => PropertyCategory::Id,
            "String" => PropertyCategory::String,
            "Int" => PropertyCategory::Int,
            "Float" => PropertyCategory::Float,
            "Boolean" => PropertyCategory::Boolean,
            name => match PropertyTypeKind::from_type_name(name) {
                Some(PropertyTypeKind::Temporal(kind)) => PropertyCategory::Temporal(kind),
                Some(PropertyTypeKind::Spatial(kind)) => PropertyCategory::Spatial(kind),
                None => match self.declared_kind(name)? {
                    DeclaredKind::Enum => PropertyCategory::Enum,
                    DeclaredKind::Scalar => PropertyCategory::Scalar,
                    _ => return None,
                },
            },
        };
        Some(category)
    }

    /// Classify a field of a Node type.
    pub fn field_role(&self, field: &FieldDescriptor) -> FieldRole {
        if field.flags.contains(FieldFlags::IGNORED) {
            return FieldRole::Other;
        }

        if let Some(category) = self.property_category(field.type_name) {
            return if field.flags.contains(FieldFlags::COMPUTED) {
                FieldRole::ComputedProperty(category)
            } else {
                FieldRole::Property(category)
            };
        }

        match self.class(field.type_name) {
            TypeClass::Node => FieldRole::NodeRelation,
            TypeClass::Relationship => FieldRole::RelationshipRelation,
            TypeClass::Other => FieldRole::Other,
        }
    }
}

fn relationship_type(
    definition: &TypeDefinition,
    fields: &[&FieldDefinition],
) -> Option<RelationshipType> {
    let directive = definition.directive(RELATION)?;
    let (from_field, to_field) = endpoint_names(directive);
    let endpoint_type = |name: &str| {
        fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| unwrap_named_type(&field.ty).name.to_string())
    };

    Some(RelationshipType {
        type_name: definition.name.clone(),
        relation_name: directive
            .string_argument("name")
            .unwrap_or(&definition.name)
            .to_string(),
        from_type: endpoint_type(from_field)?,
        to_type: endpoint_type(to_field)?,
        from_field: from_field.to_string(),
        to_field: to_field.to_string(),
    })
}
