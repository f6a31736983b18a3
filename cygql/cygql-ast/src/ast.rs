use bitflags::bitflags;
use indexmap::IndexMap;
use thin_vec::ThinVec;

/// A parsed (or built) type-system document.
///
/// A thin owned layer over [graphql_parser::schema] nodes, see [crate::read].
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Definition {
    Schema(SchemaDefinition),
    Type(TypeDefinition),
    Directive(DirectiveDefinition),
}

#[derive(Clone, PartialEq, Default, Debug)]
pub struct SchemaDefinition {
    pub directives: ThinVec<Directive>,
    pub operations: Vec<RootOperation>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RootOperation {
    pub kind: OperationKind,
    pub type_name: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [Self::Query, Self::Mutation, Self::Subscription];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }

    /// The conventional type name when no schema definition renames it
    pub fn default_type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }
}

/// A named type definition or extension (`extend` set).
#[derive(Clone, PartialEq, Debug)]
pub struct TypeDefinition {
    pub extend: bool,
    pub description: Option<String>,
    pub name: String,
    pub directives: ThinVec<Directive>,
    pub kind: TypeKind,
}

#[derive(Clone, PartialEq, Debug)]
pub enum TypeKind {
    Scalar,
    Object(ObjectType),
    Interface(ObjectType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

#[derive(Clone, PartialEq, Default, Debug)]
pub struct ObjectType {
    pub implements: Vec<String>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Clone, PartialEq, Default, Debug)]
pub struct UnionType {
    pub members: Vec<String>,
}

#[derive(Clone, PartialEq, Default, Debug)]
pub struct EnumType {
    pub values: Vec<EnumValueDefinition>,
}

#[derive(Clone, PartialEq, Default, Debug)]
pub struct InputObjectType {
    pub fields: Vec<InputValueDefinition>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct FieldDefinition {
    pub description: Option<String>,
    pub name: String,
    pub arguments: ThinVec<InputValueDefinition>,
    pub ty: Type,
    pub directives: ThinVec<Directive>,
}

/// A field argument, an input object field or a directive argument definition.
#[derive(Clone, PartialEq, Debug)]
pub struct InputValueDefinition {
    pub description: Option<String>,
    pub name: String,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: ThinVec<Directive>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct EnumValueDefinition {
    pub description: Option<String>,
    pub name: String,
    pub directives: ThinVec<Directive>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
    Named(String),
    List(Box<Type>),
    NonNull(Box<Type>),
}

#[derive(Clone, PartialEq, Debug)]
pub struct Directive {
    pub name: String,
    pub arguments: ThinVec<Argument>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

/// Constant values, as allowed in type-system documents
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

#[derive(Clone, PartialEq, Debug)]
pub struct DirectiveDefinition {
    pub description: Option<String>,
    pub name: String,
    pub arguments: ThinVec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    const NAMES: [(DirectiveLocation, &'static str); 19] = [
        (Self::Query, "QUERY"),
        (Self::Mutation, "MUTATION"),
        (Self::Subscription, "SUBSCRIPTION"),
        (Self::Field, "FIELD"),
        (Self::FragmentDefinition, "FRAGMENT_DEFINITION"),
        (Self::FragmentSpread, "FRAGMENT_SPREAD"),
        (Self::InlineFragment, "INLINE_FRAGMENT"),
        (Self::VariableDefinition, "VARIABLE_DEFINITION"),
        (Self::Schema, "SCHEMA"),
        (Self::Scalar, "SCALAR"),
        (Self::Object, "OBJECT"),
        (Self::FieldDefinition, "FIELD_DEFINITION"),
        (Self::ArgumentDefinition, "ARGUMENT_DEFINITION"),
        (Self::Interface, "INTERFACE"),
        (Self::Union, "UNION"),
        (Self::Enum, "ENUM"),
        (Self::EnumValue, "ENUM_VALUE"),
        (Self::InputObject, "INPUT_OBJECT"),
        (Self::InputFieldDefinition, "INPUT_FIELD_DEFINITION"),
    ];

    pub fn as_str(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(location, _)| *location == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, candidate)| *candidate == name)
            .map(|(location, _)| *location)
    }
}

bitflags! {
    /// The wrapper combination around a named type.
    ///
    /// `NON_NULL_LIST` is only meaningful together with `LIST`.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct Wrappers: u8 {
        const LIST = 0b001;
        const NON_NULL_NAMED = 0b010;
        const NON_NULL_LIST = 0b100;
    }
}

/// Access to the directives attached to an AST node.
pub trait HasDirectives {
    fn directives(&self) -> &[Directive];

    fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives()
            .iter()
            .find(|directive| directive.name == name)
    }

    fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }
}

impl HasDirectives for TypeDefinition {
    fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl HasDirectives for FieldDefinition {
    fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl HasDirectives for InputValueDefinition {
    fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl HasDirectives for EnumValueDefinition {
    fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl TypeDefinition {
    /// Output fields of object and interface types, empty otherwise.
    pub fn fields(&self) -> &[FieldDefinition] {
        match &self.kind {
            TypeKind::Object(object) | TypeKind::Interface(object) => &object.fields,
            _ => &[],
        }
    }

    pub fn fields_mut(&mut self) -> Option<&mut Vec<FieldDefinition>> {
        match &mut self.kind {
            TypeKind::Object(object) | TypeKind::Interface(object) => Some(&mut object.fields),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().iter().find(|field| field.name == name)
    }

    pub fn input_fields(&self) -> &[InputValueDefinition] {
        match &self.kind {
            TypeKind::InputObject(input) => &input.fields,
            _ => &[],
        }
    }

    pub fn input_fields_mut(&mut self) -> Option<&mut Vec<InputValueDefinition>> {
        match &mut self.kind {
            TypeKind::InputObject(input) => Some(&mut input.fields),
            _ => None,
        }
    }

    pub fn enum_values(&self) -> &[EnumValueDefinition] {
        match &self.kind {
            TypeKind::Enum(enum_type) => &enum_type.values,
            _ => &[],
        }
    }

    pub fn enum_values_mut(&mut self) -> Option<&mut Vec<EnumValueDefinition>> {
        match &mut self.kind {
            TypeKind::Enum(enum_type) => Some(&mut enum_type.values),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface(_))
    }

    pub fn keyword(&self) -> &'static str {
        match &self.kind {
            TypeKind::Scalar => "scalar",
            TypeKind::Object(_) => "type",
            TypeKind::Interface(_) => "interface",
            TypeKind::Union(_) => "union",
            TypeKind::Enum(_) => "enum",
            TypeKind::InputObject(_) => "input",
        }
    }
}

impl FieldDefinition {
    pub fn argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.iter().find(|argument| argument.name == name)
    }
}

impl Type {
    /// The innermost named type
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Whether a list wrapper exists at any level
    pub fn is_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
        }
    }

    /// Strip the outermost non-null wrapper, if any.
    pub fn into_nullable(self) -> Type {
        match self {
            Self::NonNull(inner) => *inner,
            other => other,
        }
    }

    pub fn into_non_null(self) -> Type {
        match self {
            Self::NonNull(inner) => Self::NonNull(inner),
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Replace the innermost name, keeping every wrapper.
    pub fn with_base_name(&self, name: &str) -> Type {
        match self {
            Self::Named(_) => Self::Named(name.to_string()),
            Self::List(inner) => Self::List(Box::new(inner.with_base_name(name))),
            Self::NonNull(inner) => Self::NonNull(Box::new(inner.with_base_name(name))),
        }
    }
}

impl Directive {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }

    pub fn string_argument(&self, name: &str) -> Option<&str> {
        self.argument(name).and_then(Value::as_str)
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }

    /// Enum values, also accepting strings for hand-written documents
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Self::Enum(name) | Self::String(name) => Some(name),
            _ => None,
        }
    }
}

impl Document {
    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Type(type_def) => Some(type_def),
            _ => None,
        })
    }

    pub fn directive_definitions(&self) -> impl Iterator<Item = &DirectiveDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Directive(directive_def) => Some(directive_def),
            _ => None,
        })
    }

    /// The non-extension definition of the named type
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.type_definitions()
            .find(|type_def| !type_def.extend && type_def.name == name)
    }
}
