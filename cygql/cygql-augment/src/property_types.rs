//! Temporal and spatial property types.
//!
//! Every enabled kind gets an output object and an input object type, and a
//! rewrite pass retargets references to the bare kind names.

use cygql_ast::{
    Type, TypeDefinition, TypeKind, Wrappers,
    build::{
        FieldDesc, InputObjectTypeDesc, InputValueDesc, ObjectTypeDesc, build_field,
        build_input_object_type, build_input_value, build_named_type, build_object_type,
    },
};
use fnv::FnvHashSet;
use tracing::trace;

use crate::config::AugmentationConfig;

pub const TYPE_PREFIX: &str = "_Neo4j";
pub const POINT_DISTANCE_FILTER: &str = "_Neo4jPointDistanceFilter";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TemporalKind {
    Time,
    Date,
    DateTime,
    LocalTime,
    LocalDateTime,
}

impl TemporalKind {
    pub const ALL: [TemporalKind; 5] = [
        Self::Time,
        Self::Date,
        Self::DateTime,
        Self::LocalTime,
        Self::LocalDateTime,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::LocalTime => "LocalTime",
            Self::LocalDateTime => "LocalDateTime",
        }
    }

    fn fields(self) -> &'static [(&'static str, &'static str)] {
        const DATE: &[(&str, &str)] = &[("year", "Int"), ("month", "Int"), ("day", "Int")];
        const LOCAL_TIME: &[(&str, &str)] = &[
            ("hour", "Int"),
            ("minute", "Int"),
            ("second", "Int"),
            ("millisecond", "Int"),
            ("microsecond", "Int"),
            ("nanosecond", "Int"),
        ];
        const TIME: &[(&str, &str)] = &[
            ("hour", "Int"),
            ("minute", "Int"),
            ("second", "Int"),
            ("millisecond", "Int"),
            ("microsecond", "Int"),
            ("nanosecond", "Int"),
            ("timezone", "String"),
        ];
        const LOCAL_DATE_TIME: &[(&str, &str)] = &[
            ("year", "Int"),
            ("month", "Int"),
            ("day", "Int"),
            ("hour", "Int"),
            ("minute", "Int"),
            ("second", "Int"),
            ("millisecond", "Int"),
            ("microsecond", "Int"),
            ("nanosecond", "Int"),
        ];
        const DATE_TIME: &[(&str, &str)] = &[
            ("year", "Int"),
            ("month", "Int"),
            ("day", "Int"),
            ("hour", "Int"),
            ("minute", "Int"),
            ("second", "Int"),
            ("millisecond", "Int"),
            ("microsecond", "Int"),
            ("nanosecond", "Int"),
            ("timezone", "String"),
        ];

        match self {
            Self::Time => TIME,
            Self::Date => DATE,
            Self::DateTime => DATE_TIME,
            Self::LocalTime => LOCAL_TIME,
            Self::LocalDateTime => LOCAL_DATE_TIME,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SpatialKind {
    Point,
}

impl SpatialKind {
    pub const ALL: [SpatialKind; 1] = [Self::Point];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Point => "Point",
        }
    }

    fn fields(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Point => &[
                ("x", "Float"),
                ("y", "Float"),
                ("z", "Float"),
                ("longitude", "Float"),
                ("latitude", "Float"),
                ("height", "Float"),
                ("crs", "String"),
                ("srid", "Int"),
            ],
        }
    }
}

/// A non-scalar property kind backed by generated types
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PropertyTypeKind {
    Temporal(TemporalKind),
    Spatial(SpatialKind),
}

impl PropertyTypeKind {
    pub fn all() -> impl Iterator<Item = PropertyTypeKind> {
        TemporalKind::ALL
            .into_iter()
            .map(Self::Temporal)
            .chain(SpatialKind::ALL.into_iter().map(Self::Spatial))
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::all().find(|kind| kind.type_name() == name)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Temporal(kind) => kind.type_name(),
            Self::Spatial(kind) => kind.type_name(),
        }
    }

    pub fn output_name(self) -> String {
        format!("{TYPE_PREFIX}{}", self.type_name())
    }

    pub fn input_name(self) -> String {
        format!("{TYPE_PREFIX}{}Input", self.type_name())
    }

    pub fn is_enabled(self, config: &AugmentationConfig) -> bool {
        match self {
            Self::Temporal(kind) => config.temporal_enabled(kind),
            Self::Spatial(SpatialKind::Point) => config.point_enabled(),
        }
    }

    fn fields(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Temporal(kind) => kind.fields(),
            Self::Spatial(kind) => kind.fields(),
        }
    }
}

pub fn is_property_type_name(name: &str) -> bool {
    name.starts_with(TYPE_PREFIX)
}

/// Output, input and filter types for every enabled kind.
pub fn generate_property_types(config: &AugmentationConfig) -> Vec<TypeDefinition> {
    let mut types = vec![];

    for kind in PropertyTypeKind::all().filter(|kind| kind.is_enabled(config)) {
        trace!("generate property types for `{}`", kind.type_name());

        let output_fields = kind
            .fields()
            .iter()
            .chain([&("formatted", "String")])
            .map(|(name, type_name)| {
                build_field(FieldDesc::new(
                    *name,
                    build_named_type(type_name, Wrappers::empty()),
                ))
            })
            .collect();

        let input_fields = kind
            .fields()
            .iter()
            .chain([&("formatted", "String")])
            .map(|(name, type_name)| {
                build_input_value(InputValueDesc::new(
                    *name,
                    build_named_type(type_name, Wrappers::empty()),
                ))
            })
            .collect();

        types.push(build_object_type(ObjectTypeDesc {
            name: kind.output_name(),
            fields: output_fields,
            ..Default::default()
        }));
        types.push(build_input_object_type(InputObjectTypeDesc {
            name: kind.input_name(),
            fields: input_fields,
            ..Default::default()
        }));

        if kind == PropertyTypeKind::Spatial(SpatialKind::Point) {
            types.push(build_input_object_type(InputObjectTypeDesc {
                name: POINT_DISTANCE_FILTER.to_string(),
                fields: vec![
                    build_input_value(InputValueDesc::new(
                        "point",
                        build_named_type(&kind.input_name(), Wrappers::NON_NULL_NAMED),
                    )),
                    build_input_value(InputValueDesc::new(
                        "distance",
                        build_named_type("Float", Wrappers::NON_NULL_NAMED),
                    )),
                ],
                ..Default::default()
            }));
        }
    }

    types
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Position {
    Output,
    Input,
}

/// Retarget references to enabled kinds inside one definition.
///
/// Output fields get the object type, arguments and input fields the input type.
/// Generated property types themselves are left alone.
pub fn rewrite_property_types(definition: &mut TypeDefinition, config: &AugmentationConfig) {
    if is_property_type_name(&definition.name) {
        return;
    }

    match &mut definition.kind {
        TypeKind::Object(object) | TypeKind::Interface(object) => {
            for field in &mut object.fields {
                rewrite_type(&mut field.ty, Position::Output, config);
                for argument in &mut field.arguments {
                    rewrite_type(&mut argument.ty, Position::Input, config);
                }
            }
        }
        TypeKind::InputObject(input) => {
            for field in &mut input.fields {
                rewrite_type(&mut field.ty, Position::Input, config);
            }
        }
        TypeKind::Scalar | TypeKind::Union(_) | TypeKind::Enum(_) => {}
    }
}

fn rewrite_type(ty: &mut Type, position: Position, config: &AugmentationConfig) {
    let Some(kind) = PropertyTypeKind::from_type_name(ty.base_name()) else {
        return;
    };
    if !kind.is_enabled(config) {
        return;
    }

    let name = match position {
        Position::Output => kind.output_name(),
        Position::Input => kind.input_name(),
    };
    *ty = ty.with_base_name(&name);
}

/// Names of disabled kinds still referenced by `definition`.
///
/// These stay bare and need a scalar declaration unless the schema has one.
pub fn collect_disabled_references(
    definition: &TypeDefinition,
    config: &AugmentationConfig,
    output: &mut FnvHashSet<&'static str>,
) {
    let mut visit = |ty: &Type| {
        if let Some(kind) = PropertyTypeKind::from_type_name(ty.base_name()) {
            if !kind.is_enabled(config) {
                output.insert(kind.type_name());
            }
        }
    };

    for field in definition.fields() {
        visit(&field.ty);
        for argument in &field.arguments {
            visit(&argument.ty);
        }
    }
    for field in definition.input_fields() {
        visit(&field.ty);
    }
}
