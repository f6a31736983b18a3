//! Names of generated schema elements.
//!
//! Every generated name is a pure function of the names it derives from,
//! which keeps the augmented schema reproducible.

use heck::AsUpperCamelCase;

pub const FILTER_AND: &str = "AND";
pub const FILTER_OR: &str = "OR";
pub const SYSTEM_ID: &str = "_id";

pub fn filter(type_name: &str) -> String {
    format!("_{type_name}Filter")
}

pub fn ordering(type_name: &str) -> String {
    format!("_{type_name}Ordering")
}

/// Selection input keyed by the primary key
pub fn input(type_name: &str) -> String {
    format!("_{type_name}Input")
}

pub fn data_input(type_name: &str) -> String {
    format!("_{type_name}Data")
}

pub fn where_input(type_name: &str) -> String {
    format!("_{type_name}Where")
}

pub fn keys_input(type_name: &str) -> String {
    format!("_{type_name}Keys")
}

/// `_<Type><Field>`, the output type of a relationship-typed field
pub fn relation_field_type(type_name: &str, field_name: &str) -> String {
    format!("_{type_name}{}", AsUpperCamelCase(field_name))
}

pub fn relation_field_filter(type_name: &str, field_name: &str) -> String {
    format!("_{type_name}{}Filter", AsUpperCamelCase(field_name))
}

pub fn directions(type_name: &str, field_name: &str) -> String {
    format!("_{type_name}{}Directions", AsUpperCamelCase(field_name))
}

pub fn directions_filter(type_name: &str, field_name: &str) -> String {
    format!("_{type_name}{}DirectionsFilter", AsUpperCamelCase(field_name))
}

pub fn ordering_value(field_name: &str, descending: bool) -> String {
    if descending {
        format!("{field_name}_desc")
    } else {
        format!("{field_name}_asc")
    }
}

/// The operations generated for a Node type, in emission order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeMutation {
    Create,
    Update,
    Delete,
    Merge,
}

impl NodeMutation {
    pub const ALL: [NodeMutation; 4] = [Self::Create, Self::Update, Self::Delete, Self::Merge];

    pub fn verb(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Merge => "Merge",
        }
    }

    pub fn field_name(self, type_name: &str) -> String {
        format!("{}{type_name}", self.verb())
    }
}

/// The operations generated for a relation field, in emission order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RelationMutation {
    Add,
    Remove,
    Update,
    Merge,
}

impl RelationMutation {
    pub const ALL: [RelationMutation; 4] = [Self::Add, Self::Remove, Self::Update, Self::Merge];

    pub fn verb(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Update => "Update",
            Self::Merge => "Merge",
        }
    }

    /// The scope action checked by `@hasScope`
    pub fn scope_action(self) -> &'static str {
        match self {
            Self::Add => "Create",
            Self::Remove => "Delete",
            Self::Update => "Update",
            Self::Merge => "Merge",
        }
    }

    pub fn field_name(self, type_name: &str, field_name: &str) -> String {
        format!("{}{type_name}{}", self.verb(), AsUpperCamelCase(field_name))
    }

    pub fn payload(self, type_name: &str, field_name: &str) -> String {
        format!(
            "_{}{type_name}{}Payload",
            self.verb(),
            AsUpperCamelCase(field_name)
        )
    }
}

/// `_<relationship>Input`, the relationship property input
pub fn relationship_input(type_name: &str) -> String {
    format!("_{type_name}Input")
}
