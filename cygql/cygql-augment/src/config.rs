use serde::Deserialize;

use crate::{error::ConfigError, property_types::TemporalKind};

/// Options recognized by the augmentation.
///
/// Deserializes from the camelCase JSON shape, with every key optional.
#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
#[serde(default, rename_all = "camelCase")]
pub struct AugmentationConfig {
    pub query: OperationPolicy,
    pub mutation: OperationPolicy,
    pub auth: AuthConfig,
    pub temporal: TemporalConfig,
    pub spatial: SpatialConfig,
    /// Use `Data`/`Where`/`Keys` inputs instead of flat mutation arguments
    pub experimental: bool,
    /// Nesting limit for nested mutation translation
    pub max_depth: usize,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            query: OperationPolicy::default(),
            mutation: OperationPolicy::default(),
            auth: AuthConfig::default(),
            temporal: TemporalConfig::default(),
            spatial: SpatialConfig::default(),
            experimental: false,
            max_depth: 32,
        }
    }
}

impl AugmentationConfig {
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(ConfigError::Malformed)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Malformed)
    }

    pub fn temporal_enabled(&self, kind: TemporalKind) -> bool {
        match &self.temporal {
            TemporalConfig::Enabled(enabled) => *enabled,
            TemporalConfig::Kinds(kinds) => match kind {
                TemporalKind::Time => kinds.time,
                TemporalKind::Date => kinds.date,
                TemporalKind::DateTime => kinds.datetime,
                TemporalKind::LocalTime => kinds.localtime,
                TemporalKind::LocalDateTime => kinds.localdatetime,
            },
        }
    }

    pub fn point_enabled(&self) -> bool {
        match &self.spatial {
            SpatialConfig::Enabled(enabled) => *enabled,
            SpatialConfig::Kinds(kinds) => kinds.point,
        }
    }
}

/// `true | false | { "exclude": [TypeName] }`
#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
#[serde(untagged)]
pub enum OperationPolicy {
    Enabled(bool),
    Exclude { exclude: Vec<String> },
}

impl Default for OperationPolicy {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl OperationPolicy {
    pub fn includes(&self, type_name: &str) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Exclude { exclude } => !exclude.iter().any(|excluded| excluded == type_name),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
#[serde(untagged)]
pub enum AuthConfig {
    Enabled(bool),
    Flags(AuthFlags),
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

/// Absent keys disable the corresponding directive.
#[derive(Clone, Copy, PartialEq, Eq, Default, Deserialize, Debug)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthFlags {
    pub is_authenticated: bool,
    pub has_role: bool,
    pub has_scope: bool,
}

impl AuthConfig {
    pub fn flags(&self) -> AuthFlags {
        match self {
            Self::Enabled(enabled) => AuthFlags {
                is_authenticated: *enabled,
                has_role: *enabled,
                has_scope: *enabled,
            },
            Self::Flags(flags) => *flags,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
#[serde(untagged)]
pub enum TemporalConfig {
    Enabled(bool),
    Kinds(TemporalKinds),
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

/// Absent keys leave the corresponding kind enabled.
#[derive(Clone, Copy, PartialEq, Eq, Deserialize, Debug)]
#[serde(default)]
pub struct TemporalKinds {
    pub time: bool,
    pub date: bool,
    pub datetime: bool,
    pub localtime: bool,
    pub localdatetime: bool,
}

impl Default for TemporalKinds {
    fn default() -> Self {
        Self {
            time: true,
            date: true,
            datetime: true,
            localtime: true,
            localdatetime: true,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
#[serde(untagged)]
pub enum SpatialConfig {
    Enabled(bool),
    Kinds(SpatialKinds),
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Deserialize, Debug)]
#[serde(default)]
pub struct SpatialKinds {
    pub point: bool,
}

impl Default for SpatialKinds {
    fn default() -> Self {
        Self { point: true }
    }
}
