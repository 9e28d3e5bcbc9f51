use std::str::FromStr;

use crate::Error;

/// Engine settings applied when the schema is built.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Whether `__schema` and `__type` queries are answered. Default is true.
    pub introspection: bool,
    /// Maximum nesting depth of a query. No limit by default.
    pub max_depth: Option<usize>,
    /// Maximum complexity of a query. No limit by default.
    pub max_complexity: Option<usize>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            introspection: true,
            max_depth: None,
            max_complexity: None,
        }
    }
}

impl SchemaConfig {
    pub fn from_toml(input: &str) -> crate::Result<Self> {
        Ok(toml::from_str(input)?)
    }
}

impl FromStr for SchemaConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_toml(s)
    }
}
