/// Errors surfaced by the registry and the schema.
///
/// Resolver failures are not part of this type: they are reported by the engine inside
/// [`QueryResult::errors`](crate::QueryResult).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No type with this name was registered.
    #[error("type {0} not found")]
    NotFound(String),
    /// The engine schema was requested before a root query type was assigned.
    #[error("you must define a base query type")]
    NoBaseQuery,
    /// The engine rejected the schema built from the registered definitions.
    #[error("invalid schema: {0}")]
    Build(String),
    /// The introspection query did not produce a `__schema` payload.
    #[error("introspection failed: {0}")]
    Introspection(String),
    /// The TOML schema configuration could not be parsed.
    #[error("invalid schema configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
