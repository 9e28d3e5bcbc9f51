use std::{
    collections::BTreeSet,
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use async_graphql::dynamic::{self, DynamicRequestExt, FieldValue};
use serde_json::{Map, Value};
use tracing::{info_span, Instrument};

use crate::{
    engine,
    introspection::INTROSPECTION_QUERY,
    Error, Instance, QueryRequest, QueryResult, SchemaConfig, TypeDefinition, TypeRegistry,
};

/// A set of registered types with a root query type, executable once built.
///
/// The engine schema is built on first use and cached for the lifetime of the `Schema`.
/// Registrations made afterwards are visible to [`Schema::get_type`] but not to the engine.
pub struct Schema {
    name: String,
    config: SchemaConfig,
    registry: TypeRegistry,
    query: Option<Arc<TypeDefinition>>,
    mutation: Option<Arc<TypeDefinition>>,
    engine: OnceLock<dynamic::Schema>,
    build_lock: Mutex<()>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, SchemaConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: SchemaConfig) -> Self {
        Self {
            name: name.into(),
            config,
            registry: TypeRegistry::new(),
            query: None,
            mutation: None,
            engine: OnceLock::new(),
            build_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Registers a type without making it a root type and hands it back.
    pub fn register(&mut self, definition: Arc<TypeDefinition>) -> Arc<TypeDefinition> {
        self.warn_if_built(definition.name());
        self.registry.register(definition)
    }

    /// Assigns and registers the root query type.
    ///
    /// The root types are fixed once the engine schema is built: a later call only registers the
    /// definition and `query()` keeps returning the type the engine executes against.
    pub fn set_query(&mut self, definition: Arc<TypeDefinition>) {
        let definition = self.register(definition);
        if !self.is_built() {
            self.query = Some(definition);
        }
    }

    pub fn query(&self) -> Option<&Arc<TypeDefinition>> {
        self.query.as_ref()
    }

    /// Assigns and registers the root mutation type. Fixed once built, like the query type.
    pub fn set_mutation(&mut self, definition: Arc<TypeDefinition>) {
        let definition = self.register(definition);
        if !self.is_built() {
            self.mutation = Some(definition);
        }
    }

    pub fn mutation(&self) -> Option<&Arc<TypeDefinition>> {
        self.mutation.as_ref()
    }

    fn warn_if_built(&self, type_name: &str) {
        if self.engine.get().is_some() {
            tracing::warn!(schema = %self.name, type_name, "schema already built, the engine will not see this type");
        }
    }

    /// Looks a type up by name. The engine schema must be buildable first.
    pub fn get_type(&self, name: &str) -> crate::Result<Arc<TypeDefinition>> {
        self.engine_schema()?;
        self.registry.get(name).cloned()
    }

    /// The engine schema, built from the registry on first access.
    pub fn engine_schema(&self) -> crate::Result<&dynamic::Schema> {
        if let Some(engine) = self.engine.get() {
            return Ok(engine);
        }

        let query = self.query.as_deref().ok_or(Error::NoBaseQuery)?;

        let _guard = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(engine) = self.engine.get() {
            return Ok(engine);
        }

        let engine = info_span!("build_engine_schema", schema = %self.name, types = self.registry.len()).in_scope(
            || engine::build(&self.registry, query, self.mutation.as_deref(), &self.config),
        )?;

        Ok(self.engine.get_or_init(|| engine))
    }

    pub fn is_built(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Runs `query` to completion on the calling thread.
    pub fn execute(&self, query: &str, root: Option<Instance>) -> crate::Result<QueryResult> {
        futures::executor::block_on(self.execute_async(query, root))
    }

    pub async fn execute_async(&self, query: &str, root: Option<Instance>) -> crate::Result<QueryResult> {
        let mut request = QueryRequest::new(query);
        if let Some(root) = root {
            request = request.root(root);
        }
        self.execute_request(request).await
    }

    /// Executes a request carrying variables or an operation name.
    pub async fn execute_request(&self, request: QueryRequest) -> crate::Result<QueryResult> {
        let engine = self.engine_schema()?;
        let (request, root) = request.into_parts();
        let root = match (root, self.query.as_deref()) {
            (Some(root), _) => root,
            (None, Some(query)) => query.instance(Value::Null),
            (None, None) => return Err(Error::NoBaseQuery),
        };

        let span = info_span!("execute", schema = %self.name);
        let result: QueryResult = engine
            .execute(request.root_value(FieldValue::owned_any(root)))
            .instrument(span)
            .await
            .into();

        tracing::debug!(schema = %self.name, errors = result.errors.len(), "query executed");

        Ok(result)
    }

    /// Runs the standard introspection query and returns its data, which holds `__schema`.
    pub fn introspect(&self) -> crate::Result<Map<String, Value>> {
        let result = self.execute(INTROSPECTION_QUERY, None)?;
        introspection_data(result)
    }

    /// Every type name in the engine's type map: the registered types, the built-in scalars and,
    /// unless disabled, the introspection types.
    pub fn type_names(&self) -> crate::Result<BTreeSet<String>> {
        Ok(self.engine_schema()?.registry().types.keys().cloned().collect())
    }

    /// The engine's SDL rendering of the built schema.
    pub fn sdl(&self) -> crate::Result<String> {
        Ok(self.engine_schema()?.sdl())
    }
}

fn introspection_data(result: QueryResult) -> crate::Result<Map<String, Value>> {
    if !result.errors.is_empty() {
        let messages = result
            .errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>();
        return Err(Error::Introspection(messages.join("; ")));
    }

    match result.data {
        Value::Object(data) if data.get("__schema").is_some_and(|schema| !schema.is_null()) => Ok(data),
        _ => Err(Error::Introspection("the response has no __schema".to_owned())),
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("query", &self.query.as_ref().map(|query| query.name()))
            .field("mutation", &self.mutation.as_ref().map(|mutation| mutation.name()))
            .field("types", &self.registry.names().collect::<Vec<_>>())
            .field("built", &self.is_built())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Schema: {}>", self.name)
    }
}
