use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde_json::Value;

use crate::{FieldType, Instance, Resolved, Resolver, ResolverContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Interface,
    Object,
}

/// A named interface or object type declaration.
///
/// Built with the `interface`/`object` constructors and the builder methods, then frozen with
/// [`TypeDefinition::finish`]. An object type inherits the fields of the interfaces it implements
/// unless it declares a field with the same name.
pub struct TypeDefinition {
    name: String,
    kind: TypeKind,
    description: Option<String>,
    interfaces: Vec<Arc<TypeDefinition>>,
    fields: Vec<FieldDefinition>,
    resolvers: IndexMap<String, Resolver>,
}

impl TypeDefinition {
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name.into(), TypeKind::Interface)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name.into(), TypeKind::Object)
    }

    fn new(name: String, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            description: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            resolvers: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: &Arc<TypeDefinition>) -> Self {
        self.interfaces.push(Arc::clone(interface));
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDefinition) -> Self {
        match self.fields.iter_mut().find(|existing| existing.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Attaches a resolver to a field by name, typically one inherited from an interface.
    #[must_use]
    pub fn resolve_field<F>(mut self, field_name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(ResolverContext<'_>) -> anyhow::Result<Resolved> + Send + Sync + 'static,
    {
        self.resolvers.insert(field_name.into(), Resolver::new(resolver));
        self
    }

    pub fn finish(self) -> Arc<Self> {
        for field_name in self.resolvers.keys() {
            if !self.has_field(field_name) {
                tracing::warn!(type_name = %self.name, field_name = %field_name, "resolver attached to an undeclared field");
            }
        }
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn interfaces(&self) -> &[Arc<TypeDefinition>] {
        &self.interfaces
    }

    /// Every interface this type implements, directly or through another interface, each once.
    pub fn all_interfaces(&self) -> Vec<Arc<TypeDefinition>> {
        let mut all = IndexMap::<String, Arc<TypeDefinition>>::new();

        for interface in &self.interfaces {
            all.entry(interface.name.clone()).or_insert_with(|| Arc::clone(interface));
            for ancestor in interface.all_interfaces() {
                all.entry(ancestor.name.clone()).or_insert(ancestor);
            }
        }

        all.into_values().collect()
    }

    /// The fields declared on this type only.
    pub fn own_fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// All fields of the type: inherited interface fields first, then its own, with the
    /// resolvers attached through [`TypeDefinition::resolve_field`] applied.
    pub fn fields(&self) -> Vec<FieldDefinition> {
        let mut fields = IndexMap::<String, FieldDefinition>::new();

        for interface in &self.interfaces {
            for field in interface.fields() {
                fields.entry(field.name.clone()).or_insert(field);
            }
        }

        for field in &self.fields {
            fields.insert(field.name.clone(), field.clone());
        }

        for (field_name, resolver) in &self.resolvers {
            if let Some(field) = fields.get_mut(field_name) {
                field.resolver = Some(resolver.clone());
            }
        }

        fields.into_values().collect()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name) || self.interfaces.iter().any(|i| i.has_field(name))
    }

    /// Definitions this one refers to directly: its interfaces and the types of its own fields.
    pub fn references(&self) -> impl Iterator<Item = Arc<TypeDefinition>> + '_ {
        self.interfaces
            .iter()
            .chain(self.fields.iter().filter_map(|field| field.ty.definition()))
            .cloned()
    }

    /// An instance of this type carrying `data`.
    pub fn instance(&self, data: Value) -> Instance {
        Instance::new(self.name.clone(), data)
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| i.name()).collect::<Vec<_>>(),
            )
            .field("fields", &self.fields)
            .finish()
    }
}

#[derive(Clone)]
pub struct FieldDefinition {
    name: String,
    ty: FieldType,
    description: Option<String>,
    deprecation_reason: Option<String>,
    arguments: Vec<ArgumentDefinition>,
    resolver: Option<Resolver>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: None,
            deprecation_reason: None,
            arguments: Vec::new(),
            resolver: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::string())
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::int())
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::float())
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::boolean())
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::id())
    }

    pub fn list(name: impl Into<String>, of: impl Into<FieldType>) -> Self {
        Self::new(name, FieldType::list_of(of))
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn resolve<F>(mut self, resolver: F) -> Self
    where
        F: Fn(ResolverContext<'_>) -> anyhow::Result<Resolved> + Send + Sync + 'static,
    {
        self.resolver = Some(Resolver::new(resolver));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn deprecation_reason(&self) -> Option<&str> {
        self.deprecation_reason.as_deref()
    }

    pub fn arguments(&self) -> &[ArgumentDefinition] {
        &self.arguments
    }

    pub fn resolver(&self) -> Option<&Resolver> {
        self.resolver.as_ref()
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("arguments", &self.arguments)
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    name: String,
    ty: FieldType,
    description: Option<String>,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
