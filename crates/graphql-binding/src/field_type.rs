use std::{fmt, sync::Arc};

use async_graphql::dynamic::TypeRef;

use crate::TypeDefinition;

/// The built-in scalars a field can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Boolean,
    Id,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::String => TypeRef::STRING,
            ScalarType::Int => TypeRef::INT,
            ScalarType::Float => TypeRef::FLOAT,
            ScalarType::Boolean => TypeRef::BOOLEAN,
            ScalarType::Id => TypeRef::ID,
        }
    }
}

/// The declared kind of a field or an argument.
#[derive(Clone)]
pub enum FieldType {
    Scalar(ScalarType),
    List(Box<FieldType>),
    NonNull(Box<FieldType>),
    /// A direct reference. The target is registered together with the type declaring the field.
    Definition(Arc<TypeDefinition>),
    /// A reference by name, resolved against the registry when the engine schema is built.
    /// This is how a type refers to itself.
    Named(String),
}

impl FieldType {
    pub fn string() -> Self {
        Self::Scalar(ScalarType::String)
    }

    pub fn int() -> Self {
        Self::Scalar(ScalarType::Int)
    }

    pub fn float() -> Self {
        Self::Scalar(ScalarType::Float)
    }

    pub fn boolean() -> Self {
        Self::Scalar(ScalarType::Boolean)
    }

    pub fn id() -> Self {
        Self::Scalar(ScalarType::Id)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn list_of(inner: impl Into<FieldType>) -> Self {
        Self::List(Box::new(inner.into()))
    }

    pub fn non_null(inner: impl Into<FieldType>) -> Self {
        match inner.into() {
            ty @ FieldType::NonNull(_) => ty,
            ty => Self::NonNull(Box::new(ty)),
        }
    }

    /// Name of the innermost named type, without list or non-null wrappers.
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::Scalar(scalar) => scalar.name(),
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.type_name(),
            FieldType::Definition(definition) => definition.name(),
            FieldType::Named(name) => name,
        }
    }

    /// The directly referenced definition, if any.
    pub fn definition(&self) -> Option<&Arc<TypeDefinition>> {
        match self {
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.definition(),
            FieldType::Definition(definition) => Some(definition),
            FieldType::Scalar(_) | FieldType::Named(_) => None,
        }
    }

    pub(crate) fn to_type_ref(&self) -> TypeRef {
        match self {
            FieldType::List(inner) => TypeRef::List(Box::new(inner.to_type_ref())),
            FieldType::NonNull(inner) => TypeRef::NonNull(Box::new(inner.to_type_ref())),
            FieldType::Scalar(_) | FieldType::Definition(_) | FieldType::Named(_) => TypeRef::named(self.type_name()),
        }
    }
}

impl From<ScalarType> for FieldType {
    fn from(scalar: ScalarType) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Arc<TypeDefinition>> for FieldType {
    fn from(definition: Arc<TypeDefinition>) -> Self {
        Self::Definition(definition)
    }
}

impl From<&Arc<TypeDefinition>> for FieldType {
    fn from(definition: &Arc<TypeDefinition>) -> Self {
        Self::Definition(Arc::clone(definition))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::List(inner) => write!(f, "[{inner}]"),
            FieldType::NonNull(inner) => write!(f, "{inner}!"),
            FieldType::Scalar(_) | FieldType::Definition(_) | FieldType::Named(_) => f.write_str(self.type_name()),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldType({self})")
    }
}
