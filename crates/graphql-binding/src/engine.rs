//! Translation of the registered definitions into an `async_graphql::dynamic` schema.

use async_graphql::dynamic::{self, FieldFuture, FieldValue, TypeRef};
use serde_json::Value;

use crate::{
    ArgumentDefinition, Error, FieldDefinition, FieldType, Instance, Resolved, Resolver, ResolverContext,
    SchemaConfig, TypeDefinition, TypeKind, TypeRegistry,
};

pub(crate) fn build(
    registry: &TypeRegistry,
    query: &TypeDefinition,
    mutation: Option<&TypeDefinition>,
    config: &SchemaConfig,
) -> crate::Result<dynamic::Schema> {
    check_named_references(registry)?;

    let mut builder = dynamic::Schema::build(query.name(), mutation.map(TypeDefinition::name), None);

    for definition in registry.iter() {
        builder = match definition.kind() {
            TypeKind::Object => builder.register(object(definition, registry)),
            TypeKind::Interface => builder.register(interface(definition)),
        };
    }

    if !config.introspection {
        builder = builder.disable_introspection();
    }
    if let Some(depth) = config.max_depth {
        builder = builder.limit_depth(depth);
    }
    if let Some(complexity) = config.max_complexity {
        builder = builder.limit_complexity(complexity);
    }

    builder.finish().map_err(|err| Error::Build(err.to_string()))
}

/// By-name references are the only ones that can dangle.
fn check_named_references(registry: &TypeRegistry) -> crate::Result<()> {
    for definition in registry.iter() {
        for field in definition.fields() {
            let types = std::iter::once(field.ty()).chain(field.arguments().iter().map(ArgumentDefinition::ty));
            for ty in types {
                let name = ty.type_name();
                if !BUILTIN_SCALARS.contains(&name) && !registry.contains(name) {
                    return Err(Error::Build(format!(
                        "{}.{} refers to the unknown type {name}",
                        definition.name(),
                        field.name()
                    )));
                }
            }
        }
    }

    Ok(())
}

const BUILTIN_SCALARS: [&str; 5] = [TypeRef::STRING, TypeRef::INT, TypeRef::FLOAT, TypeRef::BOOLEAN, TypeRef::ID];

fn object(definition: &TypeDefinition, registry: &TypeRegistry) -> dynamic::Object {
    let mut object = dynamic::Object::new(definition.name());

    if let Some(description) = definition.description() {
        object = object.description(description);
    }
    for interface in definition.all_interfaces() {
        object = object.implement(interface.name());
    }
    for field in definition.fields() {
        object = object.field(output_field(&field, registry));
    }

    object
}

fn interface(definition: &TypeDefinition) -> dynamic::Interface {
    let mut interface = dynamic::Interface::new(definition.name());

    if let Some(description) = definition.description() {
        interface = interface.description(description);
    }
    for parent in definition.all_interfaces() {
        interface = interface.implement(parent.name());
    }
    for field in definition.fields() {
        let mut interface_field = dynamic::InterfaceField::new(field.name(), field.ty().to_type_ref());
        if let Some(description) = field.description() {
            interface_field = interface_field.description(description);
        }
        for argument in field.arguments() {
            interface_field = interface_field.argument(input_value(argument));
        }
        interface = interface.field(interface_field);
    }

    interface
}

fn output_field(field: &FieldDefinition, registry: &TypeRegistry) -> dynamic::Field {
    let shape = OutputShape::of(field.ty(), registry);
    let resolver = field.resolver().cloned();
    let field_name = field.name().to_owned();

    let mut output_field = dynamic::Field::new(field.name(), field.ty().to_type_ref(), move |ctx| {
        let result = resolve_field(&ctx, &field_name, resolver.as_ref(), &shape);
        FieldFuture::new(async move { result })
    });

    if let Some(description) = field.description() {
        output_field = output_field.description(description);
    }
    if let Some(reason) = field.deprecation_reason() {
        output_field = output_field.deprecation(Some(reason));
    }
    for argument in field.arguments() {
        output_field = output_field.argument(input_value(argument));
    }

    output_field
}

fn input_value(argument: &ArgumentDefinition) -> dynamic::InputValue {
    let input_value = dynamic::InputValue::new(argument.name(), argument.ty().to_type_ref());
    match argument.description() {
        Some(description) => input_value.description(description),
        None => input_value,
    }
}

fn resolve_field<'a>(
    ctx: &dynamic::ResolverContext<'_>,
    field_name: &str,
    resolver: Option<&Resolver>,
    shape: &OutputShape,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let parent = ctx.parent_value.try_downcast_ref::<Instance>()?;

    let resolved = match resolver {
        Some(resolver) => {
            let arguments = ctx
                .args
                .iter()
                .map(|(name, value)| -> async_graphql::Result<(String, Value)> {
                    Ok((name.to_string(), value.as_value().clone().into_json()?))
                })
                .collect::<async_graphql::Result<serde_json::Map<_, _>>>()?;

            resolver
                .call(ResolverContext::new(parent, field_name, &arguments))
                .map_err(|err| async_graphql::Error::new(format!("{err:#}")))?
        }
        None => parent.field(field_name).cloned().map(Resolved::from).unwrap_or(Resolved::Null),
    };

    match resolved {
        Resolved::Null => Ok(None),
        resolved => shape.field_value(resolved).map(Some),
    }
}

/// What the engine expects a field to produce, known once the registry is complete.
#[derive(Debug, Clone, PartialEq)]
enum OutputShape {
    Leaf,
    Object(String),
    Interface(String),
    List(Box<OutputShape>),
}

impl OutputShape {
    fn of(ty: &FieldType, registry: &TypeRegistry) -> Self {
        match ty {
            FieldType::Scalar(_) => OutputShape::Leaf,
            FieldType::NonNull(inner) => Self::of(inner, registry),
            FieldType::List(inner) => OutputShape::List(Box::new(Self::of(inner, registry))),
            FieldType::Definition(definition) => Self::composite(definition),
            // Dangling names are rejected before the engine sees them.
            FieldType::Named(name) => registry.get(name).map(|d| Self::composite(d)).unwrap_or(OutputShape::Leaf),
        }
    }

    fn composite(definition: &TypeDefinition) -> Self {
        match definition.kind() {
            TypeKind::Object => OutputShape::Object(definition.name().to_owned()),
            TypeKind::Interface => OutputShape::Interface(definition.name().to_owned()),
        }
    }

    fn field_value<'a>(&self, resolved: Resolved) -> async_graphql::Result<FieldValue<'a>> {
        match (self, resolved) {
            (_, Resolved::Null | Resolved::Value(Value::Null)) => Ok(FieldValue::NULL),
            (OutputShape::List(inner), Resolved::List(items)) => Ok(FieldValue::list(
                items
                    .into_iter()
                    .map(|item| inner.field_value(item))
                    .collect::<async_graphql::Result<Vec<_>>>()?,
            )),
            (OutputShape::List(inner), Resolved::Value(Value::Array(items))) => Ok(FieldValue::list(
                items
                    .into_iter()
                    .map(|item| inner.field_value(Resolved::from(item)))
                    .collect::<async_graphql::Result<Vec<_>>>()?,
            )),
            (OutputShape::Leaf, Resolved::Value(value)) => Ok(FieldValue::value(async_graphql::Value::from_json(value)?)),
            (OutputShape::Object(_), Resolved::Instance(instance)) => Ok(FieldValue::owned_any(instance)),
            (OutputShape::Object(name), Resolved::Value(value @ Value::Object(_))) => {
                Ok(FieldValue::owned_any(Instance::new(name.clone(), value)))
            }
            (OutputShape::Interface(_), Resolved::Instance(instance)) => {
                let type_name = instance.type_name().to_owned();
                Ok(FieldValue::owned_any(instance).with_type(type_name))
            }
            (OutputShape::Interface(name), Resolved::Value(value @ Value::Object(_))) => {
                let Some(type_name) = value.get("__typename").and_then(Value::as_str).map(str::to_owned) else {
                    return Err(async_graphql::Error::new(format!(
                        "cannot determine the concrete type of {name} without __typename"
                    )));
                };
                Ok(FieldValue::owned_any(Instance::new(type_name.clone(), value)).with_type(type_name))
            }
            (shape, resolved) => Err(async_graphql::Error::new(format!(
                "resolved value does not match the field type: expected {}, got {}",
                shape.expected(),
                describe(&resolved)
            ))),
        }
    }

    fn expected(&self) -> String {
        match self {
            OutputShape::Leaf => "a scalar".to_owned(),
            OutputShape::Object(name) | OutputShape::Interface(name) => format!("an instance of {name}"),
            OutputShape::List(_) => "a list".to_owned(),
        }
    }
}

fn describe(resolved: &Resolved) -> String {
    match resolved {
        Resolved::Null => "null".to_owned(),
        Resolved::Value(Value::Array(_)) | Resolved::List(_) => "a list".to_owned(),
        Resolved::Value(Value::Object(_)) => "an object".to_owned(),
        Resolved::Value(_) => "a scalar".to_owned(),
        Resolved::Instance(instance) => format!("an instance of {}", instance.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    fn registry() -> TypeRegistry {
        let character = TypeDefinition::interface("Character")
            .field(FieldDefinition::string("name"))
            .finish();
        let human = TypeDefinition::object("Human")
            .implements(&character)
            .field(FieldDefinition::list("friends", &character))
            .field(FieldDefinition::new("next", FieldType::named("Human")))
            .finish();

        let mut registry = TypeRegistry::new();
        registry.register(human);
        registry
    }

    fn field_type(registry: &TypeRegistry, type_name: &str, field_name: &str) -> FieldType {
        let definition: &Arc<TypeDefinition> = registry.get(type_name).unwrap();
        definition
            .fields()
            .into_iter()
            .find(|field| field.name() == field_name)
            .map(|field| field.ty().clone())
            .unwrap()
    }

    #[test]
    fn shapes_follow_the_registry() {
        let registry = registry();

        assert_eq!(
            OutputShape::of(&field_type(&registry, "Human", "name"), &registry),
            OutputShape::Leaf
        );
        assert_eq!(
            OutputShape::of(&field_type(&registry, "Human", "friends"), &registry),
            OutputShape::List(Box::new(OutputShape::Interface("Character".into())))
        );
        assert_eq!(
            OutputShape::of(&field_type(&registry, "Human", "next"), &registry),
            OutputShape::Object("Human".into())
        );
    }

    #[test]
    fn mismatched_values_are_field_errors() {
        let error = OutputShape::Leaf
            .field_value(Resolved::Instance(Instance::new("Pet", json!({}))))
            .err()
            .unwrap();

        assert_eq!(
            error.message,
            "resolved value does not match the field type: expected a scalar, got an instance of Pet"
        );

        let error = OutputShape::Interface("Character".into())
            .field_value(Resolved::from(json!({ "name": "Peter" })))
            .err()
            .unwrap();

        assert_eq!(
            error.message,
            "cannot determine the concrete type of Character without __typename"
        );
    }

    #[test]
    fn builds_an_engine_schema() {
        let registry = registry();
        let query = registry.get("Human").unwrap();

        let schema = build(&registry, query, None, &SchemaConfig::default()).unwrap();

        assert!(schema.sdl().contains("implements Character"));
    }
}
