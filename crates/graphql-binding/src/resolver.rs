use std::{fmt, sync::Arc};

use serde_json::{Map, Value};

/// The runtime value of an object: its concrete type name and a JSON payload.
///
/// Fields without an explicit resolver read the payload key of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    type_name: String,
    data: Value,
}

impl Instance {
    pub fn new(type_name: impl Into<String>, data: Value) -> Self {
        Self {
            type_name: type_name.into(),
            data,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// What a resolver hands back to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Null,
    /// A leaf value, or the JSON payload of an object when the field type is composite.
    Value(Value),
    Instance(Instance),
    List(Vec<Resolved>),
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Resolved::Null,
            value => Resolved::Value(value),
        }
    }
}

impl From<Instance> for Resolved {
    fn from(instance: Instance) -> Self {
        Resolved::Instance(instance)
    }
}

impl From<&str> for Resolved {
    fn from(value: &str) -> Self {
        Resolved::Value(value.into())
    }
}

impl From<String> for Resolved {
    fn from(value: String) -> Self {
        Resolved::Value(value.into())
    }
}

impl From<bool> for Resolved {
    fn from(value: bool) -> Self {
        Resolved::Value(value.into())
    }
}

impl From<i32> for Resolved {
    fn from(value: i32) -> Self {
        Resolved::Value(value.into())
    }
}

impl From<i64> for Resolved {
    fn from(value: i64) -> Self {
        Resolved::Value(value.into())
    }
}

impl From<f64> for Resolved {
    fn from(value: f64) -> Self {
        Value::from(value).into()
    }
}

impl<T: Into<Resolved>> From<Vec<T>> for Resolved {
    fn from(values: Vec<T>) -> Self {
        Resolved::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Resolved>> From<Option<T>> for Resolved {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Resolved::Null)
    }
}

/// Everything a resolver gets to see.
pub struct ResolverContext<'a> {
    parent: &'a Instance,
    field_name: &'a str,
    arguments: &'a Map<String, Value>,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(parent: &'a Instance, field_name: &'a str, arguments: &'a Map<String, Value>) -> Self {
        Self {
            parent,
            field_name,
            arguments,
        }
    }

    pub fn parent(&self) -> &'a Instance {
        self.parent
    }

    pub fn field_name(&self) -> &'a str {
        self.field_name
    }

    pub fn arguments(&self) -> &'a Map<String, Value> {
        self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&'a Value> {
        self.arguments.get(name)
    }

    /// Deserializes an argument. Absent and null arguments are `None`.
    pub fn try_argument<T: serde::de::DeserializeOwned>(&self, name: &str) -> anyhow::Result<Option<T>> {
        match self.argument(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(T::deserialize(value)?)),
        }
    }
}

type ResolverFn = dyn Fn(ResolverContext<'_>) -> anyhow::Result<Resolved> + Send + Sync;

/// A field resolver. Cloning is cheap.
#[derive(Clone)]
pub struct Resolver(Arc<ResolverFn>);

impl Resolver {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(ResolverContext<'_>) -> anyhow::Result<Resolved> + Send + Sync + 'static,
    {
        Self(Arc::new(resolver))
    }

    pub fn call(&self, context: ResolverContext<'_>) -> anyhow::Result<Resolved> {
        (self.0)(context)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_null_is_null() {
        assert_eq!(Resolved::from(Value::Null), Resolved::Null);
        assert_eq!(Resolved::from(None::<&str>), Resolved::Null);
        assert_eq!(Resolved::from(f64::NAN), Resolved::Null);
    }

    #[test]
    fn resolver_sees_parent_and_arguments() {
        let parent = Instance::new("Human", json!({ "name": "Peter" }));
        let arguments = json!({ "times": 2, "suffix": null });
        let arguments = arguments.as_object().unwrap();

        let resolver = Resolver::new(|ctx| {
            let name = ctx.parent().field("name").and_then(Value::as_str).unwrap_or_default();
            let times = ctx.try_argument::<usize>("times")?.unwrap_or(1);
            let suffix = ctx.try_argument::<String>("suffix")?.unwrap_or_default();
            Ok(format!("{}{suffix}", name.repeat(times)).into())
        });

        let resolved = resolver.call(ResolverContext::new(&parent, "echo", arguments)).unwrap();

        assert_eq!(resolved, Resolved::from("PeterPeter"));
    }
}
