use std::sync::Arc;

use indexmap::IndexMap;

use crate::{Error, TypeDefinition};

/// Type definitions keyed by name, in registration order.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: IndexMap<String, Arc<TypeDefinition>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `definition` and, transitively, every definition it references directly.
    ///
    /// An explicit registration replaces any type already registered under the same name. Referenced
    /// definitions are only added when their name is still free.
    pub fn register(&mut self, definition: Arc<TypeDefinition>) -> Arc<TypeDefinition> {
        let mut pending = definition.references().collect::<Vec<_>>();

        if let Some(previous) = self.types.insert(definition.name().to_owned(), Arc::clone(&definition)) {
            if !Arc::ptr_eq(&previous, &definition) {
                tracing::debug!(type_name = definition.name(), "replacing a registered type");
            }
        } else {
            tracing::debug!(type_name = definition.name(), "registering type");
        }

        while let Some(reference) = pending.pop() {
            if self.types.contains_key(reference.name()) {
                continue;
            }
            tracing::debug!(type_name = reference.name(), "registering referenced type");
            pending.extend(reference.references());
            self.types.insert(reference.name().to_owned(), reference);
        }

        definition
    }

    pub fn get(&self, name: &str) -> crate::Result<&Arc<TypeDefinition>> {
        self.types.get(name).ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDefinition>> {
        self.types.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
