//! Declarative GraphQL type definitions bound to the `async-graphql` dynamic engine.
//!
//! Interfaces and object types are declared as data, registered in a [`Schema`], and executed by
//! the engine once a root query type is assigned:
//!
//! ```rust
//! use graphql_binding::{FieldDefinition, Schema, TypeDefinition};
//!
//! let pet = TypeDefinition::object("Pet")
//!     .field(FieldDefinition::string("type").resolve(|_| Ok("Dog".into())))
//!     .finish();
//!
//! let mut schema = Schema::new("pets");
//! schema.set_query(pet);
//!
//! let result = schema.execute("{ type }", None).unwrap();
//! assert_eq!(result.data, serde_json::json!({ "type": "Dog" }));
//! ```

#![cfg_attr(test, allow(unused_crate_dependencies))]

mod config;
mod definition;
mod engine;
mod error;
mod field_type;
mod introspection;
mod registry;
mod resolver;
mod response;
mod schema;

pub use config::SchemaConfig;
pub use definition::{ArgumentDefinition, FieldDefinition, TypeDefinition, TypeKind};
pub use error::{Error, Result};
pub use field_type::{FieldType, ScalarType};
pub use introspection::INTROSPECTION_QUERY;
pub use registry::TypeRegistry;
pub use resolver::{Instance, Resolved, Resolver, ResolverContext};
pub use response::{Location, PathSegment, QueryError, QueryRequest, QueryResult};
pub use schema::Schema;
