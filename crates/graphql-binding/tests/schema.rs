#![allow(unused_crate_dependencies)]

use std::sync::Arc;

use graphql_binding::{Error, FieldDefinition, Instance, Schema, TypeDefinition};
use serde_json::json;

struct StarWars {
    schema: Schema,
    character: Arc<TypeDefinition>,
    pet: Arc<TypeDefinition>,
    human: Arc<TypeDefinition>,
}

fn star_wars() -> StarWars {
    let character = TypeDefinition::interface("Character")
        .field(FieldDefinition::string("name"))
        .finish();

    let pet = TypeDefinition::object("Pet")
        .field(FieldDefinition::string("type").resolve(|_| Ok("Dog".into())))
        .finish();

    let human = TypeDefinition::object("Human")
        .implements(&character)
        .field(FieldDefinition::list("friends", &character))
        .field(FieldDefinition::new("pet", &pet).resolve(|_| Ok(Instance::new("Pet", json!({})).into())))
        .resolve_field("name", |_| Ok("Peter".into()))
        .finish();

    let mut schema = Schema::new("My own schema");
    schema.set_query(Arc::clone(&human));

    StarWars {
        schema,
        character,
        pet,
        human,
    }
}

const QUERY: &str = r"
    {
      name
      pet {
        type
      }
    }
";

#[test]
fn get_registered_type() {
    let StarWars {
        schema,
        character,
        pet,
        human,
    } = star_wars();

    assert!(Arc::ptr_eq(&schema.get_type("Character").unwrap(), &character));
    assert!(Arc::ptr_eq(&schema.get_type("Pet").unwrap(), &pet));
    assert!(Arc::ptr_eq(&schema.get_type("Human").unwrap(), &human));
}

#[test]
fn get_unregistered_type() {
    let StarWars { schema, .. } = star_wars();

    let error = schema.get_type("NON_EXISTENT_MODEL").unwrap_err();

    assert!(matches!(error, Error::NotFound(_)));
    assert!(error.to_string().contains("not found"));
    assert!(error.to_string().contains("NON_EXISTENT_MODEL"));
}

#[test]
fn schema_query() {
    let StarWars { schema, human, .. } = star_wars();

    assert!(Arc::ptr_eq(schema.query().unwrap(), &human));
}

#[test]
fn query_with_root_instance() {
    let StarWars { schema, human, .. } = star_wars();

    let result = schema.execute(QUERY, Some(human.instance(json!({})))).unwrap();

    insta::assert_json_snapshot!(result, @r#"
    {
      "data": {
        "name": "Peter",
        "pet": {
          "type": "Dog"
        }
      },
      "errors": []
    }
    "#);
}

#[test]
fn query_with_default_root() {
    let StarWars { schema, .. } = star_wars();

    let result = schema.execute(QUERY, None).unwrap();

    assert!(result.errors.is_empty());
    assert_eq!(result.data, json!({ "name": "Peter", "pet": { "type": "Dog" } }));
}

#[test]
fn type_map_holds_declared_and_builtin_types() {
    let StarWars { schema, .. } = star_wars();

    let type_names = schema.type_names().unwrap();

    insta::assert_json_snapshot!(type_names, @r#"
    [
      "Boolean",
      "Character",
      "Float",
      "Human",
      "ID",
      "Int",
      "Pet",
      "String",
      "__Directive",
      "__DirectiveLocation",
      "__EnumValue",
      "__Field",
      "__InputValue",
      "__Schema",
      "__Type",
      "__TypeKind"
    ]
    "#);
}

#[test]
fn schema_without_query() {
    let schema = Schema::new("My own schema");

    let error = schema.engine_schema().unwrap_err();

    assert!(matches!(error, Error::NoBaseQuery));
    assert!(error.to_string().contains("define a base query type"));
}

#[test]
fn registered_type_becomes_visible_with_a_query() {
    let mut schema = Schema::new("My own schema");

    let my_type = schema.register(
        TypeDefinition::object("MyType")
            .field(FieldDefinition::string("type").resolve(|_| Ok("Dog".into())))
            .finish(),
    );
    schema.set_query(Arc::clone(&my_type));

    assert!(Arc::ptr_eq(&schema.get_type("MyType").unwrap(), &my_type));
}

#[test]
fn registered_type_without_query() {
    let mut schema = Schema::new("My own schema");

    schema.register(
        TypeDefinition::object("MyType")
            .field(FieldDefinition::string("type").resolve(|_| Ok("Dog".into())))
            .finish(),
    );

    let error = schema.get_type("MyType").unwrap_err();

    assert!(matches!(error, Error::NoBaseQuery));
    assert!(error.to_string().contains("base query type"));
}

#[test]
fn schema_introspect() {
    let mut schema = Schema::new("My own schema");
    schema.set_query(
        TypeDefinition::object("MyType")
            .field(FieldDefinition::string("type").resolve(|_| Ok("Dog".into())))
            .finish(),
    );

    let introspection = schema.introspect().unwrap();

    assert!(introspection.contains_key("__schema"));
    assert_eq!(introspection["__schema"]["queryType"], json!({ "name": "MyType" }));
}
