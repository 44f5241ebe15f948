//! Construction, equality, cloning, read-only protection and value-set
//! ingestion over realistic petstore-shaped declarations.

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use restgen_params::{
    HttpMethod, Operation, OperationHandle, ParameterElement, ParameterError, ParameterStyle,
    ParameterValue, ParentPath,
};
use serde_json::json;

fn read_only_operation() -> OperationHandle {
    Operation::read_only(HttpMethod::Post, "/pets").shared()
}

fn mutable_operation() -> OperationHandle {
    Operation::new(HttpMethod::Post, "/pets").shared()
}

fn hash_of(parameter: &ParameterElement) -> u64 {
    let mut hasher = DefaultHasher::new();
    parameter.hash(&mut hasher);
    hasher.finish()
}

fn value(raw: serde_json::Value) -> ParameterValue {
    ParameterValue::from(&raw)
}

/// Petstore-like pet body declaration; `shuffled` swaps unordered map keys
/// around without changing meaning.
fn pet_body(shuffled: bool) -> serde_json::Value {
    if shuffled {
        json!({
            "name": "pet",
            "schema": {
                "properties": {
                    "category": {
                        "properties": {
                            "name": {"type": "string"},
                            "id": {"type": "integer"}
                        },
                        "type": "object"
                    },
                    "id": {"type": "integer"},
                    "tags": {
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": {"type": "integer"},
                                "name": {"type": "string"}
                            }
                        },
                        "type": "array"
                    }
                },
                "type": "object"
            }
        })
    } else {
        json!({
            "name": "pet",
            "schema": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "category": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer"},
                            "name": {"type": "string"}
                        }
                    },
                    "tags": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": {"type": "integer"},
                                "name": {"type": "string"}
                            }
                        }
                    }
                }
            }
        })
    }
}

#[test]
fn test_equality_is_independent_of_declaration_order() {
    let operation = read_only_operation();
    let first = ParameterElement::from_raw(&pet_body(false), &operation, None).unwrap();
    let second = ParameterElement::from_raw(&pet_body(false), &operation, None).unwrap();
    let unordered = ParameterElement::from_raw(&pet_body(true), &operation, None).unwrap();

    // Same parse, repeated parse, shuffled parse
    assert_eq!(first, first);
    assert_eq!(first, second);
    assert_eq!(first, unordered);
    assert_eq!(second, unordered);
    assert_eq!(hash_of(&first), hash_of(&second));
    assert_eq!(hash_of(&first), hash_of(&unordered));

    // Hash-equal trees collapse inside sets
    let mut set = HashSet::new();
    set.insert(first);
    set.insert(unordered);
    assert_eq!(set.len(), 1);
}

#[test]
fn test_equality_requires_matching_structure() {
    let operation = read_only_operation();
    let original = ParameterElement::from_raw(&pet_body(false), &operation, None).unwrap();

    // Changing a nested property type breaks equality
    let mut retyped_raw = pet_body(false);
    retyped_raw["schema"]["properties"]["id"]["type"] = json!("string");
    let retyped = ParameterElement::from_raw(&retyped_raw, &operation, None).unwrap();
    assert_ne!(original, retyped);

    // Removing a nested property breaks equality
    let mut narrowed_raw = pet_body(false);
    narrowed_raw["schema"]["properties"]
        .as_object_mut()
        .unwrap()
        .remove("category");
    let narrowed = ParameterElement::from_raw(&narrowed_raw, &operation, None).unwrap();
    assert_ne!(original, narrowed);

    // A different location breaks equality even with identical shape
    let query = json!({"name": "petId", "in": "query", "schema": {"type": "integer"}});
    let path = json!({"name": "petId", "in": "path", "schema": {"type": "integer"}});
    let a = ParameterElement::from_raw(&query, &operation, None).unwrap();
    let b = ParameterElement::from_raw(&path, &operation, None).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_normalized_name_is_ignored_at_tree_roots() {
    let operation = read_only_operation();
    // Same declared name, different originating schemas: the normalized
    // names differ but top-level parameters ignore them
    let a_raw = json!({"name": "tag", "in": "query", "schema": {"type": "string", "x-schemaName": "Tag"}});
    let b_raw = json!({"name": "tag", "in": "query", "schema": {"type": "string", "x-schemaName": "Keyword"}});
    let a = ParameterElement::from_raw(&a_raw, &operation, None).unwrap();
    let b = ParameterElement::from_raw(&b_raw, &operation, None).unwrap();
    assert_ne!(a.normalized_name(), b.normalized_name());
    assert_eq!(a, b);

    // Nested under a parent, the same divergence is significant
    let nested_a = json!({"name": "pet", "schema": {"type": "object", "properties": {
        "tag": {"type": "string", "x-schemaName": "Tag"}
    }}});
    let nested_b = json!({"name": "pet", "schema": {"type": "object", "properties": {
        "tag": {"type": "string", "x-schemaName": "Keyword"}
    }}});
    let a = ParameterElement::from_raw(&nested_a, &operation, None).unwrap();
    let b = ParameterElement::from_raw(&nested_b, &operation, None).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_examples_distribute_into_children() {
    let operation = read_only_operation();
    let raw = json!({
        "name": "pet",
        "example": {
            "id": 123123,
            "category": {"id": 234234, "name": "categoryName!"},
            "name": "firstLevelName",
            "photoUrls": ["root_url"],
            "tags": [{"id": 1, "name": "firstTag"}, {"id": 2, "name": "secondTag"}]
        },
        "schema": {
            "type": "object",
            "properties": {
                "id": {"type": "integer", "example": 5},
                "category": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "name": {"type": "string", "example": "category_name"}
                    }
                },
                "name": {"type": "string", "example": "doggie"},
                "photoUrls": {
                    "type": "array",
                    "items": {"type": "string"},
                    "example": ["url_1", "url_2"]
                },
                "tags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer", "example": 333},
                            "name": {"type": "string"}
                        }
                    },
                    "example": [{"id": 999, "name": "bigTag"}]
                },
                "status": {"type": "string"}
            }
        }
    });
    let pet = ParameterElement::from_raw(&raw, &operation, None).unwrap();
    let body = pet.as_object().unwrap();

    // The root object keeps its own example
    assert!(pet.examples().contains(&value(json!({
        "id": 123123,
        "category": {"id": 234234, "name": "categoryName!"},
        "name": "firstLevelName",
        "photoUrls": ["root_url"],
        "tags": [{"id": 1, "name": "firstTag"}, {"id": 2, "name": "secondTag"}]
    }))));

    // Root-level id: own example plus the distributed entry
    let id = body.property("id").unwrap();
    assert!(id.examples().contains(&value(json!(5))));
    assert!(id.examples().contains(&value(json!(123123))));
    assert_eq!(id.examples().len(), 2);

    // The category object receives the whole sub-mapping
    let category = body.property("category").unwrap();
    assert!(category.examples().contains(&value(json!({"id": 234234, "name": "categoryName!"}))));
    assert_eq!(category.examples().len(), 1);

    let category_id = category.as_object().unwrap().property("id").unwrap();
    assert!(category_id.examples().contains(&value(json!(234234))));
    assert_eq!(category_id.examples().len(), 1);

    let category_name = category.as_object().unwrap().property("name").unwrap();
    assert!(category_name.examples().contains(&value(json!("category_name"))));
    assert!(category_name.examples().contains(&value(json!("categoryName!"))));
    assert_eq!(category_name.examples().len(), 2);

    let name = body.property("name").unwrap();
    assert!(name.examples().contains(&value(json!("doggie"))));
    assert!(name.examples().contains(&value(json!("firstLevelName"))));
    assert_eq!(name.examples().len(), 2);

    // Array examples stay whole on the array and item-wise on the reference
    let photo_urls = body.property("photoUrls").unwrap();
    assert!(photo_urls.examples().contains(&value(json!(["root_url"]))));
    assert!(photo_urls.examples().contains(&value(json!(["url_1", "url_2"]))));
    assert_eq!(photo_urls.examples().len(), 2);

    let photo_url = photo_urls.as_array().unwrap().reference_element();
    assert!(photo_url.examples().contains(&value(json!("root_url"))));
    assert!(photo_url.examples().contains(&value(json!("url_1"))));
    assert!(photo_url.examples().contains(&value(json!("url_2"))));
    assert_eq!(photo_url.examples().len(), 3);

    let tags = body.property("tags").unwrap();
    assert!(tags.examples().contains(&value(json!([
        {"id": 1, "name": "firstTag"}, {"id": 2, "name": "secondTag"}
    ]))));
    assert!(tags.examples().contains(&value(json!([{"id": 999, "name": "bigTag"}]))));
    assert_eq!(tags.examples().len(), 2);

    let tag = tags.as_array().unwrap().reference_element();
    assert!(tag.examples().contains(&value(json!({"id": 1, "name": "firstTag"}))));
    assert!(tag.examples().contains(&value(json!({"id": 2, "name": "secondTag"}))));
    assert!(tag.examples().contains(&value(json!({"id": 999, "name": "bigTag"}))));
    assert_eq!(tag.examples().len(), 3);

    let tag_id = tag.as_object().unwrap().property("id").unwrap();
    for expected in [333, 999, 1, 2] {
        assert!(tag_id.examples().contains(&value(json!(expected))));
    }
    assert_eq!(tag_id.examples().len(), 4);

    let tag_name = tag.as_object().unwrap().property("name").unwrap();
    assert_eq!(tag_name.examples().len(), 3);

    // No example mentioned status anywhere
    let status = body.property("status").unwrap();
    assert!(status.examples().is_empty());
}

#[test]
fn test_enum_values_stay_at_their_declaring_level() {
    let operation = read_only_operation();
    let raw = json!({
        "name": "pet",
        "schema": {
            "type": "object",
            "enum": [
                {"id": 1, "category": {"id": 2, "name": "cat"}},
                {"id": 2, "category": {"id": 3, "name": "dog"}}
            ],
            "properties": {
                "id": {"type": "integer"},
                "category": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "name": {"type": "string"}
                    }
                }
            }
        }
    });
    let pet = ParameterElement::from_raw(&raw, &operation, None).unwrap();
    assert_eq!(pet.enum_values().len(), 2);
    assert!(pet.enum_values().contains(&value(json!(
        {"id": 1, "category": {"id": 2, "name": "cat"}}
    ))));

    let body = pet.as_object().unwrap();
    assert!(body.property("id").unwrap().enum_values().is_empty());
    let category = body.property("category").unwrap();
    assert!(category.enum_values().is_empty());
    assert!(category.as_object().unwrap().property("id").unwrap().enum_values().is_empty());
}

#[test]
fn test_defaults_are_not_distributed() {
    let operation = read_only_operation();
    let raw = json!({
        "name": "pet",
        "schema": {
            "type": "object",
            "default": {"id": 664466, "name": "firstLevelDefault"},
            "properties": {
                "id": {"type": "integer", "default": 5},
                "name": {"type": "string", "default": "doggie"},
                "photoUrls": {
                    "type": "array",
                    "items": {"type": "string"},
                    "default": ["url_a", "url_b"]
                },
                "status": {"type": "string"}
            }
        }
    });
    let pet = ParameterElement::from_raw(&raw, &operation, None).unwrap();
    assert_eq!(
        pet.default_value(),
        Some(&value(json!({"id": 664466, "name": "firstLevelDefault"})))
    );

    let body = pet.as_object().unwrap();
    assert_eq!(body.property("id").unwrap().default_value(), Some(&value(json!(5))));
    assert_eq!(
        body.property("name").unwrap().default_value(),
        Some(&value(json!("doggie")))
    );
    let photo_urls = body.property("photoUrls").unwrap();
    assert_eq!(photo_urls.default_value(), Some(&value(json!(["url_a", "url_b"]))));
    // The reference element has no default of its own
    assert!(photo_urls.as_array().unwrap().reference_element().default_value().is_none());
    assert!(body.property("status").unwrap().default_value().is_none());
}

#[test]
fn test_coercion_policy_on_ingestion() {
    let operation = read_only_operation();

    // Declared number: numeric strings coerce, anything else is dropped
    let number_raw = json!({
        "name": "paramNumber", "in": "query",
        "schema": {"type": "number", "default": "5", "enum": ["1", "2.5", "a"]},
        "example": true
    });
    let number = ParameterElement::from_raw(&number_raw, &operation, None).unwrap();
    assert_eq!(number.default_value(), Some(&value(json!(5))));
    assert!(number.enum_values().contains(&value(json!(1))));
    assert!(number.enum_values().contains(&value(json!(2.5))));
    assert_eq!(number.enum_values().len(), 2);
    assert!(number.examples().is_empty());

    // Declared string: scalars stringify
    let string_raw = json!({
        "name": "paramString", "in": "query",
        "schema": {"type": "string", "enum": [2.5, "a"]},
        "example": true
    });
    let string = ParameterElement::from_raw(&string_raw, &operation, None).unwrap();
    assert!(string.enum_values().contains(&value(json!("2.5"))));
    assert!(string.enum_values().contains(&value(json!("a"))));
    assert_eq!(string.enum_values().len(), 2);
    assert!(string.examples().contains(&value(json!("true"))));

    // Declared boolean: only literal spellings coerce
    let boolean_raw = json!({
        "name": "paramBoolean", "in": "query",
        "schema": {"type": "boolean", "enum": ["true", "false", 10]},
        "example": "true"
    });
    let boolean = ParameterElement::from_raw(&boolean_raw, &operation, None).unwrap();
    assert!(boolean.enum_values().contains(&value(json!(true))));
    assert!(boolean.enum_values().contains(&value(json!(false))));
    assert_eq!(boolean.enum_values().len(), 2);
    assert!(boolean.examples().contains(&value(json!(true))));
}

#[test]
fn test_schema_names_are_captured() {
    let operation = read_only_operation();
    let raw = json!({
        "name": "pet",
        "schema": {
            "type": "object",
            "x-schemaName": "Pet",
            "properties": {
                "category": {
                    "type": "object",
                    "x-schemaName": "Category",
                    "properties": {"id": {"type": "integer"}}
                },
                "tags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "x-schemaName": "Tag",
                        "properties": {"id": {"type": "integer"}}
                    }
                }
            }
        }
    });
    let pet = ParameterElement::from_raw(&raw, &operation, None).unwrap();
    assert_eq!(pet.schema_name(), Some("Pet"));

    let body = pet.as_object().unwrap();
    assert_eq!(body.property("category").unwrap().schema_name(), Some("Category"));

    let tag = body.property("tags").unwrap().as_array().unwrap().reference_element();
    assert_eq!(tag.schema_name(), Some("Tag"));
    // The anonymous reference element borrows its normalized name from the schema
    assert_eq!(tag.normalized_name().as_str(), "tag");
    assert!(tag.name().is_empty());
}

#[test]
fn test_deep_clone_is_equal_but_independent() {
    let operation = mutable_operation();
    let original = ParameterElement::from_raw(&pet_body(false), &operation, None).unwrap();
    let mut clone = original.deep_clone();
    assert_eq!(original, clone);
    assert_eq!(hash_of(&original), hash_of(&clone));
    assert_eq!(clone.operation(), original.operation());

    // Mutating the clone's containers leaves the original untouched
    assert!(clone.add_example(value(json!({"id": 1}))).unwrap());
    assert_eq!(clone.examples().len(), 1);
    assert!(original.examples().is_empty());
}

#[test]
fn test_deep_clone_rebinds_children_to_the_new_owner() {
    let template_op = read_only_operation();
    let template = ParameterElement::from_raw(&pet_body(false), &template_op, None).unwrap();

    let working_op = template_op.to_mutable().shared();
    let working = template.deep_clone_into(&working_op, None);
    // The rebound operation compares equal, so the trees still compare equal
    assert_eq!(template, working);

    // Every node of the clone references the new operation and a parent chain
    // rooted at the clone
    let body = working.as_object().unwrap();
    let category = body.property("category").unwrap();
    assert!(!category.operation().is_read_only());
    assert_eq!(
        category.parent(),
        Some(&ParentPath::root(working.name()))
    );
    let category_id = category.as_object().unwrap().property("id").unwrap();
    assert!(!category_id.operation().is_read_only());
    assert_eq!(
        category_id.parent(),
        Some(&ParentPath::root(working.name()).child(category.name()))
    );
}

#[test]
fn test_read_only_guard_blocks_every_mutator() {
    let template_op = read_only_operation();
    let mut template = ParameterElement::from_raw(&pet_body(false), &template_op, None).unwrap();

    assert!(matches!(
        template.set_required(true),
        Err(ParameterError::EditReadOnlyOperation { .. })
    ));
    assert!(matches!(
        template.set_style(ParameterStyle::PipeDelimited),
        Err(ParameterError::EditReadOnlyOperation { .. })
    ));
    assert!(matches!(
        template.set_explode(false),
        Err(ParameterError::EditReadOnlyOperation { .. })
    ));
    assert!(matches!(
        template.add_example(value(json!({"id": 1}))),
        Err(ParameterError::EditReadOnlyOperation { .. })
    ));
    assert!(matches!(
        template.set_parent(None),
        Err(ParameterError::EditReadOnlyOperation { .. })
    ));
    assert!(template.examples().is_empty());

    // Nested mutators are gated by the same owning operation
    {
        let body = template.as_object_mut().unwrap();
        let id = body.property_mut("id").unwrap().as_leaf_mut().unwrap();
        assert!(matches!(
            id.set_value(value(json!(5))),
            Err(ParameterError::EditReadOnlyOperation { .. })
        ));
        let tags = body.property_mut("tags").unwrap().as_array_mut().unwrap();
        assert!(matches!(
            tags.clear_elements(),
            Err(ParameterError::EditReadOnlyOperation { .. })
        ));
    }

    // The same calls succeed on a deep clone bound to a mutable operation
    let mut working = template.deep_clone_into(&template_op.to_mutable().shared(), None);
    working.set_required(true).unwrap();
    working.set_style(ParameterStyle::PipeDelimited).unwrap();
    assert!(working.add_example(value(json!({"id": 1}))).unwrap());
    working
        .as_object_mut()
        .unwrap()
        .property_mut("id")
        .unwrap()
        .as_leaf_mut()
        .unwrap()
        .set_value(value(json!(5)))
        .unwrap();
}

#[test]
fn test_object_merge_unifies_properties() {
    let operation = mutable_operation();
    let first_raw = json!({
        "name": "pet",
        "schema": {
            "type": "object",
            "properties": {
                "id": {"type": "integer", "enum": [1, 2]},
                "name": {"type": "string"}
            }
        }
    });
    let second_raw = json!({
        "name": "pet",
        "schema": {
            "type": "object",
            "properties": {
                "id": {"type": "integer", "enum": [2, 3]},
                "status": {"type": "string", "default": "available"}
            }
        }
    });
    let first = ParameterElement::from_raw(&first_raw, &operation, None).unwrap();
    let second = ParameterElement::from_raw(&second_raw, &operation, None).unwrap();

    let merged = first.merge(&second).unwrap();
    let object = merged.as_object().unwrap();
    assert_eq!(object.properties().len(), 3);

    // Properties present in both merge recursively
    let id = object.property("id").unwrap();
    assert_eq!(id.enum_values().len(), 3);
    // Properties present in only one side are adopted
    let status = object.property("status").unwrap();
    assert_eq!(status.default_value(), Some(&value(json!("available"))));

    // Neither operand changed
    assert_eq!(first.as_object().unwrap().properties().len(), 2);
    assert_eq!(second.as_object().unwrap().properties().len(), 2);
}

#[test]
fn test_merged_arrays_merge_reference_elements() {
    let operation = mutable_operation();
    let first_raw = json!({
        "name": "tags", "in": "query",
        "schema": {"type": "array", "items": {"type": "string", "enum": ["a"]}}
    });
    let second_raw = json!({
        "name": "tags", "in": "query",
        "schema": {"type": "array", "items": {"type": "string", "enum": ["b"]}}
    });
    let first = ParameterElement::from_raw(&first_raw, &operation, None).unwrap();
    let second = ParameterElement::from_raw(&second_raw, &operation, None).unwrap();

    let merged = first.merge(&second).unwrap();
    let reference = merged.as_array().unwrap().reference_element();
    assert!(reference.enum_values().contains(&value(json!("a"))));
    assert!(reference.enum_values().contains(&value(json!("b"))));
}

#[test]
fn test_unsupported_external_example_values_are_skipped() {
    let operation = read_only_operation();
    let raw = json!({
        "name": "petId", "in": "path",
        "schema": {"type": "integer"},
        "examples": {
            "inline": {"value": 42},
            "remote": {"externalValue": "https://example.com/pet.json"}
        }
    });
    let parameter = ParameterElement::from_raw(&raw, &operation, None).unwrap();
    assert!(parameter.examples().contains(&value(json!(42))));
    assert_eq!(parameter.examples().len(), 1);
}
