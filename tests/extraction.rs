//! Selector extraction tests
//!
//! Completed-value delivery through the pull iterator: selector
//! semantics, document-order emission, path attachment, key transforms
//! and chunk-size invariance.

use json_sieve::{Emission, Parser, ParserOptions, parse_document};
use serde_json::{Value, json};

const TOYS: &str = r#"{
  "total_rows": 2,
  "rows": [
    {
      "id": "buzz",
      "props": { "humanoid": true, "armed": true },
      "movies": [1, 2, 3]
    },
    {
      "id": "woody",
      "props": { "humanoid": true, "armed": false },
      "movies": [2, 5, 8]
    }
  ]
}"#;

fn extract(doc: &str, options: ParserOptions) -> Vec<Emission> {
    Parser::from_slice(doc.to_owned(), options)
        .into_values()
        .expect("source configured")
        .collect::<json_sieve::Result<Vec<_>>>()
        .expect("well-formed document")
}

#[test]
fn no_filter_yields_the_whole_document() {
    let values = extract(TOYS, ParserOptions::new());
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value["total_rows"], json!(2));
    assert_eq!(values[0].value["rows"][1]["id"], json!("woody"));
    assert_eq!(values[0].path, None);
}

#[test]
fn container_selector_yields_the_subtree() {
    let values = extract(TOYS, ParserOptions::new().filter("/rows"));
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value[0]["id"], json!("buzz"));
    assert_eq!(values[0].value[1]["id"], json!("woody"));
}

#[test]
fn element_selector_yields_each_array_element() {
    let values = extract(TOYS, ParserOptions::new().filter("/rows/"));
    let ids: Vec<&Value> = values.iter().map(|v| &v.value["id"]).collect();
    assert_eq!(ids, vec![&json!("buzz"), &json!("woody")]);
}

#[test]
fn leaf_selector_yields_the_scalar() {
    let values = extract(TOYS, ParserOptions::new().filter("/rows//id"));
    let ids: Vec<&Value> = values.iter().map(|v| &v.value).collect();
    assert_eq!(ids, vec![&json!("buzz"), &json!("woody")]);
}

#[test]
fn selectors_missing_a_leading_slash_are_normalized() {
    let values = extract(TOYS, ParserOptions::new().filter("rows//id"));
    assert_eq!(values.len(), 2);
}

#[test]
fn multiple_selectors_emit_in_document_order() {
    let options = ParserOptions::new().filters(["/total_rows", "/rows/"]);
    let values = extract(TOYS, options);
    assert_eq!(values.len(), 3);
    assert_eq!(values[0].value, json!(2));
    assert_eq!(values[1].value["id"], json!("buzz"));
    assert_eq!(values[2].value["id"], json!("woody"));
}

#[test]
fn with_path_attaches_the_match_location() {
    let options = ParserOptions::new()
        .filters(["/total_rows", "/rows/"])
        .with_path(true);
    let values = extract(TOYS, options);
    let paths: Vec<Option<&str>> = values.iter().map(|v| v.path.as_deref()).collect();
    assert_eq!(
        paths,
        vec![Some("/total_rows"), Some("/rows/"), Some("/rows/")]
    );
}

#[test]
fn matching_is_exact_not_prefix() {
    let values = extract(TOYS, ParserOptions::new().filter("/rows//props"));
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].value, json!({"humanoid": true, "armed": true}));

    // "/row" is a prefix of "/rows" but matches nothing.
    let values = extract(TOYS, ParserOptions::new().filter("/row"));
    assert!(values.is_empty());
}

#[test]
fn duplicate_selectors_emit_independently() {
    let options = ParserOptions::new().filters(["/total_rows", "/total_rows"]);
    let values = extract(TOYS, options);
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].value, values[1].value);
}

#[test]
fn empty_object_yields_an_empty_object() {
    let values = extract(
        r#"{"rows":[{"value":{}}]}"#,
        ParserOptions::new().filter("/rows//value"),
    );
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value, json!({}));

    let values = extract(
        r#"{"rows":[{"value":{}}]}"#,
        ParserOptions::new().filter("/rows/"),
    );
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value, json!({"value": {}}));
}

#[test]
fn object_member_order_is_preserved() {
    let values = extract(TOYS, ParserOptions::new().filter("/rows/"));
    let keys: Vec<&String> = values[0]
        .value
        .as_object()
        .expect("row is an object")
        .keys()
        .collect();
    assert_eq!(keys, vec!["id", "props", "movies"]);
}

#[test]
fn key_transform_rewrites_member_names() {
    let options = ParserOptions::new()
        .filter("/rows/")
        .key_transform(|key| key.to_uppercase());
    let values = extract(TOYS, options);
    assert_eq!(values.len(), 2, "selector matches raw paths");
    assert_eq!(values[0].value["ID"], json!("buzz"));
    assert_eq!(values[0].value.get("id"), None);
}

#[test]
fn extraction_is_chunk_size_invariant() {
    let whole = extract(TOYS, ParserOptions::new().filter("/rows/"));
    let tiny = extract(TOYS, ParserOptions::new().filter("/rows/").read_buffer_size(1));
    assert_eq!(whole, tiny);
}

#[test]
fn scalar_documents_round_through() {
    for (doc, expected) in [
        ("42", json!(42)),
        ("-17.5e2", json!(-1750.0)),
        (r#""plain""#, json!("plain")),
        ("true", json!(true)),
        ("null", json!(null)),
    ] {
        let values = extract(doc, ParserOptions::new());
        assert_eq!(values.len(), 1, "document {doc:?}");
        assert_eq!(values[0].value, expected, "document {doc:?}");
    }
}

#[test]
fn empty_input_yields_nothing() {
    assert!(extract("", ParserOptions::new()).is_empty());
    assert!(extract("  \n\t ", ParserOptions::new()).is_empty());
}

#[test]
fn emission_deserializes_into_concrete_types() {
    #[derive(serde::Deserialize)]
    struct Row {
        id: String,
    }

    let rows: Vec<Row> = Parser::from_slice(TOYS.to_owned(), ParserOptions::new().filter("/rows/"))
        .into_values()
        .expect("source configured")
        .map(|item| item.expect("well-formed document").deserialize())
        .collect::<json_sieve::Result<_>>()
        .expect("rows match the struct");
    assert_eq!(rows[0].id, "buzz");
    assert_eq!(rows[1].id, "woody");
}

#[test]
fn parse_document_returns_one_value() {
    let doc = parse_document(&b"{\"a\":[1,2]}"[..]).expect("well-formed document");
    assert_eq!(doc, json!({"a": [1, 2]}));
}

#[test]
fn each_value_drives_the_source_to_completion() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    Parser::from_slice(TOYS.to_owned(), ParserOptions::new().filter("/rows//id"))
        .each_value(move |emission| sink.borrow_mut().push(emission.value))
        .expect("well-formed document");
    assert_eq!(&*seen.borrow(), &[json!("buzz"), json!("woody")]);
}
