//! Event-level surface tests
//!
//! The raw `(path, event)` stream: path conventions for objects, arrays
//! and keys, pull iteration, and the callback-driven variant.

use json_sieve::{Event, Parser, ParserOptions};
use serde_json::json;

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

fn collect_events(doc: &str, options: ParserOptions) -> Vec<(String, Event)> {
    Parser::from_slice(doc.to_owned(), options)
        .into_events()
        .expect("source configured")
        .map(|item| item.expect("well-formed document"))
        .collect()
}

#[test]
fn simple_object_event_sequence() {
    let events = collect_events(r#"{"hello":"world"}"#, ParserOptions::new());
    assert_eq!(
        events,
        vec![
            ("".to_owned(), Event::ObjectStart),
            ("".to_owned(), Event::Key("hello".to_owned())),
            ("/hello".to_owned(), Event::Scalar(json!("world"))),
            ("".to_owned(), Event::ObjectEnd),
        ]
    );
}

#[test]
fn nested_document_event_paths() {
    let events = collect_events(TOYS, ParserOptions::new());

    let expected_prefix = vec![
        ("".to_owned(), Event::ObjectStart),
        ("".to_owned(), Event::Key("total_rows".to_owned())),
        ("/total_rows".to_owned(), Event::Scalar(json!(2))),
        ("".to_owned(), Event::Key("rows".to_owned())),
        ("/rows".to_owned(), Event::ArrayStart),
        ("/rows/".to_owned(), Event::ObjectStart),
        ("/rows/".to_owned(), Event::Key("id".to_owned())),
        ("/rows//id".to_owned(), Event::Scalar(json!("buzz"))),
        ("/rows/".to_owned(), Event::Key("props".to_owned())),
        ("/rows//props".to_owned(), Event::ObjectStart),
        ("/rows//props".to_owned(), Event::Key("humanoid".to_owned())),
        ("/rows//props/humanoid".to_owned(), Event::Scalar(json!(true))),
        ("/rows//props".to_owned(), Event::Key("armed".to_owned())),
        ("/rows//props/armed".to_owned(), Event::Scalar(json!(true))),
        ("/rows//props".to_owned(), Event::ObjectEnd),
        ("/rows/".to_owned(), Event::Key("movies".to_owned())),
        ("/rows//movies".to_owned(), Event::ArrayStart),
        ("/rows//movies/".to_owned(), Event::Scalar(json!(1))),
        ("/rows//movies/".to_owned(), Event::Scalar(json!(2))),
        ("/rows//movies/".to_owned(), Event::Scalar(json!(3))),
        ("/rows//movies".to_owned(), Event::ArrayEnd),
        ("/rows/".to_owned(), Event::ObjectEnd),
    ];
    assert_eq!(&events[..expected_prefix.len()], &expected_prefix[..]);

    // Second element walks the same paths, then the array and root close.
    let tail = &events[expected_prefix.len()..];
    assert_eq!(tail.first(), Some(&("/rows/".to_owned(), Event::ObjectStart)));
    assert_eq!(
        &events[events.len() - 2..],
        &[
            ("/rows".to_owned(), Event::ArrayEnd),
            ("".to_owned(), Event::ObjectEnd),
        ]
    );
}

#[test]
fn empty_containers_produce_matched_pairs() {
    let events = collect_events(r#"{"a":{},"b":[]}"#, ParserOptions::new());
    assert_eq!(
        events,
        vec![
            ("".to_owned(), Event::ObjectStart),
            ("".to_owned(), Event::Key("a".to_owned())),
            ("/a".to_owned(), Event::ObjectStart),
            ("/a".to_owned(), Event::ObjectEnd),
            ("".to_owned(), Event::Key("b".to_owned())),
            ("/b".to_owned(), Event::ArrayStart),
            ("/b".to_owned(), Event::ArrayEnd),
            ("".to_owned(), Event::ObjectEnd),
        ]
    );
}

#[test]
fn key_transform_reaches_events_but_not_paths() {
    let options = ParserOptions::new().key_transform(|key| key.to_uppercase());
    let events = collect_events(r#"{"hello":"world"}"#, options);
    assert_eq!(events[1], ("".to_owned(), Event::Key("HELLO".to_owned())));
    assert_eq!(events[2].0, "/hello");
}

#[test]
fn each_event_visits_the_whole_stream() {
    let mut seen = Vec::new();
    let mut closes = 0;
    Parser::from_slice(TOYS.to_owned(), ParserOptions::new())
        .each_event(|path, event| {
            if event.is_close() {
                closes += 1;
            }
            seen.push(path);
        })
        .expect("well-formed document");
    assert_eq!(seen.first().map(String::as_str), Some(""));
    assert_eq!(seen.last().map(String::as_str), Some(""));
    // Root object, rows array, 2 row objects, 2 props, 2 movies arrays.
    assert_eq!(closes, 8);
}

#[test]
fn event_iterator_is_chunk_size_invariant() {
    let whole = collect_events(TOYS, ParserOptions::new());
    let byte_at_a_time = collect_events(TOYS, ParserOptions::new().read_buffer_size(1));
    assert_eq!(whole, byte_at_a_time);
}

#[test]
fn event_iterator_surfaces_syntax_errors_once() {
    let mut events = Parser::from_slice(&b"{\"a\":1,}"[..], ParserOptions::new())
        .into_events()
        .expect("source configured");

    let mut yielded = 0;
    let mut errors = 0;
    for item in events.by_ref() {
        match item {
            Ok(_) => yielded += 1,
            Err(err) => {
                assert!(err.is_syntax());
                errors += 1;
            }
        }
    }
    // Everything before the stray comma still comes through.
    assert_eq!(yielded, 3);
    assert_eq!(errors, 1);
    assert!(events.next().is_none());
}
