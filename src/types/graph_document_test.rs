//! Tests for `GraphDocument`.

use serde_json::json;

use super::{GraphDocument, TetherRef, UnresolvedPolicy};

#[test]
fn deserializes_full_document() {
  let doc: GraphDocument = serde_json::from_value(json!({
    "options": { "unresolved_input": "fail" },
    "nodes": [
      { "id": "a", "kind": "constant", "config": { "value": 5 } },
      { "id": "b", "kind": "scale", "config": { "factor": 2 } }
    ],
    "edges": [ { "from": "a.value", "to": "b.in" } ]
  }))
  .unwrap();
  assert_eq!(doc.options.unresolved_input, UnresolvedPolicy::Fail);
  assert_eq!(doc.nodes.len(), 2);
  assert_eq!(doc.nodes[0].config, json!({ "value": 5 }));
  assert_eq!(doc.edges[0].from, TetherRef::new("a", "value"));
  assert_eq!(doc.edges[0].to, TetherRef::new("b", "in"));
}

#[test]
fn missing_sections_default() {
  let doc: GraphDocument =
    serde_json::from_value(json!({ "nodes": [ { "id": "a", "kind": "identity" } ] })).unwrap();
  assert_eq!(doc.options.unresolved_input, UnresolvedPolicy::Absent);
  assert!(doc.nodes[0].config.is_null());
  assert!(doc.edges.is_empty());
}

#[test]
fn bad_tether_ref_fails_to_parse() {
  let r = serde_json::from_value::<GraphDocument>(json!({
    "edges": [ { "from": "a", "to": "b.in" } ]
  }));
  assert!(r.is_err());
}
