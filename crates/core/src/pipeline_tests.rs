// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn stages(names: &[&str]) -> Pipeline {
    Pipeline::new(names.iter().map(|s| s.to_string()).collect())
}

#[test]
fn first_returns_entry_stage() {
    let p = stages(&["a", "b", "c"]);
    assert_eq!(p.first(), Some("a"));
}

#[test]
fn first_on_empty_pipeline() {
    let p = stages(&[]);
    assert_eq!(p.first(), None);
    assert!(p.is_empty());
}

#[test]
fn position_follows_declaration_order() {
    let p = stages(&["a", "b", "c"]);
    assert_eq!(p.position("a"), Some(0));
    assert_eq!(p.position("b"), Some(1));
    assert_eq!(p.position("c"), Some(2));
    assert_eq!(p.position("d"), None);
}

#[test]
fn next_after_walks_the_ladder() {
    let p = stages(&["a", "b", "c"]);
    assert_eq!(p.next_after("a"), Some("b"));
    assert_eq!(p.next_after("b"), Some("c"));
}

#[test]
fn next_after_last_stage_is_none() {
    let p = stages(&["a", "b"]);
    assert_eq!(p.next_after("b"), None);
}

#[test]
fn next_after_unknown_origin_is_none() {
    // Records can carry non-stage origins (provenance failures, synthesized
    // decode failures); those have no escalation target.
    let p = stages(&["a", "b"]);
    assert_eq!(p.next_after("JobRouter"), None);
    assert_eq!(p.next_after("nope"), None);
}

#[test]
fn contains_and_names() {
    let p = stages(&["a", "b"]);
    assert!(p.contains("a"));
    assert!(!p.contains("z"));
    assert_eq!(p.names(), &["a".to_string(), "b".to_string()]);
    assert_eq!(p.len(), 2);
}
