//! Ranking: field-match counting, deprecation, and tie-breaking.

use super::common::*;
use docsift::SearchEngine;

#[test]
fn test_current_doc_ranks_above_deprecated() {
    let engine = engine_with(camera_pair());
    let results = engine.search("camera", None).unwrap();
    assert_eq!(ids(&results), ["a", "b"]);
}

#[test]
fn test_deprecated_doc_is_demoted_not_hidden() {
    let engine = engine_with(camera_pair());
    let results = engine.search_scored("camera", None).unwrap();
    assert_eq!(results.len(), 2);
    // a: title + content; b: title only, then x0.3
    assert_eq!(results[0].score, Some(2.0));
    let demoted = results[1].score.unwrap();
    assert!((demoted - 0.3).abs() < 1e-9, "got {}", demoted);
}

#[test]
fn test_deprecated_falls_below_single_field_match() {
    let engine = sample_engine();
    let results = engine.search("camera", None).unwrap();
    // legacy page matches in three fields (3 x 0.3 = 0.9) but loses to the
    // permissions guide, which only mentions camera in its content (1.0)
    assert_eq!(
        ids(&results),
        ["sdk/camera", "guides/permissions", "sdk/camera-legacy"]
    );
}

#[test]
fn test_more_fields_rank_higher() {
    let engine = engine_with(vec![
        make_record("content-only", "Overview", "Configure the router here."),
        make_record_in("everywhere", "Router", "The router maps URLs.", "Router", "Router"),
    ]);
    let results = engine.search_scored("router", None).unwrap();
    assert_eq!(ids(&results), ["everywhere", "content-only"]);
    assert_eq!(results[0].score, Some(4.0));
    assert_eq!(results[1].score, Some(1.0));
}

#[test]
fn test_title_hit_beats_equal_content_hit() {
    // content-only doc is loaded first, so ordinal order alone would put it first
    let engine = engine_with(vec![
        make_record("y", "Other", "all about the router"),
        make_record("x", "Router", "nothing relevant"),
    ]);
    let results = engine.search_scored("router", None).unwrap();
    assert_eq!(ids(&results), ["x", "y"]);
    assert_eq!(results[0].score, results[1].score);
}

#[test]
fn test_earlier_position_wins_within_field() {
    let engine = engine_with(vec![
        make_record("late", "One", "all about configuring the router"),
        make_record("early", "Two", "router configuration"),
    ]);
    let results = engine.search("router", None).unwrap();
    assert_eq!(ids(&results), ["early", "late"]);
}

#[test]
fn test_multi_term_requires_cooccurrence_in_one_field() {
    let engine = sample_engine();
    assert_eq!(
        ids(&engine.search("permissions camera", None).unwrap()),
        ["guides/permissions"]
    );
    // "camera" and "audio" never share a field
    assert!(engine.search("camera audio", None).unwrap().is_empty());
}

#[test]
fn test_partial_words_match() {
    let engine = sample_engine();
    assert_eq!(
        ids(&engine.search("notif", None).unwrap()),
        ["guides/push-notifications"]
    );
    assert_eq!(ids(&engine.search("perm", None).unwrap()), ["guides/permissions"]);
    // infix, not just prefix
    assert_eq!(ids(&engine.search("layer", None).unwrap()), ["sdk/audio"]);
}

#[test]
fn test_limit_caps_results() {
    let engine = engine_with(generated_corpus(30, "widget"));
    assert_eq!(engine.search("widget", None).unwrap().len(), 5);
    assert_eq!(engine.search("widget", Some(0)).unwrap().len(), 5);
    assert_eq!(engine.search("widget", Some(12)).unwrap().len(), 12);
    assert_eq!(engine.search("widget", Some(1000)).unwrap().len(), 20);
}

#[test]
fn test_scores_only_on_scored_search() {
    let engine = sample_engine();
    assert!(engine
        .search("camera", None)
        .unwrap()
        .iter()
        .all(|r| r.score.is_none()));
    assert!(engine
        .search_scored("camera", None)
        .unwrap()
        .iter()
        .all(|r| r.score.is_some()));
}

#[test]
fn test_hierarchy_fields_are_searchable() {
    let engine = engine_with(vec![make_record_in(
        "guides/intro",
        "Getting started",
        "Install the tools.",
        "Tutorials",
        "Basics",
    )]);
    assert_eq!(ids(&engine.search("tutorials", None).unwrap()), ["guides/intro"]);
    assert_eq!(ids(&engine.search("basics", None).unwrap()), ["guides/intro"]);
}

#[test]
fn test_lvl2_and_lvl3_are_not_indexed() {
    let mut record = make_record("a", "Title", "Body");
    record.hierarchy.lvl2 = Some("Zeppelin".to_string());
    record.hierarchy.lvl3 = Some("Quokka".to_string());
    let mut engine = SearchEngine::new();
    engine.load_documents(vec![record]);
    assert!(engine.search("zeppelin", None).unwrap().is_empty());
    assert!(engine.search("quokka", None).unwrap().is_empty());
}
