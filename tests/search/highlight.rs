//! Result formatting: highlighted titles and breadcrumbs.

use super::common::*;
use docsift::{EngineConfig, SearchConfig, SearchEngine};

#[test]
fn test_highlight_partial_word_preserves_case() {
    let engine = sample_engine();
    let results = engine.search("play", None).unwrap();
    assert_eq!(results[0].title, "Audio Player");
    assert_eq!(results[0].highlighted_title, "Audio <mark>Play</mark>er");
}

#[test]
fn test_highlight_each_query_term() {
    let engine = sample_engine();
    let results = engine.search("push notif", None).unwrap();
    assert_eq!(
        results[0].highlighted_title,
        "<mark>Push</mark> <mark>notif</mark>ications"
    );
}

/// Whatever query made a title match must also mark it.
#[test]
fn test_punctuated_queries_highlight_what_they_match() {
    let engine = engine_with(vec![make_record("a", "Camera API", "")]);
    for (query, expected) in [
        ("camera,", "<mark>Camera</mark> API"),
        ("(camera)", "<mark>Camera</mark> API"),
        ("camera-api", "<mark>Camera</mark> <mark>API</mark>"),
    ] {
        let results = engine.search(query, None).unwrap();
        assert_eq!(ids(&results), ["a"], "query {:?}", query);
        assert_eq!(results[0].highlighted_title, expected, "query {:?}", query);
    }
}

#[cfg(feature = "unicode-normalization")]
#[test]
fn test_diacritic_folded_match_is_highlighted() {
    let engine = engine_with(vec![make_record("b", "Café setup", "")]);
    let results = engine.search("cafe", None).unwrap();
    assert_eq!(ids(&results), ["b"]);
    assert_eq!(results[0].highlighted_title, "<mark>Café</mark> setup");
}

#[test]
fn test_single_char_terms_not_highlighted() {
    let engine = engine_with(vec![make_record("a", "A camera app", "")]);
    let results = engine.search("a camera", None).unwrap();
    assert_eq!(results[0].highlighted_title, "A <mark>camera</mark> app");
}

#[test]
fn test_title_without_match_is_unchanged() {
    // matched through content only
    let engine = sample_engine();
    let results = engine.search("microphone", None).unwrap();
    assert_eq!(results[0].highlighted_title, "Permissions");
}

#[test]
fn test_custom_markers() {
    let config = EngineConfig {
        search: SearchConfig {
            highlight_open: "[".to_string(),
            highlight_close: "]".to_string(),
            ..SearchConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut engine = SearchEngine::with_config(config);
    engine.load_documents(vec![make_record("a", "Audio Player", "")]);
    let results = engine.search("audio", None).unwrap();
    assert_eq!(results[0].highlighted_title, "[Audio] Player");
}

#[test]
fn test_category_skips_placeholder_lvl0() {
    let engine = sample_engine();
    let results = engine.search("permissions", None).unwrap();
    assert_eq!(results[0].id, "guides/permissions");
    assert_eq!(results[0].category, "Guides");
}

#[test]
fn test_category_skips_level_equal_to_title() {
    let engine = sample_engine();
    let camera = engine
        .search("camera", None)
        .unwrap()
        .into_iter()
        .find(|r| r.id == "sdk/camera")
        .unwrap();
    // lvl1 "Camera" repeats the title
    assert_eq!(camera.category, "Reference");
}

#[test]
fn test_category_joins_levels() {
    let engine = sample_engine();
    let results = engine.search("audio", None).unwrap();
    assert_eq!(results[0].category, "Reference > Audio");
}

#[test]
fn test_category_empty_without_hierarchy() {
    let engine = engine_with(vec![make_record("a", "Loose page", "")]);
    let results = engine.search("loose", None).unwrap();
    assert_eq!(results[0].category, "");
}

#[test]
fn test_result_carries_url_and_path() {
    let engine = sample_engine();
    let results = engine.search("audio", None).unwrap();
    assert_eq!(results[0].url, "https://docs.example.com/sdk/audio");
    assert_eq!(results[0].path, "sdk/audio.mdx");
}
