//! Autocomplete, tag listings, recent posts and corpus stats.

use lectern::search::corpus::{all_tags, autocomplete, corpus_stats, popular_tags, recent};
use lectern::testing::{make_doc, make_index, sample_index};

#[test]
fn test_autocomplete_offers_titles_tags_and_words() {
    let index = sample_index();
    let suggestions = autocomplete(&index, "type", 10);
    assert_eq!(suggestions[0], "TypeScript Generics Deep Dive");
    assert!(suggestions.contains(&"typescript".to_string()));
    assert!(suggestions.contains(&"types.".to_string()) || suggestions.contains(&"types".to_string()));
}

#[test]
fn test_autocomplete_needs_two_chars() {
    assert!(autocomplete(&sample_index(), "r", 5).is_empty());
    assert!(autocomplete(&sample_index(), "  ", 5).is_empty());
}

#[test]
fn test_autocomplete_respects_limit() {
    assert_eq!(autocomplete(&sample_index(), "re", 2).len(), 2);
}

#[test]
fn test_tag_views() {
    let index = make_index(vec![
        make_doc("a", "A", &["rust", "cli"], 3),
        make_doc("b", "B", &["rust"], 2),
        make_doc("c", "C", &["web", "cli", "rust"], 1),
    ]);
    assert_eq!(all_tags(&index), vec!["cli", "rust", "web"]);

    let popular = popular_tags(&index, 2);
    assert_eq!(popular[0].tag, "rust");
    assert_eq!(popular[0].count, 3);
    assert_eq!(popular[1].tag, "cli");
    assert_eq!(popular.len(), 2);
}

#[test]
fn test_recent_and_stats() {
    let index = sample_index();
    let newest: Vec<String> = recent(&index, 2).into_iter().map(|d| d.id).collect();
    assert_eq!(newest, vec!["intro-to-react-hooks", "rust-ownership-basics"]);

    let stats = corpus_stats(&index);
    assert_eq!(stats.total_posts, 3);
    assert_eq!(stats.total_tags, 5);
    assert_eq!(stats.average_reading_time, 1);
    assert_eq!(stats.last_updated, index.built_at);
}
