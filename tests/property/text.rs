//! Text processing: markup stripping, excerpts, highlighting.

use lectern::build::{derive_excerpt, strip_markup, EXCERPT_MAX_CHARS};
use lectern::search::highlight_terms;
use lectern::utils::{normalize, tokenize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_stripped_text_is_collapsed(source in "[a-zA-Z0-9 *_`#>\\[\\]()\n.-]{0,200}") {
        let text = strip_markup(&source);
        prop_assert!(!text.contains('`'));
        prop_assert!(!text.contains("  "));
        prop_assert!(!text.contains('\n'));
        prop_assert_eq!(text.trim(), text.as_str());
    }

    #[test]
    fn prop_line_markers_never_survive(
        lines in prop::collection::vec(
            (
                prop::sample::select(vec!["", "> ", "> > ", ">", ">> "]),
                prop::sample::select(vec!["", "- ", "+ ", "1. ", "12. "]),
                prop::sample::select(vec!["", "# ", "### "]),
                "[a-z]{1,10}",
            ),
            1..8,
        ),
    ) {
        let source: Vec<String> = lines
            .iter()
            .map(|(quote, list, heading, word)| format!("{}{}{}{}", quote, list, heading, word))
            .collect();
        let words: Vec<&str> = lines.iter().map(|(_, _, _, word)| word.as_str()).collect();

        let text = strip_markup(&source.join("\n"));
        prop_assert!(!text.contains('#'));
        prop_assert!(!text.contains('>'));
        prop_assert_eq!(text, words.join(" "));
    }

    #[test]
    fn prop_excerpt_fits(text in "[a-zA-Z .!?]{0,600}") {
        let clean = strip_markup(&text);
        prop_assert!(derive_excerpt(&clean).chars().count() <= EXCERPT_MAX_CHARS);
    }

    #[test]
    fn prop_highlight_only_adds_marks(
        text in "[a-zA-Z ]{0,80}",
        terms in prop::collection::vec("[a-z]{1,5}", 0..4),
    ) {
        let marked = highlight_terms(&text, &terms);
        prop_assert_eq!(marked.replace("<mark>", "").replace("</mark>", ""), text);
    }

    #[test]
    fn prop_token_offsets_line_up(text in "\\PC{0,60}") {
        let normalized = normalize(&text);
        let chars: Vec<char> = normalized.chars().collect();
        for token in tokenize(&normalized) {
            let slice: String = chars[token.start..token.end].iter().collect();
            prop_assert_eq!(slice, token.text);
        }
    }
}
