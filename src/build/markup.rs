// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! MDX/markdown to plain text.
//!
//! Not a markdown parser. A fixed sequence of regex rewrites that removes
//! syntax while keeping every word a reader would see. Order matters: tags
//! go first so `<Callout>` attributes never leak into the text, fences go
//! before inline code so triple backticks are not read as three inline spans,
//! and line-anchored markers are stripped before whitespace is collapsed.
//! Quote markers go first among those, all levels at once, so a heading or
//! list item inside a quote is still at the start of its line.

use std::sync::LazyLock;

use regex::Regex;

// Unwraps below are on literal patterns; a typo fails every test immediately.
macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).unwrap());
    };
}

pattern!(COMPONENT_TAG, r"<[^>]*>");
pattern!(FENCED_CODE, r"(?s)```\w*[^\S\n]*\n?(.*?)```");
pattern!(STRAY_FENCE, r"```\w*");
pattern!(INLINE_CODE, r"`([^`]+)`");
pattern!(LINK, r"\[([^\]]+)\]\([^)]+\)");
pattern!(BOLD_STARS, r"\*\*([^*]+)\*\*");
pattern!(ITALIC_STAR, r"\*([^*]+)\*");
pattern!(BOLD_UNDERSCORES, r"__([^_]+)__");
pattern!(ITALIC_UNDERSCORE, r"_([^_]+)_");
pattern!(HEADING, r"(?m)^[ \t]*#+[ \t]+");
pattern!(HORIZONTAL_RULE, r"(?m)^[ \t]*-{3,}[ \t]*$");
pattern!(BLOCKQUOTE, r"(?m)^[ \t]*(?:>[ \t]*)+");
pattern!(BULLET, r"(?m)^[ \t]*[-*+][ \t]+");
pattern!(ORDERED, r"(?m)^[ \t]*\d+\.[ \t]+");
pattern!(WHITESPACE, r"\s+");

/// Remove markup syntax, keep the text.
///
/// - `<Tweet id="1" />` and other component tags become a space
/// - fenced code keeps its body, drops the fence and language tag
/// - `` `code` `` keeps `code`
/// - `[text](url)` keeps `text`
/// - `**bold**`, `*em*`, `__bold__`, `_em_` keep the inner text
/// - heading, blockquote, bullet and numbered-list markers are stripped per line
/// - `---` rule lines are removed
/// - whitespace collapses to single spaces
pub fn strip_markup(source: &str) -> String {
    let text = source.replace("\r\n", "\n");
    let text = COMPONENT_TAG.replace_all(&text, " ");
    let text = FENCED_CODE.replace_all(&text, "$1");
    let text = STRAY_FENCE.replace_all(&text, " ");
    let text = INLINE_CODE.replace_all(&text, "$1");
    // Whatever backticks survive are unbalanced delimiters, not content.
    let text = text.replace('`', "");
    let text = LINK.replace_all(&text, "$1");
    let text = BOLD_STARS.replace_all(&text, "$1");
    let text = ITALIC_STAR.replace_all(&text, "$1");
    let text = BOLD_UNDERSCORES.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "$1");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "");
    let text = ORDERED.replace_all(&text, "");
    let text = HEADING.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
