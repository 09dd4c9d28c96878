//! Parenthetical annotations in course names.
//!
//! Course names carry qualifiers in ASCII or full-width parentheses, for
//! example `体育二（武术校本课程）（二上）`. Groups are matched left to right,
//! non-greedily and without nesting; the two bracket styles may be mixed.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Annotation;

static ANNOTATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[（(][^）)]*?[）)]").expect("annotation pattern is valid"));

// ASCII whitespace only; full-width spaces stay part of a token.
static TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\x0B\x0C\r]+").expect("separator pattern is valid"));

/// Extracts one [`Annotation`] per parenthetical group, in order of appearance.
pub fn parse_annotations(input: &str) -> Vec<Annotation> {
    ANNOTATION_PATTERN
        .find_iter(input)
        .map(|group| Annotation::from_content(split_tokens(inner(group.as_str()))))
        .collect()
}

/// Removes every parenthetical group, delimiters included. The remaining text
/// is returned as is; surrounding whitespace is not collapsed.
pub fn strip_annotations(input: &str) -> String {
    ANNOTATION_PATTERN.replace_all(input, "").into_owned()
}

fn inner(group: &str) -> &str {
    let mut chars = group.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

fn split_tokens(inner: &str) -> Vec<&str> {
    if !TOKEN_SEPARATOR.is_match(inner) {
        return vec![inner];
    }
    let mut tokens: Vec<&str> = TOKEN_SEPARATOR.split(inner).collect();
    while tokens.last().is_some_and(|token| token.is_empty()) {
        tokens.pop();
    }
    tokens
}
