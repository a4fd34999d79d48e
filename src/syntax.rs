// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// How the pattern text of a `Regex` is interpreted.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PatternSyntax {
    /// Perl-like regular expression with lazy bookkeeping of
    /// non-capturing quantified groups.
    #[default]
    ExtendedRegex,

    /// The pattern is a plain string, every character is literal.
    Literal,

    /// Shell globbing: `*`, `?` and `[...]`, a backslash is a literal backslash.
    Wildcard,

    /// Like `Wildcard`, but `\` escapes the next wildcard character.
    WildcardUnix,

    /// Like `ExtendedRegex`, but quantified groups always keep the
    /// captures of their last iteration.
    GreedyExtendedRegex,

    /// Like `ExtendedRegex`, plus the XML Schema escapes
    /// `\i \I \c \C \p{..} \P{..}`.
    SchemaPattern,
}

/// Translates a pattern of any syntax into the regular expression
/// understood by the parser.
pub fn to_canonical(pattern: &str, syntax: PatternSyntax) -> Cow<'_, str> {
    match syntax {
        PatternSyntax::Wildcard => Cow::Owned(wildcard_to_regex(pattern, false)),
        PatternSyntax::WildcardUnix => Cow::Owned(wildcard_to_regex(pattern, true)),
        PatternSyntax::Literal => Cow::Owned(escape(pattern)),
        PatternSyntax::ExtendedRegex
        | PatternSyntax::GreedyExtendedRegex
        | PatternSyntax::SchemaPattern => Cow::Borrowed(pattern),
    }
}

/// Prefixes every regular expression metacharacter with a backslash,
/// e.g. `1.5*` becomes `1\.5\*`.
pub fn escape(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if matches!(
            ch,
            '$' | '(' | ')' | '*' | '+' | '.' | '?' | '[' | '\\' | ']' | '^' | '{' | '|' | '}'
        ) {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted
}

/// Translates a wildcard pattern into a regular expression,
/// e.g. `*.txt` becomes `.*\.txt`.
///
/// With `enable_escaping` a backslash escapes the following wildcard
/// character (`\*`, `\?`, `\[`, `\]`, `\\`), otherwise every backslash
/// stands for itself.
pub fn wildcard_to_regex(wildcard: &str, enable_escaping: bool) -> String {
    let chars: Vec<char> = wildcard.chars().collect();
    let mut regex = String::with_capacity(wildcard.len() * 2);

    // the previous character is a backslash
    let mut escaping = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        i += 1;

        match ch {
            '\\' => {
                if !enable_escaping {
                    regex.push_str(r"\\");
                } else if escaping {
                    regex.push_str(r"\\");
                    escaping = false;
                } else if i == chars.len() {
                    // trailing
                    regex.push_str(r"\\");
                } else {
                    escaping = true;
                }
            }
            '*' => {
                if escaping {
                    regex.push_str(r"\*");
                    escaping = false;
                } else {
                    regex.push_str(".*");
                }
            }
            '?' => {
                if escaping {
                    regex.push_str(r"\?");
                    escaping = false;
                } else {
                    regex.push('.');
                }
            }
            '$' | '(' | ')' | '+' | '.' | '^' | '{' | '|' | '}' => {
                if escaping {
                    escaping = false;
                    regex.push_str(r"\\");
                }
                regex.push('\\');
                regex.push(ch);
            }
            '[' => {
                if escaping {
                    escaping = false;
                    regex.push_str(r"\[");
                } else {
                    // the class body is copied verbatim up to the closing `]`
                    regex.push('[');
                    if chars.get(i) == Some(&'^') {
                        regex.push('^');
                        i += 1;
                    }
                    if i < chars.len() {
                        // a leading `]` is a member, not the end of the class
                        if chars[i] == ']' {
                            regex.push(']');
                            i += 1;
                        }
                        while i < chars.len() && chars[i] != ']' {
                            if chars[i] == '\\' {
                                regex.push('\\');
                            }
                            regex.push(chars[i]);
                            i += 1;
                        }
                    }
                }
            }
            ']' => {
                if escaping {
                    escaping = false;
                    regex.push('\\');
                }
                regex.push(']');
            }
            _ => {
                if escaping {
                    escaping = false;
                    regex.push_str(r"\\");
                }
                regex.push(ch);
            }
        }
    }

    regex
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{escape, to_canonical, wildcard_to_regex, PatternSyntax};

    #[test]
    fn test_escape() {
        assert_eq!(escape("abc"), "abc");
        assert_eq!(escape("1.5*2"), r"1\.5\*2");
        assert_eq!(escape(r"a\b"), r"a\\b");
        assert_eq!(
            escape("$()*+.?[]^{|}"),
            r"\$\(\)\*\+\.\?\[\]\^\{\|\}"
        );
        assert_eq!(escape("文字"), "文字");
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(wildcard_to_regex("*.txt", false), r".*\.txt");
        assert_eq!(wildcard_to_regex("a?c", false), "a.c");
        assert_eq!(wildcard_to_regex("(x)", false), r"\(x\)");
        assert_eq!(wildcard_to_regex("[a-c]*", false), "[a-c].*");
        assert_eq!(wildcard_to_regex("[^a]", false), "[^a]");
        assert_eq!(wildcard_to_regex("[]a]", false), "[]a]");
        assert_eq!(wildcard_to_regex("[^]a]", false), "[^]a]");

        // unterminated class
        assert_eq!(wildcard_to_regex("[ab", false), "[ab");
    }

    #[test]
    fn test_wildcard_backslash() {
        // no escaping, the backslash is literal
        assert_eq!(wildcard_to_regex(r"a\b", false), r"a\\b");
        assert_eq!(wildcard_to_regex(r"\*", false), r"\\.*");

        // unix escaping
        assert_eq!(wildcard_to_regex(r"\*", true), r"\*");
        assert_eq!(wildcard_to_regex(r"\?", true), r"\?");
        assert_eq!(wildcard_to_regex(r"\[", true), r"\[");
        assert_eq!(wildcard_to_regex(r"\]", true), r"\]");
        assert_eq!(wildcard_to_regex(r"\\", true), r"\\");
        assert_eq!(wildcard_to_regex(r"\\*", true), r"\\.*");
        assert_eq!(wildcard_to_regex(r"a\", true), r"a\\");
        assert_eq!(wildcard_to_regex(r"\a", true), r"\\a");
        assert_eq!(wildcard_to_regex(r"\.", true), r"\\\.");

        // backslashes inside a class are doubled
        assert_eq!(wildcard_to_regex(r"[\]", true), r"[\\]");
    }

    #[test]
    fn test_to_canonical() {
        assert_eq!(to_canonical("a.b", PatternSyntax::ExtendedRegex), "a.b");
        assert_eq!(to_canonical("a.b", PatternSyntax::GreedyExtendedRegex), "a.b");
        assert_eq!(to_canonical("a.b", PatternSyntax::SchemaPattern), "a.b");
        assert_eq!(to_canonical("a.b", PatternSyntax::Literal), r"a\.b");
        assert_eq!(to_canonical("a*", PatternSyntax::Wildcard), "a.*");
        assert_eq!(to_canonical(r"a\*", PatternSyntax::WildcardUnix), r"a\*");
    }
}
