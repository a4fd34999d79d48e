// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{
    fmt::Debug,
    ops::{Index, Range},
    sync::Arc,
};

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    automaton::Automaton,
    cache::{self, EngineKey},
    error::{RegexError, NO_ERROR_MESSAGE},
    matcher::MatchState,
    syntax::{self, PatternSyntax},
};

/// Where `^` is allowed to match.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum CaretMode {
    /// At position 0 of the text, regardless of the start offset.
    #[default]
    AtZero,

    /// At the start offset of the search.
    AtOffset,

    /// Nowhere.
    NeverMatches,
}

impl CaretMode {
    fn caret_pos(self, offset: usize) -> Option<usize> {
        match self {
            CaretMode::AtZero => Some(0),
            CaretMode::AtOffset => Some(offset),
            CaretMode::NeverMatches => None,
        }
    }
}

/// A compiled pattern.
///
/// The automaton is shared with the handles compiled from the same
/// pattern, syntax and case sensitivity, and handed over to the
/// engine cache when the last of them is dropped.
///
/// Offsets of `search`, `search_backward` and `MatchResult` count
/// characters, the `regex`-crate-style methods (`find`, `captures`
/// and the iterators) report byte offsets.
#[derive(Clone)]
pub struct Regex {
    key: EngineKey,
    minimal: bool,
    automaton: Arc<Automaton>,
}

impl Regex {
    /// Compiles an extended regular expression, case sensitive.
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        let regex = Regex::with_syntax(pattern, PatternSyntax::ExtendedRegex, true);
        match regex.error() {
            Some(error) => Err(error),
            None => Ok(regex),
        }
    }

    /// Compiles a pattern of any syntax, an invalid pattern still
    /// yields a handle, see `is_valid` and `error`.
    pub fn with_syntax(pattern: &str, syntax: PatternSyntax, case_sensitive: bool) -> Self {
        let key = EngineKey::new(pattern, syntax, case_sensitive);
        let automaton = cache::acquire(&key);
        Regex {
            key,
            minimal: false,
            automaton,
        }
    }

    /// Prefixes every regular expression metacharacter of `text`
    /// with a backslash.
    pub fn escape(text: &str) -> String {
        syntax::escape(text)
    }

    pub fn pattern(&self) -> &str {
        &self.key.pattern
    }

    pub fn syntax(&self) -> PatternSyntax {
        self.key.syntax
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.key.case_sensitive
    }

    pub fn is_minimal(&self) -> bool {
        self.minimal
    }

    pub fn set_pattern(&mut self, pattern: &str) {
        if self.key.pattern != pattern {
            let key = EngineKey::new(pattern, self.key.syntax, self.key.case_sensitive);
            self.replace_key(key);
        }
    }

    pub fn set_syntax(&mut self, syntax: PatternSyntax) {
        if self.key.syntax != syntax {
            let key = EngineKey::new(&self.key.pattern, syntax, self.key.case_sensitive);
            self.replace_key(key);
        }
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        if self.key.case_sensitive != case_sensitive {
            let key = EngineKey::new(&self.key.pattern, self.key.syntax, case_sensitive);
            self.replace_key(key);
        }
    }

    /// Stops matching at the first (shortest) match instead of the longest one.
    pub fn set_minimal(&mut self, minimal: bool) {
        self.minimal = minimal;
    }

    fn replace_key(&mut self, key: EngineKey) {
        cache::release(&self.key, &self.automaton);
        self.automaton = cache::acquire(&key);
        self.key = key;
    }

    /// An empty pattern is valid.
    pub fn is_valid(&self) -> bool {
        self.key.pattern.is_empty() || self.automaton.is_valid()
    }

    pub fn error(&self) -> Option<RegexError> {
        if self.is_valid() {
            None
        } else {
            Some(
                self.automaton
                    .error
                    .unwrap_or(RegexError::MissingLeftDelimiter),
            )
        }
    }

    pub fn error_message(&self) -> String {
        match self.error() {
            Some(error) => error.to_string(),
            None => NO_ERROR_MESSAGE.to_owned(),
        }
    }

    /// The number of capture groups, not counting the whole match.
    pub fn capture_group_count(&self) -> usize {
        self.automaton.capture_group_count()
    }

    /// A dump of the compiled automaton.
    pub fn get_debug_text(&self) -> String {
        self.automaton.get_debug_text()
    }

    fn new_match_state(&self) -> Result<MatchState, RegexError> {
        let mut state = MatchState::new();
        state.prepare(&self.automaton)?;
        Ok(state)
    }

    /// Finds the first match starting at or after `offset`,
    /// a negative offset counts from the end of the text.
    pub fn search(
        &self,
        text: &str,
        offset: isize,
        caret_mode: CaretMode,
    ) -> Result<MatchResult, RegexError> {
        let chars: Vec<char> = text.chars().collect();
        let mut state = self.new_match_state()?;

        if let Some(offset) = resolve_offset(offset, chars.len()) {
            state.run(
                &self.automaton,
                &chars,
                offset,
                self.minimal,
                false,
                caret_mode.caret_pos(offset),
            )?;
        }

        let matched = state.captured().first().is_some_and(|item| item.is_some());
        Ok(MatchResult::new(&chars, state.captured().to_vec(), matched))
    }

    /// Finds the match starting the closest to `offset`, at or before it,
    /// a negative offset counts from the end of the text.
    pub fn search_backward(
        &self,
        text: &str,
        offset: isize,
        caret_mode: CaretMode,
    ) -> Result<MatchResult, RegexError> {
        let chars: Vec<char> = text.chars().collect();
        let mut state = self.new_match_state()?;

        if let Some(offset) = resolve_offset(offset, chars.len()).filter(|o| *o <= chars.len()) {
            for start in (0..=offset).rev() {
                state.run(
                    &self.automaton,
                    &chars,
                    start,
                    self.minimal,
                    true,
                    caret_mode.caret_pos(start),
                )?;

                if matches!(state.captured().first(), Some(Some((pos, _))) if *pos == start) {
                    return Ok(MatchResult::new(&chars, state.captured().to_vec(), true));
                }
            }
        }

        let captured = vec![None; 1 + self.capture_group_count()];
        Ok(MatchResult::new(&chars, captured, false))
    }

    /// Tests whether the whole text matches.
    pub fn match_exactly(&self, text: &str) -> Result<bool, RegexError> {
        Ok(self.exact_match_result(text)?.is_match())
    }

    /// Like `match_exactly`, but returns the details. When the text does
    /// not match, the length of the whole match is how far the matcher
    /// got before giving up.
    pub fn exact_match_result(&self, text: &str) -> Result<MatchResult, RegexError> {
        let chars: Vec<char> = text.chars().collect();
        let mut state = self.new_match_state()?;
        state.run(&self.automaton, &chars, 0, self.minimal, true, Some(0))?;

        let mut captured = state.captured().to_vec();
        let matched = captured.first() == Some(&Some((0, chars.len())));
        if !matched {
            debug!(
                "{:?} does not match the whole text, stopped after {} chars",
                self.key.pattern,
                state.one_test_matched_length()
            );
            if let Some(first) = captured.first_mut() {
                *first = Some((0, state.one_test_matched_length()));
            }
        }

        Ok(MatchResult::new(&chars, captured, matched))
    }

    // the following methods are intended to
    // be compatible with the 'Regex' API of crate 'regex':
    // https://docs.rs/regex/latest/regex/struct.Regex.html

    pub fn find<'b>(&self, text: &'b str) -> Option<Match<'b>> {
        self.find_iter(text).next()
    }

    pub fn find_iter<'a, 'b>(&'a self, text: &'b str) -> Matches<'a, 'b> {
        Matches {
            inner: Searcher::new(self, text),
        }
    }

    pub fn captures<'b>(&self, text: &'b str) -> Option<Captures<'b>> {
        self.captures_iter(text).next()
    }

    pub fn captures_iter<'a, 'b>(&'a self, text: &'b str) -> CaptureMatches<'a, 'b> {
        CaptureMatches {
            inner: Searcher::new(self, text),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }
}

fn resolve_offset(offset: isize, len: usize) -> Option<usize> {
    let offset = if offset < 0 {
        offset + len as isize
    } else {
        offset
    };
    usize::try_from(offset).ok()
}

impl Drop for Regex {
    fn drop(&mut self) {
        cache::release(&self.key, &self.automaton);
    }
}

impl PartialEq for Regex {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.minimal == other.minimal
    }
}

impl Eq for Regex {}

impl Debug for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &self.key.pattern)
            .field("syntax", &self.key.syntax)
            .field("case_sensitive", &self.key.case_sensitive)
            .field("minimal", &self.minimal)
            .finish()
    }
}

// persisted as `(pattern, case_sensitive, syntax, minimal)`,
// the automaton is compiled again when loading
impl Serialize for Regex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            &self.key.pattern,
            self.key.case_sensitive,
            self.key.syntax,
            self.minimal,
        )
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Regex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (pattern, case_sensitive, syntax, minimal) =
            <(String, bool, PatternSyntax, bool)>::deserialize(deserializer)?;
        let mut regex = Regex::with_syntax(&pattern, syntax, case_sensitive);
        regex.set_minimal(minimal);
        Ok(regex)
    }
}

/// The outcome of `search`, `search_backward` or `exact_match_result`.
///
/// Entry 0 is the whole match, entry `n` the capture group `n`.
/// Offsets and lengths count characters.
#[derive(Debug, PartialEq, Clone)]
pub struct MatchResult {
    matched: bool,
    captured: Vec<Option<(usize, usize)>>,
    texts: Vec<Option<String>>,
}

impl MatchResult {
    fn new(chars: &[char], captured: Vec<Option<(usize, usize)>>, matched: bool) -> Self {
        let texts = captured
            .iter()
            .map(|item| item.map(|(start, length)| chars[start..start + length].iter().collect()))
            .collect();

        MatchResult {
            matched,
            captured,
            texts,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }

    /// `(start, length)` of entry `n`.
    pub fn get(&self, n: usize) -> Option<(usize, usize)> {
        self.captured.get(n).copied().flatten()
    }

    /// Start of entry `n`.
    pub fn pos(&self, n: usize) -> Option<usize> {
        self.get(n).map(|(start, _)| start)
    }

    pub fn matched_length(&self) -> Option<usize> {
        self.get(0).map(|(_, length)| length)
    }

    /// The text of entry `n`, `None` when the group did not participate.
    pub fn cap(&self, n: usize) -> Option<&str> {
        self.texts.get(n)?.as_deref()
    }

    /// The text of every entry, empty for the groups that did not participate.
    pub fn captured_texts(&self) -> Vec<&str> {
        self.texts
            .iter()
            .map(|text| text.as_deref().unwrap_or(""))
            .collect()
    }

    /// The number of entries, i.e. the capture group count plus one.
    pub fn len(&self) -> usize {
        self.captured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.is_empty()
    }
}

// walks the matches of a text, shared by the two iterators
struct Searcher<'a, 'b> {
    regex: &'a Regex,
    text: &'b str,
    chars: Vec<char>,
    byte_offsets: Vec<usize>,
    state: Option<MatchState>,
    last_position: usize,
}

impl<'a, 'b> Searcher<'a, 'b> {
    fn new(regex: &'a Regex, text: &'b str) -> Self {
        let byte_offsets = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();

        let state = match regex.new_match_state() {
            Ok(state) => Some(state),
            Err(error) => {
                debug!("cannot search {:?}: {}", regex.key.pattern, error);
                None
            }
        };

        Searcher {
            regex,
            text,
            chars: text.chars().collect(),
            byte_offsets,
            state,
            last_position: 0,
        }
    }

    fn next_captures(&mut self) -> Option<Vec<Option<Match<'b>>>> {
        if self.last_position > self.chars.len() {
            return None;
        }

        let state = self.state.as_mut()?;
        let regex = self.regex;
        match state.run(
            &regex.automaton,
            &self.chars,
            self.last_position,
            regex.minimal,
            false,
            Some(0),
        ) {
            Ok(true) => {}
            Ok(false) => {
                self.state = None;
                return None;
            }
            Err(error) => {
                debug!("search of {:?} aborted: {}", regex.key.pattern, error);
                self.state = None;
                return None;
            }
        }

        let captured = state.captured().to_vec();
        if let Some(Some((start, length))) = captured.first() {
            // step over an empty match
            self.last_position = start + (*length).max(1);
        }

        Some(
            captured
                .iter()
                .map(|item| item.map(|(start, length)| self.new_match(start, start + length)))
                .collect(),
        )
    }

    fn new_match(&self, start: usize, end: usize) -> Match<'b> {
        let start = self.byte_offsets[start];
        let end = self.byte_offsets[end];
        Match::new(start, end, &self.text[start..end])
    }
}

pub struct Matches<'a, 'b> {
    inner: Searcher<'a, 'b>,
}

impl<'b> Iterator for Matches<'_, 'b> {
    type Item = Match<'b>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_captures()?.into_iter().next().flatten()
    }
}

pub struct CaptureMatches<'a, 'b> {
    inner: Searcher<'a, 'b>,
}

impl<'b> Iterator for CaptureMatches<'_, 'b> {
    type Item = Captures<'b>;

    fn next(&mut self) -> Option<Self::Item> {
        let matches = self.inner.next_captures()?;
        Some(Captures { matches })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Captures<'b> {
    pub matches: Vec<Option<Match<'b>>>,
}

impl Captures<'_> {
    // the following methods are intended to
    // be compatible with the 'Captures' API of crate 'regex':
    // https://docs.rs/regex/latest/regex/struct.Captures.html

    /// Group `index`, `None` if it did not participate in the match.
    pub fn get(&self, index: usize) -> Option<&Match> {
        self.matches.get(index)?.as_ref()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Index<usize> for Captures<'_> {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!(
                "Capture group {} did not participate in the match or is out of range, the length of capture groups is {}.",
                index, self.len()))
            .as_str()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Match<'b> {
    pub start: usize, // the byte position in the text (value included)
    pub end: usize,   // the byte position in the text (value excluded)
    pub value: &'b str,
}

impl<'b> Match<'b> {
    pub fn new(start: usize, end: usize, value: &'b str) -> Self {
        Match { start, end, value }
    }

    // the following methods are intended to
    // be compatible with the 'Match' API of crate 'regex':
    // https://docs.rs/regex/latest/regex/struct.Match.html

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        Range {
            start: self.start,
            end: self.end,
        }
    }

    pub fn as_str(&self) -> &'b str {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{error::RegexError, syntax::PatternSyntax};

    use super::{CaretMode, Match, Regex};

    fn new_match(start: usize, end: usize, value: &str) -> Match<'_> {
        Match::new(start, end, value)
    }

    #[test]
    fn test_search() {
        let re = Regex::new("(a)(b)*").unwrap();
        let result = re.search("xabb", 0, CaretMode::AtZero).unwrap();

        assert!(result.is_match());
        assert_eq!(result.len(), 3);
        assert_eq!(result.get(0), Some((1, 3)));
        assert_eq!(result.pos(1), Some(1));
        assert_eq!(result.pos(2), Some(3));
        assert_eq!(result.matched_length(), Some(3));
        assert_eq!(result.cap(0), Some("abb"));
        assert_eq!(result.cap(1), Some("a"));
        assert_eq!(result.cap(2), Some("b"));
        assert_eq!(result.cap(3), None);

        // the second group does not participate
        let result = re.search("ac", 0, CaretMode::AtZero).unwrap();
        assert_eq!(result.cap(2), None);
        assert_eq!(result.captured_texts(), vec!["a", "a", ""]);

        let result = re.search("xyz", 0, CaretMode::AtZero).unwrap();
        assert!(!result.is_match());
        assert_eq!(result.len(), 3);
        assert_eq!(result.pos(0), None);
    }

    #[test]
    fn test_search_offset() {
        let re = Regex::new("a+").unwrap();
        assert_eq!(
            re.search("aaba", 1, CaretMode::AtZero).unwrap().get(0),
            Some((1, 1))
        );

        // counts from the end
        assert_eq!(
            re.search("aaba", -1, CaretMode::AtZero).unwrap().get(0),
            Some((3, 1))
        );

        // out of range
        assert!(!re.search("aaba", -10, CaretMode::AtZero).unwrap().is_match());
        assert!(!re.search("aaba", 5, CaretMode::AtZero).unwrap().is_match());
    }

    #[test]
    fn test_caret_mode() {
        let re = Regex::new("^b").unwrap();
        assert_eq!(
            re.search("ab", 1, CaretMode::AtOffset).unwrap().get(0),
            Some((1, 1))
        );
        assert!(!re.search("ab", 1, CaretMode::AtZero).unwrap().is_match());
        assert!(!re.search("ab", 1, CaretMode::NeverMatches).unwrap().is_match());

        let re = Regex::new("^abc$").unwrap();
        assert!(re.search("abc", 0, CaretMode::AtZero).unwrap().is_match());
        assert!(!re.search("abcd", 0, CaretMode::AtZero).unwrap().is_match());
    }

    #[test]
    fn test_search_backward() {
        let re = Regex::new("ab").unwrap();
        assert_eq!(
            re.search_backward("abxab", 4, CaretMode::AtZero)
                .unwrap()
                .get(0),
            Some((3, 2))
        );
        assert_eq!(
            re.search_backward("abxab", 2, CaretMode::AtZero)
                .unwrap()
                .get(0),
            Some((0, 2))
        );
        assert_eq!(
            re.search_backward("abxab", -1, CaretMode::AtZero)
                .unwrap()
                .get(0),
            Some((3, 2))
        );
        assert!(!re
            .search_backward("abxab", 10, CaretMode::AtZero)
            .unwrap()
            .is_match());
        assert!(!re
            .search_backward("xxx", 2, CaretMode::AtZero)
            .unwrap()
            .is_match());
    }

    #[test]
    fn test_back_reference_and_lookahead() {
        let re = Regex::new(r"(\w+)\s\1").unwrap();
        let result = re.search("hello hello", 0, CaretMode::AtZero).unwrap();
        assert_eq!(result.captured_texts(), vec!["hello hello", "hello"]);
        assert!(!re.is_match("hello world"));

        let re = Regex::new("foo(?!bar)").unwrap();
        assert_eq!(
            re.search("foobar foobaz", 0, CaretMode::AtZero)
                .unwrap()
                .get(0),
            Some((7, 3))
        );
    }

    #[test]
    fn test_exact_match() {
        let re = Regex::new("abcd").unwrap();
        assert!(re.match_exactly("abcd").unwrap());
        assert!(!re.match_exactly("abcde").unwrap());

        // how far the matcher got
        let result = re.exact_match_result("abxd").unwrap();
        assert!(!result.is_match());
        assert_eq!(result.get(0), Some((0, 2)));

        let re = Regex::new("a*").unwrap();
        assert!(re.match_exactly("").unwrap());
        assert!(re.match_exactly("aaa").unwrap());
    }

    #[test]
    fn test_errors() {
        assert_eq!(Regex::new("a{3,1}"), Err(RegexError::InvalidInterval));
        assert_eq!(
            Regex::new("(?<=x)y"),
            Err(RegexError::LookbehindUnsupported)
        );

        let re = Regex::with_syntax("a{3,1}", PatternSyntax::ExtendedRegex, true);
        assert!(!re.is_valid());
        assert_eq!(re.error(), Some(RegexError::InvalidInterval));
        assert_eq!(re.error_message(), "invalid interval");
        assert!(!re.search("aaa", 0, CaretMode::AtZero).unwrap().is_match());
        assert_eq!(re.find("aaa"), None);

        let re = Regex::new("").unwrap();
        assert!(re.is_valid());
        assert_eq!(re.error(), None);
        assert_eq!(re.error_message(), "no error occurred");
    }

    #[test]
    fn test_case_insensitive() {
        let re = Regex::with_syntax("HELLO", PatternSyntax::ExtendedRegex, false);
        assert_eq!(
            re.search("say hello", 0, CaretMode::AtZero).unwrap().get(0),
            Some((4, 5))
        );

        let mut re = Regex::new("abc").unwrap();
        assert!(!re.is_match("ABC"));
        re.set_case_sensitive(false);
        assert!(!re.is_case_sensitive());
        assert!(re.is_match("ABC"));
    }

    #[test]
    fn test_wildcard() {
        let re = Regex::with_syntax("*.txt", PatternSyntax::Wildcard, true);
        assert!(re.match_exactly("notes.txt").unwrap());
        assert!(!re.match_exactly("notes.txt.bak").unwrap());

        let re = Regex::with_syntax("a?c", PatternSyntax::Wildcard, true);
        assert!(re.match_exactly("abc").unwrap());
        assert!(!re.match_exactly("ac").unwrap());
        assert!(!re.match_exactly("abbc").unwrap());

        let re = Regex::with_syntax(r"\*", PatternSyntax::WildcardUnix, true);
        assert!(re.match_exactly("*").unwrap());
        assert!(!re.match_exactly("a").unwrap());

        let re = Regex::with_syntax("1.5*", PatternSyntax::Literal, true);
        assert!(re.match_exactly("1.5*").unwrap());
        assert!(!re.match_exactly("105").unwrap());
    }

    #[test]
    fn test_escape() {
        let metachars = [
            "$", "(", ")", "*", "+", ".", "?", "[", "\\", "]", "^", "{", "|", "}",
        ];

        let mut texts = vec![
            String::new(),
            "(1+2)*3 [ok]?".to_owned(),
            "文字.*".to_owned(),
            r"\d\1\b".to_owned(),
        ];
        for a in metachars {
            for b in metachars {
                texts.push(format!("{}{}", a, b));
                texts.push(format!("x{}y{}", a, b));
            }
        }

        for text in &texts {
            let re = Regex::new(&Regex::escape(text)).unwrap();
            assert!(re.match_exactly(text).unwrap(), "{:?}", text);

            // a longer subject only matches as a prefix
            for suffix in ["x", ".", "\\", "文"] {
                let longer = format!("{}{}", text, suffix);
                assert!(!re.match_exactly(&longer).unwrap(), "{:?}", longer);
                assert_eq!(
                    re.search(&longer, 0, CaretMode::AtZero).unwrap().get(0),
                    Some((0, text.chars().count())),
                    "{:?}",
                    longer
                );
            }
        }
    }

    #[test]
    fn test_longest_leftmost_captures() {
        let re = Regex::new("(a|ab)(c|bcd)(d*)").unwrap();
        let result = re.search("abcd", 0, CaretMode::AtZero).unwrap();
        assert_eq!(result.get(0), Some((0, 4)));
        assert_eq!(result.captured_texts(), vec!["abcd", "ab", "c", "d"]);
    }

    #[test]
    fn test_case_insensitive_class() {
        let re = Regex::with_syntax("[A-Z]+", PatternSyntax::ExtendedRegex, false);
        assert!(re.match_exactly("hello").unwrap());
        assert_eq!(
            re.search("123 hello", 0, CaretMode::AtZero).unwrap().get(0),
            Some((4, 5))
        );
    }

    #[test]
    fn test_independent_instances() {
        let re1 = Regex::with_syntax(r"(\w+)@(\w+)", PatternSyntax::ExtendedRegex, true);
        let first = re1.search("mail: me@host", 0, CaretMode::AtZero).unwrap();
        drop(re1);

        let re2 = Regex::with_syntax(r"(\w+)@(\w+)", PatternSyntax::ExtendedRegex, true);
        let second = re2.search("mail: me@host", 0, CaretMode::AtZero).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.captured_texts(), vec!["me@host", "me", "host"]);
    }

    #[test]
    fn test_setters() {
        let mut re = Regex::new("(a)(b)").unwrap();
        assert_eq!(re.capture_group_count(), 2);

        re.set_pattern("(a)");
        assert_eq!(re.pattern(), "(a)");
        assert_eq!(re.capture_group_count(), 1);

        re.set_syntax(PatternSyntax::Literal);
        assert_eq!(re.syntax(), PatternSyntax::Literal);
        assert_eq!(re.capture_group_count(), 0);
        assert!(re.is_match("x(a)"));

        let mut re = Regex::new("a+").unwrap();
        re.set_minimal(true);
        assert!(re.is_minimal());
        assert_eq!(
            re.search("aaa", 0, CaretMode::AtZero).unwrap().get(0),
            Some((0, 1))
        );
    }

    #[test]
    fn test_shared_handles() {
        let re1 = Regex::new("x(y)").unwrap();
        let re2 = re1.clone();
        assert_eq!(re1, re2);
        drop(re1);
        assert_eq!(re2.find("axy"), Some(new_match(1, 3, "xy")));

        // compiled again, or taken back from the cache
        let re3 = Regex::new("x(y)").unwrap();
        assert_eq!(re3.capture_group_count(), 1);
        assert!(!re3.get_debug_text().is_empty());
    }

    #[test]
    fn test_find() {
        let re = Regex::new("文+").unwrap();
        let mut matches = re.find_iter("a文文b文");
        assert_eq!(matches.next(), Some(new_match(1, 7, "文文")));
        assert_eq!(matches.next(), Some(new_match(8, 11, "文")));
        assert_eq!(matches.next(), None);

        let m = re.find("xx文").unwrap();
        assert_eq!(m.start(), 2);
        assert_eq!(m.end(), 5);
        assert_eq!(m.len(), 3);
        assert_eq!(m.range(), 2..5);
        assert_eq!(m.as_str(), "文");

        // empty matches advance by one character
        let re = Regex::new("x*").unwrap();
        assert_eq!(
            re.find_iter("ab").collect::<Vec<_>>(),
            vec![new_match(0, 0, ""), new_match(1, 1, ""), new_match(2, 2, "")]
        );
    }

    #[test]
    fn test_captures() {
        let re = Regex::new("(a)(b)*").unwrap();
        let mut captures = re.captures_iter("ab a");

        let first = captures.next().unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(&first[0], "ab");
        assert_eq!(&first[1], "a");
        assert_eq!(&first[2], "b");

        let second = captures.next().unwrap();
        assert_eq!(second.get(0), Some(&new_match(3, 4, "a")));
        assert_eq!(second.get(2), None);

        assert!(captures.next().is_none());
        assert!(re.captures("xyz").is_none());
    }

    #[test]
    fn test_serde() {
        let re = Regex::new("a+").unwrap();
        let json = serde_json::to_string(&re).unwrap();
        assert_eq!(json, r#"["a+",true,"ExtendedRegex",false]"#);

        let loaded: Regex = serde_json::from_str(r#"["*.rs",false,"Wildcard",true]"#).unwrap();
        assert_eq!(loaded.pattern(), "*.rs");
        assert_eq!(loaded.syntax(), PatternSyntax::Wildcard);
        assert!(!loaded.is_case_sensitive());
        assert!(loaded.is_minimal());
        assert!(loaded.match_exactly("MAIN.RS").unwrap());
    }
}
