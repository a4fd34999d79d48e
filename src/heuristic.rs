// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// Search drivers that pick the start positions worth trying.
//
// - good string: every match contains a known string at an offset
//   between `good_early_start` and `good_late_start`, so only the
//   starts around an occurrence of the string are tried.
// - bad character: `first_occurrence` tells, per character residue,
//   how far into a match the character can first appear, which gives
//   a Boyer-Moore-like minimum slide when a character can not occur.

use log::debug;

use crate::{
    automaton::Automaton,
    charclass::{bad_char, NO_OCCURRENCE, NUM_BAD_CHARS},
    error::RegexError,
    matcher::MatchState,
    unicode::eq_ignore_case,
};

impl Automaton {
    /// Picks the search driver from the scores of the two heuristics.
    pub fn choose_heuristic(&mut self) {
        if self.min_length == 0 {
            // no string is guaranteed to occur
            self.use_good_string_heuristic = false;
        } else if self.trivial {
            self.use_good_string_heuristic = true;
        } else {
            let min_length = self.min_length as isize;

            let good_string_score = (64 * self.good_string.len() as isize / min_length)
                - (self.good_late_start as isize - self.good_early_start as isize);

            // sample every other residue
            let step = (NUM_BAD_CHARS / 32).max(1);
            let mut bad_char_score = 0;
            for i in (1..NUM_BAD_CHARS).step_by(step) {
                let occurrence = self.first_occurrence[i];
                bad_char_score += if occurrence == NO_OCCURRENCE {
                    min_length
                } else {
                    occurrence as isize
                };
            }
            bad_char_score /= min_length;

            self.use_good_string_heuristic = good_string_score > bad_char_score;

            debug!(
                "good string score: {}, bad char score: {}",
                good_string_score, bad_char_score
            );
        }
    }
}

/// Finds `needle` in `haystack` at or after `from`.
pub fn find_chars(
    haystack: &[char],
    from: usize,
    needle: &[char],
    case_sensitive: bool,
) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }

    if needle.is_empty() {
        return Some(from);
    }

    haystack[from..]
        .windows(needle.len())
        .position(|window| {
            window.iter().zip(needle).all(|(a, b)| {
                if case_sensitive {
                    a == b
                } else {
                    eq_ignore_case(*a, *b)
                }
            })
        })
        .map(|index| from + index)
}

impl MatchState {
    pub(crate) fn good_string_match(
        &mut self,
        automaton: &Automaton,
        text: &[char],
    ) -> Result<bool, RegexError> {
        let mut k = self.pos + automaton.good_early_start;

        while let Some(found) = find_chars(
            text,
            k,
            &automaton.good_string,
            automaton.case_sensitive,
        ) {
            k = found;

            // the window of starts that puts the string at `k`
            let from = k as isize - automaton.good_late_start as isize;
            let to = k as isize - automaton.good_early_start as isize;

            if from > self.pos as isize {
                self.pos = from as usize;
            }

            while self.pos as isize <= to {
                if self.match_here(automaton, text)? {
                    return Ok(true);
                }
                self.pos += 1;
            }

            k += 1;
        }

        Ok(false)
    }

    pub(crate) fn bad_char_match(
        &mut self,
        automaton: &Automaton,
        text: &[char],
    ) -> Result<bool, RegexError> {
        let min_length = automaton.min_length;
        let last_pos = text.len() - min_length;
        let table_size = self.slide_table.len();
        let mut slide_head = 0;
        let mut slide_next = 0;

        self.slide_table.fill(0);

        // how far each of the first `min_length` characters lets the start slide
        for i in 0..min_length {
            let mut skip = automaton.first_occurrence[bad_char(text[self.pos + i])];
            if skip == NO_OCCURRENCE {
                skip = i + 1;
            }
            if skip > 0 {
                let k = if skip > i + 1 {
                    skip = i + 1;
                    0
                } else {
                    i + 1 - skip
                };
                if skip > self.slide_table[k] {
                    self.slide_table[k] = skip;
                }
            }
        }

        if self.pos > last_pos {
            return Ok(false);
        }

        loop {
            slide_next += 1;
            if slide_next >= table_size {
                slide_next = 0;
            }

            if self.slide_table[slide_head] > 0 {
                let slide = self.slide_table[slide_head] - 1;
                if slide > self.slide_table[slide_next] {
                    self.slide_table[slide_next] = slide;
                }
                self.slide_table[slide_head] = 0;
            } else if self.match_here(automaton, text)? {
                return Ok(true);
            }

            if self.pos == last_pos {
                break;
            }

            // the character entering the window
            let skip = automaton.first_occurrence[bad_char(text[self.pos + min_length])];
            if skip == NO_OCCURRENCE {
                self.slide_table[slide_next] = min_length;
            } else if skip > 0 {
                let mut k = slide_next + min_length - skip;
                if k >= table_size {
                    k -= table_size;
                }
                if skip > self.slide_table[k] {
                    self.slide_table[k] = skip;
                }
            }

            slide_head = slide_next;
            self.pos += 1;
        }

        Ok(false)
    }
}
