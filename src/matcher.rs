// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// The NFA simulator.
//
// All the states reachable after `i` characters form the current
// frontier, each with its own row of capture zones (begin, end),
// offsets relative to the start position `pos`. Every step feeds one
// character to every transition leaving the frontier and collects
// the targets into the next frontier. When two transitions reach the
// same state, the row with the leftmost-longest captures wins.
//
// A back-reference longer than one character can not be compared
// within a single step, so the target state "sleeps" for the missing
// characters and rejoins the frontier when they have been consumed.

use log::trace;

use crate::{
    anchor::{Anchor, AnchorFlags},
    automaton::{Automaton, Capture, State, Symbol, FINAL_STATE, INITIAL_STATE},
    charclass::CharClass,
    error::RegexError,
    heuristic::find_chars,
    unicode::{eq_ignore_case, is_word, to_lower, to_upper},
};

/// A capture zone boundary that has not been set.
pub const EMPTY_CAPTURE: usize = usize::MAX;

#[derive(Debug)]
struct Sleeper {
    wake_at: usize,
    state: usize,
    capture_begin: Vec<usize>,
    capture_end: Vec<usize>,
}

/// The scratch memory of one match, sized for one automaton by `prepare`.
#[derive(Debug, Default)]
pub struct MatchState {
    // the start position of the attempt in progress
    pub(crate) pos: usize,
    caret_pos: Option<usize>,
    minimal: bool,

    // state -> its index in the next frontier
    in_next_stack: Vec<Option<usize>>,
    current_stack: Vec<usize>,
    next_stack: Vec<usize>,

    // one row of `capture_count` zones per frontier entry
    current_capture_begin: Vec<usize>,
    next_capture_begin: Vec<usize>,
    current_capture_end: Vec<usize>,
    next_capture_end: Vec<usize>,
    temp_capture_begin: Vec<usize>,
    temp_capture_end: Vec<usize>,

    // atoms inside the group being re-entered
    inside_atoms: Vec<bool>,

    // the zones of the last match
    capture_begin: Vec<usize>,
    capture_end: Vec<usize>,

    pub(crate) slide_table: Vec<usize>,
    sleeping: Vec<Sleeper>,

    match_length: Option<usize>,
    one_test_matched_length: usize,
    captured: Vec<Option<(usize, usize)>>,
}

fn reset_buffer<T: Clone>(buffer: &mut Vec<T>, len: usize, value: T) -> Result<(), RegexError> {
    buffer.clear();
    buffer
        .try_reserve(len)
        .map_err(|_| RegexError::ResourceExhausted)?;
    buffer.resize(len, value);
    Ok(())
}

fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        eq_ignore_case(a, b)
    }
}

fn class_contains(class: &CharClass, ch: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        class.contains(ch)
    } else if class.is_negative() {
        class.contains(to_lower(ch)) && class.contains(to_upper(ch))
    } else {
        class.contains(to_lower(ch)) || class.contains(to_upper(ch))
    }
}

/// Compares two rows of capture zones, earlier begins win,
/// then later ends.
fn is_better_capture(begin1: &[usize], end1: &[usize], begin2: &[usize], end2: &[usize]) -> bool {
    for i in 0..begin1.len() {
        if begin1[i] != begin2[i] {
            return begin1[i] < begin2[i];
        }
        if end1[i] != end2[i] {
            return end1[i] > end2[i];
        }
    }
    false
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the scratch memory for `automaton` and clears the result.
    pub fn prepare(&mut self, automaton: &Automaton) -> Result<(), RegexError> {
        let state_count = automaton.states.len();
        let capture_count = automaton.capture_count;
        let rows = capture_count * state_count;

        reset_buffer(&mut self.in_next_stack, state_count, None)?;
        reset_buffer(&mut self.current_stack, state_count, 0)?;
        reset_buffer(&mut self.next_stack, state_count, 0)?;

        reset_buffer(&mut self.current_capture_begin, rows, EMPTY_CAPTURE)?;
        reset_buffer(&mut self.next_capture_begin, rows, EMPTY_CAPTURE)?;
        reset_buffer(&mut self.current_capture_end, rows, EMPTY_CAPTURE)?;
        reset_buffer(&mut self.next_capture_end, rows, EMPTY_CAPTURE)?;
        reset_buffer(&mut self.temp_capture_begin, capture_count, EMPTY_CAPTURE)?;
        reset_buffer(&mut self.temp_capture_end, capture_count, EMPTY_CAPTURE)?;
        reset_buffer(&mut self.capture_begin, capture_count, EMPTY_CAPTURE)?;
        reset_buffer(&mut self.inside_atoms, automaton.atoms.len(), false)?;
        reset_buffer(&mut self.capture_end, capture_count, EMPTY_CAPTURE)?;

        reset_buffer(
            &mut self.slide_table,
            (automaton.min_length + 1).max(16),
            0,
        )?;
        reset_buffer(
            &mut self.captured,
            1 + automaton.official_capture_count,
            None,
        )?;

        self.sleeping.clear();
        self.match_length = None;
        self.one_test_matched_length = 0;
        Ok(())
    }

    /// Looks for a match in `text` starting at `start`.
    ///
    /// With `one_test` only a match starting exactly at `start` is
    /// tried. `caret_pos` is the position where `^` matches, `None`
    /// if it never does. The result is available from `captured()`.
    pub fn run(
        &mut self,
        automaton: &Automaton,
        text: &[char],
        start: usize,
        minimal: bool,
        one_test: bool,
        caret_pos: Option<usize>,
    ) -> Result<bool, RegexError> {
        let mut matched = false;
        self.match_length = None;
        self.one_test_matched_length = 0;

        if automaton.trivial && !one_test {
            if let Some(found) = find_chars(
                text,
                start,
                &automaton.good_string,
                automaton.case_sensitive,
            ) {
                self.pos = found;
                self.match_length = Some(automaton.good_string.len());
                matched = true;
            }
        } else {
            self.pos = start;
            self.caret_pos = caret_pos;
            self.minimal = minimal;

            if automaton.valid && start <= text.len() {
                matched = if one_test {
                    self.match_here(automaton, text)?
                } else if start + automaton.min_length <= text.len() {
                    if automaton.caret_anchored {
                        self.match_here(automaton, text)?
                    } else if automaton.use_good_string_heuristic {
                        self.good_string_match(automaton, text)?
                    } else {
                        self.bad_char_match(automaton, text)?
                    }
                } else {
                    false
                };
            }
        }

        self.fill_captured(automaton, matched);
        Ok(matched)
    }

    /// `(start, length)` of the match followed by one entry per
    /// capture group, `None` when there is no match or the group
    /// did not participate.
    pub fn captured(&self) -> &[Option<(usize, usize)>] {
        &self.captured
    }

    /// How many characters the last single test consumed before it
    /// stopped, whether it matched or not.
    pub fn one_test_matched_length(&self) -> usize {
        self.one_test_matched_length
    }

    fn fill_captured(&mut self, automaton: &Automaton, matched: bool) {
        self.captured.fill(None);
        if !matched {
            return;
        }

        let pos = self.pos;
        if let Some(first) = self.captured.first_mut() {
            *first = Some((pos, self.match_length.unwrap_or(0)));
        }

        for (number, slot) in automaton
            .capture_for_official_capture
            .iter()
            .take(automaton.official_capture_count)
            .enumerate()
        {
            let begin = self.capture_begin[*slot];
            let end = self.capture_end[*slot];
            self.captured[number + 1] = if begin == EMPTY_CAPTURE || end == EMPTY_CAPTURE {
                None
            } else {
                Some((pos + begin, end - begin))
            };
        }
    }

    /// Tries a match starting exactly at `self.pos`.
    pub(crate) fn match_here(
        &mut self,
        automaton: &Automaton,
        text: &[char],
    ) -> Result<bool, RegexError> {
        trace!("trying a match at {}", self.pos);

        let remaining = text.len() - self.pos;
        let capture_count = automaton.capture_count;
        let case_sensitive = automaton.case_sensitive;

        let mut current_count = 1;
        let mut next_count = 0;
        let mut i = 0;
        let mut stop = false;

        self.match_length = None;
        self.current_stack[0] = INITIAL_STATE;
        self.current_capture_begin[..capture_count].fill(EMPTY_CAPTURE);
        self.current_capture_end[..capture_count].fill(EMPTY_CAPTURE);

        while (current_count > 0 || !self.sleeping.is_empty()) && i <= remaining && !stop {
            let ch = if i < remaining {
                text[self.pos + i]
            } else {
                '\0'
            };

            for row in 0..current_count {
                let current = self.current_stack[row];
                let current_state = &automaton.states[current];

                for &next in &current_state.outs {
                    let next_state = &automaton.states[next];

                    if let Some(anchor) = current_state.anchors.get(&next) {
                        if !self.test_anchor(automaton, text, i, *anchor, row)? {
                            continue;
                        }
                    }

                    let mut sleep = 0;
                    let inside = if next == FINAL_STATE {
                        self.match_length = Some(i);
                        stop = self.minimal;
                        true
                    } else {
                        match next_state.symbol {
                            Symbol::Char(expected) => chars_equal(expected, ch, case_sensitive),
                            Symbol::Class(index) => {
                                class_contains(&automaton.classes[index], ch, case_sensitive)
                            }
                            Symbol::BackReference(number) => {
                                match self.match_back_reference(automaton, text, i, ch, number, row)
                                {
                                    Some(delay) => {
                                        sleep = delay;
                                        true
                                    }
                                    None => false,
                                }
                            }
                        }
                    };

                    if !inside {
                        continue;
                    }

                    if capture_count > 0 {
                        self.update_captures(automaton, current_state, next_state, next, i, row);
                    }

                    if sleep > 0 {
                        trace!("state {} sleeps until {}", next, i + sleep);
                        self.sleeping.push(Sleeper {
                            wake_at: i + sleep,
                            state: next,
                            capture_begin: self.temp_capture_begin.clone(),
                            capture_end: self.temp_capture_end.clone(),
                        });
                        continue;
                    }

                    let (index, copy_over) = match self.in_next_stack[next] {
                        None => {
                            let index = next_count;
                            next_count += 1;
                            self.next_stack[index] = next;
                            self.in_next_stack[next] = Some(index);
                            (index, true)
                        }
                        Some(index) => {
                            let range = index * capture_count..(index + 1) * capture_count;
                            let better = is_better_capture(
                                &self.temp_capture_begin,
                                &self.temp_capture_end,
                                &self.next_capture_begin[range.clone()],
                                &self.next_capture_end[range],
                            );
                            (index, better)
                        }
                    };

                    if copy_over && capture_count > 0 {
                        let range = index * capture_count..(index + 1) * capture_count;
                        self.next_capture_begin[range.clone()]
                            .copy_from_slice(&self.temp_capture_begin);
                        self.next_capture_end[range].copy_from_slice(&self.temp_capture_end);
                    }
                }
            }

            if capture_count > 0 {
                if let Some(index) = self.in_next_stack[FINAL_STATE] {
                    let range = index * capture_count..(index + 1) * capture_count;
                    self.capture_begin
                        .copy_from_slice(&self.next_capture_begin[range.clone()]);
                    self.capture_end.copy_from_slice(&self.next_capture_end[range]);
                }
            }

            // wake up the sleepers
            let mut k = 0;
            while k < self.sleeping.len() {
                if self.sleeping[k].wake_at != i {
                    k += 1;
                    continue;
                }

                let sleeper = self.sleeping.remove(k);
                trace!("state {} wakes up at {}", sleeper.state, i);

                let (index, copy_over) = match self.in_next_stack[sleeper.state] {
                    None => {
                        let index = next_count;
                        next_count += 1;
                        self.next_stack[index] = sleeper.state;
                        self.in_next_stack[sleeper.state] = Some(index);
                        (index, true)
                    }
                    Some(index) => {
                        let range = index * capture_count..(index + 1) * capture_count;
                        let better = is_better_capture(
                            &sleeper.capture_begin,
                            &sleeper.capture_end,
                            &self.next_capture_begin[range.clone()],
                            &self.next_capture_end[range],
                        );
                        (index, better)
                    }
                };

                if copy_over && capture_count > 0 {
                    let range = index * capture_count..(index + 1) * capture_count;
                    self.next_capture_begin[range.clone()].copy_from_slice(&sleeper.capture_begin);
                    self.next_capture_end[range].copy_from_slice(&sleeper.capture_end);
                }
            }

            for &state in &self.next_stack[..next_count] {
                self.in_next_stack[state] = None;
            }

            // nothing is left to do but to accept
            if next_count == 1 && self.next_stack[0] == FINAL_STATE && self.sleeping.is_empty() {
                stop = true;
            }

            std::mem::swap(&mut self.current_stack, &mut self.next_stack);
            std::mem::swap(&mut self.current_capture_begin, &mut self.next_capture_begin);
            std::mem::swap(&mut self.current_capture_end, &mut self.next_capture_end);
            current_count = next_count;
            next_count = 0;
            i += 1;
        }

        // minimal matching may leave sleepers behind
        self.sleeping.clear();

        self.one_test_matched_length = i.saturating_sub(1);
        Ok(self.match_length.is_some())
    }

    // Returns the number of characters the target state has to sleep
    // when the back-reference matches at offset `i`.
    fn match_back_reference(
        &self,
        automaton: &Automaton,
        text: &[char],
        i: usize,
        ch: char,
        number: usize,
        row: usize,
    ) -> Option<usize> {
        let capture_count = automaton.capture_count;
        let case_sensitive = automaton.case_sensitive;
        let pos = self.pos;

        if number > capture_count {
            return None;
        }

        let slot = row * capture_count + automaton.capture_for_official_capture[number - 1];
        let begin = self.current_capture_begin[slot];
        if begin == EMPTY_CAPTURE {
            return None;
        }

        let first = text.get(pos + begin).copied().unwrap_or('\0');
        if !chars_equal(first, ch, case_sensitive) {
            return None;
        }

        let end = self.current_capture_end[slot];
        let delta = if end == EMPTY_CAPTURE {
            i - begin
        } else {
            end - begin
        };

        if delta > text.len() - (pos + i) {
            return None;
        }

        if delta > 1 {
            let same = (1..delta)
                .take_while(|n| {
                    chars_equal(text[pos + begin + n], text[pos + i + n], case_sensitive)
                })
                .count();
            if same + 1 != delta {
                return None;
            }
            return Some(delta - 1);
        }

        Some(0)
    }

    // Computes the capture zones of the transition `current_state -> next`
    // taken at offset `i` into the temporary row.
    fn update_captures(
        &mut self,
        automaton: &Automaton,
        current_state: &State,
        next_state: &State,
        next: usize,
        i: usize,
        row: usize,
    ) {
        let capture_count = automaton.capture_count;
        let atoms = &automaton.atoms;
        let range = row * capture_count..(row + 1) * capture_count;

        let begin = &mut self.temp_capture_begin;
        let end = &mut self.temp_capture_end;
        begin.copy_from_slice(&self.current_capture_begin[range.clone()]);
        end.copy_from_slice(&self.current_capture_end[range]);

        let ancestor = if let Some(&reentered) = current_state.reenter.get(&next) {
            // a new iteration of a repeated group starts with empty inner captures
            let inside = &mut self.inside_atoms;
            inside.fill(false);
            inside[reentered] = true;
            for index in (reentered + 1)..atoms.len() {
                if let Some(parent) = atoms[index].parent {
                    if inside[parent] {
                        inside[index] = true;
                        if let Capture::Slot(slot) = atoms[index].capture {
                            begin[slot] = EMPTY_CAPTURE;
                            end[slot] = EMPTY_CAPTURE;
                        }
                    }
                }
            }
            atoms[reentered].parent
        } else {
            // close the zones being left, up to the youngest common ancestor
            let mut p = current_state.atom;
            let mut q = next_state.atom;
            while p != q {
                if p > q {
                    if let Capture::Slot(slot) = atoms[p].capture {
                        if begin[slot] == i {
                            begin[slot] = EMPTY_CAPTURE;
                            end[slot] = EMPTY_CAPTURE;
                        } else {
                            end[slot] = i;
                        }
                    }
                    p = atoms[p].parent.unwrap_or(0);
                } else {
                    q = atoms[q].parent.unwrap_or(0);
                }
            }
            Some(p)
        };

        // open the zones being entered
        let mut n = Some(next_state.atom);
        while n > ancestor {
            let Some(index) = n else {
                break;
            };
            debug_assert!(atoms[index].parent.map_or(true, |parent| parent < index));
            if let Capture::Slot(slot) = atoms[index].capture {
                begin[slot] = i;
                end[slot] = EMPTY_CAPTURE;
            }
            n = atoms[index].parent;
        }
    }

    fn test_anchor(
        &self,
        automaton: &Automaton,
        text: &[char],
        i: usize,
        anchor: Anchor,
        row: usize,
    ) -> Result<bool, RegexError> {
        let flags = match anchor {
            Anchor::Alternation(index) => {
                let (a, b) = automaton.alternations.get(index);
                return Ok(self.test_anchor(automaton, text, i, a, row)?
                    || self.test_anchor(automaton, text, i, b, row)?);
            }
            Anchor::Flags(flags) => flags,
        };

        let at = self.pos + i;

        if flags.contains(AnchorFlags::CARET) && self.caret_pos != Some(at) {
            return Ok(false);
        }

        if flags.contains(AnchorFlags::DOLLAR) && at != text.len() {
            return Ok(false);
        }

        if flags.contains(AnchorFlags::WORD) || flags.contains(AnchorFlags::NON_WORD) {
            let before = at != 0 && is_word(text[at - 1]);
            let after = at != text.len() && is_word(text[at]);
            if flags.contains(AnchorFlags::WORD) && before == after {
                return Ok(false);
            }
            if flags.contains(AnchorFlags::NON_WORD) && before != after {
                return Ok(false);
            }
        }

        for (index, lookahead) in automaton.lookaheads.iter().enumerate() {
            if !flags.has_lookahead(index) {
                continue;
            }

            let mut state = MatchState::new();
            state.prepare(&lookahead.automaton)?;
            state.run(
                &lookahead.automaton,
                &text[at..],
                0,
                true,
                true,
                self.caret_pos.and_then(|caret| caret.checked_sub(at)),
            )?;

            let matched = matches!(state.captured().first(), Some(Some((0, _))));
            if matched == lookahead.negative {
                return Ok(false);
            }
        }

        let capture_count = automaton.capture_count;
        for number in 1..=automaton.back_reference_count {
            if flags.has_back_reference_empty(number) {
                let slot = automaton.capture_for_official_capture[number - 1];
                if self.current_capture_begin[row * capture_count + slot] != EMPTY_CAPTURE {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}
