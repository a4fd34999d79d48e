// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use hashbrown::HashMap;

use crate::{
    anchor::{Anchor, AnchorFlags, MAX_BACK_REFERENCES},
    automaton::{merge_into, Automaton, INFINITE_LENGTH},
    charclass::{bad_char, CharClass, OccurrenceTable, NO_OCCURRENCE, NUM_BAD_CHARS},
    error::RegexError,
    unicode::to_lower,
};

/// An automaton fragment built for one production of the grammar.
///
/// The states live in the `Automaton`, a fragment only keeps the
/// entry (left) and exit (right) states, the anchors met when
/// entering or leaving through them, and the attributes used by the
/// search heuristics.
///
/// ```diagram
///        left anchors       right anchors
/// in --o--> [left states ... right states] --o--> out
///      \                                     /
///       \------------skip anchors-----------/    (when min_length == 0)
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct Fragment {
    left_states: Vec<usize>,
    right_states: Vec<usize>,
    left_anchors: HashMap<usize, Anchor>,
    right_anchors: HashMap<usize, Anchor>,

    // the anchors to test when the whole fragment is skipped
    skip_anchors: Anchor,

    // the heuristic attributes
    early_start: usize, // where `string` can first occur
    late_start: usize,  // where `string` can last occur
    string: Vec<char>,  // a string any match has to contain
    left_string: Vec<char>,
    right_string: Vec<char>,
    max_length: usize,
    min_length: usize,
    first_occurrence: OccurrenceTable,
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

impl Fragment {
    pub fn new() -> Self {
        Fragment {
            left_states: vec![],
            right_states: vec![],
            left_anchors: HashMap::new(),
            right_anchors: HashMap::new(),
            skip_anchors: Anchor::NONE,
            early_start: 0,
            late_start: 0,
            string: vec![],
            left_string: vec![],
            right_string: vec![],
            max_length: 0,
            min_length: 0,
            first_occurrence: [NO_OCCURRENCE; NUM_BAD_CHARS],
        }
    }

    pub fn clear(&mut self) {
        *self = Fragment::new();
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn set_char(&mut self, automaton: &mut Automaton, ch: char) {
        let state = automaton.create_char_state(ch);
        self.left_states = vec![state];
        self.right_states = vec![state];
        self.string = vec![ch];
        self.left_string = vec![ch];
        self.right_string = vec![ch];
        self.max_length = 1;
        self.first_occurrence[bad_char(ch)] = 0;
        self.min_length = 1;
    }

    pub fn set_class(&mut self, automaton: &mut Automaton, class: CharClass) {
        self.first_occurrence = *class.first_occurrence();
        let state = automaton.create_class_state(class);
        self.left_states = vec![state];
        self.right_states = vec![state];
        self.max_length = 1;
        self.min_length = 1;
    }

    pub fn set_back_reference(
        &mut self,
        automaton: &mut Automaton,
        number: usize,
    ) -> Result<(), RegexError> {
        let state = automaton.create_back_reference_state(number)?;
        self.left_states = vec![state];
        self.right_states = vec![state];

        // the reference can be skipped only when its capture is empty
        if (1..=MAX_BACK_REFERENCES).contains(&number) {
            self.skip_anchors = AnchorFlags::back_reference_empty(number).into();
        }
        self.max_length = INFINITE_LENGTH;
        self.min_length = 0;
        Ok(())
    }

    /// Concatenation, `self` followed by `other`.
    pub fn cat(&mut self, automaton: &mut Automaton, other: &Fragment) {
        automaton.add_cat_transitions(&self.right_states, &other.left_states);
        self.add_anchors_to_automaton(automaton, other);

        if self.min_length == 0 {
            self.left_anchors.extend(other.left_anchors.iter());
            if !self.skip_anchors.is_none() {
                for &state in &other.left_states {
                    let existing = self.left_anchors.get(&state).copied().unwrap_or_default();
                    let anchor = automaton.anchor_concatenation(existing, self.skip_anchors);
                    self.left_anchors.insert(state, anchor);
                }
            }
            merge_into(&mut self.left_states, &other.left_states);
        }

        if other.min_length == 0 {
            self.right_anchors.extend(other.right_anchors.iter());
            if !other.skip_anchors.is_none() {
                for &state in &self.right_states {
                    let existing = self.right_anchors.get(&state).copied().unwrap_or_default();
                    let anchor = automaton.anchor_concatenation(existing, other.skip_anchors);
                    self.right_anchors.insert(state, anchor);
                }
            }
            merge_into(&mut self.right_states, &other.right_states);
        } else {
            self.right_anchors = other.right_anchors.clone();
            self.right_states = other.right_states.clone();
        }

        if self.max_length != INFINITE_LENGTH {
            if self.right_string.len() + other.left_string.len()
                > self.string.len().max(other.string.len())
            {
                self.early_start = self.min_length.saturating_sub(self.right_string.len());
                self.late_start = self.max_length.saturating_sub(self.right_string.len());
                self.string = [self.right_string.as_slice(), other.left_string.as_slice()].concat();
            } else if other.string.len() > self.string.len() {
                self.early_start = self.min_length + other.early_start;
                self.late_start = self.max_length + other.late_start;
                self.string = other.string.clone();
            }
        }

        if self.left_string.len() == self.max_length {
            self.left_string.extend_from_slice(&other.left_string);
        }

        if other.right_string.len() == other.max_length {
            self.right_string.extend_from_slice(&other.right_string);
        } else {
            self.right_string = other.right_string.clone();
        }

        if self.max_length == INFINITE_LENGTH || other.max_length == INFINITE_LENGTH {
            self.max_length = INFINITE_LENGTH;
        } else {
            self.max_length += other.max_length;
        }

        for (item, other_item) in self
            .first_occurrence
            .iter_mut()
            .zip(other.first_occurrence.iter())
        {
            if *other_item != NO_OCCURRENCE && self.min_length + other_item < *item {
                *item = self.min_length + other_item;
            }
        }

        self.min_length += other.min_length;
        if self.min_length == 0 {
            self.skip_anchors = automaton.anchor_concatenation(self.skip_anchors, other.skip_anchors);
        } else {
            self.skip_anchors = Anchor::NONE;
        }
    }

    /// Alternation, `self` or `other`.
    pub fn orx(&mut self, automaton: &mut Automaton, other: &Fragment) {
        merge_into(&mut self.left_states, &other.left_states);
        self.left_anchors.extend(other.left_anchors.iter());
        merge_into(&mut self.right_states, &other.right_states);
        self.right_anchors.extend(other.right_anchors.iter());

        if other.min_length == 0 {
            if self.min_length == 0 {
                self.skip_anchors = automaton.anchor_alternation(self.skip_anchors, other.skip_anchors);
            } else {
                self.skip_anchors = other.skip_anchors;
            }
        }

        for (item, other_item) in self
            .first_occurrence
            .iter_mut()
            .zip(other.first_occurrence.iter())
        {
            if *item > *other_item {
                *item = *other_item;
            }
        }

        self.early_start = 0;
        self.late_start = 0;
        self.string.clear();
        self.left_string.clear();
        self.right_string.clear();
        self.max_length = self.max_length.max(other.max_length);
        self.min_length = self.min_length.min(other.min_length);
    }

    /// One or more, the right states loop back to the left states.
    pub fn plus(&mut self, automaton: &mut Automaton, atom: usize) {
        automaton.add_plus_transitions(&self.right_states, &self.left_states, atom);
        self.add_anchors_to_automaton(automaton, self);
        self.max_length = INFINITE_LENGTH;
    }

    /// Zero or one.
    pub fn opt(&mut self) {
        self.early_start = 0;
        self.late_start = 0;
        self.string.clear();
        self.left_string.clear();
        self.right_string.clear();
        self.skip_anchors = Anchor::NONE;
        self.min_length = 0;
    }

    /// Appends a zero-width condition to the fragment.
    pub fn cat_anchor(&mut self, automaton: &mut Automaton, anchor: Anchor) {
        if anchor.is_none() {
            return;
        }

        for &state in &self.right_states {
            let existing = self.right_anchors.get(&state).copied().unwrap_or_default();
            let combined = automaton.anchor_concatenation(existing, anchor);
            self.right_anchors.insert(state, combined);
        }

        if self.min_length == 0 {
            self.skip_anchors = automaton.anchor_concatenation(self.skip_anchors, anchor);
        }
    }

    /// Hands the heuristic attributes of the whole pattern over to the automaton.
    pub fn setup_heuristics(&self, automaton: &mut Automaton) {
        automaton.good_early_start = self.early_start;
        automaton.good_late_start = self.late_start;
        automaton.good_string = if automaton.case_sensitive {
            self.string.clone()
        } else {
            self.string.iter().map(|ch| to_lower(*ch)).collect()
        };

        automaton.min_length = self.min_length;
        if automaton.case_sensitive {
            // an entry has to be at most `min_length`, e.g. `112|1`
            // has occurrence 2 for '2' but the minimum length is 1.
            let mut first_occurrence = self.first_occurrence;
            for item in first_occurrence.iter_mut() {
                if *item != NO_OCCURRENCE && *item >= self.min_length {
                    *item = self.min_length;
                }
            }
            automaton.first_occurrence = first_occurrence;
        } else {
            automaton.first_occurrence = [0; NUM_BAD_CHARS];
        }

        automaton.choose_heuristic();
    }

    fn add_anchors_to_automaton(&self, automaton: &mut Automaton, to: &Fragment) {
        for &to_state in &to.left_states {
            for &from_state in &self.right_states {
                let right = self.right_anchors.get(&from_state).copied().unwrap_or_default();
                let left = to.left_anchors.get(&to_state).copied().unwrap_or_default();
                let anchor = automaton.anchor_concatenation(right, left);
                automaton.add_anchors(from_state, to_state, anchor);
            }
        }
    }
}
