// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use hashbrown::HashMap;

use crate::{
    anchor::{Anchor, AnchorAlternations, AnchorFlags, MAX_BACK_REFERENCES, MAX_LOOKAHEADS},
    charclass::{CharClass, OccurrenceTable, NUM_BAD_CHARS},
    error::RegexError,
};

pub const INITIAL_STATE: usize = 0;
pub const FINAL_STATE: usize = 1;

/// The length of a fragment that can repeat without bound.
pub const INFINITE_LENGTH: usize = usize::MAX;

/// What a state matches when it is entered.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Symbol {
    Char(char),
    Class(usize),         // index of `Automaton::classes`
    BackReference(usize), // the back-reference number, starts from 1
}

/// A state of the modified NFA, the input character is matched by the
/// state itself instead of the transitions.
#[derive(Debug, Clone)]
pub struct State {
    pub atom: usize,
    pub symbol: Symbol,

    // sorted and without duplicates
    pub outs: Vec<usize>,

    // target state -> the atom reentered when transiting to the target
    pub reenter: HashMap<usize, usize>,

    // target state -> the anchor to test when transiting to the target
    pub anchors: HashMap<usize, Anchor>,
}

impl State {
    fn new(atom: usize, symbol: Symbol) -> Self {
        State {
            atom,
            symbol,
            outs: vec![],
            reenter: HashMap::new(),
            anchors: HashMap::new(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Capture {
    None,
    Official,
    Unofficial,

    // resolved at the end of parsing
    Slot(usize),
}

/// A node of the atom tree. Every parenthesized group, and every factor,
/// opens an atom; states belong to the innermost atom open at their creation.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Atom {
    pub parent: Option<usize>,
    pub capture: Capture,
}

pub struct Lookahead {
    pub automaton: Box<Automaton>,
    pub negative: bool,
}

pub struct Automaton {
    pub states: Vec<State>,
    pub classes: Vec<CharClass>,
    pub lookaheads: Vec<Lookahead>,
    pub alternations: AnchorAlternations,

    pub atoms: Vec<Atom>,
    current_atom: Option<usize>,

    // official capture number - 1 -> capture slot
    pub capture_for_official_capture: Vec<usize>,
    pub official_capture_count: usize,

    // the number of capture slots, including the unofficial ones
    pub capture_count: usize,
    pub back_reference_count: usize,

    pub caret_anchored: bool,
    pub trivial: bool,
    pub valid: bool,
    pub error: Option<RegexError>,

    pub case_sensitive: bool,
    pub greedy_quantifiers: bool,
    pub schema_extensions: bool,

    // the heuristic data
    pub use_good_string_heuristic: bool,
    pub good_early_start: usize,
    pub good_late_start: usize,
    pub good_string: Vec<char>,
    pub min_length: usize,
    pub first_occurrence: OccurrenceTable,
}

impl Automaton {
    pub fn new(case_sensitive: bool, greedy_quantifiers: bool, schema_extensions: bool) -> Self {
        Automaton {
            states: vec![],
            classes: vec![],
            lookaheads: vec![],
            alternations: AnchorAlternations::new(),
            atoms: vec![],
            current_atom: None,
            capture_for_official_capture: vec![],
            official_capture_count: 0,
            capture_count: 0,
            back_reference_count: 0,
            caret_anchored: true,
            trivial: true,
            valid: false,
            error: None,
            case_sensitive,
            greedy_quantifiers,
            schema_extensions,
            use_good_string_heuristic: true,
            good_early_start: 0,
            good_late_start: 0,
            good_string: vec![],
            min_length: 0,
            first_occurrence: [0; NUM_BAD_CHARS],
        }
    }

    fn create_state(&mut self, symbol: Symbol) -> usize {
        let atom = self.current_atom.unwrap_or(0);
        self.states.push(State::new(atom, symbol));
        self.states.len() - 1
    }

    pub fn create_char_state(&mut self, ch: char) -> usize {
        self.create_state(Symbol::Char(ch))
    }

    pub fn create_class_state(&mut self, class: CharClass) -> usize {
        self.classes.push(class);
        self.create_state(Symbol::Class(self.classes.len() - 1))
    }

    pub fn create_back_reference_state(&mut self, number: usize) -> Result<usize, RegexError> {
        if number > self.back_reference_count {
            if number > MAX_BACK_REFERENCES {
                return Err(RegexError::InternalLimit);
            }
            self.back_reference_count = number;
        }
        Ok(self.create_state(Symbol::BackReference(number)))
    }

    /// Adds a transition from every state of `from` to every state of `to`.
    pub fn add_cat_transitions(&mut self, from: &[usize], to: &[usize]) {
        for &index in from {
            merge_into(&mut self.states[index].outs, to);
        }
    }

    /// Like `add_cat_transitions`, but new transitions of a capturing atom
    /// also record that the atom is reentered.
    pub fn add_plus_transitions(&mut self, from: &[usize], to: &[usize], atom: usize) {
        let capturing = self.atoms[atom].capture != Capture::None;

        for &index in from {
            let state = &mut self.states[index];
            let old_outs = state.outs.clone();
            merge_into(&mut state.outs, to);

            if capturing {
                for &target in to {
                    if !state.reenter.contains_key(&target)
                        && old_outs.binary_search(&target).is_err()
                    {
                        state.reenter.insert(target, atom);
                    }
                }
            }
        }
    }

    pub fn anchor_alternation(&mut self, a: Anchor, b: Anchor) -> Anchor {
        self.alternations.alternation(a, b)
    }

    pub fn anchor_concatenation(&mut self, a: Anchor, b: Anchor) -> Anchor {
        self.alternations.concatenation(a, b)
    }

    /// Puts `anchor` on the transition `from -> to`. An anchor already on
    /// the transition is combined with OR.
    pub fn add_anchors(&mut self, from: usize, to: usize, anchor: Anchor) {
        let anchor = match self.states[from].anchors.get(&to) {
            Some(existing) => {
                let existing = *existing;
                self.alternations.alternation(existing, anchor)
            }
            None => anchor,
        };
        self.states[from].anchors.insert(to, anchor);
    }

    pub fn start_atom(&mut self, official_capture: bool) -> usize {
        let index = self.atoms.len();
        debug_assert!(self.current_atom.map_or(true, |parent| parent < index));

        self.atoms.push(Atom {
            parent: self.current_atom,
            capture: if official_capture {
                Capture::Official
            } else {
                Capture::None
            },
        });
        self.current_atom = Some(index);
        index
    }

    pub fn finish_atom(&mut self, atom: usize, need_capture: bool) {
        let item = &mut self.atoms[atom];
        if self.greedy_quantifiers && need_capture && item.capture == Capture::None {
            item.capture = Capture::Unofficial;
        }
        self.current_atom = item.parent;
    }

    pub fn add_lookahead(
        &mut self,
        automaton: Automaton,
        negative: bool,
    ) -> Result<Anchor, RegexError> {
        let index = self.lookaheads.len();
        if index == MAX_LOOKAHEADS {
            return Err(RegexError::InternalLimit);
        }

        self.lookaheads.push(Lookahead {
            automaton: Box::new(automaton),
            negative,
        });
        Ok(Anchor::Flags(AnchorFlags::lookahead(index)))
    }

    /// Assigns capture slots to the atoms: official captures first get
    /// their slots in order, unofficial ones only when quantifiers are greedy.
    pub fn resolve_captures(&mut self) {
        for atom in self.atoms.iter_mut() {
            match atom.capture {
                Capture::Official => {
                    atom.capture = Capture::Slot(self.capture_count);
                    self.capture_for_official_capture.push(self.capture_count);
                    self.capture_count += 1;
                    self.official_capture_count += 1;
                }
                Capture::Unofficial => {
                    if self.greedy_quantifiers {
                        atom.capture = Capture::Slot(self.capture_count);
                        self.capture_count += 1;
                    } else {
                        atom.capture = Capture::None;
                    }
                }
                _ => {}
            }
        }

        if self.official_capture_count == 0 && self.back_reference_count == 0 {
            self.capture_count = 0;
            self.atoms.clear();
        }

        // back-references without a corresponding group, e.g. `a\5`
        for _ in 0..self
            .back_reference_count
            .saturating_sub(self.official_capture_count)
        {
            self.capture_for_official_capture.push(self.capture_count);
            self.capture_count += 1;
        }
    }

    /// Decides whether every match has to start at the caret, and then
    /// drops the empty anchors.
    pub fn finish_anchors(&mut self) {
        let anchors = &self.states[INITIAL_STATE].anchors;
        self.caret_anchored = !anchors.is_empty()
            && anchors.values().all(|anchor| match anchor {
                Anchor::Flags(flags) => flags.contains(AnchorFlags::CARET),
                Anchor::Alternation(_) => false,
            });

        for state in self.states.iter_mut() {
            state.anchors.retain(|_, anchor| !anchor.is_none());
        }
    }

    /// The number of official capture groups.
    pub fn capture_group_count(&self) -> usize {
        self.official_capture_count
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn get_debug_text(&self) -> String {
        let mut lines = vec![];
        let show_atoms = !self.atoms.is_empty();

        for (index, state) in self.states.iter().enumerate() {
            let role = match index {
                INITIAL_STATE => " (initial)",
                FINAL_STATE => " (final)",
                _ => "",
            };

            let symbol = match state.symbol {
                Symbol::Char(ch) if (' '..='~').contains(&ch) => format!("Char '{}'", ch),
                Symbol::Char(ch) => format!("Char 0x{:04x}", ch as u32),
                Symbol::Class(class_index) => self.classes[class_index].to_string(),
                Symbol::BackReference(number) => format!("Back reference {}", number),
            };

            if show_atoms {
                lines.push(format!("- {}{}, {}, atom {}", index, role, symbol, state.atom));
            } else {
                lines.push(format!("- {}{}, {}", index, role, symbol));
            }

            for next in &state.outs {
                let mut line = format!("  -> {}", next);
                if let Some(atom) = state.reenter.get(next) {
                    line.push_str(&format!(", reenter {}", atom));
                }
                if let Some(anchor) = state.anchors.get(next) {
                    if !anchor.is_none() {
                        line.push_str(&format!(", anchor {}", anchor));
                    }
                }
                lines.push(line);
            }
        }

        for (index, atom) in self.atoms.iter().enumerate() {
            let mut line = format!("@ {}", index);
            if let Some(parent) = atom.parent {
                line.push_str(&format!(", parent {}", parent));
            }
            if let Capture::Slot(slot) = atom.capture {
                line.push_str(&format!(", capture {}", slot));
                if self.capture_for_official_capture.contains(&slot) {
                    line.push_str(" (official)");
                }
            }
            lines.push(line);
        }

        for (index, (a, b)) in self.alternations.iter().enumerate() {
            lines.push(format!("% {}: {} | {}", index, a, b));
        }

        lines.join("\n")
    }
}

/// Merges the sorted `source` into the sorted `target`, dropping duplicates.
pub fn merge_into(target: &mut Vec<usize>, source: &[usize]) {
    if target.is_empty() {
        target.extend_from_slice(source);
        return;
    }

    if let ([single], Some(last)) = (source, target.last()) {
        if last < single {
            target.push(*single);
            return;
        }
    }

    let mut merged = Vec::with_capacity(target.len() + source.len());
    let (mut i, mut j) = (0, 0);
    while i < target.len() && j < source.len() {
        match target[i].cmp(&source[j]) {
            std::cmp::Ordering::Less => {
                merged.push(target[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(source[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(target[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&target[i..]);
    merged.extend_from_slice(&source[j..]);
    *target = merged;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        anchor::{Anchor, AnchorFlags},
        charclass::CharClass,
        error::RegexError,
    };

    use super::{merge_into, Automaton, Capture};

    #[test]
    fn test_merge_into() {
        let mut a = vec![];
        merge_into(&mut a, &[2, 5]);
        assert_eq!(a, vec![2, 5]);

        merge_into(&mut a, &[7]);
        assert_eq!(a, vec![2, 5, 7]);

        merge_into(&mut a, &[1, 5, 6, 9]);
        assert_eq!(a, vec![1, 2, 5, 6, 7, 9]);

        merge_into(&mut a, &[]);
        assert_eq!(a, vec![1, 2, 5, 6, 7, 9]);

        merge_into(&mut a, &[2]);
        assert_eq!(a, vec![1, 2, 5, 6, 7, 9]);
    }

    #[test]
    fn test_transitions() {
        let mut automaton = Automaton::new(true, false, false);
        automaton.start_atom(false);
        let s0 = automaton.create_class_state(CharClass::new());
        let s1 = automaton.create_class_state(CharClass::new());
        let s2 = automaton.create_char_state('a');
        let s3 = automaton.create_char_state('b');

        automaton.add_cat_transitions(&[s0], &[s2, s3]);
        automaton.add_cat_transitions(&[s2, s3], &[s1]);
        assert_eq!(automaton.states[s0].outs, vec![2, 3]);
        assert_eq!(automaton.states[s2].outs, vec![1]);
        assert_eq!(automaton.states[s3].outs, vec![1]);

        automaton.add_anchors(s0, s2, AnchorFlags::CARET.into());
        automaton.add_anchors(s0, s2, AnchorFlags::DOLLAR.into());
        assert_eq!(
            automaton.states[s0].anchors.get(&s2),
            Some(&Anchor::Alternation(0))
        );
    }

    #[test]
    fn test_plus_transitions_reenter() {
        let mut automaton = Automaton::new(true, false, false);
        automaton.start_atom(false);
        let atom = automaton.start_atom(true);
        let s = automaton.create_char_state('a');
        let t = automaton.create_char_state('b');
        automaton.finish_atom(atom, false);

        automaton.add_cat_transitions(&[s], &[t]);
        automaton.add_plus_transitions(&[t], &[s], atom);
        assert_eq!(automaton.states[t].reenter.get(&s), Some(&atom));

        // an existing transition is not a reentry
        automaton.add_plus_transitions(&[s], &[t], atom);
        assert_eq!(automaton.states[s].reenter.get(&t), None);
    }

    #[test]
    fn test_atoms_and_captures() {
        // `(a)(?:b)` with greedy quantifiers
        let mut automaton = Automaton::new(true, true, false);
        let root = automaton.start_atom(false);
        let first = automaton.start_atom(true);
        automaton.finish_atom(first, false);
        let second = automaton.start_atom(false);
        automaton.finish_atom(second, true);
        automaton.finish_atom(root, false);

        assert_eq!(automaton.atoms[first].parent, Some(root));
        assert_eq!(automaton.atoms[second].capture, Capture::Unofficial);

        automaton.resolve_captures();
        assert_eq!(automaton.atoms[first].capture, Capture::Slot(0));
        assert_eq!(automaton.atoms[second].capture, Capture::Slot(1));
        assert_eq!(automaton.capture_for_official_capture, vec![0]);
        assert_eq!(automaton.capture_count, 2);
        assert_eq!(automaton.capture_group_count(), 1);
    }

    #[test]
    fn test_captures_without_groups() {
        // no groups and no back-references, the atoms are dropped
        let mut automaton = Automaton::new(true, true, false);
        let root = automaton.start_atom(false);
        let inner = automaton.start_atom(false);
        automaton.finish_atom(inner, true);
        automaton.finish_atom(root, false);
        automaton.resolve_captures();
        assert!(automaton.atoms.is_empty());
        assert_eq!(automaton.capture_count, 0);

        // a back-reference without its group gets a slot
        let mut automaton = Automaton::new(true, false, false);
        automaton.start_atom(false);
        assert_eq!(automaton.create_back_reference_state(2), Ok(0));
        automaton.resolve_captures();
        assert_eq!(automaton.capture_for_official_capture, vec![0, 1]);
        assert_eq!(automaton.capture_count, 2);
        assert_eq!(automaton.capture_group_count(), 0);
    }

    #[test]
    fn test_internal_limits() {
        let mut automaton = Automaton::new(true, false, false);
        automaton.start_atom(false);
        assert_eq!(
            automaton.create_back_reference_state(15),
            Err(RegexError::InternalLimit)
        );

        for index in 0..13 {
            let lookahead = Automaton::new(true, false, false);
            assert_eq!(
                automaton.add_lookahead(lookahead, false),
                Ok(Anchor::Flags(AnchorFlags::lookahead(index)))
            );
        }
        assert_eq!(
            automaton.add_lookahead(Automaton::new(true, false, false), true),
            Err(RegexError::InternalLimit)
        );
    }

    #[test]
    fn test_finish_anchors() {
        let mut automaton = Automaton::new(true, false, false);
        automaton.start_atom(false);
        let s0 = automaton.create_class_state(CharClass::new());
        let _s1 = automaton.create_class_state(CharClass::new());
        let s2 = automaton.create_char_state('a');
        let s3 = automaton.create_char_state('b');
        automaton.add_anchors(s0, s2, AnchorFlags::CARET.into());
        automaton.add_anchors(s0, s3, (AnchorFlags::CARET | AnchorFlags::WORD).into());
        automaton.add_anchors(s2, s3, Anchor::NONE);

        automaton.finish_anchors();
        assert!(automaton.caret_anchored);
        assert!(automaton.states[s2].anchors.is_empty());

        // an unanchored branch
        let mut automaton = Automaton::new(true, false, false);
        automaton.start_atom(false);
        let s0 = automaton.create_class_state(CharClass::new());
        let _s1 = automaton.create_class_state(CharClass::new());
        let s2 = automaton.create_char_state('a');
        let s3 = automaton.create_char_state('b');
        automaton.add_anchors(s0, s2, AnchorFlags::CARET.into());
        automaton.add_anchors(s0, s3, Anchor::NONE);

        automaton.finish_anchors();
        assert!(!automaton.caret_anchored);
        assert_eq!(automaton.states[s0].anchors.len(), 1);
    }
}
