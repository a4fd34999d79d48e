// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::Display;

use crate::unicode::{category_of, ALL_CATEGORIES};

/// Size of the first-occurrence tables used by the bad-character heuristic.
pub const NUM_BAD_CHARS: usize = 64;

/// A first-occurrence entry meaning "this residue never occurs".
pub const NO_OCCURRENCE: usize = usize::MAX;

pub type OccurrenceTable = [usize; NUM_BAD_CHARS];

/// Buckets a character into one of the `NUM_BAD_CHARS` residues.
pub fn bad_char(ch: char) -> usize {
    ch as usize % NUM_BAD_CHARS
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CharRange {
    pub from: u32,
    pub len: u32,
}

/// A set of characters, e.g. `[a-z]`, `\d` or `.`.
///
/// Membership is "in one of the ranges OR in one of the categories",
/// inverted when the class is negative. The `occurrences` table
/// records, per residue `ch % 64`, whether any member can have that
/// residue at all (`NO_OCCURRENCE` means none can), which lets the
/// membership test reject most characters without looking at the
/// ranges.
#[derive(Debug, PartialEq, Clone)]
pub struct CharClass {
    categories: u32,
    ranges: Vec<CharRange>,
    negative: bool,
    occurrences: OccurrenceTable,
}

impl Default for CharClass {
    fn default() -> Self {
        Self::new()
    }
}

impl CharClass {
    pub fn new() -> Self {
        Self {
            categories: 0,
            ranges: vec![],
            negative: false,
            occurrences: [NO_OCCURRENCE; NUM_BAD_CHARS],
        }
    }

    /// The class matching any character, i.e. `.` or `[^]`.
    pub fn new_any() -> Self {
        let mut cc = Self::new();
        cc.set_negative(true);
        cc
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn set_negative(&mut self, negative: bool) {
        self.negative = negative;
        self.occurrences.fill(0);
    }

    pub fn add_categories(&mut self, categories: u32) {
        self.categories |= ALL_CATEGORIES & categories;
        self.occurrences.fill(0);
    }

    /// Adds the inclusive range `from..=to`; a reversed range is swapped.
    pub fn add_range(&mut self, from: u32, to: u32) {
        let (from, to) = if from > to { (to, from) } else { (from, to) };

        self.ranges.push(CharRange {
            from,
            len: to - from + 1,
        });

        let bucket_count = NUM_BAD_CHARS as u32;
        if to - from < bucket_count {
            let first = (from % bucket_count) as usize;
            let last = (to % bucket_count) as usize;
            if first <= last {
                self.occurrences[first..=last].fill(0);
            } else {
                // the range wraps around the residues
                self.occurrences[..=last].fill(0);
                self.occurrences[first..].fill(0);
            }
        } else {
            self.occurrences.fill(0);
        }
    }

    pub fn add_singleton(&mut self, ch: u32) {
        self.add_range(ch, ch);
    }

    pub fn contains(&self, ch: char) -> bool {
        if self.occurrences[bad_char(ch)] == NO_OCCURRENCE {
            return self.negative;
        }

        if self.categories != 0 && (self.categories & category_of(ch).flag()) != 0 {
            return !self.negative;
        }

        let codepoint = ch as u32;
        if self
            .ranges
            .iter()
            .any(|range| codepoint.wrapping_sub(range.from) < range.len)
        {
            return !self.negative;
        }

        self.negative
    }

    pub fn first_occurrence(&self) -> &OccurrenceTable {
        &self.occurrences
    }
}

impl Display for CharClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut items = vec![];
        if self.categories != 0 {
            items.push(format!("categories 0x{:08x}", self.categories));
        }
        for range in &self.ranges {
            let end = range.from + range.len - 1;
            if range.len == 1 {
                items.push(format!("0x{:04x}", range.from));
            } else {
                items.push(format!("0x{:04x}..0x{:04x}", range.from, end));
            }
        }

        let content = items.join(", ");
        if self.negative {
            write!(f, "Class ![{}]", content)
        } else {
            write!(f, "Class [{}]", content)
        }
    }
}
