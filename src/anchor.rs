// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{
    fmt::Display,
    ops::{BitAnd, BitOr},
};

pub const MAX_LOOKAHEADS: usize = 13;
pub const MAX_BACK_REFERENCES: usize = 14;

/// A conjunction of zero-width conditions, stored as a bit set.
///
/// bits:
///
/// - 0: `$`
/// - 1: `^`
/// - 2: `\b`
/// - 3: `\B`
/// - 4..17: lookahead 0 to 12
/// - 17..31: back-reference 1 to 14 is empty
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct AnchorFlags(u32);

impl AnchorFlags {
    pub const EMPTY: AnchorFlags = AnchorFlags(0);
    pub const DOLLAR: AnchorFlags = AnchorFlags(0x0000_0001);
    pub const CARET: AnchorFlags = AnchorFlags(0x0000_0002);
    pub const WORD: AnchorFlags = AnchorFlags(0x0000_0004);
    pub const NON_WORD: AnchorFlags = AnchorFlags(0x0000_0008);

    const FIRST_LOOKAHEAD: u32 = 0x0000_0010;
    const FIRST_BACK_REFERENCE_EMPTY: u32 = Self::FIRST_LOOKAHEAD << MAX_LOOKAHEADS;

    /// The `index`th lookahead of the automaton must hold.
    pub fn lookahead(index: usize) -> AnchorFlags {
        debug_assert!(index < MAX_LOOKAHEADS);
        AnchorFlags(Self::FIRST_LOOKAHEAD << index)
    }

    /// Back-reference `number` (1-based) must refer to an empty capture.
    pub fn back_reference_empty(number: usize) -> AnchorFlags {
        debug_assert!((1..=MAX_BACK_REFERENCES).contains(&number));
        AnchorFlags(Self::FIRST_BACK_REFERENCE_EMPTY << (number - 1))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: AnchorFlags) -> bool {
        self.0 & other.0 == other.0 && !other.is_empty()
    }

    pub fn has_lookahead(&self, index: usize) -> bool {
        self.contains(Self::lookahead(index))
    }

    pub fn has_back_reference_empty(&self, number: usize) -> bool {
        self.contains(Self::back_reference_empty(number))
    }
}

impl BitOr for AnchorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        AnchorFlags(self.0 | rhs.0)
    }
}

impl BitAnd for AnchorFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        AnchorFlags(self.0 & rhs.0)
    }
}

impl Display for AnchorFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }

        let mut names = vec![];
        if self.contains(Self::DOLLAR) {
            names.push("Dollar".to_owned());
        }
        if self.contains(Self::CARET) {
            names.push("Caret".to_owned());
        }
        if self.contains(Self::WORD) {
            names.push("Word".to_owned());
        }
        if self.contains(Self::NON_WORD) {
            names.push("NonWord".to_owned());
        }
        for index in 0..MAX_LOOKAHEADS {
            if self.has_lookahead(index) {
                names.push(format!("Lookahead {}", index));
            }
        }
        for number in 1..=MAX_BACK_REFERENCES {
            if self.has_back_reference_empty(number) {
                names.push(format!("Empty \\{}", number));
            }
        }
        f.write_str(&names.join(" & "))
    }
}

/// The condition attached to a transition: either plain flags, or
/// the disjunction of the two anchors stored at an index of the
/// owning automaton's alternation table.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Anchor {
    Flags(AnchorFlags),
    Alternation(usize),
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::NONE
    }
}

impl Anchor {
    pub const NONE: Anchor = Anchor::Flags(AnchorFlags::EMPTY);

    pub fn is_none(&self) -> bool {
        *self == Anchor::NONE
    }
}

impl From<AnchorFlags> for Anchor {
    fn from(flags: AnchorFlags) -> Self {
        Anchor::Flags(flags)
    }
}

impl Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anchor::Flags(flags) => write!(f, "{}", flags),
            Anchor::Alternation(index) => write!(f, "Alternation #{}", index),
        }
    }
}

/// The table of `a OR b` anchor pairs of an automaton.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct AnchorAlternations {
    pairs: Vec<(Anchor, Anchor)>,
}

impl AnchorAlternations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> (Anchor, Anchor) {
        self.pairs[index]
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Anchor, Anchor)> {
        self.pairs.iter()
    }

    /// Returns an anchor meaning `a OR b`.
    pub fn alternation(&mut self, a: Anchor, b: Anchor) -> Anchor {
        if let (Anchor::Flags(x), Anchor::Flags(y)) = (a, b) {
            // one implies the other
            let both = x & y;
            if both == x || both == y {
                return Anchor::Flags(both);
            }
        }

        // reuse the last pair when the same alternation is requested twice in a row
        if let Some(last) = self.pairs.last() {
            if *last == (a, b) {
                return Anchor::Alternation(self.pairs.len() - 1);
            }
        }

        self.pairs.push((a, b));
        Anchor::Alternation(self.pairs.len() - 1)
    }

    /// Returns an anchor meaning `a AND b`, distributing over alternations.
    pub fn concatenation(&mut self, a: Anchor, b: Anchor) -> Anchor {
        let (alternation_index, other) = match (a, b) {
            (Anchor::Flags(x), Anchor::Flags(y)) => return Anchor::Flags(x | y),
            (_, Anchor::Alternation(index)) => (index, a),
            (Anchor::Alternation(index), _) => (index, b),
        };

        let (left, right) = self.pairs[alternation_index];
        let left_prime = self.concatenation(left, other);
        let right_prime = self.concatenation(right, other);
        self.alternation(left_prime, right_prime)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Anchor, AnchorAlternations, AnchorFlags};

    #[test]
    fn test_flags() {
        let flags = AnchorFlags::CARET | AnchorFlags::lookahead(2);
        assert!(flags.contains(AnchorFlags::CARET));
        assert!(!flags.contains(AnchorFlags::DOLLAR));
        assert!(flags.has_lookahead(2));
        assert!(!flags.has_lookahead(1));
        assert!(!flags.contains(AnchorFlags::EMPTY));

        assert_eq!(
            AnchorFlags::back_reference_empty(1),
            AnchorFlags(0x0002_0000)
        );
        assert_eq!(
            AnchorFlags::back_reference_empty(14),
            AnchorFlags(0x4000_0000)
        );

        assert_eq!(flags.to_string(), "Caret & Lookahead 2");
        assert_eq!(AnchorFlags::EMPTY.to_string(), "None");
        assert_eq!(
            AnchorFlags::back_reference_empty(3).to_string(),
            "Empty \\3"
        );
    }

    #[test]
    fn test_alternation() {
        let mut alternations = AnchorAlternations::new();

        // `^` OR nothing is nothing
        assert_eq!(
            alternations.alternation(Anchor::NONE, AnchorFlags::CARET.into()),
            Anchor::NONE
        );

        // `^$` OR `^` is `^`
        assert_eq!(
            alternations.alternation(
                (AnchorFlags::CARET | AnchorFlags::DOLLAR).into(),
                AnchorFlags::CARET.into()
            ),
            Anchor::Flags(AnchorFlags::CARET)
        );
        assert!(alternations.is_empty());

        // `^` OR `$` needs the table
        let caret_or_dollar =
            alternations.alternation(AnchorFlags::CARET.into(), AnchorFlags::DOLLAR.into());
        assert_eq!(caret_or_dollar, Anchor::Alternation(0));

        // the same pair again reuses the entry
        assert_eq!(
            alternations.alternation(AnchorFlags::CARET.into(), AnchorFlags::DOLLAR.into()),
            Anchor::Alternation(0)
        );
        assert_eq!(alternations.len(), 1);
    }

    #[test]
    fn test_concatenation() {
        let mut alternations = AnchorAlternations::new();

        assert_eq!(
            alternations.concatenation(AnchorFlags::CARET.into(), AnchorFlags::WORD.into()),
            Anchor::Flags(AnchorFlags::CARET | AnchorFlags::WORD)
        );

        // (`^` OR `$`) AND `\b` = (`^\b` OR `$\b`)
        let caret_or_dollar =
            alternations.alternation(AnchorFlags::CARET.into(), AnchorFlags::DOLLAR.into());
        let anchor = alternations.concatenation(caret_or_dollar, AnchorFlags::WORD.into());
        assert_eq!(anchor, Anchor::Alternation(1));
        assert_eq!(
            alternations.get(1),
            (
                Anchor::Flags(AnchorFlags::CARET | AnchorFlags::WORD),
                Anchor::Flags(AnchorFlags::DOLLAR | AnchorFlags::WORD)
            )
        );

        // operand order does not matter
        let anchor = alternations.concatenation(AnchorFlags::WORD.into(), caret_or_dollar);
        assert_eq!(anchor, Anchor::Alternation(1));
        assert_eq!(alternations.len(), 2);
    }
}
