// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::charclass::CharClass;

/// The upper bound of `*`, `+` and `{m,}`; explicit counts must stay below it.
pub const INFINITE_REPETITION: usize = 1025;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eos,

    Dollar, // $
    Caret,  // ^
    Bar,    // `|`

    LeftParen,         // (
    NonCapturingParen, // (?:
    PositiveLookahead, // (?=
    NegativeLookahead, // (?!
    RightParen,        // )

    WordBoundary,    // \b
    NonWordBoundary, // \B

    // `.`, `[...]`, `\d`, `\p{...}`, ...
    CharClass(CharClass),

    // `*`, `+`, `?`, `{m}`, `{m,}`, `{m,n}`
    Quantifier(Repetition),

    Char(char),
    BackReference(usize), // \number
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Repetition {
    pub min: usize,
    pub max: usize, // `INFINITE_REPETITION` when unbounded
}

impl Repetition {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max == INFINITE_REPETITION
    }
}
