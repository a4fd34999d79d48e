// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

mod anchor;
mod automaton;
mod charclass;
mod error;
mod fragment;
mod heuristic;
mod lexer;
mod matcher;
mod parser;
mod token;
mod unicode;

pub mod cache;
pub mod regex;
pub mod syntax;

pub use error::RegexError;
pub use regex::{CaptureMatches, Captures, CaretMode, Match, MatchResult, Matches, Regex};
pub use syntax::{escape, wildcard_to_regex, PatternSyntax};
