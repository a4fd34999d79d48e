// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

/// The message reported by a pattern that compiled without error.
pub const NO_ERROR_MESSAGE: &str = "no error occurred";

/// Errors raised while compiling a pattern, plus the single
/// run-time failure of the matcher (scratch memory exhaustion).
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum RegexError {
    #[error("disabled feature used")]
    DisabledFeature,

    #[error("bad char class syntax")]
    BadCharClass,

    #[error("bad lookahead syntax")]
    BadLookahead,

    #[error("lookbehinds not supported")]
    LookbehindUnsupported,

    #[error("bad repetition syntax")]
    BadRepetition,

    #[error("invalid octal value")]
    InvalidOctal,

    #[error("missing left delim")]
    MissingLeftDelimiter,

    #[error("unexpected end")]
    UnexpectedEnd,

    #[error("met internal limit")]
    InternalLimit,

    #[error("invalid interval")]
    InvalidInterval,

    #[error("invalid category")]
    InvalidCategory,

    #[error("cannot allocate the match state")]
    ResourceExhausted,
}
