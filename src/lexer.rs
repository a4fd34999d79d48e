// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// Syntax Summary:
//
// - [ ]      Character class, `[^ ]` negated, `a-z` ranges,
//            a leading `]` or a leading/trailing `-` are literal
// - {m,n}    Interval, `{m}`, `{m,}` and `{,n}` also accepted
// - *, +, ?  Quantifiers
// - |        Alternation
// - ^, $     Caret and dollar anchors
// - .        Any character (including newlines)
// - (...)    Capturing group
// - (?:...)  Non-capturing group
// - (?=...)  Positive lookahead
// - (?!...)  Negative lookahead
// - (?<...   Lookbehind, rejected
//
// Escapes:
//
// - \a \f \n \r \t \v   Control characters
// - \0ooo               Octal, at most 3 digits, at most \0377
// - \xhhhh              Hexadecimal, at most 4 digits
// - \b \B               Word boundary, non-word boundary (`\b` is backspace inside `[...]`)
// - \d \D \s \S \w \W   Preset character classes
// - \1 .. \9            Back-references, more digits may follow
//
// Schema pattern escapes:
//
// - \i \I               XML name-start characters
// - \c \C               XML name characters
// - \p{..} \P{..}       Unicode general category (`L`, `Lu`, ...) or block (`IsGreek`, ...)

use crate::{
    charclass::CharClass,
    error::RegexError,
    token::{Repetition, Token, INFINITE_REPETITION},
    unicode::{
        find_block, Category, ALL_CATEGORIES, LETTERS, MARKS, NUMBERS, OTHERS, PUNCTUATIONS,
        SEPARATORS, SYMBOLS,
    },
};

/// The result of lexing the character after a backslash. Preset
/// classes are accumulated into the class passed to `lex_escape`.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Escaped {
    Char(char),
    Class,
    WordBoundary,
    NonWordBoundary,
    BackReference(usize),
}

/// The saved cursor of a lexer, see `Lexer::save` and `Lexer::restore`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LexerSnapshot {
    position: usize,
    current_char: Option<char>,
    token_start: usize,
}

pub struct Lexer<'a> {
    chars: &'a [char],
    position: usize,            // the position of the next char to read
    current_char: Option<char>, // the last char read, `None` at the end of the pattern
    token_start: usize,         // the position of the last token
    schema_extensions: bool,
    error: Option<RegexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a [char], schema_extensions: bool) -> Self {
        let mut lexer = Self {
            chars,
            position: 0,
            current_char: None,
            token_start: 0,
            schema_extensions,
            error: None,
        };
        lexer.current_char = lexer.next_char();
        lexer
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.chars.get(self.position).copied();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    /// Records an error, only the first one is kept.
    pub fn record_error(&mut self, error: RegexError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn error(&self) -> Option<RegexError> {
        self.error
    }

    /// The position in the pattern where the last token starts.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// The part of the pattern that has not been tokenized yet.
    pub fn remaining(&self) -> &'a [char] {
        let start = if self.current_char.is_some() {
            self.position - 1
        } else {
            self.chars.len()
        };
        &self.chars[start..]
    }

    /// Skips `n` chars of `remaining()`.
    pub fn skip_chars(&mut self, n: usize) {
        if n > 0 {
            self.position += n - 1;
            self.current_char = self.next_char();
        }
    }

    pub fn save(&self) -> LexerSnapshot {
        LexerSnapshot {
            position: self.position,
            current_char: self.current_char,
            token_start: self.token_start,
        }
    }

    pub fn restore(&mut self, snapshot: LexerSnapshot) {
        self.position = snapshot.position;
        self.current_char = snapshot.current_char;
        self.token_start = snapshot.token_start;
    }
}

impl Lexer<'_> {
    pub fn next_token(&mut self) -> Token {
        let previous_char = match self.current_char {
            Some(ch) => ch,
            None => {
                self.token_start = self.position;
                return Token::Eos;
            }
        };

        self.token_start = self.position - 1;
        self.current_char = self.next_char();

        match previous_char {
            '$' => Token::Dollar,
            '(' => {
                if self.current_char == Some('?') {
                    let kind = self.next_char();
                    self.current_char = self.next_char();
                    self.lex_group_kind(kind)
                } else {
                    Token::LeftParen
                }
            }
            ')' => Token::RightParen,
            '*' => Token::Quantifier(Repetition::new(0, INFINITE_REPETITION)),
            '+' => Token::Quantifier(Repetition::new(1, INFINITE_REPETITION)),
            '?' => Token::Quantifier(Repetition::new(0, 1)),
            '.' => Token::CharClass(CharClass::new_any()),
            '[' => self.lex_char_class(),
            '\\' => {
                let mut class = CharClass::new();
                match self.lex_escape(&mut class) {
                    Escaped::Char(ch) => Token::Char(ch),
                    Escaped::Class => Token::CharClass(class),
                    Escaped::WordBoundary => Token::WordBoundary,
                    Escaped::NonWordBoundary => Token::NonWordBoundary,
                    Escaped::BackReference(number) => Token::BackReference(number),
                }
            }
            ']' => {
                self.record_error(RegexError::MissingLeftDelimiter);
                Token::Char(']')
            }
            '^' => Token::Caret,
            '{' => {
                if cfg!(feature = "interval") {
                    self.lex_interval()
                } else {
                    self.record_error(RegexError::DisabledFeature);
                    Token::Char('{')
                }
            }
            '|' => Token::Bar,
            '}' => {
                self.record_error(RegexError::MissingLeftDelimiter);
                Token::Char('}')
            }
            _ => Token::Char(previous_char),
        }
    }

    // (?...
    //   ^___ kind
    fn lex_group_kind(&mut self, kind: Option<char>) -> Token {
        match kind {
            Some(':') => Token::NonCapturingParen,
            Some('=') | Some('!') if !cfg!(feature = "lookahead") => {
                self.record_error(RegexError::DisabledFeature);
                Token::NonCapturingParen
            }
            Some('=') => Token::PositiveLookahead,
            Some('!') => Token::NegativeLookahead,
            Some('<') => {
                self.record_error(RegexError::LookbehindUnsupported);
                Token::NonCapturingParen
            }
            _ => {
                self.record_error(RegexError::BadLookahead);
                Token::NonCapturingParen
            }
        }
    }

    // {m,n}
    //  ^___ current char
    fn lex_interval(&mut self) -> Token {
        let min = self.lex_repetition_count(0);
        let mut max = min;
        if self.current_char == Some(',') {
            self.current_char = self.next_char(); // consume ','
            max = self.lex_repetition_count(INFINITE_REPETITION);
        }

        if max < min {
            self.record_error(RegexError::InvalidInterval);
        }

        if self.current_char != Some('}') {
            self.record_error(RegexError::BadRepetition);
        }

        self.current_char = self.next_char(); // consume '}'
        Token::Quantifier(Repetition::new(min, max))
    }

    fn lex_repetition_count(&mut self, default_value: usize) -> usize {
        let mut count = match self.current_char.and_then(|ch| ch.to_digit(10)) {
            Some(_) => 0,
            None => return default_value,
        };

        while let Some(digit) = self.current_char.and_then(|ch| ch.to_digit(10)) {
            count = 10 * count + digit as usize;
            if count >= INFINITE_REPETITION {
                self.record_error(RegexError::BadRepetition);
                count = default_value;
            }
            self.current_char = self.next_char();
        }

        count
    }

    // [^a-z\d-]
    //  ^___ current char
    fn lex_char_class(&mut self) -> Token {
        let mut class = CharClass::new();
        if self.current_char == Some('^') {
            class.set_negative(true);
            self.current_char = self.next_char();
        }

        let mut pending_char: Option<char> = None;
        let mut range_pending = false;

        // the first char is always a member, so `[]a]` contains `]`
        loop {
            let current_char = match self.current_char {
                Some(ch) => ch,
                None => break,
            };

            if current_char == '-' && pending_char.is_some() && !range_pending {
                range_pending = true;
                self.current_char = self.next_char();
            } else {
                if !range_pending {
                    if let Some(ch) = pending_char.take() {
                        class.add_singleton(ch as u32);
                    }
                }

                let item = if current_char == '\\' {
                    self.current_char = self.next_char();
                    match self.lex_escape(&mut class) {
                        // backspace, not a boundary
                        Escaped::WordBoundary => Escaped::Char('\u{8}'),
                        other => other,
                    }
                } else {
                    self.current_char = self.next_char();
                    Escaped::Char(current_char)
                };

                match item {
                    Escaped::Class => {
                        if range_pending {
                            class.add_singleton('-' as u32);
                            if let Some(ch) = pending_char.take() {
                                class.add_singleton(ch as u32);
                            }
                            range_pending = false;
                        }
                    }
                    Escaped::Char(ch) => {
                        if range_pending {
                            if let Some(from) = pending_char.take() {
                                class.add_range(from as u32, ch as u32);
                            }
                            range_pending = false;
                        } else {
                            pending_char = Some(ch);
                        }
                    }
                    _ => self.record_error(RegexError::BadCharClass),
                }
            }

            if self.current_char == Some(']') {
                break;
            }
        }

        if range_pending {
            class.add_singleton('-' as u32);
        }
        if let Some(ch) = pending_char {
            class.add_singleton(ch as u32);
        }

        if self.current_char.is_none() {
            self.record_error(RegexError::UnexpectedEnd);
        } else {
            self.current_char = self.next_char(); // consume ']'
        }

        Token::CharClass(class)
    }

    // \x
    //  ^___ current char
    fn lex_escape(&mut self, class: &mut CharClass) -> Escaped {
        let previous_char = match self.current_char {
            Some(ch) => ch,
            None => {
                self.record_error(RegexError::UnexpectedEnd);
                return Escaped::Char('\\');
            }
        };

        self.current_char = self.next_char();

        match previous_char {
            'a' => Escaped::Char('\u{7}'),
            'f' => Escaped::Char('\u{c}'),
            'n' => Escaped::Char('\n'),
            'r' => Escaped::Char('\r'),
            't' => Escaped::Char('\t'),
            'v' => Escaped::Char('\u{b}'),
            '0' => {
                let mut value: u32 = 0;
                for _ in 0..3 {
                    match self.current_char.and_then(|ch| ch.to_digit(8)) {
                        Some(digit) => value = (value << 3) | digit,
                        None => break,
                    }
                    self.current_char = self.next_char();
                }

                if value > 0o377 {
                    self.record_error(RegexError::InvalidOctal);
                }
                Escaped::Char(char_from_value(value))
            }
            'x' => {
                let mut value: u32 = 0;
                for _ in 0..4 {
                    match self.current_char.and_then(|ch| ch.to_digit(16)) {
                        Some(digit) => value = (value << 4) | digit,
                        None => break,
                    }
                    self.current_char = self.next_char();
                }
                Escaped::Char(char_from_value(value))
            }
            'b' => Escaped::WordBoundary,
            'B' => Escaped::NonWordBoundary,
            'd' => {
                class.add_categories(Category::NumberDecimalDigit.flag());
                Escaped::Class
            }
            'D' => {
                class.add_categories(ALL_CATEGORIES ^ Category::NumberDecimalDigit.flag());
                Escaped::Class
            }
            's' => {
                class.add_categories(SEPARATORS);
                class.add_range(0x0009, 0x000d);
                class.add_singleton(0x0085);
                Escaped::Class
            }
            'S' => {
                class.add_categories(
                    ALL_CATEGORIES ^ (SEPARATORS | Category::OtherControl.flag()),
                );
                class.add_range(0x0000, 0x0008);
                class.add_range(0x000e, 0x001f);
                class.add_range(0x007f, 0x0084);
                class.add_range(0x0086, 0x009f);
                Escaped::Class
            }
            'w' => {
                class.add_categories(MARKS | NUMBERS | LETTERS);
                class.add_singleton('_' as u32);
                Escaped::Class
            }
            'W' => {
                class.add_categories(
                    ALL_CATEGORIES
                        ^ (MARKS | NUMBERS | LETTERS | Category::PunctuationConnector.flag()),
                );
                class.add_range(0x203f, 0x2040);
                class.add_singleton(0x2040);
                class.add_singleton(0x2054);
                class.add_singleton(0x30fb);
                class.add_range(0xfe33, 0xfe34);
                class.add_range(0xfe4d, 0xfe4f);
                class.add_singleton(0xff3f);
                class.add_singleton(0xff65);
                Escaped::Class
            }
            'i' | 'I' | 'c' | 'C' | 'p' | 'P' if self.schema_extensions => {
                if previous_char.is_ascii_uppercase() {
                    class.set_negative(!class.is_negative());
                }
                match previous_char.to_ascii_lowercase() {
                    'i' => add_name_start_chars(class),
                    'c' => add_name_chars(class),
                    _ => self.lex_category(class),
                }
                Escaped::Class
            }
            '1'..='9' => {
                if !cfg!(feature = "backreference") {
                    self.record_error(RegexError::DisabledFeature);
                    return Escaped::Char(previous_char);
                }

                let mut number = previous_char as usize - '0' as usize;
                while let Some(digit) = self.current_char.and_then(|ch| ch.to_digit(10)) {
                    number = number.saturating_mul(10).saturating_add(digit as usize);
                    self.current_char = self.next_char();
                }
                Escaped::BackReference(number)
            }
            _ => Escaped::Char(previous_char),
        }
    }

    // \p{Lu}
    //   ^___ current char
    fn lex_category(&mut self, class: &mut CharClass) {
        if self.current_char != Some('{') {
            self.record_error(RegexError::BadCharClass);
            return;
        }

        let mut name = String::new();
        self.current_char = self.next_char(); // consume '{'

        loop {
            match self.current_char {
                Some('}') => break,
                Some(ch) => {
                    name.push(ch);
                    self.current_char = self.next_char();
                }
                None => {
                    self.record_error(RegexError::UnexpectedEnd);
                    return;
                }
            }
        }

        self.current_char = self.next_char(); // consume '}'

        if let Some(block_name) = name.strip_prefix("Is").filter(|s| !s.is_empty()) {
            match find_block(block_name) {
                Some((first, last)) => class.add_range(first, last),
                None => self.record_error(RegexError::InvalidCategory),
            }
        } else {
            match category_mask_by_name(&name) {
                Some(mask) => class.add_categories(mask),
                None => self.record_error(RegexError::InvalidCategory),
            }
        }
    }
}

fn char_from_value(value: u32) -> char {
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn category_mask_by_name(name: &str) -> Option<u32> {
    let mask = match name {
        "M" => MARKS,
        "Mn" => Category::MarkNonSpacing.flag(),
        "Mc" => Category::MarkSpacingCombining.flag(),
        "Me" => Category::MarkEnclosing.flag(),
        "N" => NUMBERS,
        "Nd" => Category::NumberDecimalDigit.flag(),
        "Nl" => Category::NumberLetter.flag(),
        "No" => Category::NumberOther.flag(),
        "Z" => SEPARATORS,
        "Zs" => Category::SeparatorSpace.flag(),
        "Zl" => Category::SeparatorLine.flag(),
        "Zp" => Category::SeparatorParagraph.flag(),
        "C" => OTHERS,
        "Cc" => Category::OtherControl.flag(),
        "Cf" => Category::OtherFormat.flag(),
        "Cs" => Category::OtherSurrogate.flag(),
        "Co" => Category::OtherPrivateUse.flag(),
        "Cn" => Category::OtherNotAssigned.flag(),
        "L" => LETTERS,
        "Lu" => Category::LetterUppercase.flag(),
        "Ll" => Category::LetterLowercase.flag(),
        "Lt" => Category::LetterTitlecase.flag(),
        "Lm" => Category::LetterModifier.flag(),
        "Lo" => Category::LetterOther.flag(),
        "P" => PUNCTUATIONS,
        "Pc" => Category::PunctuationConnector.flag(),
        "Pd" => Category::PunctuationDash.flag(),
        "Ps" => Category::PunctuationOpen.flag(),
        "Pe" => Category::PunctuationClose.flag(),
        "Pi" => Category::PunctuationInitialQuote.flag(),
        "Pf" => Category::PunctuationFinalQuote.flag(),
        "Po" => Category::PunctuationOther.flag(),
        "S" => SYMBOLS,
        "Sm" => Category::SymbolMath.flag(),
        "Sc" => Category::SymbolCurrency.flag(),
        "Sk" => Category::SymbolModifier.flag(),
        "So" => Category::SymbolOther.flag(),
        _ => return None,
    };
    Some(mask)
}

const NAME_START_RANGES: [(u32, u32); 14] = [
    (0x0041, 0x005a), // [A-Z]
    (0x0061, 0x007a), // [a-z]
    (0x00c0, 0x00d6),
    (0x00d8, 0x00f6),
    (0x00f8, 0x02ff),
    (0x0370, 0x037d),
    (0x037f, 0x1fff),
    (0x200c, 0x200d),
    (0x2070, 0x218f),
    (0x2c00, 0x2fef),
    (0x3001, 0xd7ff),
    (0xf900, 0xfdcf),
    (0xfdf0, 0xfffd),
    (0x10000, 0xeffff),
];

// XML `NameStartChar`
fn add_name_start_chars(class: &mut CharClass) {
    class.add_categories(MARKS | NUMBERS | LETTERS);
    class.add_singleton(':' as u32);
    class.add_singleton('_' as u32);
    for (from, to) in NAME_START_RANGES {
        class.add_range(from, to);
    }
}

// XML `NameChar`
fn add_name_chars(class: &mut CharClass) {
    class.add_categories(MARKS | NUMBERS | LETTERS);
    for ch in ['-', '.', ':', '_', '\u{b7}'] {
        class.add_singleton(ch as u32);
    }
    class.add_range('0' as u32, '9' as u32);
    for (from, to) in NAME_START_RANGES {
        class.add_range(from, to);
    }
    class.add_range(0x0300, 0x036f);
    class.add_range(0x203f, 0x2040);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        error::RegexError,
        token::{Repetition, Token, INFINITE_REPETITION},
    };

    use super::Lexer;

    fn lex_from_str(s: &str, schema_extensions: bool) -> (Vec<Token>, Option<RegexError>) {
        let chars: Vec<char> = s.chars().collect();
        let mut lexer = Lexer::new(&chars, schema_extensions);
        let mut tokens = vec![];
        loop {
            let token = lexer.next_token();
            if token == Token::Eos {
                break;
            }
            tokens.push(token);
        }
        (tokens, lexer.error())
    }

    fn lex_tokens(s: &str) -> Vec<Token> {
        let (tokens, error) = lex_from_str(s, false);
        assert_eq!(error, None);
        tokens
    }

    fn lex_error(s: &str) -> Option<RegexError> {
        lex_from_str(s, false).1
    }

    fn lex_single_class(s: &str, schema_extensions: bool) -> crate::charclass::CharClass {
        let (mut tokens, error) = lex_from_str(s, schema_extensions);
        assert_eq!(error, None);
        assert_eq!(tokens.len(), 1);
        match tokens.remove(0) {
            Token::CharClass(class) => class,
            other => panic!("expect a class, found {:?}", other),
        }
    }

    #[test]
    fn test_lex_char() {
        assert_eq!(lex_tokens(""), vec![]);
        assert_eq!(
            lex_tokens("a文😊"),
            vec![Token::Char('a'), Token::Char('文'), Token::Char('😊')]
        );

        // escaped chars
        assert_eq!(
            lex_tokens(r#"\a\f\n\r\t\v\\\(\*"#),
            vec![
                Token::Char('\u{7}'),
                Token::Char('\u{c}'),
                Token::Char('\n'),
                Token::Char('\r'),
                Token::Char('\t'),
                Token::Char('\u{b}'),
                Token::Char('\\'),
                Token::Char('('),
                Token::Char('*'),
            ]
        );

        // octal and hex
        assert_eq!(
            lex_tokens(r#"\0101\x41\x6587\0"#),
            vec![
                Token::Char('A'),
                Token::Char('A'),
                Token::Char('文'),
                Token::Char('\0'),
            ]
        );

        // at most 3 octal digits
        assert_eq!(
            lex_tokens(r#"\01012"#),
            vec![Token::Char('A'), Token::Char('2')]
        );
    }

    #[test]
    fn test_lex_operators() {
        assert_eq!(
            lex_tokens("^a|b$"),
            vec![
                Token::Caret,
                Token::Char('a'),
                Token::Bar,
                Token::Char('b'),
                Token::Dollar,
            ]
        );

        assert_eq!(
            lex_tokens("a*b+c?"),
            vec![
                Token::Char('a'),
                Token::Quantifier(Repetition::new(0, INFINITE_REPETITION)),
                Token::Char('b'),
                Token::Quantifier(Repetition::new(1, INFINITE_REPETITION)),
                Token::Char('c'),
                Token::Quantifier(Repetition::new(0, 1)),
            ]
        );

        assert_eq!(
            lex_tokens(r#"(a)(?:b)(?=c)(?!d)\b\B\12"#),
            vec![
                Token::LeftParen,
                Token::Char('a'),
                Token::RightParen,
                Token::NonCapturingParen,
                Token::Char('b'),
                Token::RightParen,
                Token::PositiveLookahead,
                Token::Char('c'),
                Token::RightParen,
                Token::NegativeLookahead,
                Token::Char('d'),
                Token::RightParen,
                Token::WordBoundary,
                Token::NonWordBoundary,
                Token::BackReference(12),
            ]
        );
    }

    #[test]
    fn test_lex_interval() {
        assert_eq!(
            lex_tokens("a{3}b{2,}c{,4}d{1,5}"),
            vec![
                Token::Char('a'),
                Token::Quantifier(Repetition::new(3, 3)),
                Token::Char('b'),
                Token::Quantifier(Repetition::new(2, INFINITE_REPETITION)),
                Token::Char('c'),
                Token::Quantifier(Repetition::new(0, 4)),
                Token::Char('d'),
                Token::Quantifier(Repetition::new(1, 5)),
            ]
        );

        assert_eq!(lex_error("a{3,1}"), Some(RegexError::InvalidInterval));
        assert_eq!(lex_error("a{3"), Some(RegexError::BadRepetition));
        assert_eq!(lex_error("a{1,2x}"), Some(RegexError::BadRepetition));
        assert_eq!(lex_error("a{1025}"), Some(RegexError::BadRepetition));
    }

    #[test]
    fn test_lex_char_class() {
        let class = lex_single_class("[a-cx]", false);
        assert!(class.contains('a'));
        assert!(class.contains('b'));
        assert!(class.contains('x'));
        assert!(!class.contains('d'));
        assert!(!class.is_negative());

        let class = lex_single_class("[^0-9]", false);
        assert!(class.is_negative());
        assert!(!class.contains('5'));
        assert!(class.contains('a'));

        // leading ']' and trailing '-' are literal
        let class = lex_single_class("[]a-]", false);
        assert!(class.contains(']'));
        assert!(class.contains('a'));
        assert!(class.contains('-'));
        assert!(!class.contains('b'));

        // preset class inside a class
        let class = lex_single_class(r#"[\d_]"#, false);
        assert!(class.contains('7'));
        assert!(class.contains('_'));
        assert!(!class.contains('a'));

        // a range ending with a preset class keeps '-' and the first char
        let class = lex_single_class(r#"[a-\d]"#, false);
        assert!(class.contains('a'));
        assert!(class.contains('-'));
        assert!(class.contains('3'));
        assert!(!class.contains('b'));

        // `\b` is backspace in a class
        let class = lex_single_class(r#"[\b]"#, false);
        assert!(class.contains('\u{8}'));
        assert!(!class.contains('b'));

        // any char
        let class = lex_single_class(".", false);
        assert!(class.contains('\n'));
    }

    #[test]
    fn test_lex_char_class_errors() {
        assert_eq!(lex_error("[abc"), Some(RegexError::UnexpectedEnd));
        assert_eq!(lex_error("[a\\Bc]"), Some(RegexError::BadCharClass));
        assert_eq!(lex_error("[a\\1]"), Some(RegexError::BadCharClass));
        assert_eq!(lex_error("a]"), Some(RegexError::MissingLeftDelimiter));
        assert_eq!(lex_error("a}"), Some(RegexError::MissingLeftDelimiter));
    }

    #[test]
    fn test_lex_preset_class() {
        let class = lex_single_class(r#"\s"#, false);
        assert!(class.contains(' '));
        assert!(class.contains('\t'));
        assert!(class.contains('\n'));
        assert!(!class.contains('a'));

        let class = lex_single_class(r#"\S"#, false);
        assert!(!class.contains(' '));
        assert!(!class.contains('\n'));
        assert!(class.contains('a'));
        assert!(class.contains('\u{1}'));

        let class = lex_single_class(r#"\w"#, false);
        assert!(class.contains('a'));
        assert!(class.contains('_'));
        assert!(class.contains('9'));
        assert!(!class.contains('-'));

        let class = lex_single_class(r#"\W"#, false);
        assert!(!class.contains('a'));
        assert!(!class.contains('_'));
        assert!(class.contains('-'));
        assert!(class.contains(' '));

        let class = lex_single_class(r#"\D"#, false);
        assert!(!class.contains('1'));
        assert!(class.contains('x'));
    }

    #[test]
    fn test_lex_group_errors() {
        assert_eq!(lex_error("(?<=x)y"), Some(RegexError::LookbehindUnsupported));
        assert_eq!(lex_error("(?#x)"), Some(RegexError::BadLookahead));
        assert_eq!(lex_error("a\\"), Some(RegexError::UnexpectedEnd));
        assert_eq!(lex_error(r#"\0400"#), Some(RegexError::InvalidOctal));
    }

    #[test]
    fn test_lex_schema_escapes() {
        let class = lex_single_class(r#"\p{Lu}"#, true);
        assert!(class.contains('A'));
        assert!(!class.contains('a'));

        let class = lex_single_class(r#"\P{Lu}"#, true);
        assert!(!class.contains('A'));
        assert!(class.contains('a'));

        let class = lex_single_class(r#"\p{IsGreek}"#, true);
        assert!(class.contains('α'));
        assert!(!class.contains('a'));

        let class = lex_single_class(r#"\i"#, true);
        assert!(class.contains('a'));
        assert!(class.contains(':'));
        assert!(!class.contains('-'));

        let class = lex_single_class(r#"\c"#, true);
        assert!(class.contains('-'));
        assert!(class.contains('.'));

        let class = lex_single_class(r#"\I"#, true);
        assert!(!class.contains('a'));
        assert!(class.contains(' '));

        assert_eq!(
            lex_from_str(r#"\p{Xy}"#, true).1,
            Some(RegexError::InvalidCategory)
        );
        assert_eq!(
            lex_from_str(r#"\p{IsKlingon}"#, true).1,
            Some(RegexError::InvalidCategory)
        );
        assert_eq!(
            lex_from_str(r#"\pL"#, true).1,
            Some(RegexError::BadCharClass)
        );
        assert_eq!(
            lex_from_str(r#"\p{Lu"#, true).1,
            Some(RegexError::UnexpectedEnd)
        );

        // plain chars without the schema extensions
        assert_eq!(
            lex_from_str(r#"\i\p"#, false).0,
            vec![Token::Char('i'), Token::Char('p')]
        );
    }

    #[test]
    fn test_lex_snapshot() {
        let chars: Vec<char> = "ab".chars().collect();
        let mut lexer = Lexer::new(&chars, false);
        let snapshot = lexer.save();
        assert_eq!(lexer.next_token(), Token::Char('a'));
        assert_eq!(lexer.next_token(), Token::Char('b'));
        lexer.restore(snapshot);
        assert_eq!(lexer.next_token(), Token::Char('a'));
        assert_eq!(lexer.token_start(), 0);
        assert_eq!(lexer.remaining(), &['b']);
    }
}
