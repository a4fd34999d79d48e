// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// Grammar:
//
// expression = term ('|' term)*
// term       = factor*
// factor     = atom quantifier?
// atom       = char | class | back-reference | '^' | '$' | '\b' | '\B'
//            | '(' expression ')' | '(?:' expression ')'
//            | '(?=' expression ')' | '(?!' expression ')'

use log::debug;

use crate::{
    anchor::AnchorFlags,
    automaton::Automaton,
    cache::EngineKey,
    charclass::CharClass,
    error::RegexError,
    fragment::Fragment,
    lexer::Lexer,
    syntax::{to_canonical, PatternSyntax},
    token::Token,
};

/// Compiles the pattern of the key into an automaton.
///
/// The automaton is always returned, an invalid pattern yields an automaton
/// with `valid == false` and the first error met.
pub fn compile(key: &EngineKey) -> Automaton {
    let mut automaton = Automaton::new(
        key.case_sensitive,
        key.syntax == PatternSyntax::GreedyExtendedRegex,
        key.syntax == PatternSyntax::SchemaPattern,
    );

    let pattern: Vec<char> = to_canonical(&key.pattern, key.syntax).chars().collect();
    let (end, error) = parse(&mut automaton, &pattern);

    automaton.valid = end == Some(pattern.len());
    automaton.error = error;
    if !automaton.valid {
        automaton.trivial = false;

        // e.g. a stray `)`
        automaton.error.get_or_insert(RegexError::MissingLeftDelimiter);
    }

    debug!(
        "compiled {:?} ({:?}, case sensitive: {}): {} states, {} captures ({} official), valid: {}, error: {:?}",
        key.pattern,
        key.syntax,
        key.case_sensitive,
        automaton.states.len(),
        automaton.capture_count,
        automaton.official_capture_count,
        automaton.valid,
        automaton.error
    );
    debug!(
        "heuristics of {:?}: trivial: {}, caret anchored: {}, good string: {}, min length: {}",
        key.pattern,
        automaton.trivial,
        automaton.caret_anchored,
        automaton.use_good_string_heuristic,
        automaton.min_length
    );

    automaton
}

/// Parses `pattern` into `automaton`.
///
/// Parsing stops at the end of the pattern or at an unbalanced `)`,
/// the position where it stopped is returned, or `None` if an error occurred.
pub fn parse(automaton: &mut Automaton, pattern: &[char]) -> (Option<usize>, Option<RegexError>) {
    let schema_extensions = automaton.schema_extensions;
    let mut parser = Parser::new(automaton, Lexer::new(pattern, schema_extensions));
    let end = parser.parse();
    (end, parser.lexer.error())
}

struct Parser<'a> {
    automaton: &'a mut Automaton,
    lexer: Lexer<'a>,
    token: Token,

    // set to false to disable capturing, e.g. when unrolling an interval
    may_capture: bool,
}

impl<'a> Parser<'a> {
    fn new(automaton: &'a mut Automaton, lexer: Lexer<'a>) -> Self {
        Parser {
            automaton,
            lexer,
            token: Token::Eos,
            may_capture: true,
        }
    }

    fn next_token(&mut self) {
        self.token = self.lexer.next_token();
    }

    fn is_term_end(&self) -> bool {
        matches!(self.token, Token::Eos | Token::RightParen | Token::Bar)
    }

    fn parse(&mut self) -> Option<usize> {
        self.automaton.valid = true;
        self.next_token();
        self.may_capture = true;

        let atom = self.automaton.start_atom(false);

        // the initial and the final states
        let mut fragment = Fragment::new();
        fragment.set_class(self.automaton, CharClass::new());
        let mut right_fragment = Fragment::new();
        right_fragment.set_class(self.automaton, CharClass::new());

        let mut middle_fragment = Fragment::new();
        self.parse_expression(&mut middle_fragment);
        self.automaton.finish_atom(atom, false);

        middle_fragment.setup_heuristics(self.automaton);
        fragment.cat(self.automaton, &middle_fragment);
        fragment.cat(self.automaton, &right_fragment);

        self.automaton.resolve_captures();

        if self.lexer.error().is_some() {
            return None;
        }

        self.automaton.finish_anchors();
        Some(self.lexer.token_start())
    }

    fn parse_expression(&mut self, fragment: &mut Fragment) {
        self.parse_term(fragment);

        while self.token == Token::Bar {
            self.automaton.trivial = false;
            let mut right_fragment = Fragment::new();
            self.next_token();
            self.parse_term(&mut right_fragment);
            fragment.orx(self.automaton, &right_fragment);
        }
    }

    fn parse_term(&mut self, fragment: &mut Fragment) {
        if !self.is_term_end() {
            self.parse_factor(fragment);
        }

        while !self.is_term_end() {
            let mut right_fragment = Fragment::new();
            self.parse_factor(&mut right_fragment);
            fragment.cat(self.automaton, &right_fragment);
        }
    }

    fn parse_factor(&mut self, fragment: &mut Fragment) {
        let greedy_quantifiers = self.automaton.greedy_quantifiers;
        let outer_atom = greedy_quantifiers.then(|| self.automaton.start_atom(false));
        let inner_atom = self
            .automaton
            .start_atom(self.may_capture && self.token == Token::LeftParen);
        let non_capturing_paren = self.token == Token::NonCapturingParen;

        // for re-parsing the atom when unrolling an interval
        let snapshot = self.lexer.save();
        let atom_token = self.token.clone();
        let may_capture = self.may_capture;

        self.parse_atom(fragment);
        self.automaton.finish_atom(inner_atom, non_capturing_paren);

        let has_quantifier = matches!(self.token, Token::Quantifier(_));
        if let Token::Quantifier(repetition) = self.token {
            self.automaton.trivial = false;

            if repetition.is_unbounded() {
                fragment.plus(self.automaton, inner_atom);
            } else if repetition.max == 0 {
                fragment.clear();
            }

            if repetition.min == 0 {
                fragment.opt();
            }

            // `a{2,4}` is unrolled to `a(a(a(a)?)?)?`, only the
            // first copy can capture
            self.may_capture = false;
            let mandatory_count = repetition.min.saturating_sub(1);
            let optional_count = if repetition.is_unbounded() {
                0
            } else {
                repetition.max.saturating_sub(mandatory_count + 1)
            };

            let mut right_fragment = Fragment::new();

            for _ in 0..optional_count {
                self.lexer.restore(snapshot);
                self.token = atom_token.clone();
                let mut left_fragment = Fragment::new();
                self.parse_atom(&mut left_fragment);
                left_fragment.cat(self.automaton, &right_fragment);
                left_fragment.opt();
                right_fragment = left_fragment;
            }

            for _ in 0..mandatory_count {
                self.lexer.restore(snapshot);
                self.token = atom_token.clone();
                let mut left_fragment = Fragment::new();
                self.parse_atom(&mut left_fragment);
                left_fragment.cat(self.automaton, &right_fragment);
                right_fragment = left_fragment;
            }

            right_fragment.cat(self.automaton, fragment);
            *fragment = right_fragment;

            self.next_token();
            self.may_capture = may_capture;
        }

        if let Some(outer_atom) = outer_atom {
            self.automaton.finish_atom(outer_atom, has_quantifier);
        }
    }

    fn parse_atom(&mut self, fragment: &mut Fragment) {
        match std::mem::replace(&mut self.token, Token::Eos) {
            Token::Char(ch) => fragment.set_char(self.automaton, ch),
            token => {
                self.automaton.trivial = false;

                match token {
                    Token::Dollar => fragment.cat_anchor(self.automaton, AnchorFlags::DOLLAR.into()),
                    Token::Caret => fragment.cat_anchor(self.automaton, AnchorFlags::CARET.into()),
                    Token::PositiveLookahead => self.parse_lookahead(fragment, false),
                    Token::NegativeLookahead => self.parse_lookahead(fragment, true),
                    Token::WordBoundary => {
                        fragment.cat_anchor(self.automaton, AnchorFlags::WORD.into())
                    }
                    Token::NonWordBoundary => {
                        fragment.cat_anchor(self.automaton, AnchorFlags::NON_WORD.into())
                    }
                    Token::LeftParen | Token::NonCapturingParen => {
                        self.next_token();
                        self.parse_expression(fragment);
                        if self.token != Token::RightParen {
                            self.lexer.record_error(RegexError::UnexpectedEnd);
                        }
                    }
                    Token::CharClass(class) => fragment.set_class(self.automaton, class),
                    Token::Quantifier(_) => self.lexer.record_error(RegexError::BadRepetition),
                    Token::BackReference(number) => {
                        if let Err(error) = fragment.set_back_reference(self.automaton, number) {
                            self.lexer.record_error(error);
                        }
                    }
                    _ => self.lexer.record_error(RegexError::DisabledFeature),
                }
            }
        }

        self.next_token();
    }

    // (?=...)
    //    ^___ current position of the lexer
    fn parse_lookahead(&mut self, fragment: &mut Fragment, negative: bool) {
        let mut sub_automaton = Automaton::new(
            self.automaton.case_sensitive,
            self.automaton.greedy_quantifiers,
            self.automaton.schema_extensions,
        );

        let (end, error) = parse(&mut sub_automaton, self.lexer.remaining());
        sub_automaton.error = error;
        match end {
            Some(length) => self.lexer.skip_chars(length),
            None => self.lexer.record_error(RegexError::BadLookahead),
        }

        match self.automaton.add_lookahead(sub_automaton, negative) {
            Ok(anchor) => fragment.cat_anchor(self.automaton, anchor),
            Err(error) => self.lexer.record_error(error),
        }

        self.next_token();
        if self.token != Token::RightParen {
            self.lexer.record_error(RegexError::BadLookahead);
        }
    }
}
