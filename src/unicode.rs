// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// Character classification used by the character classes and the
// word-boundary anchors. The category database itself comes from
// the `unicode-general-category` crate.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Unicode general categories, numbered so that `1 << category`
/// fits a `u32` mask.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Category {
    MarkNonSpacing = 0,
    MarkSpacingCombining,
    MarkEnclosing,
    NumberDecimalDigit,
    NumberLetter,
    NumberOther,
    SeparatorSpace,
    SeparatorLine,
    SeparatorParagraph,
    OtherControl,
    OtherFormat,
    OtherSurrogate,
    OtherPrivateUse,
    OtherNotAssigned,
    LetterUppercase,
    LetterLowercase,
    LetterTitlecase,
    LetterModifier,
    LetterOther,
    PunctuationConnector,
    PunctuationDash,
    PunctuationOpen,
    PunctuationClose,
    PunctuationInitialQuote,
    PunctuationFinalQuote,
    PunctuationOther,
    SymbolMath,
    SymbolCurrency,
    SymbolModifier,
    SymbolOther,
}

impl Category {
    pub fn flag(self) -> u32 {
        1 << (self as u32)
    }
}

pub const ALL_CATEGORIES: u32 = (1 << (Category::SymbolOther as u32 + 1)) - 1;

pub const MARKS: u32 = flags(&[
    Category::MarkNonSpacing,
    Category::MarkSpacingCombining,
    Category::MarkEnclosing,
]);

pub const NUMBERS: u32 = flags(&[
    Category::NumberDecimalDigit,
    Category::NumberLetter,
    Category::NumberOther,
]);

pub const SEPARATORS: u32 = flags(&[
    Category::SeparatorSpace,
    Category::SeparatorLine,
    Category::SeparatorParagraph,
]);

pub const OTHERS: u32 = flags(&[
    Category::OtherControl,
    Category::OtherFormat,
    Category::OtherSurrogate,
    Category::OtherPrivateUse,
    Category::OtherNotAssigned,
]);

pub const LETTERS: u32 = flags(&[
    Category::LetterUppercase,
    Category::LetterLowercase,
    Category::LetterTitlecase,
    Category::LetterModifier,
    Category::LetterOther,
]);

pub const PUNCTUATIONS: u32 = flags(&[
    Category::PunctuationConnector,
    Category::PunctuationDash,
    Category::PunctuationOpen,
    Category::PunctuationClose,
    Category::PunctuationInitialQuote,
    Category::PunctuationFinalQuote,
    Category::PunctuationOther,
]);

pub const SYMBOLS: u32 = flags(&[
    Category::SymbolMath,
    Category::SymbolCurrency,
    Category::SymbolModifier,
    Category::SymbolOther,
]);

const fn flags(categories: &[Category]) -> u32 {
    let mut mask = 0;
    let mut idx = 0;
    while idx < categories.len() {
        mask |= 1 << (categories[idx] as u32);
        idx += 1;
    }
    mask
}

pub fn category_of(ch: char) -> Category {
    match get_general_category(ch) {
        GeneralCategory::NonspacingMark => Category::MarkNonSpacing,
        GeneralCategory::SpacingMark => Category::MarkSpacingCombining,
        GeneralCategory::EnclosingMark => Category::MarkEnclosing,
        GeneralCategory::DecimalNumber => Category::NumberDecimalDigit,
        GeneralCategory::LetterNumber => Category::NumberLetter,
        GeneralCategory::OtherNumber => Category::NumberOther,
        GeneralCategory::SpaceSeparator => Category::SeparatorSpace,
        GeneralCategory::LineSeparator => Category::SeparatorLine,
        GeneralCategory::ParagraphSeparator => Category::SeparatorParagraph,
        GeneralCategory::Control => Category::OtherControl,
        GeneralCategory::Format => Category::OtherFormat,
        GeneralCategory::Surrogate => Category::OtherSurrogate,
        GeneralCategory::PrivateUse => Category::OtherPrivateUse,
        GeneralCategory::UppercaseLetter => Category::LetterUppercase,
        GeneralCategory::LowercaseLetter => Category::LetterLowercase,
        GeneralCategory::TitlecaseLetter => Category::LetterTitlecase,
        GeneralCategory::ModifierLetter => Category::LetterModifier,
        GeneralCategory::OtherLetter => Category::LetterOther,
        GeneralCategory::ConnectorPunctuation => Category::PunctuationConnector,
        GeneralCategory::DashPunctuation => Category::PunctuationDash,
        GeneralCategory::OpenPunctuation => Category::PunctuationOpen,
        GeneralCategory::ClosePunctuation => Category::PunctuationClose,
        GeneralCategory::InitialPunctuation => Category::PunctuationInitialQuote,
        GeneralCategory::FinalPunctuation => Category::PunctuationFinalQuote,
        GeneralCategory::OtherPunctuation => Category::PunctuationOther,
        GeneralCategory::MathSymbol => Category::SymbolMath,
        GeneralCategory::CurrencySymbol => Category::SymbolCurrency,
        GeneralCategory::ModifierSymbol => Category::SymbolModifier,
        GeneralCategory::OtherSymbol => Category::SymbolOther,
        _ => Category::OtherNotAssigned,
    }
}

/// Letters, numbers, marks and the underscore.
pub fn is_word(ch: char) -> bool {
    ch == '_' || category_of(ch).flag() & (LETTERS | NUMBERS | MARKS) != 0
}

/// Single-character lowercase mapping; characters whose lowercase
/// form expands to several characters are left unchanged.
pub fn to_lower(ch: char) -> char {
    let mut lowers = ch.to_lowercase();
    match (lowers.next(), lowers.next()) {
        (Some(lower), None) => lower,
        _ => ch,
    }
}

pub fn to_upper(ch: char) -> char {
    let mut uppers = ch.to_uppercase();
    match (uppers.next(), uppers.next()) {
        (Some(upper), None) => upper,
        _ => ch,
    }
}

pub fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || to_lower(a) == to_lower(b)
}

/// Looks up a Unicode block by the name used in `\p{IsName}`.
pub fn find_block(name: &str) -> Option<(u32, u32)> {
    UNICODE_BLOCKS
        .binary_search_by(|(block_name, _, _)| (*block_name).cmp(name))
        .ok()
        .map(|idx| (UNICODE_BLOCKS[idx].1, UNICODE_BLOCKS[idx].2))
}

// sorted by name (byte order) for the binary search
const UNICODE_BLOCKS: [(&str, u32, u32); 142] = [
    ("AegeanNumbers", 0x10100, 0x1013F),
    ("AlphabeticPresentationForms", 0xFB00, 0xFB4F),
    ("AncientGreekMusicalNotation", 0x1D200, 0x1D24F),
    ("AncientGreekNumbers", 0x10140, 0x1018F),
    ("Arabic", 0x0600, 0x06FF),
    ("ArabicPresentationForms-A", 0xFB50, 0xFDFF),
    ("ArabicPresentationForms-B", 0xFE70, 0xFEFF),
    ("ArabicSupplement", 0x0750, 0x077F),
    ("Armenian", 0x0530, 0x058F),
    ("Arrows", 0x2190, 0x21FF),
    ("BasicLatin", 0x0000, 0x007F),
    ("Bengali", 0x0980, 0x09FF),
    ("BlockElements", 0x2580, 0x259F),
    ("Bopomofo", 0x3100, 0x312F),
    ("BopomofoExtended", 0x31A0, 0x31BF),
    ("BoxDrawing", 0x2500, 0x257F),
    ("BraillePatterns", 0x2800, 0x28FF),
    ("Buginese", 0x1A00, 0x1A1F),
    ("Buhid", 0x1740, 0x175F),
    ("ByzantineMusicalSymbols", 0x1D000, 0x1D0FF),
    ("CJKCompatibility", 0x3300, 0x33FF),
    ("CJKCompatibilityForms", 0xFE30, 0xFE4F),
    ("CJKCompatibilityIdeographs", 0xF900, 0xFAFF),
    ("CJKCompatibilityIdeographsSupplement", 0x2F800, 0x2FA1F),
    ("CJKRadicalsSupplement", 0x2E80, 0x2EFF),
    ("CJKStrokes", 0x31C0, 0x31EF),
    ("CJKSymbolsandPunctuation", 0x3000, 0x303F),
    ("CJKUnifiedIdeographs", 0x4E00, 0x9FFF),
    ("CJKUnifiedIdeographsExtensionA", 0x3400, 0x4DB5),
    ("CJKUnifiedIdeographsExtensionB", 0x20000, 0x2A6DF),
    ("Cherokee", 0x13A0, 0x13FF),
    ("CombiningDiacriticalMarks", 0x0300, 0x036F),
    ("CombiningDiacriticalMarksSupplement", 0x1DC0, 0x1DFF),
    ("CombiningHalfMarks", 0xFE20, 0xFE2F),
    ("CombiningMarksforSymbols", 0x20D0, 0x20FF),
    ("ControlPictures", 0x2400, 0x243F),
    ("Coptic", 0x2C80, 0x2CFF),
    ("CurrencySymbols", 0x20A0, 0x20CF),
    ("CypriotSyllabary", 0x10800, 0x1083F),
    ("Cyrillic", 0x0400, 0x04FF),
    ("CyrillicSupplement", 0x0500, 0x052F),
    ("Deseret", 0x10400, 0x1044F),
    ("Devanagari", 0x0900, 0x097F),
    ("Dingbats", 0x2700, 0x27BF),
    ("EnclosedAlphanumerics", 0x2460, 0x24FF),
    ("EnclosedCJKLettersandMonths", 0x3200, 0x32FF),
    ("Ethiopic", 0x1200, 0x137F),
    ("EthiopicExtended", 0x2D80, 0x2DDF),
    ("EthiopicSupplement", 0x1380, 0x139F),
    ("GeneralPunctuation", 0x2000, 0x206F),
    ("GeometricShapes", 0x25A0, 0x25FF),
    ("Georgian", 0x10A0, 0x10FF),
    ("GeorgianSupplement", 0x2D00, 0x2D2F),
    ("Glagolitic", 0x2C00, 0x2C5F),
    ("Gothic", 0x10330, 0x1034F),
    ("Greek", 0x0370, 0x03FF),
    ("GreekExtended", 0x1F00, 0x1FFF),
    ("Gujarati", 0x0A80, 0x0AFF),
    ("Gurmukhi", 0x0A00, 0x0A7F),
    ("HalfwidthandFullwidthForms", 0xFF00, 0xFFEF),
    ("HangulCompatibilityJamo", 0x3130, 0x318F),
    ("HangulJamo", 0x1100, 0x11FF),
    ("HangulSyllables", 0xAC00, 0xD7A3),
    ("Hanunoo", 0x1720, 0x173F),
    ("Hebrew", 0x0590, 0x05FF),
    ("Hiragana", 0x3040, 0x309F),
    ("IPAExtensions", 0x0250, 0x02AF),
    ("IdeographicDescriptionCharacters", 0x2FF0, 0x2FFF),
    ("Kanbun", 0x3190, 0x319F),
    ("KangxiRadicals", 0x2F00, 0x2FDF),
    ("Kannada", 0x0C80, 0x0CFF),
    ("Katakana", 0x30A0, 0x30FF),
    ("KatakanaPhoneticExtensions", 0x31F0, 0x31FF),
    ("Kharoshthi", 0x10A00, 0x10A5F),
    ("Khmer", 0x1780, 0x17FF),
    ("KhmerSymbols", 0x19E0, 0x19FF),
    ("Lao", 0x0E80, 0x0EFF),
    ("Latin-1Supplement", 0x0080, 0x00FF),
    ("LatinExtended-A", 0x0100, 0x017F),
    ("LatinExtended-B", 0x0180, 0x024F),
    ("LatinExtendedAdditional", 0x1E00, 0x1EFF),
    ("LetterlikeSymbols", 0x2100, 0x214F),
    ("Limbu", 0x1900, 0x194F),
    ("LinearBIdeograms", 0x10080, 0x100FF),
    ("LinearBSyllabary", 0x10000, 0x1007F),
    ("Malayalam", 0x0D00, 0x0D7F),
    ("MathematicalAlphanumericSymbols", 0x1D400, 0x1D7FF),
    ("MathematicalOperators", 0x2200, 0x22FF),
    ("MiscellaneousMathematicalSymbols-A", 0x27C0, 0x27EF),
    ("MiscellaneousMathematicalSymbols-B", 0x2980, 0x29FF),
    ("MiscellaneousSymbols", 0x2600, 0x26FF),
    ("MiscellaneousSymbolsandArrows", 0x2B00, 0x2BFF),
    ("MiscellaneousTechnical", 0x2300, 0x23FF),
    ("ModifierToneLetters", 0xA700, 0xA71F),
    ("Mongolian", 0x1800, 0x18AF),
    ("MusicalSymbols", 0x1D100, 0x1D1FF),
    ("Myanmar", 0x1000, 0x109F),
    ("NewTaiLue", 0x1980, 0x19DF),
    ("NumberForms", 0x2150, 0x218F),
    ("Ogham", 0x1680, 0x169F),
    ("OldItalic", 0x10300, 0x1032F),
    ("OldPersian", 0x103A0, 0x103DF),
    ("OpticalCharacterRecognition", 0x2440, 0x245F),
    ("Oriya", 0x0B00, 0x0B7F),
    ("Osmanya", 0x10480, 0x104AF),
    ("PhoneticExtensions", 0x1D00, 0x1D7F),
    ("PhoneticExtensionsSupplement", 0x1D80, 0x1DBF),
    ("PrivateUse", 0xE000, 0xF8FF),
    ("Runic", 0x16A0, 0x16FF),
    ("Shavian", 0x10450, 0x1047F),
    ("Sinhala", 0x0D80, 0x0DFF),
    ("SmallFormVariants", 0xFE50, 0xFE6F),
    ("SpacingModifierLetters", 0x02B0, 0x02FF),
    ("Specials", 0xFFF0, 0xFFFF),
    ("SuperscriptsandSubscripts", 0x2070, 0x209F),
    ("SupplementalArrows-A", 0x27F0, 0x27FF),
    ("SupplementalArrows-B", 0x2900, 0x297F),
    ("SupplementalMathematicalOperators", 0x2A00, 0x2AFF),
    ("SupplementalPunctuation", 0x2E00, 0x2E7F),
    ("SupplementaryPrivateUseArea-A", 0xF0000, 0xFFFFF),
    ("SupplementaryPrivateUseArea-B", 0x100000, 0x10FFFF),
    ("SylotiNagri", 0xA800, 0xA82F),
    ("Syriac", 0x0700, 0x074F),
    ("Tagalog", 0x1700, 0x171F),
    ("Tagbanwa", 0x1760, 0x177F),
    ("Tags", 0xE0000, 0xE007F),
    ("TaiLe", 0x1950, 0x197F),
    ("TaiXuanJingSymbols", 0x1D300, 0x1D35F),
    ("Tamil", 0x0B80, 0x0BFF),
    ("Telugu", 0x0C00, 0x0C7F),
    ("Thaana", 0x0780, 0x07BF),
    ("Thai", 0x0E00, 0x0E7F),
    ("Tibetan", 0x0F00, 0x0FFF),
    ("Tifinagh", 0x2D30, 0x2D7F),
    ("Ugaritic", 0x10380, 0x1039F),
    ("UnifiedCanadianAboriginalSyllabics", 0x1400, 0x167F),
    ("VariationSelectors", 0xFE00, 0xFE0F),
    ("VariationSelectorsSupplement", 0xE0100, 0xE01EF),
    ("VerticalForms", 0xFE10, 0xFE1F),
    ("YiRadicals", 0xA490, 0xA4CF),
    ("YiSyllables", 0xA000, 0xA48F),
    ("YijingHexagramSymbols", 0x4DC0, 0x4DFF),
];
