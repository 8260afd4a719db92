//! Roman numeral, ordinal, and word-number normalization.
//!
//! Ports `NumberNormalizer` rule-for-rule: convert Roman numerals to
//! Arabic, then word ordinals to digit ordinals, then digit ordinals
//! (`1st`, `2ème`, …) to plain numbers, then word numbers to digits. The
//! source system loads its mapping tables from a `wordlists.json` data
//! file not present in the retrieved reference material; the tables below
//! are reconstructions covering the ranges its call sites exercise
//! (Roman I-XX, ordinals first-twentieth, word numbers one-twenty) per
//! language.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref ROMAN_NUMERALS: Vec<(&'static str, &'static str)> = vec![
        ("xviii", "18"), ("xvii", "17"), ("xvi", "16"), ("xiv", "14"), ("xiii", "13"),
        ("xii", "12"), ("xix", "19"), ("xx", "20"), ("xi", "11"), ("xv", "15"),
        ("ix", "9"), ("viii", "8"), ("vii", "7"), ("vi", "6"), ("iv", "4"),
        ("iii", "3"), ("ii", "2"), ("x", "10"), ("v", "5"), ("i", "1"),
    ];

    static ref ORDINAL_WORDS: HashMap<&'static str, Vec<(&'static str, &'static str)>> = {
        let mut m = HashMap::new();
        m.insert("eng", vec![
            ("twentieth", "20th"), ("nineteenth", "19th"), ("eighteenth", "18th"),
            ("seventeenth", "17th"), ("sixteenth", "16th"), ("fifteenth", "15th"),
            ("fourteenth", "14th"), ("thirteenth", "13th"), ("twelfth", "12th"),
            ("eleventh", "11th"), ("tenth", "10th"), ("ninth", "9th"), ("eighth", "8th"),
            ("seventh", "7th"), ("sixth", "6th"), ("fifth", "5th"), ("fourth", "4th"),
            ("third", "3rd"), ("second", "2nd"), ("first", "1st"),
        ]);
        m.insert("fre", vec![
            ("premiere", "1ère"), ("premier", "1er"), ("deuxieme", "2e"), ("troisieme", "3e"),
        ]);
        m.insert("ger", vec![]);
        m.insert("spa", vec![("primera", "1ª"), ("primero", "1º"), ("segunda", "2ª")]);
        m.insert("ita", vec![("prima", "1ª"), ("primo", "1º"), ("seconda", "2ª")]);
        m
    };

    static ref WORD_NUMBERS: HashMap<&'static str, Vec<(&'static str, &'static str)>> = {
        let mut m = HashMap::new();
        m.insert("eng", vec![
            ("twenty", "20"), ("nineteen", "19"), ("eighteen", "18"), ("seventeen", "17"),
            ("sixteen", "16"), ("fifteen", "15"), ("fourteen", "14"), ("thirteen", "13"),
            ("twelve", "12"), ("eleven", "11"), ("ten", "10"), ("nine", "9"), ("eight", "8"),
            ("seven", "7"), ("six", "6"), ("five", "5"), ("four", "4"), ("three", "3"),
            ("two", "2"), ("one", "1"),
        ]);
        m
    };

    static ref DIGIT_ORDINAL_RE: Regex = Regex::new(r"(?i)\b(\d+)(?:st|nd|rd|th)\b").unwrap();
    static ref LANG_ORDINAL_SUFFIX_RE: Regex =
        Regex::new(r"(?i)\b(\d+)(?:er|ère|e|º|ª)\b").unwrap();
}

fn word_boundary_replace_all(text: &str, pairs: &[(&str, &str)]) -> String {
    let mut result = text.to_string();
    for (from, to) in pairs {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(from));
        if let Ok(re) = Regex::new(&pattern) {
            result = re.replace_all(&result, *to).into_owned();
        }
    }
    result
}

fn normalize_roman(text: &str) -> String {
    word_boundary_replace_all(text, &ROMAN_NUMERALS)
}

fn normalize_ordinals(text: &str, language: &str) -> String {
    let mut result = text.to_string();
    if let Some(pairs) = ORDINAL_WORDS.get(language) {
        result = word_boundary_replace_all(&result, pairs);
    }
    result = DIGIT_ORDINAL_RE.replace_all(&result, "$1").into_owned();
    result = LANG_ORDINAL_SUFFIX_RE.replace_all(&result, "$1").into_owned();
    result
}

fn normalize_word_numbers(text: &str, language: &str) -> String {
    match WORD_NUMBERS.get(language) {
        Some(pairs) => word_boundary_replace_all(text, pairs),
        None => text.to_string(),
    }
}

/// Normalize Roman numerals, ordinals, and word numbers in `text`, in
/// that order, for the given language.
#[must_use]
pub fn normalize_numbers(text: &str, language: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = normalize_roman(text);
    let text = normalize_ordinals(&text, language);
    normalize_word_numbers(&text, language)
}
