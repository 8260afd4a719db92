//! Longest-match expansion of common bibliographic abbreviations.
//!
//! The source system loads this table from a `wordlists.json` file that
//! was not part of the retrieved reference material; the table below is a
//! reconstruction of the common bibliographic abbreviations it names
//! (`co.` / `company`, roman-numeral-adjacent edition abbreviations, and
//! so on), built from the call sites in `similarity_calculator.py` rather
//! than copied from the (unavailable) data file.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref ABBREVIATIONS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("co.", "company");
        m.insert("co", "company");
        m.insert("corp.", "corporation");
        m.insert("corp", "corporation");
        m.insert("inc.", "incorporated");
        m.insert("inc", "incorporated");
        m.insert("ltd.", "limited");
        m.insert("ltd", "limited");
        m.insert("pub.", "publishing");
        m.insert("pubs.", "publishers");
        m.insert("publ.", "publishing");
        m.insert("univ.", "university");
        m.insert("univ", "university");
        m.insert("dept.", "department");
        m.insert("dept", "department");
        m.insert("assn.", "association");
        m.insert("assoc.", "associates");
        m.insert("ed.", "edition");
        m.insert("eds.", "editions");
        m.insert("rev.", "revised");
        m.insert("trans.", "translated");
        m.insert("vol.", "volume");
        m.insert("vols.", "volumes");
        m.insert("no.", "number");
        m.insert("nos.", "numbers");
        m.insert("rep.", "reprint");
        m.insert("repr.", "reprint");
        m.insert("intro.", "introduction");
        m.insert("illus.", "illustrated");
        m.insert("comp.", "compiled");
        m.insert("st.", "saint");
        m.insert("mr.", "mister");
        m.insert("mrs.", "missus");
        m.insert("dr.", "doctor");
        m.insert("&", "and");
        m
    };
}

/// Expand every abbreviation token in `text` to its longest-match
/// expansion, leaving unrecognized tokens untouched.
///
/// Operates on whitespace-delimited tokens; `text` is expected to already
/// be lowercased (callers apply this after [`super::unicode_fold::normalize_unicode`]
/// and `.to_lowercase()`).
#[must_use]
pub fn expand_abbreviations(text: &str) -> String {
    text.split_whitespace()
        .map(|word| *ABBREVIATIONS.get(word).unwrap_or(&word))
        .collect::<Vec<_>>()
        .join(" ")
}
