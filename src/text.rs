//! Text preparation shared by the scorer: normalization and word tokenization.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Normalize feed text before lexicon matching.
///
/// Strips tags, decodes HTML entities, folds typographic quotes to ASCII and
/// collapses whitespace. Punctuation is kept (exclamation marks are scored).
pub fn normalize_text(s: &str) -> String {
    // 1) Strip HTML tags (before decoding, so `&lt;` / `&gt;` stay literal text)
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    let stripped = re_tags.replace_all(s, " ");

    // 2) HTML entity decode
    let mut out = html_escape::decode_html_entities(&stripped).to_string();

    // 3) “ ” « » and ‘ ’ to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Word tokens in original case (Unicode-aware `\w+`).
pub fn words(input: &str) -> Vec<&str> {
    static RE_WORD: OnceCell<Regex> = OnceCell::new();
    let re = RE_WORD.get_or_init(|| Regex::new(r"(?u)\b\w+\b").expect("tokenizer regex"));
    re.find_iter(input).map(|m| m.as_str()).collect()
}

/// True for shouting words: letters only, all uppercase, longer than 3 chars,
/// and not a short acronym (2-5 uppercase letters such as `NASA` or `WHO`).
/// Mixed tokens like `COVID19` never count.
pub fn is_shouting(word: &str) -> bool {
    static RE_ACRONYM: OnceCell<Regex> = OnceCell::new();
    let acronym = RE_ACRONYM.get_or_init(|| Regex::new(r"^[A-Z]{2,5}$").expect("acronym regex"));

    word.chars().count() > 3
        && word.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
        && !acronym.is_match(word)
}
