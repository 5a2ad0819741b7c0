//! Query and review text normalization.
//!
//! The same transform prepares corpus text offline and queries online, so
//! it must be deterministic: NFKC, lowercase, then a WordNet-style noun
//! lemmatizer applied token by token. Tokens are never split or added.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Plurals the suffix rules would get wrong.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("loaves", "loaf"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("calves", "calf"),
    ("shelves", "shelf"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("mangoes", "mango"),
    ("heroes", "hero"),
    ("cookies", "cookie"),
    ("pies", "pie"),
    ("brownies", "brownie"),
    ("smoothies", "smoothie"),
    ("veggies", "veggie"),
    ("movies", "movie"),
    ("quiches", "quiche"),
    ("shoes", "shoe"),
];

/// Normalize free text for vectorization.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        let folded: String = token
            .nfkc()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if folded.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&lemmatize_token(&folded));
    }
    out
}

/// Normalize raw bytes, rejecting malformed UTF-8.
pub fn normalize_bytes(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        Error::InvalidInput(format!(
            "query is not valid UTF-8 (first bad byte at offset {})",
            e.valid_up_to()
        ))
    })?;
    Ok(normalize(text))
}

/// Lemmatize a token that may carry punctuation around its word core,
/// e.g. `"tacos,"` becomes `"taco,"`.
fn lemmatize_token(token: &str) -> Cow<'_, str> {
    let start = token.find(|c: char| c.is_alphanumeric());
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8());

    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if s < e => (s, e),
        _ => return Cow::Borrowed(token),
    };

    let core = &token[start..end];
    let lemma = lemmatize(core);
    if lemma == core {
        Cow::Borrowed(token)
    } else {
        Cow::Owned(format!("{}{}{}", &token[..start], lemma, &token[end..]))
    }
}

/// Reduce a lowercase word to its singular noun form.
///
/// Words that are not purely alphabetic, words of three characters or fewer,
/// and words ending in `ss`, `us` or `is` are returned unchanged.
pub fn lemmatize(word: &str) -> Cow<'_, str> {
    if let Some((_, lemma)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
        return Cow::Owned((*lemma).to_string());
    }

    if word.chars().count() <= 3 || !word.chars().all(char::is_alphabetic) {
        return Cow::Borrowed(word);
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return Cow::Borrowed(word);
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return Cow::Owned(format!("{}y", stem));
        }
    }
    if let Some(stem) = word.strip_suffix("sses") {
        return Cow::Owned(format!("{}ss", stem));
    }
    for suffix in ["ches", "shes", "xes", "zes"] {
        if word.ends_with(suffix) {
            return Cow::Borrowed(&word[..word.len() - 2]);
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        return Cow::Borrowed(stem);
    }

    Cow::Borrowed(word)
}
