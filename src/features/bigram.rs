//! Character bigram frequencies over the space-joined normalized lyrics.
//!
//! The 729-wide vector is not part of the main record; it is written to an
//! append-only side file from which the bigram-PCA components are later built.

use crate::core::document::Document;

/// Alphabet the bigrams are drawn from: space, then a to z.
pub const BIGRAM_ALPHABET: &str = " abcdefghijklmnopqrstuvwxyz";

/// Number of ordered bigrams over [`BIGRAM_ALPHABET`] (27 squared).
pub const BIGRAM_COUNT: usize = 27 * 27;

/// All ordered bigrams, first character major.
pub fn bigrams() -> impl Iterator<Item = String> {
    BIGRAM_ALPHABET.chars().flat_map(|first| {
        BIGRAM_ALPHABET.chars().map(move |second| {
            let mut bigram = String::with_capacity(2);
            bigram.push(first);
            bigram.push(second);
            bigram
        })
    })
}

/// Frequency of every bigram in the normalized tokens joined by single spaces.
///
/// Occurrences are counted left to right without overlap, so `"aaa"` holds one
/// `"aa"`. Counts are divided by the joined length in characters.
pub fn bigram_frequencies(normalized: &[String]) -> Vec<f64> {
    if normalized.is_empty() {
        return vec![0.0; BIGRAM_COUNT];
    }

    let joined = normalized.join(" ");
    let length = joined.chars().count();
    if length == 0 {
        return vec![0.0; BIGRAM_COUNT];
    }

    bigrams()
        .map(|bigram| joined.matches(bigram.as_str()).count() as f64 / length as f64)
        .collect()
}

/// Render a document's bigram vector as one comma-separated side-file line.
pub fn bigram_line(document: &Document) -> String {
    let values: Vec<String> = bigram_frequencies(&document.normalized_tokens)
        .into_iter()
        .map(format_general)
        .collect();
    let mut line = values.join(",");
    line.push('\n');
    line
}

/// Format a value like C's `%g`: six significant digits, trailing zeros
/// dropped, exponent notation when the exponent is below -4 or at least 6.
pub fn format_general(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // Round first so that e.g. 999999.5 picks the exponent of its rounded form.
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = match exponent.parse() {
        Ok(exponent) => exponent,
        Err(_) => return scientific,
    };

    if exponent < -4 || exponent >= PRECISION {
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
