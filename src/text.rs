//! Text shaping for the quote and label.
//!
//! Lengths are counted in UTF-16 code units, the same unit the hasher
//! consumes. A character outside the Basic Multilingual Plane counts twice.

/// Longest quote rendered verbatim.
pub const MAX_QUOTE_UNITS: usize = 100;

/// Budget for the words kept before the ellipsis.
const TRUNCATED_BUDGET: usize = MAX_QUOTE_UNITS - 3;

const ELLIPSIS: &str = "...";

/// Gallery cards show at most this many units.
const PREVIEW_UNITS: usize = 60;

pub const DEFAULT_DOWNLOAD_FILENAME: &str = "quote-nft-artwork.svg";

/// Length in UTF-16 code units.
pub fn text_units(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Shorten `quote` to fit the text panel.
///
/// Quotes of up to 100 units pass through untouched. Longer quotes are cut
/// at the last space-separated word that fits and end in `...`; the result
/// never exceeds 100 units.
pub fn truncate_quote(quote: &str) -> String {
    if text_units(quote) <= MAX_QUOTE_UNITS {
        return quote.to_string();
    }

    let mut result = String::new();
    let mut consumed = 0usize;

    for word in quote.split(' ') {
        let len = text_units(word);
        if consumed + len + 1 > TRUNCATED_BUDGET {
            break;
        }
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
        consumed += len + 1;
    }

    result.push_str(ELLIPSIS);
    result
}

/// Font size in px for an already truncated quote.
pub fn quote_font_size(display_quote: &str) -> u32 {
    match text_units(display_quote) {
        n if n > 60 => 16,
        n if n > 40 => 18,
        _ => 20,
    }
}

/// Short form used on gallery cards.
pub fn preview_text(quote: &str) -> String {
    if text_units(quote) > PREVIEW_UNITS {
        let mut head = String::new();
        let mut used = 0;
        // Never split a surrogate pair.
        for ch in quote.chars() {
            used += ch.len_utf16();
            if used > PREVIEW_UNITS - 3 {
                break;
            }
            head.push(ch);
        }
        format!("{head}{ELLIPSIS}")
    } else {
        quote.to_string()
    }
}

/// `quote-nft-<label>.svg`, with whitespace runs turned into `-` and the
/// label lowercased.
pub fn download_filename(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut in_space = false;
    for ch in label.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    format!("quote-nft-{slug}.svg")
}
