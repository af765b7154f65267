//! Text helpers shared by the page and archive renderers.
//!
//! Lengths are counted in characters, not bytes.
use regex::{Captures, Regex};
use std::sync::LazyLock;

// Same reference grammar browsers accept: numeric with optional `;`, or a
// run of name characters with optional `;`.
static CHAR_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\f <&#;]{1,32};?)").unwrap()
});

/// Named references that browsers also decode without a trailing `;`.
const LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Windows-1252 reading of the C1 range `0x80..=0x9F` in numeric references.
const CP1252_C1: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

/// Escape `& < > " '` for use in element text and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode named and numeric character references the way browsers do.
///
/// Besides the terminated forms this accepts numeric references without `;`
/// (`&#39`), the legacy names without `;` (`&amp B`, `&copy2024`), maps
/// `0x80..=0x9F` through Windows-1252, and turns NUL, surrogates and
/// out-of-range code points into U+FFFD.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    CHAR_REF_RE
        .replace_all(s, |caps: &Captures<'_>| decode_reference(&caps[1]))
        .into_owned()
}

fn decode_reference(body: &str) -> String {
    if let Some(num) = body.strip_prefix('#') {
        let num = num.trim_end_matches(';');
        let parsed = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => num.parse::<u32>(),
        };
        // Digits only reach here, so a parse failure means overflow.
        return parsed.map_or_else(|_| '\u{FFFD}'.to_string(), numeric_reference);
    }

    if body.ends_with(';') {
        let whole = format!("&{body}");
        let decoded = html_escape::decode_html_entities(&whole);
        if decoded != whole {
            return decoded.into_owned();
        }
    }

    // Longest legacy name that prefixes the run; the rest is kept verbatim.
    let cuts: Vec<usize> = body
        .char_indices()
        .map(|(i, _)| i)
        .skip(2)
        .chain([body.len()])
        .collect();
    for &cut in cuts.iter().rev() {
        let name = &body[..cut];
        if LEGACY_NAMES.contains(&name) {
            let ch = html_escape::decode_html_entities(&format!("&{name};")).into_owned();
            return format!("{ch}{}", &body[cut..]);
        }
    }
    format!("&{body}")
}

fn numeric_reference(code: u32) -> String {
    match code {
        0 => '\u{FFFD}'.to_string(),
        0x0D => "\r".to_string(),
        0x80..=0x9F => CP1252_C1[(code - 0x80) as usize].to_string(),
        0xD800..=0xDFFF | 0x110000.. => '\u{FFFD}'.to_string(),
        0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF => String::new(),
        c if c & 0xFFFE == 0xFFFE => String::new(),
        c => char::from_u32(c).map_or_else(|| '\u{FFFD}'.to_string(), String::from),
    }
}

/// `\r\n` and lone `\r` become `\n`.
pub fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// All whitespace runs become one space; ends trimmed.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max` characters of `s`, and whether anything was cut.
pub fn take_chars(s: &str, max: usize) -> (&str, bool) {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => (&s[..byte_idx], true),
        None => (s, false),
    }
}

/// Cut to `max` characters and append `marker` when something was removed.
pub fn truncate_with(s: &str, max: usize, marker: &str) -> String {
    match take_chars(s, max) {
        (head, true) => format!("{head}{marker}"),
        (head, false) => head.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn decodes_named_and_numeric() {
        assert_eq!(decode_entities("A &amp; B &lt;3 &#39;x&#x27; &eacute;"), "A & B <3 'x' é");
        assert_eq!(decode_entities("&amp;amp;"), "&amp;");
    }

    #[test]
    fn decodes_unterminated_legacy_references() {
        assert_eq!(decode_entities("A &amp B"), "A & B");
        assert_eq!(decode_entities("&#39"), "'");
        assert_eq!(decode_entities("&#x41B"), "\u{41B}");
        assert_eq!(decode_entities("&copy2024 &ltfoo"), "\u{A9}2024 <foo");
        assert_eq!(decode_entities("&ampx;"), "&x;");
    }

    #[test]
    fn unknown_names_are_kept() {
        assert_eq!(decode_entities("&bogus; & &;"), "&bogus; & &;");
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("&hellip no semicolon"), "&hellip no semicolon");
    }

    #[test]
    fn invalid_code_points_follow_browser_rules() {
        assert_eq!(decode_entities("&#0;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#xD800;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#99999999999;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#x110000;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#150;"), "\u{2013}");
        assert_eq!(decode_entities("a&#1;b"), "ab");
    }

    #[test]
    fn newline_variants() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn collapse() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn take_counts_characters() {
        assert_eq!(take_chars("héllo", 2), ("hé", true));
        assert_eq!(take_chars("hé", 2), ("hé", false));
        assert_eq!(take_chars("", 0), ("", false));
        assert_eq!(truncate_with("abcdef", 3, "..."), "abc...");
        assert_eq!(truncate_with("abc", 3, "..."), "abc");
    }
}
