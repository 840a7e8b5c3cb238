//! Value validators for features whose literal argument matters
//!
//! A validator receives the raw source text of the value (quotes included for
//! string literals) and answers whether it is acceptable. Validators are
//! attached to individual [`FeatureTable`](crate::FeatureTable)s and only run
//! for the handful of features that need them.

/// A predicate over the raw text of a value
pub type Validator = fn(&str) -> bool;

/// Strip one level of matching single or double quotes
pub fn strip_quotes(raw: &str) -> &str {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' || first == b'"') && first == last {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// `declare(ticks=N)`: N must be an integer literal
pub fn valid_ticks(raw: &str) -> bool {
    let value = raw.trim();
    value.bytes().next().is_some_and(|b| b.is_ascii_digit())
        && value.bytes().all(|b| b.is_ascii_digit() || b == b'_')
}

/// `declare(strict_types=N)`: N must be 0 or 1
pub fn valid_strict_types(raw: &str) -> bool {
    matches!(raw.trim(), "0" | "1")
}

/// Character encodings PHP's `declare(encoding=...)` accepts (mbstring names)
const KNOWN_ENCODINGS: &[&str] = &[
    "ascii", "us-ascii", "utf-8", "utf8", "utf-16", "utf-16be", "utf-16le", "utf-32",
    "utf-32be", "utf-32le", "ucs-2", "ucs-2be", "ucs-2le", "ucs-4", "ucs-4be", "ucs-4le",
    "iso-8859-1", "iso-8859-2", "iso-8859-3", "iso-8859-4", "iso-8859-5", "iso-8859-6",
    "iso-8859-7", "iso-8859-8", "iso-8859-9", "iso-8859-10", "iso-8859-13", "iso-8859-14",
    "iso-8859-15", "iso-8859-16", "latin1", "euc-jp", "eucjp-win", "sjis", "sjis-win",
    "shift_jis", "cp932", "cp51932", "iso-2022-jp", "jis", "euc-cn", "cp936", "gb18030",
    "hz", "euc-tw", "big-5", "big5", "cp950", "euc-kr", "uhc", "cp949", "iso-2022-kr",
    "windows-1250", "windows-1251", "windows-1252", "windows-1254", "cp1250", "cp1251",
    "cp1252", "cp866", "koi8-r", "koi8-u", "armscii-8", "utf-7", "utf7-imap", "8bit",
    "7bit", "base64", "html-entities", "quoted-printable",
];

/// `declare(encoding='...')`: must name an encoding PHP knows
pub fn valid_encoding(raw: &str) -> bool {
    let value = strip_quotes(raw);
    if value.len() == raw.trim().len() {
        // Not a string literal
        return false;
    }
    let value = value.to_ascii_lowercase();
    KNOWN_ENCODINGS.contains(&value.as_str())
}

/// mbstring regex option strings must not use the `e` (eval) modifier,
/// which was removed in PHP 8.0 after its deprecation in 7.1
pub fn valid_mbstring_options(raw: &str) -> bool {
    let trimmed = raw.trim();
    let value = strip_quotes(trimmed);
    if value.len() == trimmed.len() {
        // A variable or expression; nothing to judge
        return true;
    }
    !value.contains('e')
}
