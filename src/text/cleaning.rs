//! Whitespace, hyphenation and serial-number cleanup.
//!
//! Extracted text carries layout residue: line-break hyphens ("Govern-\nment"),
//! hard newlines inside paragraphs, runs of spaces from justified text, and
//! list serials ("3. ") in front of headings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref LEADING_SERIAL: Regex = Regex::new(r"^\d+[.)]\s*").unwrap();
}

/// Collapse every whitespace run to a single space and trim the ends.
///
/// # Examples
///
/// ```
/// use outline_oxide::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Menu \t Planning \n"), "Menu Planning");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Clean a paragraph of extracted text.
///
/// Line-break hyphens are joined, remaining newlines become spaces, and
/// whitespace is collapsed.
///
/// # Examples
///
/// ```
/// use outline_oxide::text::clean_text;
///
/// assert_eq!(clean_text("Govern-\nment  policy\nchanges"), "Government policy changes");
/// ```
pub fn clean_text(text: &str) -> String {
    let joined = text.replace("-\n", "").replace('\n', " ");
    collapse_whitespace(&joined)
}

/// Remove a leading serial number such as `"3. "` or `"12) "`.
///
/// # Examples
///
/// ```
/// use outline_oxide::text::strip_serial;
///
/// assert_eq!(strip_serial("3. Methodology"), "Methodology");
/// assert_eq!(strip_serial("3.1 Data"), "3.1 Data");
/// ```
pub fn strip_serial(text: &str) -> String {
    LEADING_SERIAL.replace(text, "").into_owned()
}

/// True when the text has at least two letters and none of them lowercase.
pub fn is_all_caps(text: &str) -> bool {
    let mut letters = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        if c.is_lowercase() {
            return false;
        }
        letters += 1;
    }
    letters >= 2
}
