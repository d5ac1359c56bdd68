//! Plain-text helpers for CMS-supplied HTML.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&(nbsp|amp|quot|#39|lt|gt);").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const WORDS_PER_MINUTE: f64 = 200.0;

/// Removes tags and the handful of entities WordPress emits, collapsing
/// whitespace.
///
/// The pass is repeated until the text stops changing, so decoded entities
/// that form new markup are stripped as well and the result is a fixed point.
pub fn strip_html(html: &str) -> String {
    let mut current = strip_once(html);

    loop {
        let next = strip_once(&current);

        if next == current {
            return current;
        }

        current = next;
    }
}

fn strip_once(html: &str) -> String {
    let no_tags = TAG.replace_all(html, " ");

    let decoded = ENTITY.replace_all(&no_tags, |caps: &Captures<'_>| match &caps[1] {
        "nbsp" => " ",
        "amp" => "&",
        "quot" => "\"",
        "#39" => "'",
        "lt" => "<",
        _ => ">",
    });

    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// First sentence of the stripped text, or all of it when there is no period.
pub fn excerpt(html: &str) -> String {
    let clean = strip_html(html);

    match clean.find('.') {
        Some(dot) => clean[..=dot].trim().to_string(),
        None => clean,
    }
}

/// Estimated minutes to read `text`, never less than one.
pub fn reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();

    ((words as f64 / WORDS_PER_MINUTE).round() as u32).max(1)
}
