//! Estimates how long a markdown document takes to read.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// The reading rate used when the caller (or the project config) doesn't
/// provide one.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

static FENCED_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("valid fenced code regex"));
static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]*`").expect("valid inline code regex"));
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid image regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid link regex"));
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#*>]").expect("valid markdown marker regex"));

/// The result of a reading time estimate. Its [`fmt::Display`]
/// implementation produces the label shown to readers (e.g. `"3 min read"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadingTime {
    /// The number of words left after markup was stripped.
    pub words: usize,

    /// Whole minutes, rounded up. Always at least 1.
    pub minutes: usize,
}

impl ReadingTime {
    /// Estimates the reading time of `content` at `words_per_minute`. A rate
    /// of zero is treated as one word per minute.
    pub fn estimate(content: &str, words_per_minute: u32) -> ReadingTime {
        let words = count_words(content);
        let rate = words_per_minute.max(1) as usize;
        let minutes = (words + rate - 1) / rate;
        ReadingTime {
            words,
            minutes: minutes.max(1),
        }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

/// Returns the reading time label for `content`, e.g. `"1 min read"` or
/// `"4 min read"`. Degenerate input (empty or whitespace-only) always yields
/// `"1 min read"`.
pub fn estimate_reading_time(content: &str, words_per_minute: u32) -> String {
    ReadingTime::estimate(content, words_per_minute).to_string()
}

/// Strips markdown markup from `content` and returns what remains as plain
/// prose. Code (fenced and inline) and images are dropped entirely, links are
/// reduced to their labels, and heading, emphasis, and blockquote markers are
/// removed wherever they occur. Images are removed before links are
/// unwrapped, so `![alt](src)` leaves nothing behind.
pub fn strip_markdown(content: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(content, "");
    let text = INLINE_CODE_RE.replace_all(&text, "");
    // Images go before links; otherwise the link pattern would eat the
    // `[alt](src)` half of every image and leave a stray `!alt` word behind.
    let text = IMAGE_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    MARKER_RE.replace_all(&text, "").into_owned()
}

fn count_words(content: &str) -> usize {
    strip_markdown(content).split_whitespace().count()
}
