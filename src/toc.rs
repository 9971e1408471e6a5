//! Table-of-contents extraction from raw markdown.
//!
//! Only second- and third-level headings make it into the outline: the post
//! title is the page's only `#` heading, and anything deeper than `###` is
//! too fine-grained for a sidebar.

use crate::slug::slugify;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]+(.+)$").expect("valid heading regex"));

/// The heading levels included in a table of contents.
pub const TOC_LEVELS: RangeInclusive<usize> = 2..=3;

/// The id given to headings whose text has nothing to slugify.
const FALLBACK_ID: &str = "heading";

/// One entry in a table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// The anchor id, without the leading `#`.
    pub id: String,

    /// The heading text as written, trimmed.
    pub text: String,

    /// The heading level (2 for `##`, 3 for `###`).
    pub level: usize,
}

/// Hands out anchor ids in document order. The first heading that slugifies
/// to `foo` gets `foo`, the second `foo-2`, the third `foo-3`, and so on,
/// skipping any candidate that was already issued or claimed.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: HashSet<String>,
    last_suffix: HashMap<String, usize>,
}

impl IdAllocator {
    pub fn new() -> IdAllocator {
        IdAllocator::default()
    }

    /// Marks `id` as taken without deriving it from text, so later calls to
    /// [`IdAllocator::allocate`] never return it. Returns `false` if it was
    /// already taken.
    pub fn claim(&mut self, id: &str) -> bool {
        self.issued.insert(id.to_owned())
    }

    /// Returns a document-unique id for `text`.
    pub fn allocate(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = FALLBACK_ID.to_owned();
        }
        let suffix = self.last_suffix.entry(base.clone()).or_insert(1);
        let mut id = base.clone();
        while self.issued.contains(&id) {
            *suffix += 1;
            id = format!("{}-{}", base, suffix);
        }
        self.issued.insert(id.clone());
        id
    }
}

/// Scans `markdown` for ATX headings (`## Text`) and returns the level 2 and
/// level 3 headings in document order. Returns an empty vector when there is
/// nothing to show.
///
/// The scan is purely line-based: a `## ` line inside a fenced code block is
/// still treated as a heading.
pub fn extract_toc(markdown: &str) -> Vec<Heading> {
    let mut ids = IdAllocator::new();
    HEADING_RE
        .captures_iter(markdown)
        .filter_map(|caps| {
            let level = caps[1].len();
            if !TOC_LEVELS.contains(&level) {
                return None;
            }
            let text = caps[2].trim().to_owned();
            Some(Heading {
                id: ids.allocate(&text),
                text,
                level,
            })
        })
        .collect()
}
