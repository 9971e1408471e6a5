//! Defines the [`Entry`] type, the uniform shape that blog posts and projects
//! are normalized into when they are loaded, and [`Collection`], the
//! immutable, ordered set of entries that every query runs against.

use chrono::{DateTime, NaiveDate};
use std::collections::HashMap;
use std::fmt;

/// Distinguishes the two kinds of content the site publishes. The kind only
/// matters for presentation (e.g., URL prefixes); filtering and relatedness
/// treat both kinds the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Post,
    Project,
}

impl EntryKind {
    /// The path segment under which entries of this kind are published.
    pub fn path_segment(self) -> &'static str {
        match self {
            EntryKind::Post => "blog",
            EntryKind::Project => "projects",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntryKind::Post => write!(f, "post"),
            EntryKind::Project => write!(f, "project"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub image: Option<String>,
}

/// External links shown on a project page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Links {
    pub github: Option<String>,
    pub live: Option<String>,
}

/// A blog post or a project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,

    /// The display name. Never empty.
    pub title: String,

    /// The lookup key. Unique within a [`Collection`].
    pub slug: String,

    /// Classification labels. Posts carry exactly one; projects carry any
    /// number.
    pub categories: Vec<String>,

    /// Free-form labels used for filtering and relatedness. For projects
    /// these are the technologies used.
    pub tags: Vec<String>,

    /// An ISO-8601 date (a post's publication date or a project's
    /// completion date). Only used for ordering.
    pub date: Option<String>,

    /// A post's excerpt or a project's short description.
    pub summary: String,

    /// Raw markdown: a post's content or a project's long description.
    pub body: String,

    /// A reading time label supplied by the author, if any. See
    /// [`Entry::reading_time`].
    pub reading_time: Option<String>,

    pub author: Option<Author>,
    pub cover_image: Option<String>,
    pub links: Links,
    pub featured: bool,
}

impl Entry {
    /// Creates an entry with only the required fields populated.
    pub fn new(kind: EntryKind, title: &str, slug: &str) -> Entry {
        Entry {
            kind,
            title: title.to_owned(),
            slug: slug.to_owned(),
            categories: Vec::new(),
            tags: Vec::new(),
            date: None,
            summary: String::new(),
            body: String::new(),
            reading_time: None,
            author: None,
            cover_image: None,
            links: Links::default(),
            featured: false,
        }
    }

    /// Parses [`Entry::date`] as a calendar date. Accepts plain dates
    /// (`2024-02-20`) and RFC 3339 timestamps. Returns `None` for missing or
    /// unparseable dates.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(date)
                    .ok()
                    .map(|dt| dt.naive_utc().date())
            })
    }

    /// Returns the author-supplied reading time label if there is one,
    /// otherwise estimates it from the body.
    pub fn reading_time(&self, words_per_minute: u32) -> String {
        match &self.reading_time {
            Some(label) => label.clone(),
            None => crate::reading::estimate_reading_time(&self.body, words_per_minute),
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A distinct label (category or tag) together with the number of entries
/// that carry it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub name: String,
    pub count: usize,
}

/// An ordered, immutable sequence of [`Entry`] values with unique slugs.
/// Collections are built once at load time; every query returns new derived
/// sequences that borrow from it.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    entries: Vec<Entry>,
    by_slug: HashMap<String, usize>,
}

impl Collection {
    /// Builds a collection, preserving the order of `entries`. Returns the
    /// offending slug if two entries share one.
    pub fn new(entries: Vec<Entry>) -> Result<Collection, DuplicateSlug> {
        let mut by_slug = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if by_slug.insert(entry.slug.clone(), i).is_some() {
                return Err(DuplicateSlug(entry.slug.clone()));
            }
        }
        Ok(Collection { entries, by_slug })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Looks up an entry by slug.
    pub fn get(&self, slug: &str) -> Option<&Entry> {
        self.by_slug.get(slug).map(|&i| &self.entries[i])
    }

    /// Returns up to `count` featured entries in collection order.
    pub fn featured(&self, count: usize) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.featured).take(count).collect()
    }

    /// Returns the entries sorted by date, newest first. Entries with missing
    /// or unparseable dates sort last; ties keep collection order.
    pub fn sorted_by_date(&self) -> Vec<&Entry> {
        sort_by_date_desc(&self.entries)
    }

    /// The distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<Term> {
        terms(self.entries.iter().flat_map(|e| e.categories.iter()))
    }

    /// The distinct tags in first-seen order.
    pub fn tags(&self) -> Vec<Term> {
        terms(self.entries.iter().flat_map(|e| e.tags.iter()))
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Returns references to `entries` sorted by date, newest first. Missing or
/// unparseable dates sort as the oldest. The sort is stable and `entries` is
/// left untouched.
pub fn sort_by_date_desc(entries: &[Entry]) -> Vec<&Entry> {
    let mut keyed: Vec<(Option<NaiveDate>, &Entry)> =
        entries.iter().map(|e| (e.parsed_date(), e)).collect();
    // `None < Some(_)`, so reversing the comparison puts undated entries last.
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, e)| e).collect()
}

fn terms<'a>(labels: impl Iterator<Item = &'a String>) -> Vec<Term> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut terms: Vec<Term> = Vec::new();
    for label in labels {
        match index.get(label.as_str()) {
            Some(&i) => terms[i].count += 1,
            None => {
                index.insert(label.as_str(), terms.len());
                terms.push(Term {
                    name: label.clone(),
                    count: 1,
                });
            }
        }
    }
    terms
}

/// Returned by [`Collection::new`] when two entries share a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSlug(pub String);

impl fmt::Display for DuplicateSlug {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "duplicate slug `{}`", self.0)
    }
}

impl std::error::Error for DuplicateSlug {}
