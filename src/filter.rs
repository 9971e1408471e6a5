//! Narrows a list of entries down by free-text search, category, and tag.

use crate::entry::Entry;

/// The constraints a reader can apply to a listing. Every field is optional,
/// and an empty string means the same thing as `None`: no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against the title or summary.
    pub search: Option<String>,

    /// Exact category label.
    pub category: Option<String>,

    /// Exact, case-sensitive tag label.
    pub tag: Option<String>,
}

impl FilterCriteria {
    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(search.to_owned());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_owned());
        self
    }

    /// Returns `true` if no criterion is set.
    pub fn is_empty(&self) -> bool {
        non_empty(&self.search).is_none()
            && non_empty(&self.category).is_none()
            && non_empty(&self.tag).is_none()
    }

    /// Returns `true` if `entry` satisfies every criterion that is set.
    pub fn matches(&self, entry: &Entry) -> bool {
        let matches_search = match non_empty(&self.search) {
            None => true,
            Some(search) => {
                let needle = search.to_lowercase();
                entry.title.to_lowercase().contains(&needle)
                    || entry.summary.to_lowercase().contains(&needle)
            }
        };
        let matches_category = match non_empty(&self.category) {
            None => true,
            Some(category) => entry.has_category(category),
        };
        let matches_tag = match non_empty(&self.tag) {
            None => true,
            Some(tag) => entry.has_tag(tag),
        };
        matches_search && matches_category && matches_tag
    }
}

fn non_empty(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|s| !s.is_empty())
}

/// Returns the entries matching `criteria`, in their original order.
pub fn filter<'a, I>(entries: I, criteria: &FilterCriteria) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().filter(|e| criteria.matches(e)).collect()
}
