//! Picks "you might also like" entries for an entry page.

use crate::entry::Entry;

/// How many related entries an entry page shows by default.
pub const DEFAULT_RELATED_COUNT: usize = 3;

/// Returns up to `count` entries from `entries` that share at least one
/// category or at least one tag with `target`. `target` itself (matched by
/// slug) is never included. Results keep collection order; there is no
/// relevance ranking.
pub fn find_related<'a, I>(target: &Entry, entries: I, count: usize) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries
        .into_iter()
        .filter(|e| e.slug != target.slug && shares_label(target, e))
        .take(count)
        .collect()
}

fn shares_label(a: &Entry, b: &Entry) -> bool {
    a.categories.iter().any(|c| b.has_category(c)) || a.tags.iter().any(|t| b.has_tag(t))
}
