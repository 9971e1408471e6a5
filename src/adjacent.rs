//! Previous/next navigation between posts in date order.

use crate::entry::{sort_by_date_desc, Entry};

/// The chronological neighbours of an entry.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Adjacent<'a> {
    /// The next-older entry, or `None` if the target is the oldest.
    pub previous: Option<&'a Entry>,

    /// The next-newer entry, or `None` if the target is the newest.
    pub next: Option<&'a Entry>,
}

/// Finds the entries published immediately before and after `target` in
/// `entries`. Entries are ordered by date, newest first, with missing or
/// unparseable dates treated as the oldest; ties keep collection order. If no
/// entry in `entries` has `target`'s slug, both neighbours are `None`.
pub fn find_adjacent<'a>(target: &Entry, entries: &'a [Entry]) -> Adjacent<'a> {
    let sorted = sort_by_date_desc(entries);
    match sorted.iter().position(|e| e.slug == target.slug) {
        None => Adjacent::default(),
        Some(i) => Adjacent {
            previous: sorted.get(i + 1).copied(),
            next: match i {
                0 => None,
                _ => Some(sorted[i - 1]),
            },
        },
    }
}
