//! Splits a listing into fixed-size, 1-indexed pages.

/// The number of entries per listing page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// One page of a listing.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// The items on this page. Empty when the page number is out of range.
    pub items: &'a [T],

    /// The 1-indexed page number that was requested.
    pub number: usize,

    /// The number of pages in the listing. Never zero: an empty listing has
    /// one empty page.
    pub total_pages: usize,

    /// The number of items across all pages.
    pub total_items: usize,

    /// The previous page number, if `number` is in range and not the first.
    pub prev: Option<usize>,

    /// The next page number, if `number` is in range and not the last.
    pub next: Option<usize>,
}

impl<T> Page<'_, T> {
    /// Returns `true` if the requested page exists.
    pub fn in_range(&self) -> bool {
        (1..=self.total_pages).contains(&self.number)
    }
}

/// Returns the number of pages needed to show `len` items `page_size` at a
/// time. An empty listing (or a zero page size) still has one page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    match len % page_size {
        0 => (len / page_size).max(1),
        _ => len / page_size + 1,
    }
}

/// Clamps a requested page number into `[1, total_pages]`.
pub fn clamp_page(page_number: usize, total_pages: usize) -> usize {
    page_number.max(1).min(total_pages.max(1))
}

/// Returns page `page_number` (1-indexed) of `items`. Page numbers outside
/// `[1, total_pages]` produce an empty page rather than an error; callers
/// that want the nearest real page should [`clamp_page`] first.
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> Page<'_, T> {
    let total_pages = total_pages(items.len(), page_size);
    let in_range = (1..=total_pages).contains(&page_number);

    let start = page_number
        .checked_sub(1)
        .and_then(|i| i.checked_mul(page_size))
        .unwrap_or(usize::MAX);
    let page_items = match items.get(start..) {
        Some(rest) if in_range => &rest[..page_size.min(rest.len())],
        _ => &items[..0],
    };

    Page {
        items: page_items,
        number: page_number,
        total_pages,
        total_items: items.len(),
        prev: match in_range && page_number > 1 {
            true => Some(page_number - 1),
            false => None,
        },
        next: match in_range && page_number < total_pages {
            true => Some(page_number + 1),
            false => None,
        },
    }
}

/// Returns every page of `items`, first to last.
pub fn pages<T>(items: &[T], page_size: usize) -> impl Iterator<Item = Page<'_, T>> {
    let total_pages = total_pages(items.len(), page_size);
    (1..=total_pages).map(move |n| paginate(items, page_size, n))
}
