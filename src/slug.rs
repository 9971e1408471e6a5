//! Converts free text into URL- and anchor-safe identifiers.

/// Lowercases `text` and replaces every maximal run of characters outside
/// `[a-z0-9]` with a single hyphen, trimming hyphens from both ends. Empty
/// input (or input with no ASCII alphanumerics) yields an empty string.
///
/// The mapping is not injective: `"C++"` and `"C"` both become `"c"`, and
/// two headings with the same words but different punctuation collapse to
/// the same slug. Callers that need unique ids must disambiguate (see
/// [`crate::toc::extract_toc`]).
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod test {
    use super::*;

    fn is_well_formed(slug: &str) -> bool {
        slug.is_empty()
            || slug.split('-').all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            })
    }

    #[test]
    fn test_slugify_punctuation_and_digits() {
        assert_eq!("hello-world-2024", slugify("Hello, World! 2024"));
    }

    #[test]
    fn test_slugify_trims_and_collapses() {
        assert_eq!("a-b", slugify("--A   ---  b!!"));
        assert_eq!("next-js", slugify("  Next.js  "));
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!("", slugify(""));
        assert_eq!("", slugify("?!  ..."));
    }

    #[test]
    fn test_slugify_non_ascii_is_a_separator() {
        assert_eq!("caf-cr-me", slugify("Café Crème"));
    }

    #[test]
    fn test_slugify_collisions_are_possible() {
        assert_eq!(slugify("C++"), slugify("C"));
        assert_eq!(slugify("Getting Started"), slugify("Getting-Started!"));
    }

    #[test]
    fn test_slugify_shape() {
        for input in &[
            "Hello, World! 2024",
            "  leading and trailing  ",
            "UPPER_snake_Case",
            "tabs\tand\nnewlines",
            "émoji 🚀 rocket",
            "",
        ] {
            let slug = slugify(input);
            assert_eq!(slug, slugify(input));
            assert!(is_well_formed(&slug), "malformed slug {:?}", slug);
        }
    }
}
