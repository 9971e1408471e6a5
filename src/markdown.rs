//! Renders post and project bodies from markdown to HTML.
//!
//! Second- and third-level headings get anchor ids so the table of contents
//! can link to them. Headings written with an explicit id
//! (`## Setup {#setup}`) keep it; every other one is given the same id
//! [`crate::toc::extract_toc`] would give it (`setup`, `setup-2`, ...),
//! skipping any id already written explicitly elsewhere in the document.

use crate::toc::{Heading, IdAllocator, TOC_LEVELS};
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag};

/// The output of [`render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    /// The rendered HTML fragment.
    pub html: String,

    /// The level 2 and 3 headings in document order, carrying the ids that
    /// were actually emitted into `html`.
    pub headings: Vec<Heading>,
}

/// Converts `markdown` to HTML with GitHub-style extensions (tables,
/// footnotes, strikethrough, task lists), smart punctuation, and heading
/// attributes enabled.
pub fn render(markdown: &str) -> Rendered {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let events: Vec<Event> = Parser::new_ext(markdown, options).collect();
    let headings = outline(&events);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, with_heading_ids(events, &headings));
    Rendered {
        html: out,
        headings,
    }
}

fn level_number(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn in_toc(level: HeadingLevel) -> bool {
    TOC_LEVELS.contains(&level_number(level))
}

/// Collects the table-of-contents headings (text and final id) from a parsed
/// event stream.
fn outline(events: &[Event]) -> Vec<Heading> {
    // (level, explicit id, text) per heading, in document order
    let mut found: Vec<(usize, Option<&str>, String)> = Vec::new();
    let mut current: Option<(usize, Option<&str>, String)> = None;

    for ev in events {
        match ev {
            Event::Start(Tag::Heading(level, id, _)) if in_toc(*level) => {
                current = Some((level_number(*level), *id, String::new()));
            }
            Event::End(Tag::Heading(..)) => {
                if let Some((level, id, text)) = current.take() {
                    found.push((level, id, text.trim().to_owned()));
                }
            }
            Event::Text(s) | Event::Code(s) => {
                if let Some((_, _, text)) = current.as_mut() {
                    text.push_str(s);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, _, text)) = current.as_mut() {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }

    let mut ids = IdAllocator::new();
    for (_, id, _) in &found {
        if let Some(id) = id {
            ids.claim(id);
        }
    }
    found
        .into_iter()
        .map(|(level, id, text)| Heading {
            id: match id {
                Some(id) => id.to_owned(),
                None => ids.allocate(&text),
            },
            text,
            level,
        })
        .collect()
}

/// Rewrites the table-of-contents heading tags in `events` so each carries
/// the id from the corresponding entry of `headings`.
fn with_heading_ids<'a>(
    events: Vec<Event<'a>>,
    headings: &'a [Heading],
) -> impl Iterator<Item = Event<'a>> {
    let mut ids = headings.iter().map(|h| h.id.as_str());
    events.into_iter().map(move |ev| match ev {
        Event::Start(Tag::Heading(level, id, classes)) if in_toc(level) => {
            Event::Start(Tag::Heading(level, ids.next().or(id), classes))
        }
        ev => ev,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_heading_ids() {
        let rendered = render("# Title\n\n## Intro\n\ntext\n\n### Setup {#custom}\n\n#### Deep\n\n## Intro\n");
        assert!(rendered.html.contains(r#"<h2 id="intro">Intro</h2>"#));
        assert!(rendered.html.contains(r#"<h3 id="custom">"#));
        assert!(rendered.html.contains(r#"<h2 id="intro-2">Intro</h2>"#));
        assert!(rendered.html.contains("<h1>Title</h1>"));
        assert!(rendered.html.contains("<h4>Deep</h4>"));

        let ids: Vec<&str> = rendered.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(vec!["intro", "custom", "intro-2"], ids);
        let levels: Vec<usize> = rendered.headings.iter().map(|h| h.level).collect();
        assert_eq!(vec![2, 3, 2], levels);
    }

    #[test]
    fn test_render_ids_match_extracted_toc() {
        let markdown = "## Intro 2\n\n## Intro\n\n### Details\n\n## Intro\n";
        let rendered = render(markdown);
        assert_eq!(crate::toc::extract_toc(markdown), rendered.headings);
        for heading in &rendered.headings {
            assert!(rendered.html.contains(&format!(r#"id="{}""#, heading.id)));
        }
    }

    #[test]
    fn test_render_explicit_id_is_not_reused() {
        let rendered = render("## Setup\n\n## Later {#setup}\n");
        let ids: Vec<&str> = rendered.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(vec!["setup-2", "setup"], ids);
    }

    #[test]
    fn test_render_heading_text_includes_code() {
        let rendered = render("## Using `cargo test` Well\n");
        assert_eq!("Using cargo test Well", rendered.headings[0].text);
        assert_eq!("using-cargo-test-well", rendered.headings[0].id);
    }

    #[test]
    fn test_render_body() {
        let rendered = render("Some *emphasis* and a [link](https://example.com).\n\n- [x] done\n");
        assert!(rendered.html.contains("<em>emphasis</em>"));
        assert!(rendered.html.contains(r#"<a href="https://example.com">link</a>"#));
        assert!(rendered.html.contains("checkbox"));
        assert!(rendered.headings.is_empty());
    }

    #[test]
    fn test_render_code_block_is_not_a_heading() {
        let rendered = render("```sh\n## not a heading\n```\n");
        assert!(rendered.headings.is_empty());
        assert!(rendered.html.contains("## not a heading"));
    }
}
