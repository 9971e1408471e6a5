//! Exports [`Site`], the loaded, read-only content of a project, and the
//! page-level views assembled from it.
//!
//! A [`Site`] is built once by [`Site::load`] and then only read. Every query
//! takes it (or one of its collections) explicitly; there is no global state.

use crate::adjacent::{find_adjacent, Adjacent};
use crate::config::Config;
use crate::entry::{Collection, Entry};
use crate::filter::{filter, FilterCriteria};
use crate::markdown;
use crate::page::{clamp_page, paginate, total_pages};
use crate::parser::Parser;
use crate::related::find_related;
use crate::share::{self, ShareLinks};
use crate::toc::Heading;
use anyhow::{Context, Result};
use std::path::Path;

pub struct Site {
    pub config: Config,
    pub posts: Collection,
    pub projects: Collection,
}

impl Site {
    /// Loads posts and projects from the locations named in `config`.
    pub fn load(config: Config) -> Result<Site> {
        let parser = Parser::new(&config.posts_directory, &config.projects_file);
        let posts = parser.parse_posts().context("Loading posts")?;
        let projects = parser.parse_projects().context("Loading projects")?;
        log::info!(
            "loaded {} posts and {} projects",
            posts.len(),
            projects.len()
        );
        Ok(Site {
            config,
            posts,
            projects,
        })
    }

    /// Finds the nearest `folio.yaml` at or above `dir` and loads the site
    /// it describes.
    pub fn from_directory(dir: &Path) -> Result<Site> {
        Site::load(Config::from_directory(dir)?)
    }

    /// Assembles everything a post page shows. Returns `Ok(None)` for an
    /// unknown slug.
    pub fn post_view(&self, slug: &str) -> share::Result<Option<PostView<'_>>> {
        let post = match self.posts.get(slug) {
            Some(post) => post,
            None => return Ok(None),
        };
        Ok(Some(PostView {
            post,
            reading_time: post.reading_time(self.config.words_per_minute),
            toc: markdown::render(&post.body).headings,
            adjacent: find_adjacent(post, self.posts.entries()),
            related: find_related(post, &self.posts, self.config.related_count),
            share: ShareLinks::new(&self.config.site_url, post)?,
        }))
    }

    /// Assembles a project page. Returns `Ok(None)` for an unknown slug.
    pub fn project_view(&self, slug: &str) -> share::Result<Option<ProjectView<'_>>> {
        let project = match self.projects.get(slug) {
            Some(project) => project,
            None => return Ok(None),
        };
        Ok(Some(ProjectView {
            project,
            related: find_related(project, &self.projects, self.config.related_count),
            share: ShareLinks::new(&self.config.site_url, project)?,
        }))
    }
}

/// A filtered, paginated listing of a collection.
#[derive(Debug)]
pub struct Listing<'a> {
    /// The entries on the requested page.
    pub entries: Vec<&'a Entry>,

    /// The page actually shown, after clamping.
    pub page: usize,

    pub total_pages: usize,

    /// The number of entries that matched the criteria, across all pages.
    pub total_matches: usize,
}

/// Filters `collection` by `criteria` and returns page `page` of the
/// result. Unlike [`paginate`], the requested page is first clamped into
/// range, so asking for page 9 of 2 shows page 2.
pub fn list<'a>(
    collection: &'a Collection,
    criteria: &FilterCriteria,
    page_size: usize,
    page: usize,
) -> Listing<'a> {
    let matches = filter(collection, criteria);
    let page = clamp_page(page, total_pages(matches.len(), page_size));
    let shown = paginate(&matches, page_size, page);
    Listing {
        entries: shown.items.to_vec(),
        page: shown.number,
        total_pages: shown.total_pages,
        total_matches: matches.len(),
    }
}

/// Everything shown on a post page.
#[derive(Debug)]
pub struct PostView<'a> {
    pub post: &'a Entry,
    pub reading_time: String,

    /// The outline of the rendered body; each id is an anchor in
    /// [`markdown::render`]'s output.
    pub toc: Vec<Heading>,
    pub adjacent: Adjacent<'a>,
    pub related: Vec<&'a Entry>,
    pub share: ShareLinks,
}

/// Everything shown on a project page.
#[derive(Debug)]
pub struct ProjectView<'a> {
    pub project: &'a Entry,
    pub related: Vec<&'a Entry>,
    pub share: ShareLinks,
}

#[cfg(test)]
mod test {
    use super::*;

    fn site() -> Result<Site> {
        Site::from_directory(Path::new("./testdata/site"))
    }

    fn slugs(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.slug.clone()).collect()
    }

    #[test]
    fn test_load() -> Result<()> {
        let site = site()?;
        assert_eq!(3, site.posts.len());
        assert_eq!(3, site.projects.len());
        Ok(())
    }

    #[test]
    fn test_post_view() -> Result<()> {
        let site = site()?;
        let view = site.post_view("building-typesafe-api-trpc")?.unwrap();
        assert_eq!("1 min read", view.reading_time);

        let toc: Vec<&str> = view.toc.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(vec!["introduction", "getting-started"], toc);

        assert_eq!(
            Some("mastering-tailwind-css"),
            view.adjacent.previous.map(|e| e.slug.as_str())
        );
        assert_eq!(
            Some("understanding-react-server-components"),
            view.adjacent.next.map(|e| e.slug.as_str())
        );

        // Shares the `Performance` tag with the RSC post; nothing with CSS.
        assert_eq!(
            vec!["understanding-react-server-components"],
            slugs(&view.related)
        );
        assert_eq!(
            "https://example.com/blog/building-typesafe-api-trpc",
            view.share.url.as_str()
        );
        Ok(())
    }

    #[test]
    fn test_post_view_toc_links_into_rendered_body() -> Result<()> {
        let site = site()?;
        for post in &site.posts {
            let view = site.post_view(&post.slug)?.unwrap();
            let html = markdown::render(&post.body).html;
            for heading in &view.toc {
                let anchor = format!(r#"id="{}""#, heading.id);
                assert!(html.contains(&anchor), "{} missing {}", post.slug, anchor);
            }
        }
        Ok(())
    }

    #[test]
    fn test_post_view_uses_supplied_reading_time() -> Result<()> {
        let site = site()?;
        let view = site.post_view("mastering-tailwind-css")?.unwrap();
        assert_eq!("10 min read", view.reading_time);
        assert_eq!(None, view.adjacent.previous);
        Ok(())
    }

    #[test]
    fn test_unknown_slugs() -> Result<()> {
        let site = site()?;
        assert!(site.post_view("nope")?.is_none());
        assert!(site.project_view("nope")?.is_none());
        Ok(())
    }

    #[test]
    fn test_project_view() -> Result<()> {
        let site = site()?;
        let view = site.project_view("personal-blog-platform")?.unwrap();
        assert_eq!(
            vec!["task-tracker-api", "design-system"],
            slugs(&view.related)
        );
        assert_eq!(
            "https://example.com/projects/personal-blog-platform",
            view.share.url.as_str()
        );
        Ok(())
    }

    #[test]
    fn test_list_clamps_page() -> Result<()> {
        let site = site()?;
        let listing = list(&site.posts, &FilterCriteria::default(), 2, 9);
        assert_eq!(2, listing.page);
        assert_eq!(2, listing.total_pages);
        assert_eq!(3, listing.total_matches);
        assert_eq!(vec!["mastering-tailwind-css"], slugs(&listing.entries));

        let none = list(&site.posts, &FilterCriteria::default().tag("Rust"), 6, 1);
        assert_eq!(1, none.page);
        assert_eq!(1, none.total_pages);
        assert!(none.entries.is_empty());
        Ok(())
    }

    #[test]
    fn test_list_filters() -> Result<()> {
        let site = site()?;
        let listing = list(
            &site.projects,
            &FilterCriteria::default().category("Frontend"),
            6,
            1,
        );
        assert_eq!(
            vec!["personal-blog-platform", "design-system"],
            slugs(&listing.entries)
        );
        Ok(())
    }
}
