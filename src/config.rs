//! Loads the project configuration from `folio.yaml`.

use crate::page::DEFAULT_PAGE_SIZE;
use crate::reading::DEFAULT_WORDS_PER_MINUTE;
use crate::related::DEFAULT_RELATED_COUNT;
use crate::util::open;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "folio.yaml";

const DEFAULT_FEATURED_COUNT: usize = 3;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct Project {
    title: String,

    #[serde(default)]
    description: String,

    site_url: Url,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default = "default_page_size")]
    posts_per_page: usize,

    #[serde(default = "default_words_per_minute")]
    words_per_minute: u32,

    #[serde(default = "default_related_count")]
    related_count: usize,

    #[serde(default = "default_featured_count")]
    featured_count: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_words_per_minute() -> u32 {
    DEFAULT_WORDS_PER_MINUTE
}

fn default_related_count() -> usize {
    DEFAULT_RELATED_COUNT
}

fn default_featured_count() -> usize {
    DEFAULT_FEATURED_COUNT
}

/// The resolved configuration for a site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub title: String,
    pub description: String,
    pub site_url: Url,
    pub author: Option<Author>,

    /// The directory containing post markdown files (`{root}/posts`).
    pub posts_directory: PathBuf,

    /// The project catalog (`{root}/projects.yaml`).
    pub projects_file: PathBuf,

    /// The number of entries per listing page.
    pub posts_per_page: usize,

    /// The reading rate used when a post doesn't state its reading time.
    pub words_per_minute: u32,

    /// How many related entries to show on an entry page.
    pub related_count: usize,

    /// How many featured projects to show on the home page.
    pub featured_count: usize,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a `folio.yaml` and
    /// loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path).context("Loading configuration")
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads the project file at `path`. Content paths are resolved relative
    /// to the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)
            .with_context(|| format!("Parsing project file `{}`", path.display()))?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        if project.posts_per_page == 0 {
            return Err(anyhow!("`posts_per_page` must be at least 1"));
        }
        log::debug!("loaded project `{}` from {}", project.title, path.display());
        Ok(Config {
            title: project.title,
            description: project.description,
            site_url: project.site_url,
            author: project.author,
            posts_directory: project_root.join("posts"),
            projects_file: project_root.join("projects.yaml"),
            posts_per_page: project.posts_per_page,
            words_per_minute: project.words_per_minute,
            related_count: project.related_count,
            featured_count: project.featured_count,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        let config = Config::from_directory(Path::new("./testdata/site/posts"))?;
        assert_eq!("Developer Notes", config.title);
        assert_eq!("https://example.com/", config.site_url.as_str());
        assert_eq!(Path::new("./testdata/site/posts"), config.posts_directory);
        assert_eq!(Path::new("./testdata/site/projects.yaml"), config.projects_file);
        assert_eq!(
            Some(Author {
                name: "Jane Doe".to_owned(),
                email: None
            }),
            config.author
        );
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = Config::from_project_file(Path::new("./testdata/site/folio.yaml"))?;
        assert_eq!(6, config.posts_per_page);
        assert_eq!(200, config.words_per_minute);
        assert_eq!(3, config.related_count);
        assert_eq!(3, config.featured_count);
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let config = Config::from_project_file(Path::new("./testdata/tuned/folio.yaml"))?;
        assert_eq!(2, config.posts_per_page);
        assert_eq!(100, config.words_per_minute);
        assert_eq!(1, config.related_count);
        Ok(())
    }

    #[test]
    fn test_missing_site_url() {
        assert!(Config::from_project_file(Path::new("./testdata/broken/folio.yaml")).is_err());
    }
}
