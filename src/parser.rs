//! Defines the [`Parser`] and [`Error`] types, which load posts and projects
//! from a content directory into [`Collection`]s.
//!
//! Posts and projects are stored differently on disk: each post is a
//! markdown file with YAML frontmatter, while projects live together in a
//! single YAML catalog. Both are normalized into [`Entry`] values here, so
//! nothing downstream needs to know which kind it is looking at. A post's
//! single `category` becomes a one-element category list, and a project's
//! `technologies` become its tags.

use std::{
    fmt,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer};
use walkdir::WalkDir;

use crate::entry::{Author, Collection, DuplicateSlug, Entry, EntryKind, Links};

const MARKDOWN_EXTENSION: &str = "md";
const BUNDLE_INDEX: &str = "index.md";

/// Loads [`Entry`] collections from source files.
pub struct Parser<'a> {
    /// The directory searched (recursively) for post files.
    posts_directory: &'a Path,

    /// The YAML project catalog.
    projects_file: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(posts_directory: &'a Path, projects_file: &'a Path) -> Parser<'a> {
        Parser {
            posts_directory,
            projects_file,
        }
    }

    /// Searches the posts directory for post files and returns them as a
    /// [`Collection`] sorted by date (most recent first). A post is either a
    /// `{slug}.md` file or a bundle directory `{slug}/index.md`. Each file
    /// must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with `title` and optionally `slug`, `date`,
    ///    `category`, `tags`, `excerpt`, `readingTime`, `author`,
    ///    `coverImage`, and `featured`
    /// 3. Terminal frontmatter fence (`---`) on its own line
    /// 4. Post body in markdown
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2024-04-16
    /// category: Meta
    /// tags: [greet]
    /// ---
    /// ## Hello
    ///
    /// World
    /// ```
    ///
    /// Other markdown files inside a bundle directory are skipped. A missing
    /// posts directory yields an empty collection.
    pub fn parse_posts(&self) -> Result<Collection> {
        if !self.posts_directory.is_dir() {
            log::warn!(
                "posts directory {} does not exist; no posts loaded",
                self.posts_directory.display()
            );
            return Ok(Collection::default());
        }

        let mut posts = Vec::new();
        for result in WalkDir::new(self.posts_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().map_or(true, |ext| ext != MARKDOWN_EXTENSION)
            {
                continue;
            }
            if self.inside_bundle(path) {
                log::debug!("skipping {}: not a bundle's index", path.display());
                continue;
            }
            posts.push(self.parse_post(path)?);
        }

        posts.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
        log::debug!(
            "loaded {} posts from {}",
            posts.len(),
            self.posts_directory.display()
        );
        Ok(Collection::new(posts)?)
    }

    /// Reports whether `path` is a markdown file other than `index.md` inside
    /// a bundle directory (at any depth). Such files hold drafts or notes
    /// belonging to the bundle, not posts of their own.
    fn inside_bundle(&self, path: &Path) -> bool {
        path.ancestors()
            .skip(1)
            .take_while(|dir| *dir != self.posts_directory)
            .any(|dir| {
                let index = dir.join(BUNDLE_INDEX);
                index != path && index.is_file()
            })
    }

    /// Parses a single post file. Errors are annotated with the file path.
    pub fn parse_post(&self, path: &Path) -> Result<Entry> {
        match Self::_parse_post(path) {
            Ok(post) => Ok(post),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(path: &Path) -> Result<Entry> {
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let (yaml, body) = split_frontmatter(&contents)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(yaml)?;

        let slug = match frontmatter.slug {
            Some(slug) => slug,
            None => default_slug(path).ok_or_else(|| Error::InvalidFileName(path.to_owned()))?,
        };
        if frontmatter.title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }

        let mut post = Entry::new(EntryKind::Post, &frontmatter.title, &slug);
        post.categories = frontmatter.category;
        post.tags = frontmatter.tags;
        post.date = frontmatter.date;
        post.summary = frontmatter.excerpt;
        post.body = body.to_owned();
        post.reading_time = frontmatter.reading_time;
        post.author = frontmatter.author.map(AuthorRecord::into_author);
        post.cover_image = frontmatter.cover_image;
        post.featured = frontmatter.featured;
        Ok(post)
    }

    /// Loads the project catalog, keeping catalog order. A missing catalog
    /// yields an empty collection.
    pub fn parse_projects(&self) -> Result<Collection> {
        if !self.projects_file.is_file() {
            log::debug!(
                "no project catalog at {}; no projects loaded",
                self.projects_file.display()
            );
            return Ok(Collection::default());
        }

        let annotate = |e: Error| {
            Error::Annotated(
                format!("parsing projects `{}`", self.projects_file.display()),
                Box::new(e),
            )
        };
        let file = File::open(self.projects_file).map_err(|e| annotate(e.into()))?;
        let records: Vec<ProjectRecord> =
            serde_yaml::from_reader(file).map_err(|e| annotate(e.into()))?;

        let mut projects = Vec::with_capacity(records.len());
        for record in records {
            if record.title.trim().is_empty() {
                return Err(annotate(Error::EmptyTitle));
            }
            projects.push(record.into_entry());
        }
        log::debug!(
            "loaded {} projects from {}",
            projects.len(),
            self.projects_file.display()
        );
        Ok(Collection::new(projects)?)
    }
}

/// Splits a post source file into its YAML frontmatter and markdown body.
fn split_frontmatter(input: &str) -> Result<(&str, &str)> {
    const FENCE: &str = "---";
    let input = input.trim_start_matches('\u{feff}');
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    let rest = &input[FENCE.len()..];
    match rest.find("\n---") {
        None => Err(Error::FrontmatterMissingEndFence),
        Some(offset) => {
            let yaml = &rest[..offset];
            let after_fence = &rest[offset + 1 + FENCE.len()..];
            // Drop the remainder of the fence line.
            let body = match after_fence.find('\n') {
                Some(i) => &after_fence[i + 1..],
                None => "",
            };
            Ok((yaml, body))
        }
    }
}

/// The slug for a post that doesn't declare one: the file stem, or the
/// directory name for bundles.
fn default_slug(path: &Path) -> Option<String> {
    let named = match path.file_name() {
        Some(name) if name == BUNDLE_INDEX => path.parent()?.file_name()?,
        _ => path.file_stem()?,
    };
    named.to_str().map(str::to_owned)
}

/// Accepts either a single string or a list of strings.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(label) => vec![label],
        OneOrMany::Many(labels) => labels,
    })
}

#[derive(Deserialize)]
struct AuthorRecord {
    name: String,

    #[serde(default)]
    image: Option<String>,
}

impl AuthorRecord {
    fn into_author(self) -> Author {
        Author {
            name: self.name,
            image: self.image,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    title: String,

    #[serde(default)]
    slug: Option<String>,

    #[serde(default)]
    date: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    category: Vec<String>,

    #[serde(default)]
    tags: Vec<String>,

    #[serde(default)]
    excerpt: String,

    #[serde(default)]
    reading_time: Option<String>,

    #[serde(default)]
    author: Option<AuthorRecord>,

    #[serde(default)]
    cover_image: Option<String>,

    #[serde(default)]
    featured: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRecord {
    title: String,
    slug: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    long_description: String,

    #[serde(default)]
    technologies: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    categories: Vec<String>,

    #[serde(default)]
    image: Option<String>,

    #[serde(default)]
    github_url: Option<String>,

    #[serde(default)]
    live_url: Option<String>,

    #[serde(default)]
    featured: bool,

    #[serde(default)]
    completion_date: Option<String>,
}

impl ProjectRecord {
    fn into_entry(self) -> Entry {
        let mut project = Entry::new(EntryKind::Project, &self.title, &self.slug);
        project.categories = self.categories;
        project.tags = self.technologies;
        project.date = self.completion_date;
        project.summary = self.description;
        project.body = self.long_description;
        project.cover_image = self.image;
        project.links = Links {
            github: self.github_url,
            live: self.live_url,
        };
        project.featured = self.featured;
        project
    }
}

/// Represents the result of a load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading posts or projects.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when an entry's title is empty.
    EmptyTitle,

    /// Returned when two entries in the same collection share a slug.
    DuplicateSlug(DuplicateSlug),

    /// Returned when a post has no `slug` and its file name isn't valid
    /// UTF-8.
    InvalidFileName(PathBuf),

    /// Returned when there was an error parsing YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::EmptyTitle => write!(f, "title must not be empty"),
            Error::DuplicateSlug(err) => err.fmt(f),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::EmptyTitle => None,
            Error::DuplicateSlug(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<DuplicateSlug> for Error {
    fn from(err: DuplicateSlug) -> Error {
        Error::DuplicateSlug(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for directory traversal.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parser(root: &str) -> (PathBuf, PathBuf) {
        let root = Path::new(root);
        (root.join("posts"), root.join("projects.yaml"))
    }

    #[test]
    fn test_parse_posts() -> Result<()> {
        let (posts_directory, projects_file) = parser("./testdata/site");
        let posts = Parser::new(&posts_directory, &projects_file).parse_posts()?;

        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            vec![
                "understanding-react-server-components",
                "building-typesafe-api-trpc",
                "mastering-tailwind-css",
            ],
            slugs
        );

        let rsc = posts.get("understanding-react-server-components").unwrap();
        assert_eq!("Understanding React Server Components", rsc.title);
        assert_eq!(vec!["React".to_owned()], rsc.categories);
        assert_eq!(vec!["React", "Next.js", "Performance"], rsc.tags);
        assert_eq!(Some("2024-02-20"), rsc.date.as_deref());
        assert_eq!(Some("John Doe"), rsc.author.as_ref().map(|a| a.name.as_str()));
        assert!(rsc.body.starts_with("## Introduction"));
        assert_eq!(None, rsc.reading_time);
        Ok(())
    }

    #[test]
    fn test_parse_bundle_post() -> Result<()> {
        let (posts_directory, projects_file) = parser("./testdata/site");
        let posts = Parser::new(&posts_directory, &projects_file).parse_posts()?;
        let tailwind = posts.get("mastering-tailwind-css").unwrap();
        assert_eq!(vec!["CSS".to_owned()], tailwind.categories);
        assert_eq!(Some("10 min read"), tailwind.reading_time.as_deref());
        Ok(())
    }

    #[test]
    fn test_parse_posts_skips_bundle_extras() -> Result<()> {
        // `mastering-tailwind-css/` also holds `notes.md` (no frontmatter)
        // and `drafts/plugins.md`; neither becomes a post.
        let (posts_directory, projects_file) = parser("./testdata/site");
        let parser = Parser::new(&posts_directory, &projects_file);
        assert_eq!(3, parser.parse_posts()?.len());

        let bundle = posts_directory.join("mastering-tailwind-css");
        assert!(parser.inside_bundle(&bundle.join("notes.md")));
        assert!(parser.inside_bundle(&bundle.join("drafts").join("plugins.md")));
        assert!(!parser.inside_bundle(&bundle.join(BUNDLE_INDEX)));
        assert!(!parser.inside_bundle(&posts_directory.join("building-typesafe-api-trpc.md")));
        Ok(())
    }

    #[test]
    fn test_parse_projects() -> Result<()> {
        let (posts_directory, projects_file) = parser("./testdata/site");
        let projects = Parser::new(&posts_directory, &projects_file).parse_projects()?;
        let slugs: Vec<&str> = projects.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            vec!["personal-blog-platform", "task-tracker-api", "design-system"],
            slugs
        );

        let blog = projects.get("personal-blog-platform").unwrap();
        assert_eq!(EntryKind::Project, blog.kind);
        assert_eq!(vec!["Web Development", "Frontend"], blog.categories);
        assert_eq!(vec!["Next.js", "React", "TypeScript"], blog.tags);
        assert_eq!(Some("2024-01-15"), blog.date.as_deref());
        assert!(blog.featured);
        assert_eq!(
            Some("https://github.com/example/blog-platform"),
            blog.links.github.as_deref()
        );

        // A single category string is accepted too.
        let api = projects.get("task-tracker-api").unwrap();
        assert_eq!(vec!["Backend"], api.categories);
        Ok(())
    }

    #[test]
    fn test_missing_sources() -> Result<()> {
        let (posts_directory, projects_file) = parser("./testdata/does-not-exist");
        let parser = Parser::new(&posts_directory, &projects_file);
        assert!(parser.parse_posts()?.is_empty());
        assert!(parser.parse_projects()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_slug() {
        let (posts_directory, projects_file) = parser("./testdata/duplicates");
        match Parser::new(&posts_directory, &projects_file).parse_posts() {
            Err(Error::DuplicateSlug(DuplicateSlug(slug))) => assert_eq!("hello", slug),
            other => panic!("expected duplicate slug error, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_missing_fence() {
        let (posts_directory, projects_file) = parser("./testdata/unfenced");
        match Parser::new(&posts_directory, &projects_file).parse_posts() {
            Err(Error::Annotated(annotation, err)) => {
                assert!(annotation.contains("no-fence.md"));
                assert!(matches!(*err, Error::FrontmatterMissingStartFence));
            }
            other => panic!("expected annotated error, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_split_frontmatter() -> Result<()> {
        let (yaml, body) = split_frontmatter("---\ntitle: x\n---\n## Body\n---\nmore")?;
        assert_eq!("\ntitle: x", yaml);
        assert_eq!("## Body\n---\nmore", body);

        assert!(matches!(
            split_frontmatter("---\ntitle: x\n"),
            Err(Error::FrontmatterMissingEndFence)
        ));
        Ok(())
    }

    #[test]
    fn test_default_slug() {
        assert_eq!(
            Some("hello".to_owned()),
            default_slug(Path::new("posts/hello.md"))
        );
        assert_eq!(
            Some("bundle".to_owned()),
            default_slug(Path::new("posts/bundle/index.md"))
        );
    }
}
