//! Builds the social share links shown on entry pages.

use crate::entry::Entry;
use std::fmt;
use url::Url;

const TWITTER_INTENT_URL: &str = "https://twitter.com/intent/tweet";
const FACEBOOK_SHARER_URL: &str = "https://www.facebook.com/sharer/sharer.php";
const LINKEDIN_SHARE_URL: &str = "https://www.linkedin.com/sharing/share-offsite/";

/// The canonical URL for an entry plus ready-to-use share URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareLinks {
    pub url: Url,
    pub twitter: Url,
    pub facebook: Url,
    pub linkedin: Url,
}

impl ShareLinks {
    /// Builds the share links for `entry`. The canonical URL is
    /// `{site_url}/blog/{slug}` for posts and `{site_url}/projects/{slug}`
    /// for projects.
    pub fn new(site_url: &Url, entry: &Entry) -> Result<ShareLinks> {
        let url = entry_url(site_url, entry)?;
        let message = format!("Check out this article: {}", entry.title);
        Ok(ShareLinks {
            twitter: Url::parse_with_params(
                TWITTER_INTENT_URL,
                &[("text", message.as_str()), ("url", url.as_str())],
            )?,
            facebook: Url::parse_with_params(FACEBOOK_SHARER_URL, &[("u", url.as_str())])?,
            linkedin: Url::parse_with_params(LINKEDIN_SHARE_URL, &[("url", url.as_str())])?,
            url,
        })
    }
}

/// Returns the canonical URL of `entry` under `site_url`.
pub fn entry_url(site_url: &Url, entry: &Entry) -> Result<Url> {
    // `Url::join` treats the last path segment as a file name unless it ends
    // in a slash, so `https://example.com/me` would otherwise lose `me`.
    let mut base = site_url.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    Ok(base.join(&format!("{}/{}", entry.kind.path_segment(), entry.slug))?)
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem building share links.
#[derive(Debug)]
pub enum Error {
    /// Returned when the site URL and slug don't form a valid URL.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UrlParse(err) => write!(f, "building share URL: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
