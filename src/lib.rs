//! The library code for `folio`, the content core of a personal portfolio
//! and blog. The architecture breaks down into three layers:
//!
//! 1. Loading content from disk ([`crate::config`], [`crate::parser`],
//!    [`crate::site`]). Posts and projects are normalized into one
//!    [`crate::entry::Entry`] shape and held in immutable
//!    [`crate::entry::Collection`]s.
//! 2. Querying collections: filtering ([`crate::filter`]), pagination
//!    ([`crate::page`]), related entries ([`crate::related`]), and
//!    previous/next navigation ([`crate::adjacent`]).
//! 3. Deriving metadata from a single entry's markdown: reading time
//!    ([`crate::reading`]), a table of contents ([`crate::toc`]), rendered
//!    HTML with heading anchors ([`crate::markdown`]), and share links
//!    ([`crate::share`]).
//!
//! Everything past the loading step is a pure function over borrowed data,
//! so a loaded [`crate::site::Site`] can be shared freely between threads.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod adjacent;
pub mod config;
pub mod entry;
pub mod filter;
pub mod markdown;
pub mod page;
pub mod parser;
pub mod reading;
pub mod related;
pub mod share;
pub mod site;
pub mod slug;
pub mod toc;
pub mod util;
