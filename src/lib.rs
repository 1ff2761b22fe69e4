//! Front matter parsing and content manifests for markdown blogs.
//!
//! Every content file starts with a fenced metadata block (`---` YAML or `+++` TOML)
//! followed by the post body. [`content::parse_content`] turns one file into an immutable
//! [`content::ContentRecord`]; [`manifest::ContentManifest`] orders a set of records,
//! newest first, and exposes the published and draft partitions to a site generator.

pub mod config;
pub mod content;
pub mod content_store;
pub mod error;
pub mod loader;
pub mod logger;
pub mod manifest;
pub mod paginator;
pub mod post_list;
pub mod text_utils;
pub mod util;
mod test_data;
