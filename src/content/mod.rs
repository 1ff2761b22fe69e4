use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

pub mod content_file;
pub mod front_matter;
pub mod parsing_utils;

pub use parsing_utils::parse_content;

/// Marker separating the summary from the rest of a post body.
pub const DEFAULT_SUMMARY_FOLD: &str = "<!--more-->";

/// Front matter dialect, chosen by the fence that opens the file.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontMatterFormat {
    /// `---` fenced YAML
    Yaml,
    /// `+++` fenced TOML
    Toml,
}

impl FrontMatterFormat {
    pub const ALL: [FrontMatterFormat; 2] = [FrontMatterFormat::Yaml, FrontMatterFormat::Toml];

    pub fn fence(&self) -> &'static str {
        match self {
            FrontMatterFormat::Yaml => "---",
            FrontMatterFormat::Toml => "+++",
        }
    }

    pub fn from_fence(line: &str) -> Option<FrontMatterFormat> {
        Self::ALL.into_iter().find(|format| format.fence() == line)
    }
}

/// One parsed content file. Built only by [`parse_content`] and never mutated afterwards;
/// re-parsing a file yields a fresh record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    path: PathBuf,
    format: FrontMatterFormat,
    title: String,
    published_at: DateTime<FixedOffset>,
    updated_at: Option<DateTime<FixedOffset>>,
    author: Option<String>,
    description: Option<String>,
    slug: Option<String>,
    tags: Vec<String>,
    categories: Vec<String>,
    draft: bool,
    #[serde(skip)]
    body: String,
}

impl ContentRecord {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FrontMatterFormat {
        self.format
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn published_at(&self) -> &DateTime<FixedOffset> {
        &self.published_at
    }

    pub fn updated_at(&self) -> Option<&DateTime<FixedOffset>> {
        self.updated_at.as_ref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Unique tags, in the order they first appear in the front matter.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_draft(&self) -> bool {
        self.draft
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Name used to address the post.
    ///
    /// The explicit `slug` wins. A page bundle (`my-post/index.md`) is named after its
    /// directory, any other file after its stem.
    pub fn link(&self) -> String {
        if let Some(ref slug) = self.slug {
            return slug.clone();
        }
        link_from_path(&self.path)
    }

    /// Body up to the first `fold` marker, and whether the marker was found.
    pub fn summary(&self, fold: &str) -> (&str, bool) {
        match self.body.find(fold) {
            Some(i) => (&self.body[..i], true),
            None => (&self.body, false),
        }
    }
}

impl Display for ContentRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "path={}, date={}, draft={}\ntitle={}\ntags=[{}]",
               self.path.display(),
               self.published_at.to_rfc3339(),
               self.draft,
               self.title,
               self.tags.join(", "),
        )
    }
}

fn link_from_path(path: &Path) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    if stem == "index" || stem == "_index" {
        if let Some(dir) = path.parent().and_then(|p| p.file_name()) {
            return dir.to_string_lossy().to_string();
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use crate::test_data::{record, POST_DATA};

    use super::*;

    #[test]
    fn test_from_fence() {
        assert_eq!(FrontMatterFormat::from_fence("---"), Some(FrontMatterFormat::Yaml));
        assert_eq!(FrontMatterFormat::from_fence("+++"), Some(FrontMatterFormat::Toml));
        assert_eq!(FrontMatterFormat::from_fence("----"), None);
        assert_eq!(FrontMatterFormat::from_fence(""), None);
    }

    #[test]
    fn test_link_from_path() {
        assert_eq!(link_from_path(Path::new("content/posts/podman-pods/index.md")), "podman-pods");
        assert_eq!(link_from_path(Path::new("content/posts/_index.md")), "posts");
        assert_eq!(link_from_path(Path::new("content/posts/starting-anew.md")), "starting-anew");
        assert_eq!(link_from_path(Path::new("index.md")), "index");
    }

    #[test]
    fn test_link_prefers_slug() {
        let post = parse_content(Path::new("posts/whatever.md"), POST_DATA).unwrap();
        assert_eq!(post.link(), "podman-for-dev-environments");

        let post = record("posts/20230528_post/index.md", "2023-05-28T10:00:00+02:00", false);
        assert_eq!(post.link(), "20230528_post");
    }

    #[test]
    fn test_summary() {
        let post = parse_content(Path::new("posts/pods.md"), POST_DATA).unwrap();
        let (summary, folded) = post.summary(DEFAULT_SUMMARY_FOLD);
        assert!(folded);
        assert_eq!(summary, "\nRunning an API and its database in a single pod.\n\n");

        let (summary, folded) = post.summary("<!-- nothing -->");
        assert!(!folded);
        assert_eq!(summary, post.body());
    }

    #[test]
    fn test_has_tag() {
        let post = parse_content(Path::new("posts/pods.md"), POST_DATA).unwrap();
        assert!(post.has_tag("podman"));
        assert!(post.has_tag("containers"));
        assert!(!post.has_tag("Podman"));
        assert!(!post.has_tag("devops"));
    }

    #[test]
    fn test_display() {
        let post = parse_content(Path::new("posts/pods.md"), POST_DATA).unwrap();
        assert_eq!(
            post.to_string(),
            "path=posts/pods.md, date=2023-05-28T10:30:00+02:00, draft=false\ntitle=Podman for dev environments\ntags=[podman, containers]"
        );
    }
}
