use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use spdlog::{debug, info};

use crate::content::ContentRecord;
use crate::error::{ContentError, ContentResult};
use crate::paginator::Paginator;

/// Term -> positions (in manifest order) of the published records carrying it.
type TermIndex = BTreeMap<String, Vec<usize>>;

/// Read-only index over parsed records, newest first.
///
/// The manifest borrows the records. `published()` and `drafts()` walk the same ordered
/// list with opposite filters, so every record shows up in exactly one of them.
pub struct ContentManifest<'a> {
    entries: Vec<&'a ContentRecord>,
    tags: TermIndex,
    categories: TermIndex,
}

impl<'a> ContentManifest<'a> {
    /// Orders `records` by publication instant, descending, ties broken by path ascending.
    /// Two records with the same path are a caller bug and abort the build.
    pub fn build<I>(records: I) -> ContentResult<ContentManifest<'a>>
    where
        I: IntoIterator<Item = &'a ContentRecord>,
    {
        let mut seen: HashSet<&Path> = HashSet::new();
        let mut entries: Vec<&'a ContentRecord> = vec![];
        for record in records {
            if !seen.insert(record.path()) {
                return Err(ContentError::DuplicatePath(record.path().to_path_buf()));
            }
            entries.push(record);
        }

        entries.sort_by(|a, b| {
            b.published_at().cmp(a.published_at())
                .then_with(|| a.path().cmp(b.path()))
        });

        let tags = Self::index_terms(&entries, |r| r.tags());
        let categories = Self::index_terms(&entries, |r| r.categories());

        debug!("Built manifest with {} entries, {} tags, {} categories", entries.len(), tags.len(), categories.len());

        Ok(ContentManifest {
            entries,
            tags,
            categories,
        })
    }

    fn index_terms(entries: &[&'a ContentRecord], terms: fn(&ContentRecord) -> &[String]) -> TermIndex {
        let mut index = TermIndex::new();
        for (pos, record) in entries.iter().enumerate() {
            if record.is_draft() {
                continue;
            }
            for term in terms(record) {
                index.entry(term.clone()).or_default().push(pos);
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every record, drafts included, in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &'a ContentRecord> + '_ {
        self.entries.iter().copied()
    }

    pub fn get(&self, path: &Path) -> Option<&'a ContentRecord> {
        self.iter().find(|r| r.path() == path)
    }

    pub fn published(&self) -> impl Iterator<Item = &'a ContentRecord> + '_ {
        self.iter().filter(|r| !r.is_draft())
    }

    pub fn drafts(&self) -> impl Iterator<Item = &'a ContentRecord> + '_ {
        self.iter().filter(|r| r.is_draft())
    }

    /// Tag names with the number of published records carrying them.
    pub fn tags(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.tags.iter().map(|(tag, positions)| (tag.as_str(), positions.len()))
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.categories.iter().map(|(category, positions)| (category.as_str(), positions.len()))
    }

    /// Published records with `tag`, newest first.
    pub fn tagged(&self, tag: &str) -> impl Iterator<Item = &'a ContentRecord> + '_ {
        self.lookup(&self.tags, tag)
    }

    pub fn in_category(&self, category: &str) -> impl Iterator<Item = &'a ContentRecord> + '_ {
        self.lookup(&self.categories, category)
    }

    fn lookup<'s>(&'s self, index: &'s TermIndex, term: &str) -> impl Iterator<Item = &'a ContentRecord> + 's {
        index.get(term)
            .into_iter()
            .flatten()
            .map(move |&pos| self.entries[pos])
    }

    /// The published partition cut into pages of `page_size` records.
    pub fn published_pages(&self, page_size: usize) -> Vec<Vec<&'a ContentRecord>> {
        let published: Vec<&'a ContentRecord> = self.published().collect();
        let paginator = Paginator::from(&published, page_size);
        paginator.pages().map(|page| page.to_vec()).collect()
    }

    /// `pages` always lists published records only, whatever `include_drafts` says.
    pub fn to_document(&self, include_drafts: bool, summary_fold: &str, page_size: usize) -> ManifestDocument<'a> {
        let records: Vec<&'a ContentRecord> = if include_drafts {
            self.iter().collect()
        } else {
            self.published().collect()
        };

        let entries = records.into_iter()
            .map(|record| ManifestEntry::new(record, summary_fold))
            .collect();

        let links = |index: &TermIndex| -> BTreeMap<String, Vec<String>> {
            index.iter()
                .map(|(term, positions)| {
                    (term.clone(), positions.iter().map(|&pos| self.entries[pos].link()).collect())
                })
                .collect()
        };

        let pages = self.published_pages(page_size)
            .into_iter()
            .map(|page| page.into_iter().map(|record| record.link()).collect())
            .collect();

        ManifestDocument {
            generated_at: Utc::now(),
            published_count: self.published().count(),
            draft_count: self.drafts().count(),
            page_size: page_size.max(1),
            entries,
            pages,
            tags: links(&self.tags),
            categories: links(&self.categories),
        }
    }

    pub fn write_json(&self, path: &Path, include_drafts: bool, summary_fold: &str, page_size: usize) -> Result<()> {
        let document = self.to_document(include_drafts, summary_fold, page_size);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Error creating directory {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Error creating manifest file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &document)
            .with_context(|| format!("Error writing manifest file {}", path.display()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!("Wrote {} manifest entries to {}", document.entries.len(), path.display());
        Ok(())
    }
}

/// Serialized form of a manifest handed to the site generator.
#[derive(Serialize)]
pub struct ManifestDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub published_count: usize,
    pub draft_count: usize,
    pub page_size: usize,
    pub entries: Vec<ManifestEntry<'a>>,
    /// Links of the published records, one list per index page.
    pub pages: Vec<Vec<String>>,
    pub tags: BTreeMap<String, Vec<String>>,
    pub categories: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
pub struct ManifestEntry<'a> {
    pub path: &'a Path,
    pub link: String,
    pub title: &'a str,
    pub published_at: &'a DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<&'a DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub tags: &'a [String],
    pub categories: &'a [String],
    pub draft: bool,
    pub summary: &'a str,
    pub summarized: bool,
}

impl<'a> ManifestEntry<'a> {
    fn new(record: &'a ContentRecord, summary_fold: &str) -> Self {
        let (summary, summarized) = record.summary(summary_fold);
        ManifestEntry {
            path: record.path(),
            link: record.link(),
            title: record.title(),
            published_at: record.published_at(),
            updated_at: record.updated_at(),
            author: record.author(),
            description: record.description(),
            tags: record.tags(),
            categories: record.categories(),
            draft: record.is_draft(),
            summary,
            summarized,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::content::DEFAULT_SUMMARY_FOLD;
    use crate::test_data::{record, record_with_tags};

    use super::*;

    fn paths<'a>(records: impl Iterator<Item = &'a ContentRecord>) -> Vec<PathBuf> {
        records.map(|r| r.path().to_path_buf()).collect()
    }

    #[test]
    fn test_newest_first() {
        let records = vec![
            record("posts/starting-anew.md", "2023-05-22T01:00:00+02:00", false),
            record("posts/podman.md", "2023-05-28T10:00:00+02:00", false),
        ];
        let manifest = ContentManifest::build(&records).unwrap();
        assert_eq!(paths(manifest.iter()), vec![
            PathBuf::from("posts/podman.md"),
            PathBuf::from("posts/starting-anew.md"),
        ]);
    }

    #[test]
    fn test_instants_are_compared_across_offsets() {
        // 09:00+02:00 is 07:00Z, earlier than 08:00Z
        let records = vec![
            record("posts/a.md", "2023-05-22T09:00:00+02:00", false),
            record("posts/b.md", "2023-05-22T08:00:00Z", false),
        ];
        let manifest = ContentManifest::build(&records).unwrap();
        assert_eq!(paths(manifest.iter()), vec![PathBuf::from("posts/b.md"), PathBuf::from("posts/a.md")]);
    }

    #[test]
    fn test_ties_broken_by_path() {
        let records = vec![
            record("posts/c.md", "2023-05-22T01:00:00+02:00", false),
            record("posts/a.md", "2023-05-21T23:00:00Z", false),
            record("posts/b.md", "2023-05-22T01:00:00+02:00", true),
        ];
        let manifest = ContentManifest::build(&records).unwrap();
        assert_eq!(paths(manifest.iter()), vec![
            PathBuf::from("posts/a.md"),
            PathBuf::from("posts/b.md"),
            PathBuf::from("posts/c.md"),
        ]);
    }

    #[test]
    fn test_partitions() {
        let records = vec![
            record("posts/1.md", "2023-05-01T00:00:00Z", false),
            record("posts/2.md", "2023-05-02T00:00:00Z", true),
            record("posts/3.md", "2023-05-03T00:00:00Z", false),
            record("posts/4.md", "2023-05-04T00:00:00Z", true),
        ];
        let manifest = ContentManifest::build(&records).unwrap();
        assert_eq!(manifest.len(), 4);

        let drafts = paths(manifest.drafts());
        let published = paths(manifest.published());
        assert_eq!(drafts, vec![PathBuf::from("posts/4.md"), PathBuf::from("posts/2.md")]);
        assert_eq!(published, vec![PathBuf::from("posts/3.md"), PathBuf::from("posts/1.md")]);
        assert!(manifest.drafts().all(|r| r.is_draft()));
        assert!(manifest.published().all(|r| !r.is_draft()));
        assert_eq!(drafts.len() + published.len(), manifest.len());
    }

    #[test]
    fn test_duplicate_path() {
        let records = vec![
            record("posts/same.md", "2023-05-01T00:00:00Z", false),
            record("posts/same.md", "2023-05-02T00:00:00Z", false),
        ];
        match ContentManifest::build(&records) {
            Err(ContentError::DuplicatePath(path)) => assert_eq!(path, PathBuf::from("posts/same.md")),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("duplicate paths must be rejected"),
        }
    }

    #[test]
    fn test_empty() {
        let manifest = ContentManifest::build(&[]).unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.published().count(), 0);
        assert!(manifest.published_pages(10).is_empty());
    }

    #[test]
    fn test_taxonomies_skip_drafts() {
        let records = vec![
            record_with_tags("posts/1.md", "2023-05-01T00:00:00Z", false, &["podman", "rust"]),
            record_with_tags("posts/2.md", "2023-05-02T00:00:00Z", true, &["podman", "secret"]),
            record_with_tags("posts/3.md", "2023-05-03T00:00:00Z", false, &["podman"]),
        ];
        let manifest = ContentManifest::build(&records).unwrap();

        let tags: Vec<(&str, usize)> = manifest.tags().collect();
        assert_eq!(tags, vec![("podman", 2), ("rust", 1)]);
        assert_eq!(paths(manifest.tagged("podman")), vec![PathBuf::from("posts/3.md"), PathBuf::from("posts/1.md")]);
        assert_eq!(manifest.tagged("secret").count(), 0);
        assert_eq!(manifest.tagged("unknown").count(), 0);
        assert_eq!(manifest.categories().count(), 0);
        assert_eq!(manifest.in_category("devops").count(), 0);
    }

    #[test]
    fn test_get_and_pages() {
        let records: Vec<ContentRecord> = (1..=5)
            .map(|day| record(&format!("posts/{}.md", day), &format!("2023-05-0{}T00:00:00Z", day), day == 3))
            .collect();
        let manifest = ContentManifest::build(&records).unwrap();

        assert_eq!(manifest.get(Path::new("posts/2.md")).map(|r| r.is_draft()), Some(false));
        assert!(manifest.get(Path::new("posts/9.md")).is_none());

        let pages = manifest.published_pages(3);
        assert_eq!(pages.len(), 2);
        assert_eq!(paths(pages[0].iter().copied()), vec![
            PathBuf::from("posts/5.md"),
            PathBuf::from("posts/4.md"),
            PathBuf::from("posts/2.md"),
        ]);
        assert_eq!(paths(pages[1].iter().copied()), vec![PathBuf::from("posts/1.md")]);
    }

    #[test]
    fn test_document() {
        let records = vec![
            record_with_tags("posts/1.md", "2023-05-01T00:00:00Z", false, &["podman"]),
            record("posts/2.md", "2023-05-02T00:00:00Z", true),
        ];
        let manifest = ContentManifest::build(&records).unwrap();

        let document = manifest.to_document(false, DEFAULT_SUMMARY_FOLD, 10);
        assert_eq!(document.entries.len(), 1);
        assert_eq!(document.published_count, 1);
        assert_eq!(document.draft_count, 1);
        assert_eq!(document.tags.get("podman"), Some(&vec!["1".to_string()]));

        let document = manifest.to_document(true, DEFAULT_SUMMARY_FOLD, 10);
        assert_eq!(document.entries.len(), 2);
        assert_eq!(document.entries[0].link, "2");
        assert!(document.entries[0].draft);

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["entries"][1]["title"], "posts/1.md");
        assert!(json["entries"][1]["published_at"].as_str().unwrap().starts_with("2023-05-01T00:00:00"));
        assert_eq!(json["entries"][1]["summary"], "Body of posts/1.md\n");
        assert!(json["entries"][1].get("description").is_none());
        assert_eq!(json["pages"], serde_json::json!([["1"]]));
    }

    #[test]
    fn test_document_pages() {
        let records = vec![
            record("posts/1.md", "2023-05-01T00:00:00Z", false),
            record("posts/2.md", "2023-05-02T00:00:00Z", false),
            record("posts/3.md", "2023-05-03T00:00:00Z", true),
            record("posts/4.md", "2023-05-04T00:00:00Z", false),
        ];
        let manifest = ContentManifest::build(&records).unwrap();

        let document = manifest.to_document(true, DEFAULT_SUMMARY_FOLD, 2);
        assert_eq!(document.page_size, 2);
        assert_eq!(document.pages, vec![
            vec!["4".to_string(), "2".to_string()],
            vec!["1".to_string()],
        ]);

        let document = manifest.to_document(false, DEFAULT_SUMMARY_FOLD, 0);
        assert_eq!(document.page_size, 1);
        assert_eq!(document.pages.len(), 3);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record("posts/1.md", "2023-05-01T00:00:00Z", false)];
        let manifest = ContentManifest::build(&records).unwrap();

        let path = dir.path().join("out").join("manifest.json");
        manifest.write_json(&path, false, DEFAULT_SUMMARY_FOLD, 10).unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["entries"].as_array().map(|e| e.len()), Some(1));
        assert_eq!(written["published_count"], 1);
        assert_eq!(written["page_size"], 10);
        assert_eq!(written["pages"][0][0], "1");
    }
}
