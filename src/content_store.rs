use std::collections::HashMap;
use std::path::{Path, PathBuf};

use spdlog::{debug, warn};

use crate::content::ContentRecord;
use crate::error::ContentResult;
use crate::loader::LoadReport;
use crate::manifest::ContentManifest;

/// Latest record for every content file, keyed by path.
#[derive(Default)]
pub struct ContentStore {
    records: HashMap<PathBuf, ContentRecord>,
    link_to_path: HashMap<String, PathBuf>,
}

impl ContentStore {
    pub fn new() -> ContentStore {
        Default::default()
    }

    pub fn from_report(report: LoadReport) -> ContentStore {
        let mut store = ContentStore::new();
        for record in report.records {
            store.upsert(record);
        }
        store
    }

    /// Stores `record`, replacing and returning any record previously parsed from the
    /// same path.
    pub fn upsert(&mut self, record: ContentRecord) -> Option<ContentRecord> {
        let path = record.path().to_path_buf();
        let link = record.link();

        let previous = self.records.insert(path.clone(), record);
        if let Some(ref old) = previous {
            let old_link = old.link();
            if old_link != link && self.link_to_path.get(&old_link) == Some(&path) {
                self.link_to_path.remove(&old_link);
            }
            debug!("Replaced record for {}", path.display());
        }

        if let Some(other) = self.link_to_path.get(&link).filter(|other| **other != path) {
            warn!("Link '{}' of {} is already used by {}", link, path.display(), other.display());
        }
        self.link_to_path.insert(link, path);

        previous
    }

    pub fn remove(&mut self, path: &Path) -> Option<ContentRecord> {
        let removed = self.records.remove(path)?;
        let link = removed.link();
        if self.link_to_path.get(&link).map(|p| p.as_path()) == Some(path) {
            self.link_to_path.remove(&link);
        }
        Some(removed)
    }

    pub fn get(&self, path: &Path) -> Option<&ContentRecord> {
        self.records.get(path)
    }

    pub fn from_link(&self, link: &str) -> Option<&ContentRecord> {
        self.link_to_path.get(link).and_then(|path| self.records.get(path))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn manifest(&self) -> ContentResult<ContentManifest<'_>> {
        ContentManifest::build(self.records.values())
    }
}
