use std::path::{Path, PathBuf};

use spdlog::warn;
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Finds content files under `root_dir`, single files and page bundles alike.
pub struct PostList {
    pub root_dir: PathBuf,
    pub extensions: Vec<String>,
}

impl PostList {
    pub fn new(root_dir: &Path) -> Self {
        PostList {
            root_dir: root_dir.to_path_buf(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn with_extensions(root_dir: &Path, extensions: &[String]) -> Self {
        PostList {
            root_dir: root_dir.to_path_buf(),
            extensions: extensions.iter().map(|e| e.trim_start_matches('.').to_lowercase()).collect(),
        }
    }

    /// Content files sorted by path. Hidden files and directories are skipped, as are
    /// entries that cannot be read.
    pub fn retrieve_files(&self) -> walkdir::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        let walker = WalkDir::new(&self.root_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !Self::is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.has_content_extension(entry.path()) {
                posts.push(entry.into_path());
            }
        }

        posts.sort();
        Ok(posts)
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry.file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
    }

    fn has_content_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_retrieve_files() {
        let root = tempfile::tempdir().unwrap();
        let posts = root.path().join("posts");
        fs::create_dir_all(posts.join("podman-pods")).unwrap();
        fs::create_dir_all(posts.join(".drafts")).unwrap();
        fs::write(posts.join("starting-anew.md"), "").unwrap();
        fs::write(posts.join("notes.MARKDOWN"), "").unwrap();
        fs::write(posts.join("podman-pods").join("index.md"), "").unwrap();
        fs::write(posts.join("podman-pods").join("diagram.png"), "").unwrap();
        fs::write(posts.join(".drafts").join("secret.md"), "").unwrap();
        fs::write(posts.join(".hidden.md"), "").unwrap();

        let list = PostList::new(root.path());
        let files = list.retrieve_files().unwrap();
        assert_eq!(files, vec![
            posts.join("notes.MARKDOWN"),
            posts.join("podman-pods").join("index.md"),
            posts.join("starting-anew.md"),
        ]);

        let list = PostList::with_extensions(root.path(), &[".png".to_string()]);
        let files = list.retrieve_files().unwrap();
        assert_eq!(files, vec![posts.join("podman-pods").join("diagram.png")]);
    }

    #[test]
    fn test_missing_root() {
        let root = tempfile::tempdir().unwrap();
        let list = PostList::new(&root.path().join("nothing-here"));
        assert!(list.retrieve_files().is_err());
    }
}
