use std::fs;
use std::path::{Path, PathBuf};

use crate::content::{parse_content, ContentRecord};
use crate::error::{ContentError, ContentResult};

pub struct ContentFile {
    pub file_path: PathBuf,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(file_path: &Path) -> ContentResult<ContentFile> {
        let raw_content = fs::read_to_string(file_path).map_err(|source| ContentError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

        Ok(ContentFile {
            file_path: file_path.to_path_buf(),
            raw_content,
        })
    }

    pub fn parse(&self) -> ContentResult<ContentRecord> {
        parse_content(&self.file_path, &self.raw_content)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::test_data::POST_DATA;

    use super::*;

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pods.md");
        fs::write(&path, POST_DATA).unwrap();

        let file = ContentFile::from_file(&path).unwrap();
        assert_eq!(file.raw_content, POST_DATA);

        let post = file.parse().unwrap();
        assert_eq!(post.path(), path.as_path());
        assert_eq!(post.title(), "Podman for dev environments");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.md");
        match ContentFile::from_file(&path) {
            Err(ContentError::Io { path: err_path, .. }) => assert_eq!(err_path, path),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("file should not exist"),
        }
    }
}
