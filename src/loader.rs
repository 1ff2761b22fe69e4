use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use spdlog::{debug, error, info, warn};

use crate::content::content_file::ContentFile;
use crate::content::ContentRecord;
use crate::error::{ContentError, ContentResult};
use crate::post_list::PostList;

/// Outcome of loading a batch of files. A broken post ends up in `failures` and never
/// prevents the others from loading.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<ContentRecord>,
    pub failures: Vec<(PathBuf, ContentError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn push(&mut self, path: PathBuf, result: ContentResult<ContentRecord>) {
        match result {
            Ok(record) => self.records.push(record),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                self.failures.push((path, e));
            }
        }
    }

    fn extend(&mut self, other: LoadReport) {
        self.records.extend(other.records);
        self.failures.extend(other.failures);
    }

    // Workers finish in any order
    fn sort(&mut self) {
        self.records.sort_by(|a, b| a.path().cmp(b.path()));
        self.failures.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
}

pub fn load_file(path: &Path) -> ContentResult<ContentRecord> {
    ContentFile::from_file(path)?.parse()
}

/// Reads and parses `files`, using a pool of `threads` workers when more than one.
pub fn load_content(files: &[PathBuf], threads: usize) -> LoadReport {
    let mut report = if threads < 2 || files.len() < 2 {
        load_single_threaded(files)
    } else {
        load_parallel(files, threads)
    };
    report.sort();

    info!("Loaded {} content files, {} failed", report.records.len(), report.failures.len());
    report
}

/// Discovers the content files under `root_dir` and loads them.
pub fn load_dir(root_dir: &Path, extensions: &[String], threads: usize) -> Result<LoadReport> {
    let post_list = PostList::with_extensions(root_dir, extensions);
    let files = post_list.retrieve_files()
        .with_context(|| format!("Error listing content directory {}", root_dir.display()))?;
    debug!("Found {} content files in {}", files.len(), root_dir.display());
    Ok(load_content(&files, threads))
}

fn load_single_threaded(files: &[PathBuf]) -> LoadReport {
    let mut report = LoadReport::default();
    for path in files {
        report.push(path.clone(), load_file(path));
    }
    report
}

fn load_parallel(files: &[PathBuf], threads: usize) -> LoadReport {
    let (tx, rx) = unbounded::<&PathBuf>();

    thread::scope(|scope| {
        let mut workers = Vec::with_capacity(threads);
        for _ in 0..threads {
            let rx = rx.clone();
            workers.push(scope.spawn(move || {
                let mut report = LoadReport::default();
                for path in rx {
                    report.push(path.clone(), load_file(path));
                }
                report
            }));
        }

        for path in files {
            // Receivers live until every worker is joined below
            let _ = tx.send(path);
        }
        drop(tx);

        let mut report = LoadReport::default();
        for worker in workers {
            match worker.join() {
                Ok(partial) => report.extend(partial),
                Err(_) => error!("Content worker panicked; its files are missing from the report"),
            }
        }
        report
    })
}
