//! Kraken 2 library manifest: the list of files a library build needs.
//!
//! One relative path per line, e.g.
//! `genomes/all/GCF/000/005/845/GCF_000005845.2_ASM584v2/GCF_000005845.2_ASM584v2_genomic.fna.gz`.
//! The directory part of each entry is where the file goes under the base.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::layout::{is_contained_relative, Layout};

pub const MANIFEST_FILE_NAME: &str = "manifest.txt";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(
        "the provided path does not contain a 'manifest.txt' file ({}); \
         manifests live in the library directories, e.g. \
         'DBs/kraken/standard/library/bacteria/manifest.txt', in which case the input \
         path should be 'DBs/kraken/standard/library/bacteria'",
        .path.display()
    )]
    Missing { path: PathBuf },
    #[error("failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One file the library build needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequiredFile {
    /// Path relative to the base directory; also the path on the server.
    pub path: String,
    /// Directory part of `path` (empty for a bare filename).
    pub subdir: String,
}

impl RequiredFile {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let subdir = match path.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => String::new(),
        };
        Self { path, subdir }
    }
}

/// Parsed manifest, in file order with duplicates collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    files: Vec<RequiredFile>,
}

impl Manifest {
    pub fn parse(text: &str) -> Self {
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            if !is_contained_relative(entry) {
                tracing::warn!(line = lineno + 1, "skipping manifest entry outside base: {}", entry);
                continue;
            }
            // Same key shape the scanner produces: no `.` parts, no doubled slashes.
            let key: Vec<&str> = entry.split('/').filter(|p| !p.is_empty() && *p != ".").collect();
            let key = key.join("/");
            if seen.insert(key.clone()) {
                files.push(RequiredFile::new(key));
            }
        }
        Self { files }
    }

    pub fn files(&self) -> &[RequiredFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Read `<base>/manifest.txt`. Its absence is a precondition failure.
pub fn load(layout: &Layout) -> Result<Manifest, ManifestError> {
    let path = layout.manifest_path();
    if !path.is_file() {
        return Err(ManifestError::Missing { path });
    }
    let text = fs::read_to_string(&path).map_err(|source| ManifestError::Io {
        path: path.clone(),
        source,
    })?;
    let manifest = Manifest::parse(&text);
    tracing::debug!(entries = manifest.len(), "loaded manifest {}", path.display());
    Ok(manifest)
}
