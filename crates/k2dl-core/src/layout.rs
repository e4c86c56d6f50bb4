//! On-disk layout of a Kraken 2 library directory.
//!
//! Everything is resolved against one normalized base directory: the manifest
//! sits at `<base>/manifest.txt` and each required file lands at
//! `<base>/<relative path>`.

use std::path::{Component, Path, PathBuf};

/// Drops trailing separators, doubled separators and interior `.` components.
/// A bare root stays `/`; an empty input becomes `.`.
pub fn normalize_base(raw: &Path) -> PathBuf {
    let normalized: PathBuf = raw.components().collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// True when the user passed the base directory with a trailing separator.
pub fn has_trailing_separator(raw: &Path) -> bool {
    let s = raw.as_os_str().to_string_lossy();
    s.len() > 1 && s.ends_with(std::path::MAIN_SEPARATOR)
}

/// True when `rel` stays inside the base directory once joined onto it.
pub fn is_contained_relative(rel: &str) -> bool {
    let path = Path::new(rel);
    !rel.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    base: PathBuf,
}

impl Layout {
    pub fn new(raw_base: impl AsRef<Path>) -> Self {
        Self {
            base: normalize_base(raw_base.as_ref()),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.base.join(crate::manifest::MANIFEST_FILE_NAME)
    }

    /// Directory a file's subdirectory maps to.
    pub fn dir_path(&self, subdir: &str) -> PathBuf {
        if subdir.is_empty() {
            self.base.clone()
        } else {
            self.base.join(subdir)
        }
    }

    /// Final location of a manifest entry.
    pub fn file_path(&self, rel: &str) -> PathBuf {
        self.base.join(rel)
    }

    /// Manifest-style key (`/`-separated, relative to base) for a path under base.
    pub fn relative_key(&self, path: &Path) -> Option<String> {
        let rel = path
            .strip_prefix(&self.base)
            .ok()
            .or_else(|| strip_cur_dir(path).strip_prefix(strip_cur_dir(&self.base)).ok())?;
        let parts: Vec<&str> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

fn strip_cur_dir(p: &Path) -> &Path {
    p.strip_prefix(".").unwrap_or(p)
}
