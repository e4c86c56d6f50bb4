//! Writing downloaded bodies to disk.
//!
//! Bodies go to `<final>.part` first and are renamed into place once fully
//! written, so an interrupted write never leaves a truncated file at a path the
//! next run's scan would count as present.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.fna.gz` → `a.fna.gz.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Create `dir` and its parents; an existing directory is fine.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Write `data` to the temp path, sync it, then rename it over `final_path`.
/// A stale temp file from an earlier run is truncated. On failure the temp file is removed.
pub fn write_finalized(final_path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp = temp_path(final_path);
    let res = (|| {
        let mut f = File::create(&tmp)?;
        f.write_all(data)?;
        f.sync_all()?;
        drop(f);
        fs::rename(&tmp, final_path)
    })();
    if res.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    res
}
