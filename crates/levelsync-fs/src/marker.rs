//! Disabled-copy naming.
//!
//! A disabled copy is the original path with [`MARKER`] appended, followed
//! by the smallest counter that makes the name unique (no counter for the
//! first one): `arena1.zip` becomes `arena1.zip_OCT_Hidden`, then
//! `arena1.zip_OCT_Hidden1`, and so on. Stripping the anchored marker
//! always gives back the original path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::FileSystem;

pub const MARKER: &str = "_OCT_Hidden";

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("{MARKER}[0-9]*$")).unwrap());

const ARCHIVE_MARKER: &str = ".zip_OCT_Hidden";

/// `path` with the marker and, for `n > 0`, the counter appended.
pub fn disabled_name(path: &Path, n: u64) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(MARKER);
    if n > 0 {
        name.push(n.to_string());
    }
    PathBuf::from(name)
}

/// Remove a trailing marker. Paths without one come back unchanged.
pub fn strip_marker(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(MARKER_RE.replace(s, "").into_owned()),
        None => path.to_path_buf(),
    }
}

pub fn is_disabled(path: &Path) -> bool { path.to_str().is_some_and(|s| MARKER_RE.is_match(s)) }

/// Matches `*.zip_OCT_Hidden*` with the marker anchored at the end.
pub fn is_disabled_archive(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.contains(ARCHIVE_MARKER) && MARKER_RE.is_match(name)
}

/// First disabled name for `path` that does not exist yet.
pub fn next_free_disabled_path<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> PathBuf {
    let mut n = 0;
    loop {
        let candidate = disabled_name(path, n);
        if !fs.exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
