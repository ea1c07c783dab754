use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::registry::ContentEntry;

/// Names one version of a level: `<file name>[:<version>]`, e.g.
/// `arena1.mp:3f2a9c`.
///
/// Two keys for the same slot share [`file_name`](Self::file_name) and
/// differ in [`version`](Self::version).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn new(key: impl Into<String>) -> Self { Self(key.into()) }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Everything before the first `:`.
    pub fn file_name_ext(&self) -> &str { self.0.split(':').next().unwrap_or(&self.0) }

    /// Extension-less final component of [`file_name_ext`](Self::file_name_ext).
    pub fn file_name(&self) -> &str {
        Path::new(self.file_name_ext())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// The human form registries index levels by: `_` as space, upper-cased.
    pub fn display_name(&self) -> String { display_name(self.file_name()) }

    pub fn version(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, v)| v).filter(|v| !v.is_empty())
    }

    /// What to show while searching: the key up to `.mp`.
    pub fn search_label(&self) -> &str {
        match self.0.to_ascii_lowercase().find(".mp") {
            Some(end) => &self.0[..end],
            None => self.file_name_ext(),
        }
    }

    /// Same slot, regardless of version. An entry matches on either naming
    /// convention.
    pub fn matches(&self, entry: &ContentEntry) -> bool {
        entry.file_name == self.file_name() || entry.display_name == self.display_name()
    }
}

pub(crate) fn display_name(file_name: &str) -> String { file_name.replace('_', " ").to_uppercase() }

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for ContentKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::new(s)) }
}

impl From<&str> for ContentKey {
    fn from(s: &str) -> Self { Self::new(s) }
}

impl From<String> for ContentKey {
    fn from(s: String) -> Self { Self(s) }
}
