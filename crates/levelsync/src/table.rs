use std::path::Path;

use levelsync_core::{ContentEntry, Storage};
use levelsync_fs::strip_marker;
use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub footer: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }
        table.with(Style::blank());
        table
    }
}

#[derive(Debug, Tabled)]
pub struct LevelRow {
    #[tabled(rename = "#")]
    pub index:   usize,
    #[tabled(rename = "FILE")]
    pub file:    String,
    #[tabled(rename = "NAME")]
    pub name:    String,
    #[tabled(rename = "STORAGE")]
    pub storage: &'static str,
    #[tabled(rename = "PATH")]
    pub path:    String,
}

impl LevelRow {
    pub fn new(index: usize, entry: &ContentEntry) -> Self {
        Self {
            index,
            file: entry.file_name.clone(),
            name: entry.display_name.clone(),
            storage: match entry.storage {
                Storage::Zip(_) => "zip",
                Storage::Loose(_) => "loose",
            },
            path: entry.backing_path().display().to_string(),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct DisabledRow {
    #[tabled(rename = "PATH")]
    pub path:     String,
    #[tabled(rename = "RESTORES TO")]
    pub original: String,
    /// An enabled file already sits at the original name.
    #[tabled(rename = "BLOCKED")]
    pub blocked:  bool,
}

impl DisabledRow {
    pub fn new(path: &Path, blocked: impl Fn(&Path) -> bool) -> Self {
        let original = strip_marker(path);
        Self {
            path:     path.display().to_string(),
            blocked:  blocked(&original),
            original: original.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_level_table_has_rows() {
        let entries = [
            ContentEntry::zipped(PathBuf::from("/l/arena1.zip"), "arena1.mp"),
            ContentEntry::loose(PathBuf::from("/l/big_room.mp")),
        ];
        let rows = entries.iter().enumerate().map(|(i, e)| LevelRow::new(i, e));
        let out = Formatter::default().build(rows).to_string();
        assert!(out.contains("ARENA1"));
        assert!(out.contains("BIG ROOM"));
        assert!(out.contains("loose"));
    }

    #[test]
    fn test_footer_is_last_line() {
        let rows = [DisabledRow::new(Path::new("/l/arena1.zip_OCT_Hidden"), |_| true)];
        let formatter = Formatter {
            footer: Some("1 disabled archive(s)".to_string()),
        };
        let out = formatter.build(rows).to_string();
        assert_eq!(out.lines().last().map(str::trim), Some("1 disabled archive(s)"));
        assert!(out.contains("RESTORES TO"));
    }

    #[test]
    fn test_disabled_row_restores_original() {
        let row = DisabledRow::new(Path::new("/l/arena1.zip_OCT_Hidden2"), |_| false);
        assert_eq!(row.original, "/l/arena1.zip");
        assert!(!row.blocked);
    }
}
