//! Gallery value types.

use bridge_traits::storage::RemoteEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An image file found while indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    /// Path with the casing the user sees
    pub display_path: String,
    /// Path used to request the temporary link; unique within an index
    pub lookup_path: String,
    pub filename: String,
    /// Client modification time, falling back to the server's
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileReference {
    /// Build a reference from a listing entry found under `folder_path`.
    ///
    /// Entries without paths get one derived from the folder and name.
    pub fn from_entry(entry: &RemoteEntry, folder_path: &str) -> Self {
        let derived = || format!("{}/{}", folder_path, entry.name);

        let lookup_path = entry
            .path_lower
            .clone()
            .or_else(|| entry.path_display.clone())
            .unwrap_or_else(derived);
        let display_path = entry
            .path_display
            .clone()
            .unwrap_or_else(|| lookup_path.clone());

        Self {
            display_path,
            lookup_path,
            filename: entry.name.clone(),
            last_modified: entry.modified_at(),
        }
    }
}

/// Image files of one folder, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryIndex {
    folder_path: String,
    items: Vec<FileReference>,
    pages: usize,
    built_at: DateTime<Utc>,
}

impl GalleryIndex {
    /// Sorts `items` newest first. Equal or missing timestamps keep their
    /// listing order; missing ones go last.
    pub fn new(folder_path: impl Into<String>, mut items: Vec<FileReference>, pages: usize) -> Self {
        items.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Self {
            folder_path: folder_path.into(),
            items,
            pages,
            built_at: Utc::now(),
        }
    }

    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FileReference> {
        self.items.get(position)
    }

    pub fn items(&self) -> &[FileReference] {
        &self.items
    }

    /// Entries in `range`, clamped to the index bounds.
    pub fn window(&self, range: Range<usize>) -> &[FileReference] {
        let end = range.end.min(self.items.len());
        let start = range.start.min(end);
        &self.items[start..end]
    }

    /// Number of listing pages fetched to build the index.
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

/// An image ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    /// Temporary, directly fetchable URL
    pub access_url: String,
    pub filename: String,
}

/// Result of one `next_batch` call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GalleryBatch {
    pub images: Vec<ResolvedImage>,
    pub has_more: bool,
    /// Lookup paths dropped because their link could not be resolved
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl GalleryBatch {
    /// The batch returned once the index is exhausted.
    pub fn exhausted() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Position of a session within its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryProgress {
    /// Number of index entries already handed out or skipped
    pub offset: usize,
    /// Index length, once built
    pub total: Option<usize>,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::storage::EntryKind;
    use chrono::TimeZone;

    fn reference(name: &str, ts: Option<i64>) -> FileReference {
        FileReference {
            display_path: format!("/P/{}", name),
            lookup_path: format!("/p/{}", name),
            filename: name.to_string(),
            last_modified: ts.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        }
    }

    #[test]
    fn test_index_sorts_newest_first_and_keeps_ties_stable() {
        let index = GalleryIndex::new(
            "/p",
            vec![
                reference("old.jpg", Some(100)),
                reference("undated.jpg", None),
                reference("tie-a.jpg", Some(200)),
                reference("new.jpg", Some(300)),
                reference("tie-b.jpg", Some(200)),
            ],
            1,
        );

        let names: Vec<_> = index.items().iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["new.jpg", "tie-a.jpg", "tie-b.jpg", "old.jpg", "undated.jpg"]
        );
    }

    #[test]
    fn test_window_is_clamped() {
        let index = GalleryIndex::new(
            "",
            (0..5).map(|i| reference(&format!("{i}.jpg"), Some(i))).collect(),
            1,
        );

        assert_eq!(index.window(0..3).len(), 3);
        assert_eq!(index.window(3..6).len(), 2);
        assert!(index.window(7..9).is_empty());
    }

    #[test]
    fn test_file_reference_from_entry() {
        let entry = RemoteEntry {
            kind: EntryKind::File,
            name: "Beach.JPG".to_string(),
            path_display: Some("/Photos/Beach.JPG".to_string()),
            path_lower: Some("/photos/beach.jpg".to_string()),
            client_modified: None,
            server_modified: Some(Utc.timestamp_opt(50, 0).unwrap()),
            size: Some(1),
        };

        let file = FileReference::from_entry(&entry, "/Photos");
        assert_eq!(file.lookup_path, "/photos/beach.jpg");
        assert_eq!(file.display_path, "/Photos/Beach.JPG");
        assert_eq!(file.filename, "Beach.JPG");
        assert_eq!(file.last_modified.unwrap().timestamp(), 50);
    }

    #[test]
    fn test_file_reference_derives_missing_paths() {
        let entry = RemoteEntry {
            kind: EntryKind::File,
            name: "a.png".to_string(),
            path_display: None,
            path_lower: None,
            client_modified: None,
            server_modified: None,
            size: None,
        };

        let file = FileReference::from_entry(&entry, "/Photos");
        assert_eq!(file.lookup_path, "/Photos/a.png");
        assert_eq!(file.display_path, "/Photos/a.png");
    }
}
