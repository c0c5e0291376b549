//! Display-ready directory listings.

use serde::Serialize;

use super::entry::{Entry, EntryKind, FileId};
use crate::error::Result;
use crate::storage::RemoteStorage;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// A folder row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderItem {
    pub id: String,
    pub name: String,
}

/// A file row with its formatted size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileItem {
    pub id: String,
    pub name: String,
    pub size: String,
}

/// Children of a folder, split by kind, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    pub folder: Vec<FolderItem>,
    pub file: Vec<FileItem>,
}

impl DirectoryListing {
    /// Partition entries into folders and files.
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut listing = Self::default();
        for entry in entries {
            match entry.kind {
                EntryKind::Folder => listing.folder.push(FolderItem {
                    id: entry.id.to_string(),
                    name: entry.name.clone(),
                }),
                EntryKind::File => listing.file.push(FileItem {
                    id: entry.id.to_string(),
                    name: entry.name.clone(),
                    size: format_size(entry.size),
                }),
            }
        }
        listing
    }

    /// Whether the folder has no children.
    pub fn is_empty(&self) -> bool {
        self.folder.is_empty() && self.file.is_empty()
    }
}

/// Format a byte count with binary units and one decimal.
///
/// A unit is used only when the count is strictly above it, so exactly
/// 1024 bytes stays "1024B".
pub fn format_size(bytes: u64) -> String {
    if bytes > GIB {
        format!("{:.1}GB", bytes as f64 / GIB as f64)
    } else if bytes > MIB {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    } else if bytes > KIB {
        format!("{:.1}KB", bytes as f64 / KIB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Lists the children of a folder identifier.
pub struct DirectoryView<'a, C: RemoteStorage + ?Sized> {
    client: &'a C,
}

impl<'a, C: RemoteStorage + ?Sized> DirectoryView<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// List and format the immediate children of `id`.
    ///
    /// The identifier is not checked to be a folder; listing a file yields
    /// whatever the backend returns for it.
    pub async fn list_children(&self, id: FileId) -> Result<DirectoryListing> {
        let entries = self.client.list(id).await?;
        Ok(DirectoryListing::from_entries(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::ROOT_ID;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(500), "500B");
        assert_eq!(format_size(1024), "1024B");
        assert_eq!(format_size(1025), "1.0KB");
        assert_eq!(format_size(2048), "2.0KB");
        assert_eq!(format_size(MIB), "1024.0KB");
        assert_eq!(format_size(5 * MIB), "5.0MB");
        assert_eq!(format_size(GIB), "1024.0MB");
        assert_eq!(format_size(3 * GIB), "3.0GB");
        assert_eq!(format_size(3 * GIB + GIB / 2), "3.5GB");
    }

    #[test]
    fn test_partition_keeps_order() {
        let entries = vec![
            Entry::file(4, "b.iso", 3 * GIB, ROOT_ID),
            Entry::folder(1, "images", ROOT_ID),
            Entry::file(2, "a.txt", 10, ROOT_ID),
            Entry::folder(3, "archive", ROOT_ID),
        ];
        let listing = DirectoryListing::from_entries(&entries);

        let folders: Vec<&str> = listing.folder.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(folders, vec!["images", "archive"]);
        assert_eq!(
            listing.file,
            vec![
                FileItem {
                    id: "4".into(),
                    name: "b.iso".into(),
                    size: "3.0GB".into(),
                },
                FileItem {
                    id: "2".into(),
                    name: "a.txt".into(),
                    size: "10B".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_children() {
        let storage = MemoryStorage::new();
        let a = storage.add_folder(ROOT_ID, "a");
        storage.add_file(a, "c.txt", 2048);

        let view = DirectoryView::new(&storage);
        let listing = view.list_children(a).await.unwrap();
        assert!(listing.folder.is_empty());
        assert_eq!(listing.file[0].size, "2.0KB");

        let empty = view.list_children(999).await.unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let listing = DirectoryListing::from_entries(&[Entry::folder(1, "x", ROOT_ID)]);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "folder": [{ "id": "1", "name": "x" }], "file": [] })
        );
    }
}
