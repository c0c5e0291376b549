//! Folder creation and deletion.

use serde_json::json;
use tracing::{debug, warn};

use super::{Drive, FolderCreated, FolderDeleted, Status, SUCCESS};
use crate::error::{PanError, Result};
use crate::fs::entry::ROOT_ID;
use crate::fs::path::{is_root, join_path, normalize_path, parent_path};
use crate::fs::resolver::locate;
use crate::storage::{file_id_of, RemoteStorage, CREATE_FOLDER_ENDPOINT};

impl<C: RemoteStorage + ?Sized> Drive<'_, C> {
    /// Create a folder named `name` inside `parent_path`.
    ///
    /// # Returns
    /// The identifier the backend assigned to the new folder
    pub async fn create_folder(&self, parent_path: &str, name: &str) -> Result<FolderCreated> {
        let parent_id = if is_root(parent_path) {
            ROOT_ID
        } else {
            match self.resolve(parent_path).await {
                Ok(id) => id,
                Err(e) if e.is_not_found() => {
                    return Err(PanError::ParentNotFound(normalize_path(parent_path)))
                }
                Err(e) => return Err(e),
            }
        };

        let data = self
            .client
            .post(
                CREATE_FOLDER_ENDPOINT,
                json!({
                    "driveId": 0,
                    "etag": "",
                    "fileName": name,
                    "parentFileId": parent_id,
                    "size": 0,
                    "type": 1,
                    "duplicate": 0
                }),
            )
            .await?;

        let folder_id = file_id_of(&data)?;
        debug!(path = %join_path(parent_path, name), folder = folder_id, "created folder");
        Ok(FolderCreated {
            status: SUCCESS,
            folder_id: folder_id.to_string(),
        })
    }

    /// Move a file or folder to the trash.
    pub async fn delete(&self, path: &str) -> Result<Status> {
        // The entry comes from the parent listing made while resolving.
        let (entry, _) = self.resolve_entry(path).await?;

        self.client.trash(&entry).await?;
        debug!(id = entry.id, "trashed entry");
        Ok(Status::success())
    }

    /// Delete a folder: each direct child first, then the folder itself.
    ///
    /// Children are trashed one request at a time. A child that fails is
    /// logged and left out of the count. Grandchildren are not visited; the
    /// backend trashes a non-empty folder as a whole.
    ///
    /// # Returns
    /// Number of entries trashed, the folder included
    pub async fn delete_folder(&self, path: &str) -> Result<FolderDeleted> {
        let (folder, _) = self.resolve_entry(path).await?;
        if !folder.is_folder() {
            return Err(PanError::NotAFolder(normalize_path(path)));
        }

        let mut deleted_files = 0;
        for child in self.client.list(folder.id).await? {
            match self.client.trash(&child).await {
                Ok(()) => deleted_files += 1,
                Err(e) => {
                    warn!(id = child.id, name = %child.name, error = %e, "failed to trash child")
                }
            }
        }

        let parent = parent_path(path);
        let parent_id = self.resolve(&parent).await?;
        let siblings = self.client.list(parent_id).await?;
        let target = locate(&siblings, folder.id)
            .filter(|e| e.is_folder())
            .ok_or(PanError::StaleListing {
                path: parent,
                id: folder.id,
            })?;

        self.client.trash(target).await?;
        deleted_files += 1;

        Ok(FolderDeleted {
            status: SUCCESS,
            deleted_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_create_folder_round_trip() {
        let storage = MemoryStorage::new();
        let drive = Drive::new(&storage);

        let created = drive.create_folder("/", "X").await.unwrap();
        assert_eq!(created.status, "success");
        assert_eq!(drive.resolve("/X").await.unwrap().to_string(), created.folder_id);

        let nested = drive.create_folder("/X", "Y").await.unwrap();
        assert_eq!(drive.resolve("/X/Y").await.unwrap().to_string(), nested.folder_id);
    }

    #[tokio::test]
    async fn test_create_folder_at_root_skips_resolution() {
        let storage = MemoryStorage::new();
        let drive = Drive::new(&storage);
        drive.create_folder("/", "X").await.unwrap();
        assert_eq!(storage.list_calls(), 0);
        assert_eq!(storage.post_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_folder_missing_parent() {
        let storage = MemoryStorage::new();
        let drive = Drive::new(&storage);
        let err = drive.create_folder("/nope", "X").await.unwrap_err();
        assert!(matches!(err, PanError::ParentNotFound(ref p) if p == "/nope"));
        assert_eq!(storage.post_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_folder_backend_rejection() {
        let storage = MemoryStorage::new();
        let drive = Drive::new(&storage);
        drive.create_folder("/", "X").await.unwrap();
        let err = drive.create_folder("/", "X").await.unwrap_err();
        assert!(matches!(err, PanError::Api { .. }));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let storage = MemoryStorage::new();
        let a = storage.add_folder(ROOT_ID, "a");
        let file = storage.add_file(a, "f.txt", 1);
        let drive = Drive::new(&storage);

        drive.delete("/a/f.txt").await.unwrap();
        assert!(!storage.contains(file));

        let err = drive.delete("/a/f.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_root_is_not_found() {
        let storage = MemoryStorage::new();
        let drive = Drive::new(&storage);
        assert!(drive.delete("/").await.unwrap_err().is_not_found());
        assert_eq!(storage.trash_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_folder_counts_direct_children() {
        let storage = MemoryStorage::new();
        let a = storage.add_folder(ROOT_ID, "a");
        storage.add_file(a, "one.txt", 1);
        let b = storage.add_folder(a, "b");
        let c = storage.add_file(b, "c.txt", 1);
        let drive = Drive::new(&storage);

        let report = drive.delete_folder("/a").await.unwrap();
        assert_eq!(report.deleted_files, 3);
        assert!(!storage.contains(a));
        assert!(!storage.contains(c));
        assert_eq!(storage.trash_calls(), 3);
    }

    #[tokio::test]
    async fn test_delete_folder_rejects_files() {
        let storage = MemoryStorage::new();
        storage.add_file(ROOT_ID, "f.txt", 1);
        let drive = Drive::new(&storage);
        let err = drive.delete_folder("/f.txt").await.unwrap_err();
        assert!(matches!(err, PanError::NotAFolder(_)));
        assert_eq!(storage.trash_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_folder_vanished_from_parent() {
        let storage = MemoryStorage::new();
        let docs = storage.add_folder(ROOT_ID, "docs");
        let a = storage.add_folder(docs, "a");
        let x = storage.add_file(a, "x.txt", 1);
        storage.trash_also_removes(x, a);
        let drive = Drive::new(&storage);

        let err = drive.delete_folder("/docs/a").await.unwrap_err();
        match err {
            PanError::StaleListing { path, id } => {
                assert_eq!(path, "/docs");
                assert_eq!(id, a);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(storage.trash_calls(), 1);
    }

    #[tokio::test]
    async fn test_delete_folder_skips_failed_children() {
        let storage = MemoryStorage::new();
        let a = storage.add_folder(ROOT_ID, "a");
        let stuck = storage.add_file(a, "stuck.txt", 1);
        storage.add_file(a, "ok.txt", 1);
        storage.deny_trash(stuck);
        let drive = Drive::new(&storage);

        let report = drive.delete_folder("/a").await.unwrap();
        assert_eq!(report.deleted_files, 2);
        assert!(!storage.contains(a));
    }
}
