//! Listing helpers.

use super::Drive;
use crate::error::{PanError, Result};
use crate::fs::entry::{FileId, ROOT_ID};
use crate::fs::path::{is_root, normalize_path};
use crate::fs::view::DirectoryListing;
use crate::storage::RemoteStorage;

impl<C: RemoteStorage + ?Sized> Drive<'_, C> {
    /// Resolve a path to its identifier.
    pub async fn resolve(&self, path: &str) -> Result<FileId> {
        self.resolver().resolve_id(path).await
    }

    /// List the home folder.
    ///
    /// # Arguments
    /// * `default_path` - Configured home folder; `None` or "/" lists the root
    pub async fn list_home(&self, default_path: Option<&str>) -> Result<DirectoryListing> {
        let id = match default_path.filter(|p| !is_root(p)) {
            Some(path) => self.home_id(path).await?,
            None => ROOT_ID,
        };
        self.view().list_children(id).await
    }

    /// List the folder at `path`.
    pub async fn list_folder(&self, path: &str) -> Result<DirectoryListing> {
        let id = self.resolve(path).await?;
        self.view().list_children(id).await
    }

    async fn home_id(&self, path: &str) -> Result<FileId> {
        let invalid = || PanError::InvalidDefaultRoot(normalize_path(path));
        let resolved = match self.resolver().resolve(path).await {
            Ok(resolved) => resolved,
            Err(e) if e.is_not_found() => return Err(invalid()),
            Err(e) => return Err(e),
        };
        match resolved.entry {
            Some(entry) if entry.is_folder() => Ok(entry.id),
            _ => Err(invalid()),
        }
    }
}
