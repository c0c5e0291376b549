//! Path-addressed drive operations, split into focused modules.

mod browse;
mod dir_ops;
mod export;
mod upload;

use serde::Serialize;

use super::entry::Entry;
use super::path::normalize_path;
use super::resolver::PathResolver;
use super::view::DirectoryView;
use crate::error::{PanError, Result};
use crate::storage::RemoteStorage;

pub use export::SHARE_URL_BASE;

const SUCCESS: &str = "success";

/// Path-addressed operations over a [`RemoteStorage`].
///
/// Every call resolves its paths from the root again; listings obtained
/// while resolving are passed along as values, never kept between calls.
pub struct Drive<'a, C: RemoteStorage + ?Sized> {
    client: &'a C,
}

impl<'a, C: RemoteStorage + ?Sized> Drive<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Resolver over the same client.
    pub fn resolver(&self) -> PathResolver<'a, C> {
        PathResolver::new(self.client)
    }

    /// Directory view over the same client.
    pub fn view(&self) -> DirectoryView<'a, C> {
        DirectoryView::new(self.client)
    }

    /// Resolve a path that must name an entry (the root does not count).
    async fn resolve_entry(&self, path: &str) -> Result<(Entry, Vec<Entry>)> {
        let resolved = self.resolver().resolve(path).await?;
        match resolved.entry {
            Some(entry) => Ok((entry, resolved.siblings)),
            None => Err(PanError::NotFound(normalize_path(path))),
        }
    }
}

/// Plain success marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub status: &'static str,
}

impl Status {
    pub fn success() -> Self {
        Self { status: SUCCESS }
    }
}

/// Result of `create_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderCreated {
    pub status: &'static str,
    pub folder_id: String,
}

/// Result of `delete_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderDeleted {
    pub status: &'static str,
    /// Direct children trashed plus the folder itself
    pub deleted_files: usize,
}

/// Result of `upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Uploaded {
    pub status: &'static str,
    pub file_id: String,
}

/// A public share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub share_url: String,
    pub share_key: String,
    pub share_pwd: String,
}

/// A direct download link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub url: String,
}
