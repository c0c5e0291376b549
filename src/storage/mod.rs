//! Remote storage seam.
//!
//! Everything above this trait works purely in terms of identifiers and
//! [`Entry`] values. [`crate::api::Pan123Client`] talks to the real service and
//! [`MemoryStorage`] keeps a drive in memory.

mod memory;

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{PanError, Result};
use crate::fs::{Entry, FileId};

pub use memory::MemoryStorage;

/// Raw endpoint for folder creation (an upload request with `type: 1`).
pub const CREATE_FOLDER_ENDPOINT: &str = "/b/api/file/upload_request";

/// Raw endpoint for share creation.
pub const SHARE_CREATE_ENDPOINT: &str = "/a/api/share/create";

/// Primitives the path layer needs from a storage backend.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// List the immediate children of `parent`, in backend order.
    async fn list(&self, parent: FileId) -> Result<Vec<Entry>>;

    /// Direct download link for a file entry taken from a listing.
    async fn download_link(&self, entry: &Entry) -> Result<String>;

    /// Upload a local file into the folder `parent`.
    async fn upload(&self, local_path: &Path, parent: FileId) -> Result<Entry>;

    /// Move an entry taken from a listing to the trash.
    async fn trash(&self, entry: &Entry) -> Result<()>;

    /// Authenticated raw POST. Returns the `data` member of a successful reply.
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value>;
}

/// Read the `FileId` of a created entry, as a number or a numeric string,
/// either at the top level or under `Info`.
pub(crate) fn file_id_of(data: &Value) -> Result<FileId> {
    let id = data
        .get("FileId")
        .or_else(|| data.get("Info").and_then(|i| i.get("FileId")));
    id.and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .ok_or_else(|| PanError::InvalidResponse("missing FileId".to_string()))
}
