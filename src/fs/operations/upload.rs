//! Upload operations.

use std::path::Path;

use tracing::debug;

use super::{Drive, Uploaded, SUCCESS};
use crate::error::Result;
use crate::fs::entry::ROOT_ID;
use crate::fs::path::is_root;
use crate::storage::RemoteStorage;

impl<C: RemoteStorage + ?Sized> Drive<'_, C> {
    /// Upload a local file into the folder at `remote_path`.
    ///
    /// # Arguments
    /// * `local_path` - Path to the local file to upload
    /// * `remote_path` - Path to the remote parent folder ("/" for the root)
    pub async fn upload<P: AsRef<Path>>(
        &self,
        local_path: P,
        remote_path: &str,
    ) -> Result<Uploaded> {
        let parent = if is_root(remote_path) {
            ROOT_ID
        } else {
            self.resolve(remote_path).await?
        };

        let entry = self.client.upload(local_path.as_ref(), parent).await?;
        debug!(parent = parent, id = entry.id, "uploaded file");
        Ok(Uploaded {
            status: SUCCESS,
            file_id: entry.id.to_string(),
        })
    }
}
