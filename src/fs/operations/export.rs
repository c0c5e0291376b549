//! Download links and public shares.

use serde_json::json;
use tracing::debug;

use super::{DownloadLink, Drive, ShareLink};
use crate::error::{PanError, Result};
use crate::fs::path::normalize_path;
use crate::storage::{RemoteStorage, SHARE_CREATE_ENDPOINT};

/// Public share page prefix; the share key is appended.
pub const SHARE_URL_BASE: &str = "https://www.123pan.com/s";

/// Expiration sent with every share; the service has no "never".
const SHARE_EXPIRATION: &str = "2099-12-12T08:00:00+08:00";

impl<C: RemoteStorage + ?Sized> Drive<'_, C> {
    /// Get a direct download link for the file at `path`.
    ///
    /// Folders are reported as not found.
    pub async fn download_link(&self, path: &str) -> Result<DownloadLink> {
        let (entry, _) = self.resolve_entry(path).await?;
        if !entry.is_file() {
            return Err(PanError::NotFound(normalize_path(path)));
        }

        let url = self.client.download_link(&entry).await?;
        Ok(DownloadLink { url })
    }

    /// Create a password-less public share for the entry at `path`.
    ///
    /// # Example
    /// ```no_run
    /// # use panpath::{Drive, MemoryStorage};
    /// # async fn example() -> panpath::Result<()> {
    /// let storage = MemoryStorage::new();
    /// let drive = Drive::new(&storage);
    /// let link = drive.share("/docs/q1.pdf").await?;
    /// println!("Share: {}", link.share_url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn share(&self, path: &str) -> Result<ShareLink> {
        let (entry, _) = self.resolve_entry(path).await?;

        let data = self
            .client
            .post(
                SHARE_CREATE_ENDPOINT,
                json!({
                    "driveId": 0,
                    "expiration": SHARE_EXPIRATION,
                    "fileIdList": entry.id.to_string(),
                    "shareName": entry.name,
                    "sharePwd": "",
                    "event": "shareCreate"
                }),
            )
            .await?;

        let share_key = data
            .get("ShareKey")
            .and_then(|v| v.as_str())
            .ok_or_else(|| PanError::InvalidResponse("missing ShareKey".to_string()))?
            .to_string();
        debug!(id = entry.id, key = %share_key, "created share");

        Ok(ShareLink {
            share_url: format!("{}/{}", SHARE_URL_BASE, share_key),
            share_key,
            share_pwd: String::new(),
        })
    }
}
