//! Session state: the live client plus the settings file it came from.

use std::path::{Path, PathBuf};

use tracing::info;

use super::connector::Connector;
use crate::error::{PanError, Result};
use crate::fs::{
    DirectoryListing, DownloadLink, Drive, FolderCreated, FolderDeleted, ShareLink, Status,
    Uploaded,
};
use crate::settings::Settings;

/// One authenticated connection to the drive.
///
/// The client is created lazily from the stored credentials on first use and
/// replaced by [`Session::login`] and [`Session::reload`].
pub(crate) struct Session<K: Connector> {
    connector: K,
    settings_path: PathBuf,
    client: Option<K::Client>,
    /// Credentials of the last successful login.
    credentials: Option<(String, String)>,
}

impl<K: Connector> Session<K> {
    pub fn new(connector: K, settings_path: PathBuf) -> Self {
        Self {
            connector,
            settings_path,
            client: None,
            credentials: None,
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    async fn settings(&self) -> Result<Settings> {
        Settings::load(self.settings_path()).await
    }

    /// The current client, signing in with known credentials if needed.
    async fn client(&mut self) -> Result<&K::Client> {
        if self.client.is_none() {
            let (username, password) = match &self.credentials {
                Some(creds) => creds.clone(),
                None => {
                    let settings = self.settings().await?;
                    let (u, p) = settings.credentials().ok_or(PanError::CredentialsMissing)?;
                    (u.to_string(), p.to_string())
                }
            };
            let client = self.connector.connect(&username, &password).await?;
            info!(username = %username, "session connected");
            self.client = Some(client);
            self.credentials = Some((username, password));
        }
        self.client.as_ref().ok_or(PanError::CredentialsMissing)
    }

    /// Sign in, falling back to stored values for missing arguments.
    ///
    /// The settings file is only rewritten when both values were given and
    /// the login succeeded. If that write fails the previous client and
    /// credentials stay in place.
    pub async fn login(
        &mut self,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Status> {
        let mut settings = self.settings().await?;
        let username = username.filter(|u| !u.is_empty());
        let password = password.filter(|p| !p.is_empty());
        let supplied = username.is_some() && password.is_some();

        let use_username = username
            .or_else(|| settings.username.clone())
            .filter(|u| !u.is_empty())
            .ok_or(PanError::CredentialsMissing)?;
        let use_password = password
            .or_else(|| settings.password.clone())
            .filter(|p| !p.is_empty())
            .ok_or(PanError::CredentialsMissing)?;

        let client = self.connector.connect(&use_username, &use_password).await?;

        // The session only switches accounts once the settings are written.
        if supplied {
            settings.username = Some(use_username.clone());
            settings.password = Some(use_password.clone());
            settings.save(&self.settings_path).await?;
        }

        info!(username = %use_username, "logged in");
        self.client = Some(client);
        self.credentials = Some((use_username, use_password));
        Ok(Status::success())
    }

    /// Drop the current client and connect again.
    pub async fn reload(&mut self) -> Result<Status> {
        self.client = None;
        self.client().await?;
        info!("session reloaded");
        Ok(Status::success())
    }

    /// List the home folder: `default-path` if configured, else the root.
    pub async fn list(&mut self) -> Result<DirectoryListing> {
        let settings = self.settings().await?;
        let client = self.client().await?;
        Drive::new(client).list_home(settings.default_path()).await
    }

    pub async fn list_folder(&mut self, path: &str) -> Result<DirectoryListing> {
        Drive::new(self.client().await?).list_folder(path).await
    }

    pub async fn parsing(&mut self, path: &str) -> Result<DownloadLink> {
        Drive::new(self.client().await?).download_link(path).await
    }

    pub async fn share(&mut self, path: &str) -> Result<ShareLink> {
        Drive::new(self.client().await?).share(path).await
    }

    pub async fn upload(&mut self, local_path: &Path, remote_path: &str) -> Result<Uploaded> {
        Drive::new(self.client().await?)
            .upload(local_path, remote_path)
            .await
    }

    pub async fn delete(&mut self, path: &str) -> Result<Status> {
        Drive::new(self.client().await?).delete(path).await
    }

    pub async fn delete_folder(&mut self, path: &str) -> Result<FolderDeleted> {
        Drive::new(self.client().await?).delete_folder(path).await
    }

    pub async fn create_folder(&mut self, parent_path: &str, name: &str) -> Result<FolderCreated> {
        Drive::new(self.client().await?)
            .create_folder(parent_path, name)
            .await
    }
}
