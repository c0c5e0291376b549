//! Actor-based session runtime.
//!
//! A [`SessionHandle`] is a cheap, cloneable sender. All commands are
//! executed one at a time, in arrival order, by a single task that owns the
//! [`Session`].

use std::path::{Path, PathBuf};

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::connector::{Connector, Pan123Connector};
use super::core::Session;
use crate::api::ClientConfig;
use crate::error::{PanError, Result};
use crate::fs::{
    DirectoryListing, DownloadLink, FolderCreated, FolderDeleted, ShareLink, Status, Uploaded,
};

#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

enum SessionCommand {
    Login {
        username: Option<String>,
        password: Option<String>,
        reply: oneshot::Sender<Result<Status>>,
    },
    List {
        reply: oneshot::Sender<Result<DirectoryListing>>,
    },
    ListFolder {
        path: String,
        reply: oneshot::Sender<Result<DirectoryListing>>,
    },
    Parsing {
        path: String,
        reply: oneshot::Sender<Result<DownloadLink>>,
    },
    Share {
        path: String,
        reply: oneshot::Sender<Result<ShareLink>>,
    },
    Upload {
        local: PathBuf,
        remote: String,
        reply: oneshot::Sender<Result<Uploaded>>,
    },
    Delete {
        path: String,
        reply: oneshot::Sender<Result<Status>>,
    },
    DeleteFolder {
        path: String,
        reply: oneshot::Sender<Result<FolderDeleted>>,
    },
    CreateFolder {
        parent: String,
        name: String,
        reply: oneshot::Sender<Result<FolderCreated>>,
    },
    Reload {
        reply: oneshot::Sender<Result<Status>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

struct SessionActor<K: Connector> {
    session: Session<K>,
    rx: mpsc::Receiver<SessionCommand>,
}

impl SessionHandle {
    /// Start a session against the real service with default settings.
    ///
    /// Nothing is sent over the network until the first command.
    pub fn open<P: AsRef<Path>>(settings_path: P) -> Self {
        Self::spawn(Pan123Connector::default(), settings_path)
    }

    /// Start a session against the real service through a custom config.
    pub fn open_with_config<P: AsRef<Path>>(config: ClientConfig, settings_path: P) -> Self {
        Self::spawn(Pan123Connector::new(config), settings_path)
    }

    /// Start a session with any connector. Must be called inside a tokio runtime.
    pub fn spawn<K: Connector, P: AsRef<Path>>(connector: K, settings_path: P) -> Self {
        let session = Session::new(connector, settings_path.as_ref().to_path_buf());
        SessionActor::spawn(session)
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R>>) -> SessionCommand,
    ) -> Result<R> {
        let (tx, rx) = oneshot::channel();
        let cmd = build(tx);
        self.tx
            .send(cmd)
            .await
            .map_err(|_| PanError::SessionClosed)?;
        rx.await.map_err(|_| PanError::SessionClosed)?
    }

    /// Sign in. Missing values are taken from the settings file; the file is
    /// updated only when both are given.
    pub async fn login(&self, username: Option<&str>, password: Option<&str>) -> Result<Status> {
        self.request(|reply| SessionCommand::Login {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            reply,
        })
        .await
    }

    /// List the home folder (`default-path`, or the root).
    pub async fn list(&self) -> Result<DirectoryListing> {
        self.request(|reply| SessionCommand::List { reply }).await
    }

    pub async fn list_folder(&self, path: &str) -> Result<DirectoryListing> {
        self.request(|reply| SessionCommand::ListFolder {
            path: path.to_string(),
            reply,
        })
        .await
    }

    /// Direct download link for a file.
    pub async fn parsing(&self, path: &str) -> Result<DownloadLink> {
        self.request(|reply| SessionCommand::Parsing {
            path: path.to_string(),
            reply,
        })
        .await
    }

    pub async fn share(&self, path: &str) -> Result<ShareLink> {
        self.request(|reply| SessionCommand::Share {
            path: path.to_string(),
            reply,
        })
        .await
    }

    /// Upload a local file into the remote folder `remote`.
    pub async fn upload<P: AsRef<Path>>(&self, local: P, remote: &str) -> Result<Uploaded> {
        self.request(|reply| SessionCommand::Upload {
            local: local.as_ref().to_path_buf(),
            remote: remote.to_string(),
            reply,
        })
        .await
    }

    pub async fn delete(&self, path: &str) -> Result<Status> {
        self.request(|reply| SessionCommand::Delete {
            path: path.to_string(),
            reply,
        })
        .await
    }

    pub async fn delete_folder(&self, path: &str) -> Result<FolderDeleted> {
        self.request(|reply| SessionCommand::DeleteFolder {
            path: path.to_string(),
            reply,
        })
        .await
    }

    pub async fn create_folder(&self, parent: &str, name: &str) -> Result<FolderCreated> {
        self.request(|reply| SessionCommand::CreateFolder {
            parent: parent.to_string(),
            name: name.to_string(),
            reply,
        })
        .await
    }

    /// Throw away the current client and sign in again.
    pub async fn reload_session(&self) -> Result<Status> {
        self.request(|reply| SessionCommand::Reload { reply }).await
    }

    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        let _ = self.tx.send(SessionCommand::Shutdown { reply: tx }).await;
        let _ = rx.await;
    }
}

impl<K: Connector> SessionActor<K> {
    fn spawn(session: Session<K>) -> SessionHandle {
        let (tx, rx) = mpsc::channel(64);
        let actor = SessionActor { session, rx };
        tokio::spawn(actor.run());
        SessionHandle { tx }
    }

    async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            if self.handle_command(cmd).await {
                break;
            }
        }
        debug!("session actor stopped");
    }

    async fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Login {
                username,
                password,
                reply,
            } => {
                let res = self.session.login(username, password).await;
                let _ = reply.send(res);
            }
            SessionCommand::List { reply } => {
                let res = self.session.list().await;
                let _ = reply.send(res);
            }
            SessionCommand::ListFolder { path, reply } => {
                let res = self.session.list_folder(&path).await;
                let _ = reply.send(res);
            }
            SessionCommand::Parsing { path, reply } => {
                let res = self.session.parsing(&path).await;
                let _ = reply.send(res);
            }
            SessionCommand::Share { path, reply } => {
                let res = self.session.share(&path).await;
                let _ = reply.send(res);
            }
            SessionCommand::Upload {
                local,
                remote,
                reply,
            } => {
                let res = self.session.upload(&local, &remote).await;
                let _ = reply.send(res);
            }
            SessionCommand::Delete { path, reply } => {
                let res = self.session.delete(&path).await;
                let _ = reply.send(res);
            }
            SessionCommand::DeleteFolder { path, reply } => {
                let res = self.session.delete_folder(&path).await;
                let _ = reply.send(res);
            }
            SessionCommand::CreateFolder {
                parent,
                name,
                reply,
            } => {
                let res = self.session.create_folder(&parent, &name).await;
                let _ = reply.send(res);
            }
            SessionCommand::Reload { reply } => {
                let res = self.session.reload().await;
                let _ = reply.send(res);
            }
            SessionCommand::Shutdown { reply } => {
                let _ = reply.send(());
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::ROOT_ID;
    use crate::session::MemoryConnector;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_commands_after_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let handle = SessionHandle::spawn(
            MemoryConnector::new(MemoryStorage::new()),
            dir.path().join("settings.json"),
        );
        handle.shutdown().await;
        let err = handle.list().await.unwrap_err();
        assert!(matches!(err, PanError::SessionClosed));
    }

    #[tokio::test]
    async fn test_clones_share_one_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        storage.add_folder(ROOT_ID, "shared");
        let connector = MemoryConnector::new(storage);
        let handle = SessionHandle::spawn(connector.clone(), dir.path().join("settings.json"));
        let other = handle.clone();

        handle.login(Some("u"), Some("p")).await.unwrap();
        let listing = other.list_folder("/shared").await.unwrap();
        assert!(listing.is_empty());
        assert_eq!(connector.connects(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_commands_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new();
        let handle = SessionHandle::spawn(
            MemoryConnector::new(storage.clone()),
            dir.path().join("settings.json"),
        );
        handle.login(Some("u"), Some("p")).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..8 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle.create_folder("/", &format!("f{}", i)).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        let listing = handle.list().await.unwrap();
        assert_eq!(listing.folder.len(), 8);
    }
}
