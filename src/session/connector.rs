//! How a session obtains an authenticated storage client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ClientConfig, Pan123Client};
use crate::error::{PanError, Result};
use crate::storage::{MemoryStorage, RemoteStorage};

/// Turns credentials into a live [`RemoteStorage`] client.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Client type produced by a successful login.
    type Client: RemoteStorage + 'static;

    /// Authenticate and return a fresh client.
    async fn connect(&self, username: &str, password: &str) -> Result<Self::Client>;
}

/// Signs in to the real 123pan service.
#[derive(Debug, Clone, Default)]
pub struct Pan123Connector {
    config: ClientConfig,
}

impl Pan123Connector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for Pan123Connector {
    type Client = Pan123Client;

    async fn connect(&self, username: &str, password: &str) -> Result<Pan123Client> {
        Pan123Client::login(self.config.clone(), username, password).await
    }
}

/// Hands out clones of one [`MemoryStorage`].
///
/// Optionally checks credentials, and counts how many logins happened.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    storage: MemoryStorage,
    account: Option<(String, String)>,
    connects: Arc<AtomicUsize>,
}

impl MemoryConnector {
    /// Accept any credentials.
    pub fn new(storage: MemoryStorage) -> Self {
        Self {
            storage,
            ..Default::default()
        }
    }

    /// Accept only `username`/`password`.
    pub fn with_account(mut self, username: &str, password: &str) -> Self {
        self.account = Some((username.to_string(), password.to_string()));
        self
    }

    /// Number of successful connects so far.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    type Client = MemoryStorage;

    async fn connect(&self, username: &str, password: &str) -> Result<MemoryStorage> {
        if let Some((user, pass)) = &self.account {
            if user != username || pass != password {
                return Err(PanError::Api {
                    code: 1,
                    message: "wrong username or password".to_string(),
                });
            }
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        debug!(username = username, "memory login");
        Ok(self.storage.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_connector_checks_account() {
        let connector = MemoryConnector::new(MemoryStorage::new()).with_account("u", "p");
        assert!(connector.connect("u", "wrong").await.is_err());
        assert_eq!(connector.connects(), 0);
        assert!(connector.connect("u", "p").await.is_ok());
        assert_eq!(connector.connects(), 1);
    }

    #[tokio::test]
    async fn test_memory_connector_shares_storage() {
        let storage = MemoryStorage::new();
        let connector = MemoryConnector::new(storage.clone());
        let client = connector.connect("any", "thing").await.unwrap();
        client.add_folder(crate::fs::ROOT_ID, "x");
        assert_eq!(storage.list(crate::fs::ROOT_ID).await.unwrap().len(), 1);
    }
}
