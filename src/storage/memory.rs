//! In-memory drive, intended primarily for testing and offline demos.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{RemoteStorage, CREATE_FOLDER_ENDPOINT, SHARE_CREATE_ENDPOINT};
use crate::error::{PanError, Result};
use crate::fs::{Entry, EntryKind, FileId, ROOT_ID};

#[derive(Default)]
struct Tree {
    entries: Vec<Entry>,
    last_id: FileId,
    shares: Vec<(String, FileId)>,
    deny_trash: HashSet<FileId>,
    /// Extra subtrees removed when the key entry is trashed.
    trash_also: Vec<(FileId, FileId)>,
}

impl Tree {
    fn get(&self, id: FileId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn is_folder(&self, id: FileId) -> bool {
        id == ROOT_ID || self.get(id).is_some_and(|e| e.is_folder())
    }

    fn insert(&mut self, parent: FileId, name: &str, kind: EntryKind, size: u64) -> FileId {
        self.last_id += 1;
        let id = self.last_id;
        let entry = match kind {
            EntryKind::Folder => Entry::folder(id, name, parent),
            EntryKind::File => Entry::file(id, name, size, parent),
        };
        self.entries.push(entry);
        id
    }

    /// Remove an entry together with everything below it.
    fn remove_subtree(&mut self, id: FileId) -> usize {
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i];
            doomed.extend(
                self.entries
                    .iter()
                    .filter(|e| e.parent_id == current)
                    .map(|e| e.id),
            );
            i += 1;
        }
        let before = self.entries.len();
        self.entries.retain(|e| !doomed.contains(&e.id));
        before - self.entries.len()
    }
}

#[derive(Default)]
struct CallCounters {
    list: AtomicUsize,
    post: AtomicUsize,
    trash: AtomicUsize,
    upload: AtomicUsize,
    link: AtomicUsize,
}

/// A drive held in memory.
///
/// Clones share the same tree, so a test can keep one handle for inspection
/// while another is owned by a session. Trashing a folder removes its whole
/// subtree, like the real service does.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tree: Arc<RwLock<Tree>>,
    calls: Arc<CallCounters>,
}

impl MemoryStorage {
    /// Create a new empty drive.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a folder under `parent` without any name checks.
    pub fn add_folder(&self, parent: FileId, name: &str) -> FileId {
        self.write().insert(parent, name, EntryKind::Folder, 0)
    }

    /// Add a file under `parent` without any name checks.
    pub fn add_file(&self, parent: FileId, name: &str, size: u64) -> FileId {
        self.write().insert(parent, name, EntryKind::File, size)
    }

    /// Remove an entry and its descendants, bypassing the trash primitive.
    pub fn remove(&self, id: FileId) -> usize {
        self.write().remove_subtree(id)
    }

    /// Make every later trash request for `id` fail.
    pub fn deny_trash(&self, id: FileId) {
        self.write().deny_trash.insert(id);
    }

    /// When `trigger` is trashed, also remove `other` and its descendants.
    ///
    /// Simulates a concurrent change on the server.
    pub fn trash_also_removes(&self, trigger: FileId, other: FileId) {
        self.write().trash_also.push((trigger, other));
    }

    /// Whether an entry with this identifier exists.
    pub fn contains(&self, id: FileId) -> bool {
        self.read().get(id).is_some()
    }

    /// Look up an entry by identifier.
    pub fn entry(&self, id: FileId) -> Option<Entry> {
        self.read().get(id).cloned()
    }

    /// Share keys handed out so far, with the shared entry.
    pub fn shares(&self) -> Vec<(String, FileId)> {
        self.read().shares.clone()
    }

    /// Number of `list` calls served.
    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::SeqCst)
    }

    /// Number of raw `post` calls served.
    pub fn post_calls(&self) -> usize {
        self.calls.post.load(Ordering::SeqCst)
    }

    /// Number of `trash` calls served.
    pub fn trash_calls(&self) -> usize {
        self.calls.trash.load(Ordering::SeqCst)
    }

    /// Total remote calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.list_calls()
            + self.post_calls()
            + self.trash_calls()
            + self.calls.upload.load(Ordering::SeqCst)
            + self.calls.link.load(Ordering::SeqCst)
    }

    /// Reset all call counters to zero.
    pub fn reset_counters(&self) {
        for counter in [
            &self.calls.list,
            &self.calls.post,
            &self.calls.trash,
            &self.calls.upload,
            &self.calls.link,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }

    fn create_folder(&self, body: &Value) -> Result<Value> {
        let parent = body
            .get("parentFileId")
            .and_then(Value::as_u64)
            .ok_or_else(|| api_error(2, "parentFileId missing"))?;
        let name = body
            .get("fileName")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| api_error(2, "fileName missing"))?;
        if body.get("type").and_then(Value::as_i64) != Some(1) {
            return Err(api_error(2, "only folder requests are accepted here"));
        }

        let mut tree = self.write();
        if !tree.is_folder(parent) {
            return Err(api_error(1, "parent folder not found"));
        }
        if tree
            .entries
            .iter()
            .any(|e| e.parent_id == parent && e.name == name)
        {
            return Err(api_error(1, "name already exists"));
        }
        let id = tree.insert(parent, name, EntryKind::Folder, 0);
        Ok(json!({ "FileId": id, "Reuse": false }))
    }

    fn create_share(&self, body: &Value) -> Result<Value> {
        let id = body
            .get("fileIdList")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<FileId>().ok())
            .ok_or_else(|| api_error(2, "fileIdList missing"))?;

        let mut tree = self.write();
        if tree.get(id).is_none() {
            return Err(api_error(1, "file not found"));
        }
        let key = format!("mem{}", tree.shares.len() + 1);
        tree.shares.push((key.clone(), id));
        Ok(json!({ "ShareKey": key }))
    }
}

fn api_error(code: i64, message: &str) -> PanError {
    PanError::Api {
        code,
        message: message.to_string(),
    }
}

#[async_trait]
impl RemoteStorage for MemoryStorage {
    async fn list(&self, parent: FileId) -> Result<Vec<Entry>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        debug!(parent = parent, "memory list");
        Ok(self
            .read()
            .entries
            .iter()
            .filter(|e| e.parent_id == parent)
            .cloned()
            .collect())
    }

    async fn download_link(&self, entry: &Entry) -> Result<String> {
        self.calls.link.fetch_add(1, Ordering::SeqCst);
        if !self.contains(entry.id) {
            return Err(api_error(1, "file not found"));
        }
        Ok(format!("memory://{}/{}", entry.id, entry.name))
    }

    async fn upload(&self, local_path: &Path, parent: FileId) -> Result<Entry> {
        self.calls.upload.fetch_add(1, Ordering::SeqCst);
        let metadata = tokio::fs::metadata(local_path).await?;
        let name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
            })?;

        let mut tree = self.write();
        if !tree.is_folder(parent) {
            return Err(api_error(1, "parent folder not found"));
        }
        let id = tree.insert(parent, &name, EntryKind::File, metadata.len());
        Ok(Entry::file(id, name, metadata.len(), parent))
    }

    async fn trash(&self, entry: &Entry) -> Result<()> {
        self.calls.trash.fetch_add(1, Ordering::SeqCst);
        let mut tree = self.write();
        if tree.deny_trash.contains(&entry.id) {
            return Err(api_error(403, "trash rejected"));
        }
        if tree.remove_subtree(entry.id) == 0 {
            return Err(api_error(1, "file not found"));
        }
        let linked: Vec<FileId> = tree
            .trash_also
            .iter()
            .filter(|(trigger, _)| *trigger == entry.id)
            .map(|(_, other)| *other)
            .collect();
        for other in linked {
            tree.remove_subtree(other);
        }
        Ok(())
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.calls.post.fetch_add(1, Ordering::SeqCst);
        debug!(endpoint = endpoint, "memory post");
        match endpoint {
            CREATE_FOLDER_ENDPOINT => self.create_folder(&body),
            SHARE_CREATE_ENDPOINT => self.create_share(&body),
            _ => Err(api_error(404, "unknown endpoint")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let storage = MemoryStorage::new();
        let b = storage.add_file(ROOT_ID, "b.txt", 1);
        let a = storage.add_folder(ROOT_ID, "a");
        let listed = storage.list(ROOT_ID).await.unwrap();
        let ids: Vec<FileId> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b, a]);
        assert_eq!(storage.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_trash_removes_subtree() {
        let storage = MemoryStorage::new();
        let a = storage.add_folder(ROOT_ID, "a");
        let b = storage.add_folder(a, "b");
        let c = storage.add_file(b, "c.txt", 10);

        let entry = storage.entry(a).unwrap();
        storage.trash(&entry).await.unwrap();
        assert!(!storage.contains(a));
        assert!(!storage.contains(b));
        assert!(!storage.contains(c));

        let err = storage.trash(&entry).await.unwrap_err();
        assert_eq!(err.kind(), "remote_api");
    }

    #[tokio::test]
    async fn test_create_folder_rejects_duplicates() {
        let storage = MemoryStorage::new();
        let body = json!({ "parentFileId": 0, "fileName": "X", "type": 1 });
        let data = storage.post(CREATE_FOLDER_ENDPOINT, body.clone()).await.unwrap();
        assert!(data["FileId"].as_u64().is_some());

        let err = storage.post(CREATE_FOLDER_ENDPOINT, body).await.unwrap_err();
        assert!(matches!(err, PanError::Api { code: 1, .. }));
    }

    #[tokio::test]
    async fn test_create_share() {
        let storage = MemoryStorage::new();
        let id = storage.add_file(ROOT_ID, "a.txt", 3);
        let data = storage
            .post(SHARE_CREATE_ENDPOINT, json!({ "fileIdList": id.to_string() }))
            .await
            .unwrap();
        assert_eq!(data["ShareKey"], "mem1");
        assert_eq!(storage.shares(), vec![("mem1".to_string(), id)]);
    }

    #[tokio::test]
    async fn test_unknown_endpoint() {
        let storage = MemoryStorage::new();
        let err = storage.post("/nope", json!({})).await.unwrap_err();
        assert!(matches!(err, PanError::Api { code: 404, .. }));
    }
}
