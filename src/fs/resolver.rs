//! Path resolution by walking directory listings.

use tracing::debug;

use super::entry::{Entry, FileId, ROOT_ID};
use super::path::{normalize_path, segments};
use crate::error::{PanError, Result};
use crate::storage::RemoteStorage;

/// Outcome of resolving a path.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Identifier of the final segment (`ROOT_ID` for the root)
    pub id: FileId,
    /// The matched entry, `None` for the root
    pub entry: Option<Entry>,
    /// Listing of the parent folder the entry was matched in
    pub siblings: Vec<Entry>,
}

impl Resolved {
    fn root() -> Self {
        Self {
            id: ROOT_ID,
            entry: None,
            siblings: Vec::new(),
        }
    }

    /// Whether the path named the drive root.
    pub fn is_root(&self) -> bool {
        self.entry.is_none()
    }
}

/// Walks slash-separated paths one segment at a time.
///
/// Every call lists each ancestor again starting from the root; nothing is
/// cached between calls, so a path always reflects the drive as it is now.
pub struct PathResolver<'a, C: RemoteStorage + ?Sized> {
    client: &'a C,
}

impl<'a, C: RemoteStorage + ?Sized> PathResolver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Resolve `path` to the identifier of its last segment.
    pub async fn resolve_id(&self, path: &str) -> Result<FileId> {
        Ok(self.resolve(path).await?.id)
    }

    /// Resolve `path`, keeping the matched entry and the listing it came from.
    ///
    /// Issues exactly one listing per segment. The root ("/" or "") needs no
    /// remote call. Names are compared byte for byte; when siblings share a
    /// name the first one listed wins.
    pub async fn resolve(&self, path: &str) -> Result<Resolved> {
        let parts = segments(path);
        let mut resolved = Resolved::root();

        for part in parts {
            let listing = self.client.list(resolved.id).await?;
            let entry = listing
                .iter()
                .find(|e| e.name == part)
                .cloned()
                .ok_or_else(|| PanError::NotFound(normalize_path(path)))?;

            resolved = Resolved {
                id: entry.id,
                entry: Some(entry),
                siblings: listing,
            };
        }

        debug!(path = path, id = resolved.id, "resolved path");
        Ok(resolved)
    }
}

/// Find `id` in a listing.
pub(crate) fn locate(listing: &[Entry], id: FileId) -> Option<&Entry> {
    listing.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn tree() -> (MemoryStorage, FileId, FileId, FileId) {
        let storage = MemoryStorage::new();
        let docs = storage.add_folder(ROOT_ID, "docs");
        let reports = storage.add_folder(docs, "reports");
        let q1 = storage.add_file(reports, "q1.pdf", 2048);
        (storage, docs, reports, q1)
    }

    #[tokio::test]
    async fn test_root_needs_no_calls() {
        let (storage, ..) = tree();
        let resolver = PathResolver::new(&storage);
        for path in ["/", "", "//"] {
            let resolved = resolver.resolve(path).await.unwrap();
            assert_eq!(resolved.id, ROOT_ID);
            assert!(resolved.is_root());
        }
        assert_eq!(storage.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_one_listing_per_segment() {
        let (storage, docs, reports, q1) = tree();
        let resolver = PathResolver::new(&storage);

        assert_eq!(resolver.resolve_id("/docs").await.unwrap(), docs);
        assert_eq!(storage.list_calls(), 1);

        storage.reset_counters();
        assert_eq!(resolver.resolve_id("docs/reports/").await.unwrap(), reports);
        assert_eq!(storage.list_calls(), 2);

        storage.reset_counters();
        let resolved = resolver.resolve("/docs/reports/q1.pdf").await.unwrap();
        assert_eq!(resolved.id, q1);
        assert_eq!(resolved.entry.as_ref().map(|e| e.name.as_str()), Some("q1.pdf"));
        assert!(locate(&resolved.siblings, q1).is_some());
        assert_eq!(storage.list_calls(), 3);
        assert_eq!(storage.total_calls(), 3);
    }

    #[tokio::test]
    async fn test_missing_ancestor_is_not_found() {
        let (storage, docs, ..) = tree();
        let resolver = PathResolver::new(&storage);
        storage.remove(docs);

        let err = resolver.resolve("/docs/reports/q1.pdf").await.unwrap_err();
        assert!(matches!(err, PanError::NotFound(ref p) if p == "/docs/reports/q1.pdf"));
        // Fails on the first segment without listing further.
        storage.reset_counters();
        let _ = resolver.resolve("/docs/reports").await;
        assert_eq!(storage.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let (storage, ..) = tree();
        let resolver = PathResolver::new(&storage);
        assert!(resolver.resolve("/Docs").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_file_accepted_mid_walk() {
        let (storage, _, _, q1) = tree();
        let resolver = PathResolver::new(&storage);
        assert_eq!(resolver.resolve_id("/docs/reports/q1.pdf").await.unwrap(), q1);

        storage.reset_counters();
        let err = resolver.resolve("/docs/reports/q1.pdf/deeper").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.list_calls(), 4);
    }

    #[tokio::test]
    async fn test_duplicate_names_pick_first_listed() {
        let storage = MemoryStorage::new();
        let first = storage.add_folder(ROOT_ID, "dup");
        let _second = storage.add_folder(ROOT_ID, "dup");
        let resolver = PathResolver::new(&storage);
        assert_eq!(resolver.resolve_id("/dup").await.unwrap(), first);
    }
}
