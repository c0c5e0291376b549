//! Remote entry types.

/// Opaque identifier of a remote file or folder.
pub type FileId = u64;

/// Identifier of the drive root. Top-level entries list it as their parent.
pub const ROOT_ID: FileId = 0;

/// Entry kind, matching the backend's `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EntryKind {
    /// Regular file
    File = 0,
    /// Folder/directory
    Folder = 1,
}

impl EntryKind {
    /// Create from the integer type value used on the wire.
    ///
    /// Anything that is not a folder is treated as a file.
    pub fn from_i64(t: i64) -> Self {
        if t == 1 {
            EntryKind::Folder
        } else {
            EntryKind::File
        }
    }

    /// Integer type value used on the wire.
    pub fn as_i64(&self) -> i64 {
        *self as i64
    }
}

/// A node in the remote drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Identifier, unique within the drive
    pub id: FileId,
    /// Display name, expected to be unique among siblings
    pub name: String,
    /// File or folder
    pub kind: EntryKind,
    /// Size in bytes (0 for folders)
    pub size: u64,
    /// Identifier of the folder this entry is listed under
    pub parent_id: FileId,
    /// Content hash reported by the backend
    pub(crate) etag: String,
    /// Storage flag the backend needs back for downloads and deletes
    pub(crate) s3_key_flag: String,
}

impl Entry {
    /// Build a folder entry.
    pub fn folder(id: FileId, name: impl Into<String>, parent_id: FileId) -> Self {
        Self {
            id,
            name: name.into(),
            kind: EntryKind::Folder,
            size: 0,
            parent_id,
            etag: String::new(),
            s3_key_flag: String::new(),
        }
    }

    /// Build a file entry.
    pub fn file(id: FileId, name: impl Into<String>, size: u64, parent_id: FileId) -> Self {
        Self {
            id,
            name: name.into(),
            kind: EntryKind::File,
            size,
            parent_id,
            etag: String::new(),
            s3_key_flag: String::new(),
        }
    }

    /// Attach backend metadata.
    pub(crate) fn with_backend_meta(mut self, etag: String, s3_key_flag: String) -> Self {
        self.etag = etag;
        self.s3_key_flag = s3_key_flag;
        self
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Check if this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Content hash reported by the backend (empty for folders).
    pub fn etag(&self) -> &str {
        &self.etag
    }
}
