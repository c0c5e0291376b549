//! Path-addressed filesystem layer.

pub(crate) mod entry;
mod operations;
pub(crate) mod path;
mod resolver;
mod view;

pub use entry::{Entry, EntryKind, FileId, ROOT_ID};
pub use operations::{
    DownloadLink, Drive, FolderCreated, FolderDeleted, ShareLink, Status, Uploaded,
    SHARE_URL_BASE,
};
pub use resolver::{PathResolver, Resolved};
pub use view::{format_size, DirectoryListing, DirectoryView, FileItem, FolderItem};
