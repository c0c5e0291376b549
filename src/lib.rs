//! # panpath
//!
//! Path-addressed access layer for the 123pan cloud drive.
//!
//! The service only knows numeric identifiers. This crate lets callers use
//! slash-separated paths such as `/学习资料/小猪佩奇全集/1.mp4` and turns
//! them into identifiers by walking folder listings from the root.
//!
//! ## Features
//!
//! - **Browsing**: list the home folder (honouring `default-path` from the
//!   settings file) or any folder by path, with human-readable sizes.
//! - **Mutations**: create folders, delete files or folders, upload files.
//! - **Sharing**: password-less public share links and direct download links.
//! - **Sessions**: login with credentials stored in `settings.json`, lazy
//!   reconnect, and a reload command.
//!
//! Every call lists the folders it walks through, so results always reflect
//! the current state of the drive. No listing is cached between calls.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use panpath::SessionHandle;
//!
//! # async fn example() -> panpath::Result<()> {
//! let session = SessionHandle::open("settings.json");
//! session.login(Some("13800000000"), Some("password")).await?;
//!
//! let home = session.list().await?;
//! for file in &home.file {
//!     println!("{} ({})", file.name, file.size);
//! }
//!
//! session.create_folder("/", "backups").await?;
//! session.upload("notes.txt", "/backups").await?;
//! let link = session.share("/backups/notes.txt").await?;
//! println!("{}", link.share_url);
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Offline
//!
//! [`MemoryStorage`] implements the same storage seam in memory:
//!
//! ```no_run
//! use panpath::{Drive, MemoryStorage, ROOT_ID};
//!
//! # async fn example() -> panpath::Result<()> {
//! let storage = MemoryStorage::new();
//! let docs = storage.add_folder(ROOT_ID, "docs");
//! storage.add_file(docs, "q1.pdf", 2048);
//!
//! let drive = Drive::new(&storage);
//! let listing = drive.list_folder("/docs").await?;
//! assert_eq!(listing.file[0].size, "2.0KB");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod fs;
pub mod http;
pub mod reply;
pub mod session;
pub mod settings;
pub mod storage;

// Re-export commonly used types
pub use api::{ClientConfig, Pan123Client};
pub use error::{PanError, Result};
pub use fs::{
    format_size, DirectoryListing, DownloadLink, Drive, Entry, EntryKind, FileId, FileItem,
    FolderCreated, FolderDeleted, FolderItem, ShareLink, Status, Uploaded, ROOT_ID,
};
pub use session::{Connector, MemoryConnector, Pan123Connector, SessionHandle};
pub use settings::Settings;
pub use storage::{MemoryStorage, RemoteStorage};
