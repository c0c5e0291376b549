//! Session management.

pub mod actor;
mod connector;
mod core;

pub use actor::SessionHandle;
pub use connector::{Connector, MemoryConnector, Pan123Connector};
