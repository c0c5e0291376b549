//! 123pan API client and types.

pub mod client;
pub mod config;
pub mod error;

pub use client::Pan123Client;
pub use config::ClientConfig;
pub use error::ApiStatus;
