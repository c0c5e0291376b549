//! Persistent settings file (`settings.json`).
//!
//! The file is a flat JSON object. Keys this crate does not know about are
//! kept and written back unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Default file name, relative to the working directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Folder that `list()` shows instead of the drive root.
    #[serde(
        rename = "default-path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Read settings from `path`. A missing file yields empty settings.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match tokio::fs::read(path.as_ref()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write settings to `path` as indented UTF-8 JSON.
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path.as_ref(), text).await?;
        Ok(())
    }

    /// Stored credentials, when both halves are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }

    /// The configured default folder, ignoring an empty value.
    pub fn default_path(&self) -> Option<&str> {
        self.default_path.as_deref().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("settings.json")).await.unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.credentials().is_none());
    }

    #[tokio::test]
    async fn test_unknown_keys_survive_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"username":"u","default-path":"媒体","theme":"dark","retries":3}"#,
        )
        .unwrap();

        let mut settings = Settings::load(&path).await.unwrap();
        assert_eq!(settings.default_path(), Some("媒体"));
        settings.password = Some("p".to_string());
        settings.save(&path).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["retries"], 3);
        assert_eq!(raw["password"], "p");
        assert_eq!(raw["default-path"], "媒体");
        assert!(std::fs::read_to_string(&path).unwrap().contains("媒体"));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Settings::load(&path).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_response");
    }

    #[test]
    fn test_credentials_need_both_halves() {
        let settings = Settings {
            username: Some("u".to_string()),
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(settings.credentials().is_none());

        let settings = Settings {
            username: Some("u".to_string()),
            password: Some("p".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.credentials(), Some(("u", "p")));
    }

    #[test]
    fn test_empty_default_path_ignored() {
        let settings = Settings {
            default_path: Some(String::new()),
            ..Default::default()
        };
        assert!(settings.default_path().is_none());
    }
}
