//! JSON rendering of operation results.
//!
//! Successful payloads serialize as-is. Failures become
//! `{"error": "<message>", "kind": "<category>"}`.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{PanError, Result};

/// Render an operation result as a JSON value. Never fails.
pub fn render<T: Serialize>(result: Result<T>) -> Value {
    match result {
        Ok(payload) => serde_json::to_value(payload).unwrap_or_else(|e| error_value(&e.into())),
        Err(e) => error_value(&e),
    }
}

fn error_value(err: &PanError) -> Value {
    json!({ "error": err.to_string(), "kind": err.kind() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{DirectoryListing, FileItem, FolderCreated, FolderItem, Status};

    #[test]
    fn test_render_status() {
        assert_eq!(render(Ok(Status::success())), json!({ "status": "success" }));
    }

    #[test]
    fn test_render_listing() {
        let listing = DirectoryListing {
            folder: vec![FolderItem {
                id: "1".to_string(),
                name: "镜像文件夹".to_string(),
            }],
            file: vec![FileItem {
                id: "4".to_string(),
                name: "win11.iso".to_string(),
                size: "3.5GB".to_string(),
            }],
        };
        assert_eq!(
            render(Ok(listing)),
            json!({
                "folder": [{ "id": "1", "name": "镜像文件夹" }],
                "file": [{ "id": "4", "name": "win11.iso", "size": "3.5GB" }]
            })
        );
    }

    #[test]
    fn test_render_created() {
        let created = FolderCreated {
            status: "success",
            folder_id: "12".to_string(),
        };
        assert_eq!(
            render(Ok(created)),
            json!({ "status": "success", "folder_id": "12" })
        );
    }

    #[test]
    fn test_render_error() {
        let value = render::<Status>(Err(PanError::NotFound("/a/b".to_string())));
        assert_eq!(value["kind"], "not_found");
        assert_eq!(value["error"], "Path not found: /a/b");
        assert!(value.get("status").is_none());
    }
}
