//! 123pan API client with request/response handling.

use std::path::Path;

use async_trait::async_trait;
use md5::{Digest, Md5};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use super::config::ClientConfig;
use super::error::{unwrap_envelope, ApiStatus};
use crate::error::{PanError, Result};
use crate::fs::{Entry, EntryKind, FileId};
use crate::http::HttpClient;
use crate::storage::{file_id_of, RemoteStorage};

const SIGN_IN: &str = "/b/api/user/sign_in";
const FILE_LIST: &str = "/api/file/list/new";
const DOWNLOAD_INFO: &str = "/a/api/file/download_info";
const TRASH: &str = "/a/api/file/trash";
const UPLOAD_REQUEST: &str = "/b/api/file/upload_request";
const PREPARE_PARTS: &str = "/b/api/file/s3_repare_upload_parts_batch";
const COMPLETE_MULTIPART: &str = "/b/api/file/s3_complete_multipart_upload";
const UPLOAD_COMPLETE: &str = "/b/api/file/upload_complete";

/// Entries requested per listing page.
const PAGE_LIMIT: u32 = 100;

/// Size of one multipart upload chunk (16 MiB).
const PART_SIZE: u64 = 16 * 1024 * 1024;

/// Listing record as the service sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FileInfo {
    file_id: FileId,
    file_name: String,
    #[serde(rename = "Type")]
    kind: i64,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    etag: String,
    #[serde(default)]
    s3_key_flag: String,
    #[serde(default)]
    parent_file_id: FileId,
}

impl From<FileInfo> for Entry {
    fn from(info: FileInfo) -> Self {
        let entry = match EntryKind::from_i64(info.kind) {
            EntryKind::Folder => Entry::folder(info.file_id, info.file_name, info.parent_file_id),
            EntryKind::File => {
                Entry::file(info.file_id, info.file_name, info.size, info.parent_file_id)
            }
        };
        entry.with_backend_meta(info.etag, info.s3_key_flag)
    }
}

impl From<&Entry> for FileInfo {
    fn from(entry: &Entry) -> Self {
        Self {
            file_id: entry.id,
            file_name: entry.name.clone(),
            kind: entry.kind.as_i64(),
            size: entry.size,
            etag: entry.etag.clone(),
            s3_key_flag: entry.s3_key_flag.clone(),
            parent_file_id: entry.parent_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListPage {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    info_list: Vec<FileInfo>,
}

/// Multipart session handed out by an upload request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UploadTarget {
    bucket: String,
    storage_node: String,
    key: String,
    upload_id: String,
    file_id: FileId,
}

/// Authenticated 123pan client.
///
/// Speaks the Android app's dialect of the web API: every request carries
/// the device headers plus the bearer token obtained at sign-in.
#[derive(Debug, Clone)]
pub struct Pan123Client {
    http: HttpClient,
    config: ClientConfig,
    headers: HeaderMap,
}

impl Pan123Client {
    /// Sign in and return a ready client.
    ///
    /// # Arguments
    /// * `config` - Service origin, timeout and proxy
    /// * `username` - Account passport (phone number or email)
    /// * `password` - Account password
    pub async fn login(config: ClientConfig, username: &str, password: &str) -> Result<Self> {
        let http = HttpClient::new(&config)?;
        let mut headers = device_headers();

        let reply = http
            .post_json(
                &config.url(SIGN_IN),
                &headers,
                &json!({ "type": 1, "passport": username, "password": password }),
            )
            .await?;
        let data = unwrap_envelope(reply, &[ApiStatus::Ok, ApiStatus::SignedIn])?;
        let token = data
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| PanError::InvalidResponse("sign-in reply has no token".to_string()))?;

        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| PanError::InvalidResponse("token is not a valid header".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        info!("signed in to {}", config.base_url);

        Ok(Self {
            http,
            config,
            headers,
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn call(&self, endpoint: &str, body: &Value) -> Result<Value> {
        debug!(endpoint = endpoint, "api request");
        let reply = self
            .http
            .post_json(&self.config.url(endpoint), &self.headers, body)
            .await?;
        unwrap_envelope(reply, &[ApiStatus::Ok])
    }

    async fn list_page(&self, parent: FileId, page: u32) -> Result<ListPage> {
        let query = [
            ("driveId", "0".to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("next", "0".to_string()),
            ("orderBy", "file_id".to_string()),
            ("orderDirection", "desc".to_string()),
            ("parentFileId", parent.to_string()),
            ("trashed", "false".to_string()),
            ("SearchData", String::new()),
            ("Page", page.to_string()),
            ("OnlyLookAbnormalFile", "0".to_string()),
        ];
        let reply = self
            .http
            .get_json(&self.config.url(FILE_LIST), &self.headers, &query)
            .await?;
        let data = unwrap_envelope(reply, &[ApiStatus::Ok])?;
        Ok(serde_json::from_value(data)?)
    }

    async fn upload_parts(&self, local_path: &Path, size: u64, target: &Value) -> Result<()> {
        let upload: UploadTarget = serde_json::from_value(target.clone())?;
        let mut file = tokio::fs::File::open(local_path).await?;
        let parts = size.div_ceil(PART_SIZE).max(1);

        for part in 1..=parts {
            let data = self
                .call(
                    PREPARE_PARTS,
                    &json!({
                        "bucket": upload.bucket,
                        "key": upload.key,
                        "uploadId": upload.upload_id,
                        "storageNode": upload.storage_node,
                        "partNumberStart": part,
                        "partNumberEnd": part + 1,
                    }),
                )
                .await?;
            let url = data
                .get("presignedUrls")
                .and_then(|urls| urls.get(part.to_string()))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    PanError::InvalidResponse(format!("no presigned URL for part {}", part))
                })?;

            let mut chunk = Vec::new();
            (&mut file).take(PART_SIZE).read_to_end(&mut chunk).await?;
            self.http.put_bytes(url, chunk).await?;
            debug!(file = upload.file_id, part = part, parts = parts, "uploaded part");
        }

        self.call(COMPLETE_MULTIPART, target).await?;
        self.call(UPLOAD_COMPLETE, &json!({ "fileId": upload.file_id })).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteStorage for Pan123Client {
    async fn list(&self, parent: FileId) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.list_page(parent, page).await?;
            let done = batch.info_list.is_empty();
            entries.extend(batch.info_list.into_iter().map(Entry::from));
            if done || entries.len() as u64 >= batch.total {
                break;
            }
            page += 1;
        }
        debug!(parent = parent, count = entries.len(), "listed folder");
        Ok(entries)
    }

    async fn download_link(&self, entry: &Entry) -> Result<String> {
        let data = self
            .call(
                DOWNLOAD_INFO,
                &json!({
                    "driveId": 0,
                    "etag": entry.etag,
                    "fileId": entry.id,
                    "s3keyFlag": entry.s3_key_flag,
                    "type": entry.kind.as_i64(),
                    "fileName": entry.name,
                    "size": entry.size,
                }),
            )
            .await?;

        let redirect = data
            .get("DownloadUrl")
            .and_then(Value::as_str)
            .ok_or_else(|| PanError::InvalidResponse("missing DownloadUrl".to_string()))?;

        // The first URL is an interstitial; the real link is its redirect target.
        let (location, body) = self.http.get_unfollowed(redirect).await?;
        Ok(location
            .or_else(|| extract_href(&body))
            .unwrap_or_else(|| redirect.to_string()))
    }

    async fn upload(&self, local_path: &Path, parent: FileId) -> Result<Entry> {
        let size = tokio::fs::metadata(local_path).await?.len();
        let name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PanError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("not a file name: {}", local_path.display()),
                ))
            })?
            .to_string();
        let etag = file_md5(local_path).await?;

        let data = self
            .call(
                UPLOAD_REQUEST,
                &json!({
                    "driveId": 0,
                    "etag": etag,
                    "fileName": name,
                    "parentFileId": parent,
                    "size": size,
                    "type": 0,
                    "duplicate": 0,
                }),
            )
            .await?;
        let id = file_id_of(&data)?;

        if data.get("Reuse").and_then(Value::as_bool).unwrap_or(false) {
            debug!(id = id, "server already holds this content");
        } else {
            self.upload_parts(local_path, size, &data).await?;
        }

        Ok(Entry::file(id, name, size, parent).with_backend_meta(etag, String::new()))
    }

    async fn trash(&self, entry: &Entry) -> Result<()> {
        self.call(
            TRASH,
            &json!({
                "driveId": 0,
                "fileTrashInfoList": [FileInfo::from(entry)],
                "operation": true,
            }),
        )
        .await?;
        Ok(())
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.call(endpoint, &body).await
    }
}

fn device_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("123pan/v2.4.0(Android_7.1.2;Xiaomi)"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("osversion", HeaderValue::from_static("Android_7.1.2"));
    headers.insert("platform", HeaderValue::from_static("android"));
    headers.insert("devicetype", HeaderValue::from_static("M2101K9C"));
    headers.insert("x-channel", HeaderValue::from_static("1004"));
    headers.insert("devicename", HeaderValue::from_static("Xiaomi"));
    headers.insert("app-version", HeaderValue::from_static("61"));
    headers.insert("x-app-version", HeaderValue::from_static("2.4.0"));
    if let Ok(uuid) = HeaderValue::from_str(&hex::encode(rand::random::<[u8; 16]>())) {
        headers.insert("loginuuid", uuid);
    }
    headers
}

/// Hex MD5 of a local file, read in chunks.
async fn file_md5(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Pull the target out of an HTML interstitial like `<a href='...'>`.
fn extract_href(body: &str) -> Option<String> {
    for quote in ['\'', '"'] {
        let marker = format!("href={}", quote);
        if let Some(start) = body.find(&marker) {
            let rest = &body[start + marker.len()..];
            if let Some(end) = rest.find(quote) {
                return Some(rest[..end].to_string());
            }
        }
    }
    None
}
