use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::ApiClient;

/// Folder used when the caller does not name one.
pub const DEFAULT_UPLOAD_FOLDER: &str = "documents";

/// File storage.
#[derive(Debug, Clone, Copy)]
pub struct FileService<'a> {
    pub(super) client: &'a ApiClient,
}

impl FileService<'_> {
    /// Upload bytes as a multipart `file` field; returns the stored URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is refused or the response carries no
    /// URL.
    pub async fn upload(
        self,
        file_name: &str,
        bytes: Vec<u8>,
        folder_name: Option<&str>,
    ) -> Result<String> {
        let folder = folder_name.unwrap_or(DEFAULT_UPLOAD_FOLDER).to_string();
        debug!("Uploading {} ({} bytes) to '{}'", file_name, bytes.len(), folder);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = Form::new().part("file", part).text("folderName", folder);

        let response: Value = self
            .client
            .post_multipart("/api/files/upload", form)
            .await?;
        let url = stored_url(&response)
            .ok_or_else(|| Error::api(200, "upload response did not include a file URL"))?;

        info!("Uploaded {}", file_name);
        Ok(url)
    }

    /// Read a local file and upload it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the upload fails.
    pub async fn upload_path(self, path: &Path, folder_name: Option<&str>) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        self.upload(&file_name, bytes, folder_name).await
    }
}

/// The backend answers with a bare URL string or an object holding it.
fn stored_url(response: &Value) -> Option<String> {
    match response {
        Value::String(url) => Some(url.clone()),
        Value::Object(fields) => ["fileUrl", "url", "filePath"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(ToString::to_string),
        _ => None,
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
