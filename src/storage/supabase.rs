use std::time::Duration;

use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};

use super::{StorageClient, StorageError, UploadedFile};
use crate::config::StorageSettings;

/// Client for the Supabase Storage REST api.
pub struct SupabaseStorage {
    http_client: Client,
    base_url: String,
    bucket: String,
    service_key: SecretString,
}

impl SupabaseStorage {
    pub fn new(settings: StorageSettings) -> Result<Self, StorageError> {
        tracing::info!(bucket = %settings.bucket, "Initializing storage client");
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            base_url: settings.url.trim_end_matches('/').to_owned(),
            bucket: settings.bucket,
            service_key: settings.service_key,
        })
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }
}

impl StorageClient for SupabaseStorage {
    async fn upload_image(&self, file: &UploadedFile, path: &str) -> Result<String, StorageError> {
        tracing::debug!(path, size = file.contents.len(), "Uploading file to storage");
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        let response = self
            .http_client
            .post(self.object_url(path))
            .bearer_auth(self.service_key.expose_secret())
            .header("apikey", self.service_key.expose_secret())
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(file.contents.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(path, "File uploaded to storage");
        Ok(self.public_url(path))
    }
}
