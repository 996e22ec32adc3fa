//! Remote object storage for question and choice images.

mod supabase;

use std::future::Future;

use axum::body::Bytes;
use thiserror::Error;

pub use supabase::SupabaseStorage;

/// A file received from a client, held in memory until it is uploaded.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub contents: Bytes,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage rejected the upload with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

pub trait StorageClient: Send + Sync {
    /// Stores `file` under the object path `path` and returns the url it can
    /// be fetched from. The returned url always ends with `path`.
    fn upload_image(
        &self,
        file: &UploadedFile,
        path: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}
