//! Outbound side of an upload: the capability the controller posts files through.

pub mod http;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;

use crate::model::SelectedFile;

pub use http::HttpAnalysisClient;

/// Name of the multipart field the analysis service reads the mesh from.
pub const FILE_FIELD: &str = "file";

/// The single body part of an upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content: Bytes,
}

impl From<&SelectedFile> for FilePart {
    fn from(file: &SelectedFile) -> Self {
        Self {
            file_name: file.name().to_string(),
            content: file.content().clone(),
        }
    }
}

/// Whatever the service answered, success or not.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    /// reason phrase, when the transport has one
    pub status_text: Option<String>,
    pub body: Bytes,
}

impl HttpReply {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().map(str::to_string),
            body: body.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportFailure {
    /// the service could not be reached at all
    #[error("Failed to fetch")]
    Unreachable(#[source] anyhow::Error),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// POST `part` as a multipart upload to `url`.
    async fn post(&self, url: &str, part: FilePart) -> Result<HttpReply, TransportFailure>;
}
