use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};

use super::{AnalysisClient, FILE_FIELD, FilePart, HttpReply, TransportFailure};

pub const MAX_REPLY_BODY_SIZE: usize = 8 * 1024 * 1024; // 8MB

/// [`AnalysisClient`] backed by `reqwest`.
///
/// No timeout is configured, a request runs for as long as the transport lets it.
#[derive(Debug, Clone, Default)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
}

impl HttpAnalysisClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn post(&self, url: &str, part: FilePart) -> Result<HttpReply, TransportFailure> {
        let length = part.content.len() as u64;
        let form = Form::new().part(
            FILE_FIELD,
            Part::stream_with_length(part.content, length).file_name(part.file_name),
        );

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        log::debug!("[upload] {} answered {}", url, status);

        let mut stream = response.bytes_stream();
        let mut buffer = BytesMut::with_capacity(8192); // 8KB initial capacity
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(classify)?;
            if buffer.len() + chunk.len() > MAX_REPLY_BODY_SIZE {
                return Err(TransportFailure::Other(format!(
                    "response body exceeds limit (max: {} bytes)",
                    MAX_REPLY_BODY_SIZE
                )));
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(HttpReply::new(status, buffer.freeze()))
    }
}

fn classify(err: reqwest::Error) -> TransportFailure {
    if err.is_connect() || err.is_timeout() {
        TransportFailure::Unreachable(anyhow::Error::new(err))
    } else {
        TransportFailure::Other(err.to_string())
    }
}
