// replays a response saved on disk (e.g. a previous diagnostic dump)
use crate::api::request::QueryWindow;
use crate::api::transport::{CallsTransport, RawResponse};
use crate::error::{QueryError, Result};
use std::path::PathBuf;

pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTransport { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CallsTransport for FileTransport {
    async fn fetch(&self, window: &QueryWindow) -> Result<RawResponse> {
        tracing::info!(
            "replaying {} for {}",
            self.path.display(),
            window.date().format("%d/%m/%Y")
        );
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| QueryError::ReadFailure {
                path: self.path.clone(),
                source,
            })?;
        // No header to declare a charset; the decoder detects it.
        Ok(RawResponse {
            body,
            charset: None,
        })
    }
}
