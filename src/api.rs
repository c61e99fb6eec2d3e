pub mod file_transport;
pub mod http_transport;
pub mod request;
pub mod transport;

use crate::decoder::decode_response;
use crate::error::Result;
use crate::normalize::{normalize_records, CallRecord};
use request::QueryWindow;
use transport::CallsTransport;

pub struct CallsClient {
    transport: Box<dyn CallsTransport>,
}

impl CallsClient {
    pub fn new(transport: Box<dyn CallsTransport>) -> Self {
        CallsClient { transport }
    }

    /// Fetch, decode and normalize the inbound calls of one day.
    pub async fn fetch_records(&self, window: &QueryWindow) -> Result<Vec<CallRecord>> {
        let raw = self.transport.fetch(window).await?;
        let json = decode_response(&raw.body, raw.charset.as_deref())?;

        let records = normalize_records(&json);
        tracing::debug!("normalized {} records", records.len());
        Ok(records)
    }
}
