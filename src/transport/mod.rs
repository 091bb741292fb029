use async_trait::async_trait;

use crate::acl::Envelope;
use crate::error::Result;

/// Sends an encoded envelope to a remote agent's communication endpoint and
/// decodes the reply envelope. One synchronous request/response; no delivery
/// guarantees beyond that.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, address: &str, envelope: &Envelope) -> Result<Envelope>;
}

/// HTTP transport: the envelope travels as a single string-valued `content`
/// query parameter and the reply comes back as the response body.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, address: &str, envelope: &Envelope) -> Result<Envelope> {
        let payload = envelope.serialize()?;
        let response = self
            .client
            .get(address)
            .query(&[("content", payload.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        Envelope::parse(&body)
    }
}
