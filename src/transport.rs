//! # Transport
//!
//! Dispatches one prepared payload as an HTTP POST. Pre-send adjustments
//! are an ordered middleware list applied deterministically just before the
//! send: the raw-body path sets its content-type header, callers can layer
//! their own headers or query parameters on top, and everything composes in
//! push order.
//!
//! The transport adds no retry, timeout, or progress tracking of its own;
//! the HTTP outcome flows back to the caller unmodified.

use reqwest::header::CONTENT_TYPE;

use crate::request::RequestPayload;

/// A pre-send adjustment. Applied in the order registered.
pub type PreSend = Box<dyn Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync>;

pub struct Transport {
    client: reqwest::Client,
    pre_send: Vec<PreSend>,
}

impl Transport {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            pre_send: Vec::new(),
        }
    }

    /// Appends a pre-send adjustment after all previously registered ones.
    pub fn layer(mut self, middleware: PreSend) -> Self {
        self.pre_send.push(middleware);
        self
    }

    /// Sends the payload to `endpoint`. Raw bodies go out byte-for-byte —
    /// the binary-safe send — with their boundary-bearing content type.
    pub async fn dispatch(
        &self,
        endpoint: &str,
        payload: RequestPayload,
    ) -> Result<reqwest::Response, reqwest::Error> {
        tracing::info!(endpoint, "sending file");
        let builder = match payload {
            RequestPayload::Structured(form) => self.client.post(endpoint).multipart(form),
            RequestPayload::Raw { content_type, body } => self
                .client
                .post(endpoint)
                .header(CONTENT_TYPE, content_type)
                .body(body),
        };
        self.apply(builder).send().await
    }

    fn apply(&self, mut builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for middleware in &self.pre_send {
            builder = middleware(builder);
        }
        builder
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("pre_send_layers", &self.pre_send.len())
            .finish_non_exhaustive()
    }
}
