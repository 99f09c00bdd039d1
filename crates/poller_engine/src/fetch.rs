use std::time::Duration;

use futures_util::StreamExt;
use poller_core::PollRequest;
use poller_logging::poller_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::decode::decode_fragment;
use crate::{FailureKind, FetchError, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Server root; requests go to `{base_url}/submission/{id}/{since}`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 1024 * 1024,
        }
    }
}

/// Asks the server whether a submission changed since a point in time.
#[async_trait::async_trait]
pub trait SubmissionFetcher: Send + Sync {
    async fn fetch(&self, request: &PollRequest) -> Result<FetchOutput, FetchError>;
}

/// HTTP transport shared by every row poller; the client pools connections.
#[derive(Debug, Clone)]
pub struct ReqwestSubmissionFetcher {
    settings: FetchSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestSubmissionFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be a base url"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    /// Appends the request's segments to the base path, percent-encoding each.
    pub fn request_url(&self, request: &PollRequest) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base url cannot be a base"))?
            .pop_if_empty()
            .extend(request.path_segments());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl SubmissionFetcher for ReqwestSubmissionFetcher {
    async fn fetch(&self, request: &PollRequest) -> Result<FetchOutput, FetchError> {
        let url = self.request_url(request)?;

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        // The body is treated as HTML whatever the declared type.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: next_len,
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_fragment(&bytes, content_type.as_deref());
        if decoded.had_errors {
            poller_debug!(
                "Submission {} body had malformed {} sequences; replaced",
                request.submission_id,
                decoded.encoding_label
            );
        }

        Ok(FetchOutput {
            body: decoded.html,
            status: status.as_u16(),
            content_type,
            byte_len: bytes.len() as u64,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
