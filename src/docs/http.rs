use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::backend::{ApiError, ApiResult, DocsBackend};
use super::schema::{
    AskRequest, AskResponse, ClearReceipt, ErrorBody, FileListResponse, FileRecord,
    UploadReceipt, UploadRequest,
};

/// Talks to the ingestion server over HTTP.
///
/// Every request is bounded by the client timeout and raced against a
/// cancellation token, so a stuck server never pins a control in its busy state.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
    cancel: CancellationToken,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Self::with_cancellation(base_url, timeout, CancellationToken::new())
    }

    pub fn with_cancellation(
        base_url: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("docask/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            cancel,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Abort every in-flight and future request with [`ApiError::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T, F>(&self, endpoint: &'static str, request: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: Future<Output = reqwest::Result<reqwest::Response>>,
    {
        let exchange = async {
            let response = request.await.map_err(classify)?;
            read_json::<T>(response).await
        };
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            result = exchange => result,
        };
        if let Err(e) = &result {
            tracing::debug!(endpoint, error = %e, "request failed");
        }
        result
    }
}

#[async_trait]
impl DocsBackend for HttpBackend {
    async fn upload(&self, request: UploadRequest) -> ApiResult<UploadReceipt> {
        let size = request.size();
        let part = Part::bytes(request.bytes)
            .file_name(request.file_name.clone())
            .mime_str(&request.media_type)
            .map_err(|e| ApiError::Transport(format!("invalid media type: {e}")))?;
        let form = Form::new().part("file", part);
        tracing::debug!(file = %request.file_name, bytes = size, "uploading");
        self.send(
            "/upload",
            self.http.post(self.url("/upload")).multipart(form).send(),
        )
        .await
    }

    async fn list_files(&self) -> ApiResult<Vec<FileRecord>> {
        let listing: FileListResponse = self
            .send("/files", self.http.get(self.url("/files")).send())
            .await?;
        Ok(listing.into_files())
    }

    async fn clear(&self) -> ApiResult<String> {
        let receipt: ClearReceipt = self
            .send("/clear", self.http.post(self.url("/clear")).send())
            .await?;
        Ok(receipt.message)
    }

    async fn ask(&self, question: &str) -> ApiResult<String> {
        let body = AskRequest {
            question: question.to_string(),
        };
        let response: AskResponse = self
            .send("/ask", self.http.post(self.url("/ask")).json(&body).send())
            .await?;
        Ok(response.answer)
    }
}

fn classify(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e.to_string())
    }
}

/// Turn a response into `T`, or into the error its status and body describe.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase);
    let body = response.bytes().await.map_err(classify)?;

    if !status.is_success() {
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: ErrorBody::message_from(&body),
        });
    }

    if let Some(content_type) = content_type.as_deref() {
        if !content_type.contains("json") {
            return Err(ApiError::Malformed(format!(
                "expected JSON, got {content_type}"
            )));
        }
    }

    serde_json::from_slice(&body).map_err(|e| ApiError::Malformed(e.to_string()))
}
