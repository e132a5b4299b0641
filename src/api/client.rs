//! HTTP transport

use super::request::{ApiRequest, MultipartForm, RequestBody};
use super::response::ApiResponse;
use crate::config::AdapterConfig;
use crate::error::{Error, Result};
use futures_util::StreamExt;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use std::future::Future;

/// Sends an [`ApiRequest`] and returns the raw response.
///
/// Status codes are not interpreted here; a 4xx/5xx answer is still `Ok`.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// reqwest-backed transport that authenticates every request with the API key header
pub struct HttpTransport {
    client: reqwest::Client,
    api_key_header: HeaderName,
    api_key: HeaderValue,
    max_response_bytes: u64,
}

impl HttpTransport {
    pub fn new(config: &AdapterConfig) -> Result<Self> {
        let api_key_header =
            HeaderName::from_bytes(config.api_key_header.as_bytes()).map_err(|e| {
                Error::Configuration {
                    reason: format!("invalid API key header name: {}", e),
                }
            })?;

        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| Error::Configuration {
                reason: "API key contains characters not allowed in a header".to_string(),
            })?;
        api_key.set_sensitive(true);

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::HttpRequest)?;

        Ok(Self {
            client,
            api_key_header,
            api_key,
            max_response_bytes: config.max_response_bytes,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .header(self.api_key_header.clone(), self.api_key.clone());

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(into_form(form)?),
        };

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        tracing::debug!(url = %request.url, status, "remote API responded");

        // Check Content-Length header for early rejection
        if let Some(content_length) = response.content_length() {
            if content_length > self.max_response_bytes {
                return Err(Error::ResponseTooLarge {
                    size: content_length,
                    max_size: self.max_response_bytes,
                });
            }
        }

        // Stream the body with incremental size checking to prevent OOM
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Error::HttpRequest)?;
            body.extend_from_slice(&chunk);
            if body.len() as u64 > self.max_response_bytes {
                return Err(Error::ResponseTooLarge {
                    size: body.len() as u64,
                    max_size: self.max_response_bytes,
                });
            }
        }

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

fn into_form(form: MultipartForm) -> Result<Form> {
    let mut multipart = Form::new();
    for (name, value) in form.fields {
        multipart = multipart.text(name, value);
    }
    for file in form.files {
        let part = Part::bytes(file.data)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)?;
        multipart = multipart.part(file.field, part);
    }
    Ok(multipart)
}
