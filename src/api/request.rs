//! Request assembly
//!
//! An operation's prepared body becomes a JSON request when it only carries
//! URLs and scalars, or a multipart form when the item's binary payloads
//! have to be uploaded.

use crate::config::AdapterConfig;
use crate::error::{Error, Result};
use crate::item::InputItem;
use crate::operation::{ImageFormat, Operation};
use reqwest::Method;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

/// Multipart field for single-document uploads
pub const SINGLE_FILE_FIELD: &str = "file";
/// Multipart field for multi-document uploads (merge)
pub const MULTI_FILE_FIELD: &str = "files";

const DEFAULT_UPLOAD_MIME: &str = "application/pdf";

/// Which binary payloads of the item must be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePlan {
    None,
    Single { property: String },
    Multiple { properties: Vec<String> },
}

/// How a successful binary response is named
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryNaming {
    Fixed {
        file_name: String,
        mime_type: String,
    },
    /// MIME type taken from the response; archives get a `.zip` name
    FromContentType { image_format: ImageFormat },
}

/// How the response body is interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputShape {
    Json,
    Binary(BinaryNaming),
}

/// Validated, network-free description of one call
#[derive(Debug, Clone)]
pub struct PreparedCall {
    pub operation: Operation,
    pub body: Map<String, Value>,
    pub files: FilePlan,
    pub output: OutputShape,
    /// Per-call timeout; the configured default applies when absent
    pub timeout: Option<Duration>,
}

/// One uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// Scalar fields as text parts
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// Transport-independent HTTP request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: RequestBody,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn multipart(&self) -> Option<&MultipartForm> {
        match &self.body {
            RequestBody::Multipart(form) => Some(form),
            _ => None,
        }
    }
}

/// Build the HTTP request for `prepared`, pulling binary payloads from `item`.
pub fn build_request(
    prepared: &PreparedCall,
    item: &InputItem,
    config: &AdapterConfig,
) -> Result<ApiRequest> {
    let url = config.endpoint(prepared.operation.path())?;
    let timeout = Some(prepared.timeout.unwrap_or_else(|| config.timeout()));

    let body = match &prepared.files {
        FilePlan::None => RequestBody::Json(Value::Object(prepared.body.clone())),
        FilePlan::Single { property } => {
            let file = file_part(item, property, SINGLE_FILE_FIELD, SINGLE_FILE_FIELD)?;
            RequestBody::Multipart(MultipartForm {
                fields: text_fields(&prepared.body),
                files: vec![file],
            })
        }
        FilePlan::Multiple { properties } => {
            let files = properties
                .iter()
                .map(|property| file_part(item, property, MULTI_FILE_FIELD, property))
                .collect::<Result<Vec<_>>>()?;
            RequestBody::Multipart(MultipartForm {
                fields: text_fields(&prepared.body),
                files,
            })
        }
    };

    Ok(ApiRequest {
        method: Method::POST,
        url,
        body,
        timeout,
    })
}

/// Look up `property` on the item; unnamed payloads are called `<fallback_stem>.pdf`.
fn file_part(
    item: &InputItem,
    property: &str,
    field: &str,
    fallback_stem: &str,
) -> Result<FilePart> {
    let binary = item
        .binary(property)
        .ok_or_else(|| Error::MissingBinaryProperty {
            property: property.to_string(),
        })?;

    Ok(FilePart {
        field: field.to_string(),
        file_name: binary
            .file_name
            .clone()
            .unwrap_or_else(|| format!("{}.pdf", fallback_stem)),
        mime_type: binary
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_UPLOAD_MIME.to_string()),
        data: binary.data.clone(),
    })
}

fn text_fields(body: &Map<String, Value>) -> Vec<(String, String)> {
    body.iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}
