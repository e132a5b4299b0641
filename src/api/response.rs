//! Response shaping
//!
//! Turns a raw [`ApiResponse`] into an [`OutputRecord`]: JSON bodies pass
//! through as objects, binary bodies become an attachment, and error
//! statuses are merged into the JSON as `statusCode`.

use super::request::{BinaryNaming, OutputShape};
use crate::error::{Error, Result};
use crate::item::{BinaryAttachment, OutputRecord, OUTPUT_BINARY_PROPERTY};
use serde_json::{Map, Value};

const FALLBACK_MIME: &str = "application/octet-stream";
const UNPARSABLE_ERROR: &str = "Unable to parse error response";

/// Raw HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Objects pass through; any other JSON value is wrapped as `{"body": value}`.
pub fn to_json_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("body".to_string(), other);
            map
        }
    }
}

/// Interpret a body requested as JSON. Empty bodies give `{}`, non-JSON text
/// is kept verbatim under `body`.
pub fn parse_json_body(bytes: &[u8]) -> Map<String, Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Map::new();
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => to_json_object(value),
        Err(_) => to_json_object(Value::String(
            String::from_utf8_lossy(bytes).trim().to_string(),
        )),
    }
}

/// Best-effort decoding of an error body that was requested as raw bytes.
pub fn parse_error_body(bytes: &[u8]) -> Map<String, Value> {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return error_map(UNPARSABLE_ERROR);
    };

    let text = text.trim();
    if text.is_empty() {
        return Map::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => to_json_object(value),
        Err(_) => error_map(text),
    }
}

fn error_map(message: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("error".to_string(), Value::String(message.to_string()));
    map
}

fn with_status(mut map: Map<String, Value>, status: u16) -> Map<String, Value> {
    map.insert("statusCode".to_string(), Value::from(status));
    map
}

/// File name and MIME type of a successful binary response
fn name_binary(naming: &BinaryNaming, content_type: Option<&str>) -> (String, String) {
    match naming {
        BinaryNaming::Fixed {
            file_name,
            mime_type,
        } => (file_name.clone(), mime_type.clone()),
        BinaryNaming::FromContentType { image_format } => {
            let mime_type = content_type
                .map(str::trim)
                .filter(|ct| !ct.is_empty())
                .unwrap_or(FALLBACK_MIME)
                .to_string();
            let file_name = if mime_type.contains("zip") {
                "pdf-to-images.zip".to_string()
            } else {
                format!("pdf-page.{}", image_format.as_str())
            };
            (file_name, mime_type)
        }
    }
}

/// Shape `response` into the record for item `paired_item`.
///
/// With `fail_on_http_error`, status >= 400 becomes [`Error::RemoteStatus`]
/// instead of a record carrying `statusCode`.
pub fn shape_response(
    response: ApiResponse,
    output: &OutputShape,
    paired_item: usize,
    fail_on_http_error: bool,
) -> Result<OutputRecord> {
    let status = response.status;

    if response.is_error() {
        let body = match output {
            OutputShape::Binary(_) => parse_error_body(&response.body),
            OutputShape::Json => parse_json_body(&response.body),
        };
        if fail_on_http_error {
            return Err(Error::RemoteStatus {
                status,
                body: Value::Object(body),
            });
        }
        return Ok(OutputRecord::json(paired_item, with_status(body, status)));
    }

    match output {
        OutputShape::Json => Ok(OutputRecord::json(
            paired_item,
            parse_json_body(&response.body),
        )),
        OutputShape::Binary(naming) => {
            let (file_name, mime_type) = name_binary(naming, response.content_type.as_deref());
            let mut json = Map::new();
            json.insert("success".to_string(), Value::Bool(true));
            Ok(OutputRecord {
                json,
                binary: Some(BinaryAttachment {
                    property: OUTPUT_BINARY_PROPERTY.to_string(),
                    file_name,
                    mime_type,
                    data: response.body,
                }),
                paired_item,
            })
        }
    }
}
