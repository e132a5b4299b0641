//! Input items and output records

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Name of the binary property successful file outputs are attached under
pub const OUTPUT_BINARY_PROPERTY: &str = "data";

/// A binary payload carried by an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl BinaryData {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            file_name: None,
            mime_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// One unit of input data
#[derive(Debug, Clone, Default)]
pub struct InputItem {
    /// JSON fields of the item. Requests never read them; per-item
    /// resolvers (`Adapter::execute_with`) use them to derive parameters.
    pub json: Map<String, Value>,
    /// Named binary payloads (e.g. `data`)
    pub binary: HashMap<String, BinaryData>,
}

impl InputItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(mut self, property: impl Into<String>, binary: BinaryData) -> Self {
        self.binary.insert(property.into(), binary);
        self
    }

    pub fn binary(&self, property: &str) -> Option<&BinaryData> {
        self.binary.get(property)
    }
}

/// Binary attachment of an output record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryAttachment {
    /// Property the attachment is stored under
    pub property: String,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Result for one input item
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub json: Map<String, Value>,
    pub binary: Option<BinaryAttachment>,
    /// Index of the input item this record belongs to
    pub paired_item: usize,
}

impl OutputRecord {
    pub fn json(paired_item: usize, json: Map<String, Value>) -> Self {
        Self {
            json,
            binary: None,
            paired_item,
        }
    }

    /// `{"error": message}` record emitted for failed items when failures are collected
    pub fn error(paired_item: usize, message: impl Into<String>) -> Self {
        let mut json = Map::new();
        json.insert("error".to_string(), Value::String(message.into()));
        Self::json(paired_item, json)
    }

    pub fn is_error(&self) -> bool {
        self.json.contains_key("error")
    }

    /// HTTP status merged into the record for remote errors
    pub fn status_code(&self) -> Option<u16> {
        self.json
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
    }
}
