//! Typed parameter records, one per operation

use super::{Operation, OutputMode};
use crate::api::{BinaryNaming, FilePlan, OutputShape, PreparedCall};
use crate::config::AdapterConfig;
use crate::error::{Error, Result};
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Merge needs at least this many documents
pub const MIN_MERGE_SOURCES: usize = 2;
/// Upper bound on URLs per merge
pub const MAX_MERGE_URLS: usize = 15;
/// Upper bound on image URLs per image-to-PDF conversion
pub const MAX_IMAGE_URLS: usize = 100;

/// Document source of a single-document operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum InputSource {
    /// Publicly reachable document URL
    Url {
        /// URL of the PDF file
        url: String,
    },
    /// Binary payload attached to the input item
    Binary {
        /// Name of the item's binary property holding the file (null or blank: "data")
        binary_property: String,
    },
}

impl<'de> Deserialize<'de> for InputSource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        let Some(obj) = value.as_object() else {
            return Err(serde::de::Error::custom(format!(
                "Invalid input: expected an object with \"url\" or \"binary_property\", but got {}",
                json_kind(&value)
            )));
        };

        if let Some(v) = obj.get("url") {
            return match v.as_str() {
                Some(s) => Ok(InputSource::Url { url: s.to_string() }),
                None => Err(serde::de::Error::custom("\"url\" must be a string")),
            };
        }
        if let Some(v) = obj.get("binary_property") {
            return match v {
                Value::String(s) if !s.trim().is_empty() => Ok(InputSource::Binary {
                    binary_property: s.to_string(),
                }),
                Value::String(_) | Value::Null => Ok(InputSource::Binary {
                    binary_property: default_binary_property(),
                }),
                _ => Err(serde::de::Error::custom(
                    "\"binary_property\" must be a string",
                )),
            };
        }

        let keys: Vec<&String> = obj.keys().collect();
        Err(serde::de::Error::custom(format!(
            "Invalid input: expected an object with \"url\" or \"binary_property\", but got keys: {:?}",
            keys
        )))
    }
}

impl InputSource {
    /// Put the URL under `url_key` or plan a single-file upload.
    fn apply(&self, body: &mut Map<String, Value>, url_key: &str) -> FilePlan {
        match self {
            InputSource::Url { url } => {
                body.insert(url_key.to_string(), Value::String(url.clone()));
                FilePlan::None
            }
            InputSource::Binary { binary_property } => FilePlan::Single {
                property: binary_property.trim().to_string(),
            },
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
        Value::Object(_) => "an object",
    }
}

/// Accept either a JSON array or a comma-separated string; trim and drop blanks.
fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    list_from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

fn list_from_value(value: Value) -> std::result::Result<Vec<String>, String> {
    let raw: Vec<String> = match value {
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(values) => values
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s),
                other => Err(format!(
                    "list entries must be strings, got {}",
                    json_kind(&other)
                )),
            })
            .collect::<std::result::Result<_, _>>()?,
        Value::Null => Vec::new(),
        other => {
            return Err(format!(
                "expected a list or a comma-separated string, got {}",
                json_kind(&other)
            ))
        }
    };
    Ok(clean_list(raw))
}

fn clean_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn check_output(operation: Operation, mode: OutputMode) -> Result<()> {
    if operation.supports_output(mode) {
        Ok(())
    } else {
        Err(Error::Validation {
            reason: format!(
                "Output mode \"{}\" is not supported by {}",
                mode.as_str(),
                operation
            ),
        })
    }
}

fn pdf_output(mode: OutputMode, file_name: impl Into<String>) -> OutputShape {
    match mode {
        OutputMode::File => OutputShape::Binary(BinaryNaming::Fixed {
            file_name: file_name.into(),
            mime_type: "application/pdf".to_string(),
        }),
        _ => OutputShape::Json,
    }
}

fn default_binary_property() -> String {
    "data".to_string()
}

fn default_output_filename() -> String {
    "document".to_string()
}

fn default_true() -> bool {
    true
}

fn default_wait_till() -> u64 {
    10_000
}

fn default_file_output() -> OutputMode {
    OutputMode::File
}

// ============================================================================
// PDF creation
// ============================================================================

/// Extra key/value pair forwarded to the HTML renderer
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DynamicParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct HtmlToPdfParams {
    /// HTML markup to render
    pub html_content: String,
    /// Stylesheet applied to the markup
    #[serde(default)]
    pub css_content: String,
    /// Viewport width in pixels (default from configuration: 1080)
    #[serde(default)]
    pub viewport_width: Option<u32>,
    /// Viewport height in pixels (default from configuration: 720)
    #[serde(default)]
    pub viewport_height: Option<u32>,
    /// "url" or "file"
    #[serde(default)]
    pub output_format: OutputMode,
    /// File name without extension (default: "document")
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    /// Request timeout in seconds (default from configuration: 300)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Template parameters; entries with an empty key are ignored
    #[serde(default)]
    pub dynamic_params: Vec<DynamicParam>,
}

impl HtmlToPdfParams {
    fn prepare(&self, config: &AdapterConfig) -> Result<PreparedCall> {
        check_output(Operation::HtmlToPdf, self.output_format)?;

        let mut body = object(json!({
            "output_filename": self.output_filename,
            "html_content": self.html_content,
            "css_content": self.css_content,
            "viewPortWidth": self.viewport_width.unwrap_or(config.default_viewport_width),
            "viewPortHeight": self.viewport_height.unwrap_or(config.default_viewport_height),
            "output_format": self.output_format.as_str(),
        }));

        let mapped: Vec<Value> = self
            .dynamic_params
            .iter()
            .filter(|p| !p.key.is_empty())
            .map(|p| {
                let mut entry = Map::new();
                entry.insert(p.key.clone(), Value::String(p.value.clone()));
                Value::Object(entry)
            })
            .collect();
        if !mapped.is_empty() {
            body.insert("dynamic_params".to_string(), Value::Array(mapped));
        }

        Ok(PreparedCall {
            operation: Operation::HtmlToPdf,
            body,
            files: FilePlan::None,
            output: pdf_output(self.output_format, format!("{}.pdf", self.output_filename)),
            timeout: Some(Duration::from_secs(
                self.timeout_secs.unwrap_or(config.timeout_secs),
            )),
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UrlToPdfParams {
    /// Page to capture
    pub url: String,
    /// Capture the full scrollable page (default: true)
    #[serde(default = "default_true")]
    pub full_page: bool,
    /// Milliseconds to wait before capturing (default: 10000)
    #[serde(default = "default_wait_till")]
    pub wait_till: u64,
    /// Viewport width in pixels (default from configuration: 1080)
    #[serde(default)]
    pub viewport_width: Option<u32>,
    /// Viewport height in pixels (default from configuration: 720)
    #[serde(default)]
    pub viewport_height: Option<u32>,
    /// "url" or "file"
    #[serde(default)]
    pub output_format: OutputMode,
    /// File name without extension (default: "document")
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    /// Request timeout in seconds (default from configuration: 300)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl UrlToPdfParams {
    fn prepare(&self, config: &AdapterConfig) -> Result<PreparedCall> {
        check_output(Operation::UrlToPdf, self.output_format)?;

        let body = object(json!({
            "output_filename": self.output_filename,
            "url": self.url,
            "full_page": self.full_page,
            "wait_till": self.wait_till,
            "viewPortWidth": self.viewport_width.unwrap_or(config.default_viewport_width),
            "viewPortHeight": self.viewport_height.unwrap_or(config.default_viewport_height),
            "output_format": self.output_format.as_str(),
        }));

        Ok(PreparedCall {
            operation: Operation::UrlToPdf,
            body,
            files: FilePlan::None,
            output: pdf_output(self.output_format, format!("{}.pdf", self.output_filename)),
            timeout: Some(Duration::from_secs(
                self.timeout_secs.unwrap_or(config.timeout_secs),
            )),
        })
    }
}

// ============================================================================
// PDF manipulation
// ============================================================================

/// Documents to merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum MergeInput {
    /// Public PDF URLs (2 to 15), as a list or comma-separated string
    Urls { urls: Vec<String> },
    /// Names of the item's binary properties holding the PDFs (at least 2)
    Binary { binary_properties: Vec<String> },
}

impl<'de> Deserialize<'de> for MergeInput {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        let Some(obj) = value.as_object() else {
            return Err(serde::de::Error::custom(format!(
                "Invalid merge input: expected an object with \"urls\" or \"binary_properties\", but got {}",
                json_kind(&value)
            )));
        };

        if let Some(v) = obj.get("urls") {
            return list_from_value(v.clone())
                .map(|urls| MergeInput::Urls { urls })
                .map_err(|e| serde::de::Error::custom(format!("\"urls\": {}", e)));
        }
        if let Some(v) = obj.get("binary_properties") {
            return list_from_value(v.clone())
                .map(|binary_properties| MergeInput::Binary { binary_properties })
                .map_err(|e| serde::de::Error::custom(format!("\"binary_properties\": {}", e)));
        }

        let keys: Vec<&String> = obj.keys().collect();
        Err(serde::de::Error::custom(format!(
            "Invalid merge input: expected an object with \"urls\" or \"binary_properties\", but got keys: {:?}",
            keys
        )))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MergePdfsParams {
    pub input: MergeInput,
    /// "url", "file" or "base64"
    #[serde(default)]
    pub output: OutputMode,
}

impl MergePdfsParams {
    fn prepare(&self) -> Result<PreparedCall> {
        check_output(Operation::MergePdfs, self.output)?;

        let mut body = object(json!({ "output": self.output.as_str() }));

        let files = match &self.input {
            MergeInput::Urls { urls } => {
                let urls = clean_list(urls);
                if urls.len() < MIN_MERGE_SOURCES {
                    return Err(Error::Validation {
                        reason: "At least 2 PDF URLs are required for merging".to_string(),
                    });
                }
                if urls.len() > MAX_MERGE_URLS {
                    return Err(Error::Validation {
                        reason: format!("Maximum {} PDF URLs allowed for merging", MAX_MERGE_URLS),
                    });
                }
                body.insert("urls".to_string(), json!(urls));
                FilePlan::None
            }
            MergeInput::Binary { binary_properties } => {
                let properties = clean_list(binary_properties);
                if properties.len() < MIN_MERGE_SOURCES {
                    return Err(Error::Validation {
                        reason: "At least 2 binary PDF properties are required".to_string(),
                    });
                }
                FilePlan::Multiple { properties }
            }
        };

        Ok(PreparedCall {
            operation: Operation::MergePdfs,
            body,
            files,
            output: pdf_output(self.output, "merged.pdf"),
            timeout: None,
        })
    }
}

/// How to split a document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SplitMode {
    /// Extract a page selection such as "1-5" or "1,3,5"
    Pages {
        #[serde(default = "default_split_pages")]
        pages: String,
    },
    /// One document per page
    Each,
    /// Split into this many chunks
    Chunks {
        #[serde(default = "default_chunks")]
        chunks: u32,
    },
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::Pages {
            pages: default_split_pages(),
        }
    }
}

fn default_split_pages() -> String {
    "1-5".to_string()
}

fn default_chunks() -> u32 {
    2
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SplitPdfParams {
    pub input: InputSource,
    /// Default: pages "1-5"
    #[serde(default)]
    pub mode: SplitMode,
    /// "url", "file" or "base64"
    #[serde(default)]
    pub output: OutputMode,
}

impl SplitPdfParams {
    fn prepare(&self) -> Result<PreparedCall> {
        check_output(Operation::SplitPdf, self.output)?;

        let mut body = object(json!({ "output": self.output.as_str() }));
        let files = self.input.apply(&mut body, "url");

        match &self.mode {
            SplitMode::Pages { pages } => {
                body.insert("pages".to_string(), json!(pages));
            }
            SplitMode::Each => {
                body.insert("mode".to_string(), json!("each"));
            }
            SplitMode::Chunks { chunks } => {
                body.insert("chunks".to_string(), json!(chunks));
            }
        }

        Ok(PreparedCall {
            operation: Operation::SplitPdf,
            body,
            files,
            output: pdf_output(self.output, "split.pdf"),
            timeout: None,
        })
    }
}

/// Compression strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Low,
    Medium,
    #[default]
    High,
    Max,
}

impl Compression {
    pub fn as_str(self) -> &'static str {
        match self {
            Compression::Low => "low",
            Compression::Medium => "medium",
            Compression::High => "high",
            Compression::Max => "max",
        }
    }
}

fn default_compressed_name() -> String {
    "compressed.pdf".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompressPdfParams {
    pub input: InputSource,
    /// "low", "medium", "high" or "max" (default: "high")
    #[serde(default)]
    pub compression: Compression,
    /// "url", "file" or "base64" (default: "file")
    #[serde(default = "default_file_output")]
    pub output: OutputMode,
    /// Output file name (default: "compressed.pdf")
    #[serde(default = "default_compressed_name")]
    pub output_name: String,
}

impl CompressPdfParams {
    fn prepare(&self) -> Result<PreparedCall> {
        check_output(Operation::CompressPdf, self.output)?;

        let mut body = object(json!({
            "compression": self.compression.as_str(),
            "output": self.output.as_str(),
            "output_name": self.output_name,
        }));
        let files = self.input.apply(&mut body, "url");

        Ok(PreparedCall {
            operation: Operation::CompressPdf,
            body,
            files,
            output: pdf_output(self.output, self.output_name.clone()),
            timeout: None,
        })
    }
}

fn default_watermark_text() -> String {
    "CONFIDENTIAL".to_string()
}

fn default_opacity() -> f64 {
    0.15
}

fn default_angle() -> f64 {
    30.0
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WatermarkPdfParams {
    pub input: InputSource,
    /// "file", "url", "base64" or "both" (default: "file")
    #[serde(default = "default_file_output")]
    pub output_format: OutputMode,
    /// Watermark text (default: "CONFIDENTIAL")
    #[serde(default = "default_watermark_text")]
    pub text: String,
    /// 0.0 to 1.0 (default: 0.15)
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Rotation in degrees (default: 30)
    #[serde(default = "default_angle")]
    pub angle: f64,
    /// Font size; 0 lets the service choose (default: 0)
    #[serde(default)]
    pub font_size: u32,
}

impl WatermarkPdfParams {
    fn prepare(&self) -> Result<PreparedCall> {
        check_output(Operation::WatermarkPdf, self.output_format)?;

        let mut body = object(json!({
            "output_format": self.output_format.as_str(),
            "text": self.text,
            "opacity": self.opacity,
            "angle": self.angle,
        }));
        let files = self.input.apply(&mut body, "file_url");
        if self.font_size > 0 {
            body.insert("font_size".to_string(), json!(self.font_size));
        }

        Ok(PreparedCall {
            operation: Operation::WatermarkPdf,
            body,
            files,
            output: pdf_output(self.output_format, "watermarked.pdf"),
            timeout: None,
        })
    }
}

/// Raster format for PDF-to-image conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Webp => "webp",
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_image_dpi() -> u32 {
    150
}

fn default_quality() -> u32 {
    85
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConvertPdfToImageParams {
    pub input: InputSource,
    /// Single page to convert when `pages` is blank (default: 1)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page selection such as "1-3"; takes precedence over `page`
    #[serde(default)]
    pub pages: Option<String>,
    /// "png", "jpg", "jpeg" or "webp" (default: "png")
    #[serde(default)]
    pub image_format: ImageFormat,
    /// Render resolution (default: 150)
    #[serde(default = "default_image_dpi")]
    pub dpi: u32,
    /// Lossy quality 1-100 (default: 85)
    #[serde(default = "default_quality")]
    pub quality: u32,
    /// "url", "base64", "both" or "file"
    #[serde(default)]
    pub output: OutputMode,
}

impl ConvertPdfToImageParams {
    fn prepare(&self) -> Result<PreparedCall> {
        check_output(Operation::ConvertPdfToImage, self.output)?;

        let mut body = object(json!({
            "image_format": self.image_format.as_str(),
            "dpi": self.dpi,
            "quality": self.quality,
            "output": self.output.as_str(),
        }));
        let files = self.input.apply(&mut body, "url");

        match self.pages.as_deref().map(str::trim) {
            Some(pages) if !pages.is_empty() => {
                body.insert("pages".to_string(), json!(pages));
            }
            _ if self.page > 0 => {
                body.insert("page".to_string(), json!(self.page));
            }
            _ => {}
        }

        let output = match self.output {
            OutputMode::File => OutputShape::Binary(BinaryNaming::FromContentType {
                image_format: self.image_format,
            }),
            _ => OutputShape::Json,
        };

        Ok(PreparedCall {
            operation: Operation::ConvertPdfToImage,
            body,
            files,
            output,
            timeout: None,
        })
    }
}

fn default_combined_name() -> String {
    "combined-images.pdf".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConvertImageToPdfParams {
    /// Image URLs (1 to 100), as a list or comma-separated string
    #[serde(deserialize_with = "string_or_list")]
    #[schemars(with = "Vec<String>")]
    pub image_urls: Vec<String>,
    /// "url", "base64", "both" or "file"
    #[serde(default)]
    pub output: OutputMode,
    /// Output file name (default: "combined-images.pdf")
    #[serde(default = "default_combined_name")]
    pub output_filename: String,
}

impl ConvertImageToPdfParams {
    fn prepare(&self) -> Result<PreparedCall> {
        check_output(Operation::ConvertImageToPdf, self.output)?;

        let urls = clean_list(&self.image_urls);
        if urls.is_empty() {
            return Err(Error::Validation {
                reason: "At least one image URL is required".to_string(),
            });
        }
        if urls.len() > MAX_IMAGE_URLS {
            return Err(Error::Validation {
                reason: format!("Maximum {} image URLs are allowed", MAX_IMAGE_URLS),
            });
        }

        let mut body = object(json!({
            "output": self.output.as_str(),
            "output_filename": self.output_filename,
        }));
        if urls.len() == 1 {
            body.insert("image_url".to_string(), json!(urls[0]));
        } else {
            body.insert("image_urls".to_string(), json!(urls));
        }

        let file_name = if self.output_filename.ends_with(".pdf") {
            self.output_filename.clone()
        } else {
            format!("{}.pdf", self.output_filename)
        };

        Ok(PreparedCall {
            operation: Operation::ConvertImageToPdf,
            body,
            files: FilePlan::None,
            output: pdf_output(self.output, file_name),
            timeout: None,
        })
    }
}

// ============================================================================
// PDF security
// ============================================================================

fn default_locked_name() -> String {
    "locked.pdf".to_string()
}

fn default_unlocked_name() -> String {
    "unlocked.pdf".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LockPdfParams {
    pub input: InputSource,
    /// Password required to open the output
    pub password: String,
    /// Password of the input document, if it is already protected
    #[serde(default)]
    pub input_password: Option<String>,
    /// "url", "file" or "base64" (default: "file")
    #[serde(default = "default_file_output")]
    pub output: OutputMode,
    /// Output file name (default: "locked.pdf")
    #[serde(default = "default_locked_name")]
    pub output_name: String,
}

impl LockPdfParams {
    fn prepare(&self) -> Result<PreparedCall> {
        check_output(Operation::LockPdf, self.output)?;

        let mut body = object(json!({
            "password": self.password,
            "output": self.output.as_str(),
            "output_name": self.output_name,
        }));
        let files = self.input.apply(&mut body, "url");
        if let Some(input_password) = self.input_password.as_deref().filter(|p| !p.is_empty()) {
            body.insert("input_password".to_string(), json!(input_password));
        }

        Ok(PreparedCall {
            operation: Operation::LockPdf,
            body,
            files,
            output: pdf_output(self.output, self.output_name.clone()),
            timeout: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UnlockPdfParams {
    pub input: InputSource,
    /// Password of the protected document
    pub password: String,
    /// "url", "file" or "base64" (default: "file")
    #[serde(default = "default_file_output")]
    pub output: OutputMode,
    /// Output file name (default: "unlocked.pdf")
    #[serde(default = "default_unlocked_name")]
    pub output_name: String,
}

impl UnlockPdfParams {
    fn prepare(&self) -> Result<PreparedCall> {
        check_output(Operation::UnlockPdf, self.output)?;

        let mut body = object(json!({
            "password": self.password,
            "output": self.output.as_str(),
            "output_name": self.output_name,
        }));
        let files = self.input.apply(&mut body, "url");

        Ok(PreparedCall {
            operation: Operation::UnlockPdf,
            body,
            files,
            output: pdf_output(self.output, self.output_name.clone()),
            timeout: None,
        })
    }
}

// ============================================================================
// PDF parsing
// ============================================================================

/// Level of detail returned by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Text only
    Text,
    /// Text plus text blocks with bounding boxes
    Layout,
    /// Text plus table blocks
    Tables,
    /// Text, blocks, tables and images
    #[default]
    Full,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Text => "text",
            ParseMode::Layout => "layout",
            ParseMode::Tables => "tables",
            ParseMode::Full => "full",
        }
    }
}

fn default_all_pages() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ParsePdfParams {
    pub input: InputSource,
    /// "text", "layout", "tables" or "full" (default: "full")
    #[serde(default)]
    pub mode: ParseMode,
    /// Page selection (default: "all")
    #[serde(default = "default_all_pages")]
    pub pages: String,
}

impl ParsePdfParams {
    fn prepare(&self) -> Result<PreparedCall> {
        let mut body = object(json!({
            "mode": self.mode.as_str(),
            "pages": self.pages,
        }));
        let files = self.input.apply(&mut body, "url");

        Ok(PreparedCall {
            operation: Operation::ParsePdf,
            body,
            files,
            output: OutputShape::Json,
            timeout: None,
        })
    }
}

fn default_lang() -> String {
    "eng".to_string()
}

fn default_ocr_dpi() -> u32 {
    200
}

fn default_engine_mode() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ParsePdfOcrParams {
    pub input: InputSource,
    /// Page selection (default: "all")
    #[serde(default = "default_all_pages")]
    pub pages: String,
    /// OCR language code(s), e.g. "eng" or "eng+deu" (default: "eng")
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Rasterisation resolution (default: 200)
    #[serde(default = "default_ocr_dpi")]
    pub dpi: u32,
    /// Page segmentation mode 0-13 (default: 3)
    #[serde(default = "default_engine_mode")]
    pub psm: u32,
    /// OCR engine mode 0-3 (default: 3)
    #[serde(default = "default_engine_mode")]
    pub oem: u32,
}

impl ParsePdfOcrParams {
    fn prepare(&self) -> Result<PreparedCall> {
        let mut body = object(json!({
            "pages": self.pages,
            "lang": self.lang,
            "dpi": self.dpi,
            "psm": self.psm,
            "oem": self.oem,
        }));
        let files = self.input.apply(&mut body, "url");

        Ok(PreparedCall {
            operation: Operation::ParsePdfOcr,
            body,
            files,
            output: OutputShape::Json,
            timeout: None,
        })
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Parameters of the selected operation
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum OperationParams {
    HtmlToPdf(HtmlToPdfParams),
    UrlToPdf(UrlToPdfParams),
    MergePdfs(MergePdfsParams),
    SplitPdf(SplitPdfParams),
    CompressPdf(CompressPdfParams),
    WatermarkPdf(WatermarkPdfParams),
    ConvertPdfToImage(ConvertPdfToImageParams),
    ConvertImageToPdf(ConvertImageToPdfParams),
    LockPdf(LockPdfParams),
    UnlockPdf(UnlockPdfParams),
    ParsePdf(ParsePdfParams),
    ParsePdfOcr(ParsePdfOcrParams),
}

impl OperationParams {
    pub fn operation(&self) -> Operation {
        match self {
            OperationParams::HtmlToPdf(_) => Operation::HtmlToPdf,
            OperationParams::UrlToPdf(_) => Operation::UrlToPdf,
            OperationParams::MergePdfs(_) => Operation::MergePdfs,
            OperationParams::SplitPdf(_) => Operation::SplitPdf,
            OperationParams::CompressPdf(_) => Operation::CompressPdf,
            OperationParams::WatermarkPdf(_) => Operation::WatermarkPdf,
            OperationParams::ConvertPdfToImage(_) => Operation::ConvertPdfToImage,
            OperationParams::ConvertImageToPdf(_) => Operation::ConvertImageToPdf,
            OperationParams::LockPdf(_) => Operation::LockPdf,
            OperationParams::UnlockPdf(_) => Operation::UnlockPdf,
            OperationParams::ParsePdf(_) => Operation::ParsePdf,
            OperationParams::ParsePdfOcr(_) => Operation::ParsePdfOcr,
        }
    }

    /// Validate the parameters and derive the body, file plan and output shape.
    /// Never touches the network.
    pub fn prepare(&self, config: &AdapterConfig) -> Result<PreparedCall> {
        match self {
            OperationParams::HtmlToPdf(p) => p.prepare(config),
            OperationParams::UrlToPdf(p) => p.prepare(config),
            OperationParams::MergePdfs(p) => p.prepare(),
            OperationParams::SplitPdf(p) => p.prepare(),
            OperationParams::CompressPdf(p) => p.prepare(),
            OperationParams::WatermarkPdf(p) => p.prepare(),
            OperationParams::ConvertPdfToImage(p) => p.prepare(),
            OperationParams::ConvertImageToPdf(p) => p.prepare(),
            OperationParams::LockPdf(p) => p.prepare(),
            OperationParams::UnlockPdf(p) => p.prepare(),
            OperationParams::ParsePdf(p) => p.prepare(),
            OperationParams::ParsePdfOcr(p) => p.prepare(),
        }
    }
}
