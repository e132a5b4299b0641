//! Operation table
//!
//! Every remote action is described once by a static [`OperationDescriptor`]
//! and parameterised by its own typed record in [`OperationParams`].

mod params;

pub use params::{
    CompressPdfParams, Compression, ConvertImageToPdfParams, ConvertPdfToImageParams,
    DynamicParam, HtmlToPdfParams, ImageFormat, InputSource, LockPdfParams, MergeInput,
    MergePdfsParams, OperationParams, ParseMode, ParsePdfOcrParams, ParsePdfParams,
    SplitMode, SplitPdfParams, UnlockPdfParams, UrlToPdfParams, WatermarkPdfParams,
    MAX_IMAGE_URLS, MAX_MERGE_URLS, MIN_MERGE_SOURCES,
};

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Grouping of operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    PdfCreation,
    PdfManipulation,
    PdfSecurity,
    PdfParsing,
}

/// Remote API action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    HtmlToPdf,
    UrlToPdf,
    MergePdfs,
    SplitPdf,
    CompressPdf,
    WatermarkPdf,
    ConvertPdfToImage,
    ConvertImageToPdf,
    LockPdf,
    UnlockPdf,
    ParsePdf,
    ParsePdfOcr,
}

/// Where an operation's document comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Binary,
}

/// How the caller wants the result returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Hosted URL reference in a JSON body
    #[default]
    Url,
    /// Raw response bytes as a binary attachment
    File,
    /// Base64 text in a JSON body
    Base64,
    /// URL and base64 in a JSON body
    Both,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputMode::Url => "url",
            OutputMode::File => "file",
            OutputMode::Base64 => "base64",
            OutputMode::Both => "both",
        }
    }
}

/// Static description of one remote operation
#[derive(Debug, Serialize)]
pub struct OperationDescriptor {
    pub operation: Operation,
    pub display_name: &'static str,
    pub resource: Resource,
    /// Endpoint path relative to the API base URL
    pub path: &'static str,
    pub method: &'static str,
    /// Accepted document sources; empty for operations without a document input
    pub inputs: &'static [InputKind],
    /// Supported output modes; empty for JSON-only operations
    pub outputs: &'static [OutputMode],
    /// Body fields the operation may send
    pub body_fields: &'static [&'static str],
}

const URL_OR_BINARY: &[InputKind] = &[InputKind::Url, InputKind::Binary];
const URL_OR_FILE: &[OutputMode] = &[OutputMode::Url, OutputMode::File];
const URL_FILE_BASE64: &[OutputMode] = &[OutputMode::Url, OutputMode::File, OutputMode::Base64];
const ALL_OUTPUTS: &[OutputMode] = &[
    OutputMode::Url,
    OutputMode::File,
    OutputMode::Base64,
    OutputMode::Both,
];

/// All operations, ordered like [`Operation`]'s variants
pub static OPERATIONS: [OperationDescriptor; 12] = [
    OperationDescriptor {
        operation: Operation::HtmlToPdf,
        display_name: "HTML to PDF",
        resource: Resource::PdfCreation,
        path: "/api/v1/generatePdf",
        method: "POST",
        inputs: &[],
        outputs: URL_OR_FILE,
        body_fields: &[
            "output_filename",
            "html_content",
            "css_content",
            "viewPortWidth",
            "viewPortHeight",
            "output_format",
            "dynamic_params",
        ],
    },
    OperationDescriptor {
        operation: Operation::UrlToPdf,
        display_name: "URL to PDF",
        resource: Resource::PdfCreation,
        path: "/api/v1/generatePdf",
        method: "POST",
        inputs: &[InputKind::Url],
        outputs: URL_OR_FILE,
        body_fields: &[
            "output_filename",
            "url",
            "full_page",
            "wait_till",
            "viewPortWidth",
            "viewPortHeight",
            "output_format",
        ],
    },
    OperationDescriptor {
        operation: Operation::MergePdfs,
        display_name: "Merge PDFs",
        resource: Resource::PdfManipulation,
        path: "/api/v1/pdf/merge",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: URL_FILE_BASE64,
        body_fields: &["output", "urls", "files"],
    },
    OperationDescriptor {
        operation: Operation::SplitPdf,
        display_name: "Split PDF",
        resource: Resource::PdfManipulation,
        path: "/api/v1/pdf/split",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: URL_FILE_BASE64,
        body_fields: &["output", "url", "file", "pages", "mode", "chunks"],
    },
    OperationDescriptor {
        operation: Operation::CompressPdf,
        display_name: "Compress PDF",
        resource: Resource::PdfManipulation,
        path: "/api/v1/compressPdf",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: URL_FILE_BASE64,
        body_fields: &["compression", "output", "output_name", "url", "file"],
    },
    OperationDescriptor {
        operation: Operation::WatermarkPdf,
        display_name: "Watermark PDF",
        resource: Resource::PdfManipulation,
        path: "/api/v1/watermark",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: ALL_OUTPUTS,
        body_fields: &[
            "output_format",
            "text",
            "opacity",
            "angle",
            "font_size",
            "file_url",
            "file",
        ],
    },
    OperationDescriptor {
        operation: Operation::ConvertPdfToImage,
        display_name: "Convert PDF to Image",
        resource: Resource::PdfManipulation,
        path: "/api/v1/convert/pdf/image",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: ALL_OUTPUTS,
        body_fields: &[
            "image_format",
            "dpi",
            "quality",
            "output",
            "page",
            "pages",
            "url",
            "file",
        ],
    },
    OperationDescriptor {
        operation: Operation::ConvertImageToPdf,
        display_name: "Convert Image to PDF",
        resource: Resource::PdfManipulation,
        path: "/api/v1/convert/image/pdf",
        method: "POST",
        inputs: &[InputKind::Url],
        outputs: ALL_OUTPUTS,
        body_fields: &["output", "output_filename", "image_url", "image_urls"],
    },
    OperationDescriptor {
        operation: Operation::LockPdf,
        display_name: "Lock PDF",
        resource: Resource::PdfSecurity,
        path: "/api/v1/lockPdf",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: URL_FILE_BASE64,
        body_fields: &[
            "password",
            "input_password",
            "output",
            "output_name",
            "url",
            "file",
        ],
    },
    OperationDescriptor {
        operation: Operation::UnlockPdf,
        display_name: "Unlock PDF",
        resource: Resource::PdfSecurity,
        path: "/api/v1/unlockPdf",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: URL_FILE_BASE64,
        body_fields: &["password", "output", "output_name", "url", "file"],
    },
    OperationDescriptor {
        operation: Operation::ParsePdf,
        display_name: "Parse PDF",
        resource: Resource::PdfParsing,
        path: "/api/v1/pdf/parse",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: &[],
        body_fields: &["mode", "pages", "url", "file"],
    },
    OperationDescriptor {
        operation: Operation::ParsePdfOcr,
        display_name: "Parse PDF with OCR",
        resource: Resource::PdfParsing,
        path: "/api/v1/pdf/ocr/parse",
        method: "POST",
        inputs: URL_OR_BINARY,
        outputs: &[],
        body_fields: &["pages", "lang", "dpi", "psm", "oem", "url", "file"],
    },
];

/// Credential check endpoint (GET)
pub const VALIDATE_API_KEY_PATH: &str = "/api/v1/validate-api-key";

impl Operation {
    /// Static descriptor of this operation
    pub fn descriptor(self) -> &'static OperationDescriptor {
        &OPERATIONS[self as usize]
    }

    pub fn resource(self) -> Resource {
        self.descriptor().resource
    }

    pub fn path(self) -> &'static str {
        self.descriptor().path
    }

    /// Wire name, e.g. `mergePdfs`
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::HtmlToPdf => "htmlToPdf",
            Operation::UrlToPdf => "urlToPdf",
            Operation::MergePdfs => "mergePdfs",
            Operation::SplitPdf => "splitPdf",
            Operation::CompressPdf => "compressPdf",
            Operation::WatermarkPdf => "watermarkPdf",
            Operation::ConvertPdfToImage => "convertPdfToImage",
            Operation::ConvertImageToPdf => "convertImageToPdf",
            Operation::LockPdf => "lockPdf",
            Operation::UnlockPdf => "unlockPdf",
            Operation::ParsePdf => "parsePdf",
            Operation::ParsePdfOcr => "parsePdfOcr",
        }
    }

    /// Whether the operation accepts `mode` as an output mode.
    /// JSON-only operations accept none.
    pub fn supports_output(self, mode: OutputMode) -> bool {
        self.descriptor().outputs.contains(&mode)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptors of all operations, optionally restricted to one resource
pub fn descriptors(resource: Option<Resource>) -> Vec<&'static OperationDescriptor> {
    OPERATIONS
        .iter()
        .filter(|d| resource.map_or(true, |r| d.resource == r))
        .collect()
}
