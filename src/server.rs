//! MCP server implementation using rmcp

use crate::adapter::Adapter;
use crate::config::AdapterConfig;
use crate::encoding::{decode_base64, encode_base64};
use crate::error::Error;
use crate::item::{BinaryAttachment, BinaryData, InputItem, OutputRecord};
use crate::operation::{descriptors, OperationParams, Resource};
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Content of a binary input
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum BinaryContent {
    /// Local file (absolute or relative)
    Path {
        /// Path to the file
        path: String,
    },
    /// Base64 encoded bytes
    Base64 {
        /// Base64 encoded content
        base64: String,
    },
}

impl<'de> Deserialize<'de> for BinaryContent {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        if let Some(obj) = value.as_object() {
            if let Some(v) = obj.get("path") {
                if let Some(s) = v.as_str() {
                    return Ok(BinaryContent::Path {
                        path: s.to_string(),
                    });
                }
            }
            if let Some(v) = obj.get("base64") {
                if let Some(s) = v.as_str() {
                    return Ok(BinaryContent::Base64 {
                        base64: s.to_string(),
                    });
                }
            }

            let keys: Vec<&String> = obj.keys().collect();
            return Err(serde::de::Error::custom(format!(
                "Invalid binary input: expected an object with \"path\" or \"base64\" (string), but got keys: {:?}",
                keys
            )));
        }

        Err(serde::de::Error::custom(
            "Invalid binary input: expected an object like {\"path\": \"/file.pdf\"} or {\"base64\": \"...\"}",
        ))
    }
}

/// Binary payload attached to an item
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BinaryInput {
    #[serde(flatten)]
    pub content: BinaryContent,
    /// File name sent with the upload (default: the path's file name)
    #[serde(default)]
    pub file_name: Option<String>,
    /// MIME type sent with the upload (default: guessed from the file name)
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// One input item
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ItemParams {
    /// Binary payloads by property name, e.g. {"data": {"path": "/in.pdf"}}
    #[serde(default)]
    pub binary: HashMap<String, BinaryInput>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteParams {
    /// Operation and its parameters, e.g. {"operation": "mergePdfs", "input": {"urls": [...]}}
    pub params: OperationParams,
    /// Items to process in order (default: one empty item)
    #[serde(default)]
    pub items: Vec<ItemParams>,
    /// Record failures as {"error": ...} and keep going (default: false)
    #[serde(default)]
    pub continue_on_fail: bool,
    /// Write binary results into this directory instead of returning base64
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListOperationsParams {
    /// Only list operations of this resource
    #[serde(default)]
    pub resource: Option<Resource>,
}

/// Binary result as returned to the client
#[derive(Debug, Serialize)]
pub struct AttachmentView {
    pub property: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordView {
    pub paired_item: usize,
    pub json: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<AttachmentView>,
}

/// Server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Remote API settings
    pub adapter: AdapterConfig,
    /// Directories local input paths and output directories must live in.
    /// Empty allows all paths.
    pub resource_dirs: Vec<String>,
}

/// PDF API MCP server
#[derive(Clone)]
pub struct PdfApiServer {
    adapter: Arc<Adapter>,
    tool_router: ToolRouter<Self>,
    config: Arc<ServerConfig>,
}

#[tool_router]
impl PdfApiServer {
    pub fn with_config(config: ServerConfig) -> crate::error::Result<Self> {
        let adapter = Adapter::new(config.adapter.clone())?;
        Ok(Self {
            adapter: Arc::new(adapter),
            tool_router: Self::tool_router(),
            config: Arc::new(config),
        })
    }

    /// List the remote operations
    #[tool(
        description = "List the available PDF API operations with their endpoint, accepted inputs (url/binary) and supported output modes. Optionally filter by resource: pdfCreation, pdfManipulation, pdfSecurity, pdfParsing."
    )]
    async fn list_operations(
        &self,
        Parameters(params): Parameters<ListOperationsParams>,
    ) -> String {
        let operations = descriptors(params.resource);
        let response = serde_json::json!({ "operations": operations });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    /// Run an operation over a batch of items
    #[tool(
        description = "Run a PDF API operation over a list of items, one request per item, in order. Returns one result per item with paired_item set to the item index.

Binary format: item binaries are {\"path\": \"/absolute/file.pdf\"} or {\"base64\": \"...\"}, optionally with \"file_name\" and \"mime_type\". Operations reference them with {\"binary_property\": \"data\"}.

File outputs are returned as base64 unless output_dir is set."
    )]
    async fn execute(&self, Parameters(params): Parameters<ExecuteParams>) -> String {
        let response = self.process_execute(&params).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "execute failed");
            serde_json::json!({ "error": e.client_message() })
        });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    /// Check the configured API key
    #[tool(description = "Check whether the configured API key is accepted by the PDF API.")]
    async fn validate_credentials(&self) -> String {
        let response = match self.adapter.validate_credentials().await {
            Ok(check) => serde_json::to_value(check).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "validate_credentials failed");
                serde_json::json!({ "error": e.client_message() })
            }
        };
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    async fn process_execute(&self, params: &ExecuteParams) -> crate::error::Result<Value> {
        let output_dir = params
            .output_dir
            .as_deref()
            .map(|dir| self.validate_output_dir_access(dir))
            .transpose()?;

        let records = if params.items.is_empty() {
            self.adapter
                .execute(&[InputItem::new()], &params.params, params.continue_on_fail)
                .await?
        } else {
            self.adapter
                .execute_loading(
                    params.items.len(),
                    &params.params,
                    params.continue_on_fail,
                    |index| self.resolve_item(&params.items[index]),
                )
                .await?
        };

        let results = records
            .into_iter()
            .map(|record| self.render_record(record, output_dir.as_deref()))
            .collect::<crate::error::Result<Vec<_>>>()?;

        Ok(serde_json::json!({ "results": results }))
    }

    fn resolve_item(&self, item: &ItemParams) -> crate::error::Result<InputItem> {
        let mut binary = HashMap::with_capacity(item.binary.len());
        for (property, input) in &item.binary {
            binary.insert(property.clone(), self.resolve_binary(input)?);
        }
        Ok(InputItem {
            json: Map::new(),
            binary,
        })
    }

    fn resolve_binary(&self, input: &BinaryInput) -> crate::error::Result<BinaryData> {
        let (data, source_name) = match &input.content {
            BinaryContent::Path { path } => {
                let resolved = self.validate_path_access(path)?;
                if !resolved.is_file() {
                    return Err(Error::BinaryNotFound { path: path.clone() });
                }
                let data = std::fs::read(&resolved)?;
                let name = resolved
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                (data, name)
            }
            BinaryContent::Base64 { base64 } => (decode_base64(base64)?, None),
        };

        let file_name = input.file_name.clone().or(source_name);
        let mime_type = input
            .mime_type
            .clone()
            .or_else(|| file_name.as_deref().and_then(guess_mime).map(str::to_string));

        Ok(BinaryData {
            data,
            file_name,
            mime_type,
        })
    }

    fn render_record(
        &self,
        record: OutputRecord,
        output_dir: Option<&Path>,
    ) -> crate::error::Result<RecordView> {
        let binary = match record.binary {
            Some(attachment) => Some(self.render_attachment(
                attachment,
                record.paired_item,
                output_dir,
            )?),
            None => None,
        };

        Ok(RecordView {
            paired_item: record.paired_item,
            json: record.json,
            binary,
        })
    }

    fn render_attachment(
        &self,
        attachment: BinaryAttachment,
        paired_item: usize,
        output_dir: Option<&Path>,
    ) -> crate::error::Result<AttachmentView> {
        let size = attachment.data.len();
        let (base64, path) = match output_dir {
            Some(dir) => {
                // Remote-chosen names never escape the output directory
                let name = Path::new(&attachment.file_name)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| attachment.property.clone());
                let target = dir.join(format!("{}-{}", paired_item, name));
                (None, Some(self.write_output(&target, &attachment.data)?))
            }
            None => (Some(encode_base64(&attachment.data)), None),
        };

        Ok(AttachmentView {
            property: attachment.property,
            file_name: attachment.file_name,
            mime_type: attachment.mime_type,
            size,
            base64,
            path,
        })
    }

    /// Validate that a path is within allowed resource directories.
    /// If no resource_dirs are configured, all paths are allowed.
    fn validate_path_access(&self, path: &str) -> crate::error::Result<PathBuf> {
        if self.config.resource_dirs.is_empty() {
            return Ok(PathBuf::from(path));
        }

        let canonical = std::fs::canonicalize(path).map_err(|_| Error::PathAccessDenied {
            path: path.to_string(),
        })?;

        if self.is_within_resource_dirs(&canonical) {
            Ok(canonical)
        } else {
            Err(Error::PathAccessDenied {
                path: path.to_string(),
            })
        }
    }

    /// Validate an output directory, creating it when it is allowed but missing.
    fn validate_output_dir_access(&self, dir: &str) -> crate::error::Result<PathBuf> {
        if self.config.resource_dirs.is_empty() {
            std::fs::create_dir_all(dir)?;
            return Ok(PathBuf::from(dir));
        }

        // Canonicalize the nearest existing ancestor since the directory may not exist yet
        let requested = Path::new(dir);
        let mut existing = requested;
        let mut missing = Vec::new();
        while !existing.exists() {
            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = if parent.as_os_str().is_empty() {
                        Path::new(".")
                    } else {
                        parent
                    };
                }
                _ => {
                    return Err(Error::PathAccessDenied {
                        path: dir.to_string(),
                    })
                }
            }
        }

        let mut canonical = std::fs::canonicalize(existing).map_err(|_| Error::PathAccessDenied {
            path: dir.to_string(),
        })?;
        canonical.extend(missing.iter().rev());

        if !self.is_within_resource_dirs(&canonical) {
            return Err(Error::PathAccessDenied {
                path: dir.to_string(),
            });
        }

        std::fs::create_dir_all(&canonical)?;
        Ok(canonical)
    }

    fn is_within_resource_dirs(&self, canonical: &Path) -> bool {
        self.config.resource_dirs.iter().any(|dir| {
            std::fs::canonicalize(dir)
                .map(|cd| canonical.starts_with(&cd))
                .unwrap_or(false)
        })
    }

    /// Write output data to a file inside an already validated directory.
    fn write_output(&self, path: &Path, data: &[u8]) -> crate::error::Result<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, data)?;
        Ok(path.display().to_string())
    }
}

/// MIME type for common upload extensions
fn guess_mime(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let mime = match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "html" | "htm" => "text/html",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

#[tool_handler]
impl ServerHandler for PdfApiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "PDF API server: creates, manipulates, secures and parses PDFs through a remote \
                 PDF processing API. Use list_operations to discover operations, then execute."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server over stdio
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let server = PdfApiServer::with_config(config)?;

    tracing::info!("PDF API server ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
