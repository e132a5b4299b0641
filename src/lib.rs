//! PDF API Adapter Library
//!
//! Maps typed PDF operation parameters onto a remote PDF processing API:
//! - `operation`: operation table and per-operation parameter records
//! - `api`: JSON/multipart request assembly, HTTP transport, response shaping
//! - `adapter`: batch execution with continue-on-fail policy
//! - `server`: MCP tools (`list_operations`, `execute`, `validate_credentials`)

pub mod adapter;
pub mod api;
pub mod config;
pub mod encoding;
pub mod error;
pub mod item;
pub mod operation;
pub mod server;

#[cfg(test)]
mod test_support;

pub use adapter::{Adapter, CredentialCheck};
pub use api::{ApiRequest, ApiResponse, HttpTransport, RequestBody, Transport};
pub use config::AdapterConfig;
pub use error::{Error, Result};
pub use item::{BinaryAttachment, BinaryData, InputItem, OutputRecord};
pub use operation::{Operation, OperationParams, OutputMode, Resource};
pub use server::{run_server, PdfApiServer, ServerConfig};
