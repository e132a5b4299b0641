//! Remote API plumbing: request assembly, transport and response shaping

pub mod client;
pub mod request;
pub mod response;

pub use client::{HttpTransport, Transport};
pub use request::{
    build_request, ApiRequest, BinaryNaming, FilePart, FilePlan, MultipartForm, OutputShape,
    PreparedCall, RequestBody, MULTI_FILE_FIELD, SINGLE_FILE_FIELD,
};
pub use response::{parse_error_body, parse_json_body, shape_response, to_json_object, ApiResponse};
