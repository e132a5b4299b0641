//! Integration tests for the PDF API adapter

use parking_lot::Mutex;
use pdf_api_adapter::api::ApiRequest;
use pdf_api_adapter::encoding::{decode_base64, encode_base64};
use pdf_api_adapter::{
    Adapter, AdapterConfig, ApiResponse, BinaryData, Error, InputItem, OperationParams,
    RequestBody, Result, Transport,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::time::Duration;

/// Records every request and answers with queued responses (200 `{}` once drained)
#[derive(Default)]
struct RecordingTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl RecordingTransport {
    fn replying(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().push(request);
        Ok(self.responses.lock().pop_front().unwrap_or(ApiResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: b"{}".to_vec(),
        }))
    }
}

fn response(status: u16, content_type: &str, body: &[u8]) -> ApiResponse {
    ApiResponse {
        status,
        content_type: Some(content_type.to_string()),
        body: body.to_vec(),
    }
}

fn adapter(transport: RecordingTransport) -> Adapter<RecordingTransport> {
    Adapter::with_transport(transport, AdapterConfig::with_api_key("secret"))
}

fn params(value: Value) -> OperationParams {
    serde_json::from_value(value).expect("valid operation parameters")
}

fn urls(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://files.example.com/{}.pdf", i))
        .collect()
}

#[tokio::test]
async fn test_url_input_records_pair_with_items() {
    let adapter = adapter(RecordingTransport::replying(vec![
        response(200, "application/json", br#"{"pdf_url":"https://cdn/a.pdf"}"#),
        response(200, "application/json", br#"{"pdf_url":"https://cdn/b.pdf"}"#),
    ]));
    let items = vec![InputItem::new(), InputItem::new()];
    let params = params(json!({
        "operation": "urlToPdf",
        "url": "https://example.com",
        "output_format": "url"
    }));

    let records = adapter.execute(&items, &params, false).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].paired_item, 0);
    assert_eq!(records[1].paired_item, 1);
    assert_eq!(records[1].json["pdf_url"], json!("https://cdn/b.pdf"));
    assert!(records.iter().all(|r| r.binary.is_none()));

    let requests = adapter.transport().requests();
    assert_eq!(requests.len(), 2);
    let body = requests[0].json_body().unwrap();
    assert_eq!(body["url"], json!("https://example.com"));
    assert_eq!(body["viewPortWidth"], json!(1080));
    assert_eq!(body["viewPortHeight"], json!(720));
    assert_eq!(body["full_page"], json!(true));
    assert_eq!(body["wait_till"], json!(10000));
    assert_eq!(requests[0].timeout, Some(Duration::from_secs(300)));
}

#[rstest]
#[case(0)]
#[case(1)]
#[tokio::test]
async fn test_merge_too_few_urls_sends_nothing(#[case] count: usize) {
    let adapter = adapter(RecordingTransport::default());
    let params = params(json!({"operation": "mergePdfs", "input": {"urls": urls(count)}}));

    let err = adapter
        .execute(&[InputItem::new()], &params, false)
        .await
        .unwrap_err();

    assert_eq!(err.item_index(), Some(0));
    assert!(err.to_string().contains("At least 2 PDF URLs"));
    assert!(adapter.transport().requests().is_empty());
}

#[tokio::test]
async fn test_merge_url_limit() {
    let adapter = adapter(RecordingTransport::default());

    let too_many = params(json!({"operation": "mergePdfs", "input": {"urls": urls(16)}}));
    let err = adapter
        .execute(&[InputItem::new()], &too_many, false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Maximum 15"));
    assert!(adapter.transport().requests().is_empty());

    let at_limit = params(json!({"operation": "mergePdfs", "input": {"urls": urls(15)}}));
    let records = adapter
        .execute(&[InputItem::new()], &at_limit, false)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);

    let requests = adapter.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/v1/pdf/merge");
    assert_eq!(
        requests[0].json_body().unwrap()["urls"].as_array().unwrap().len(),
        15
    );
}

#[tokio::test]
async fn test_merge_comma_separated_urls_are_trimmed() {
    let adapter = adapter(RecordingTransport::default());
    let params = params(json!({
        "operation": "mergePdfs",
        "input": {"urls": " https://a/1.pdf, ,https://a/2.pdf "}
    }));

    adapter
        .execute(&[InputItem::new()], &params, false)
        .await
        .unwrap();

    let requests = adapter.transport().requests();
    assert_eq!(
        requests[0].json_body().unwrap()["urls"],
        json!(["https://a/1.pdf", "https://a/2.pdf"])
    );
}

#[tokio::test]
async fn test_file_output_success_has_single_attachment() {
    let adapter = adapter(RecordingTransport::replying(vec![response(
        200,
        "application/pdf",
        b"%PDF-1.7 merged",
    )]));
    let params = params(json!({
        "operation": "mergePdfs",
        "input": {"urls": urls(2)},
        "output": "file"
    }));

    let records = adapter
        .execute(&[InputItem::new()], &params, false)
        .await
        .unwrap();

    let record = &records[0];
    assert!(!record.is_error());
    assert_eq!(record.status_code(), None);
    assert_eq!(Value::Object(record.json.clone()), json!({"success": true}));
    let binary = record.binary.as_ref().unwrap();
    assert_eq!(binary.property, "data");
    assert_eq!(binary.file_name, "merged.pdf");
    assert_eq!(binary.mime_type, "application/pdf");
    assert_eq!(binary.data, b"%PDF-1.7 merged");
}

#[tokio::test]
async fn test_image_output_takes_response_content_type() {
    let adapter = adapter(RecordingTransport::replying(vec![response(
        200,
        "application/zip",
        b"PK\x03\x04",
    )]));
    let params = params(json!({
        "operation": "convertPdfToImage",
        "input": {"url": "https://a/doc.pdf"},
        "output": "file"
    }));

    let records = adapter
        .execute(&[InputItem::new()], &params, false)
        .await
        .unwrap();

    let binary = records[0].binary.as_ref().unwrap();
    assert_eq!(binary.mime_type, "application/zip");
    assert_eq!(binary.file_name, "pdf-to-images.zip");
}

#[tokio::test]
async fn test_json_error_status_merged_into_record() {
    let adapter = adapter(RecordingTransport::replying(vec![response(
        404,
        "application/json",
        br#"{"message":"not found"}"#,
    )]));
    let params = params(json!({"operation": "parsePdf", "input": {"url": "https://a/x.pdf"}}));

    let records = adapter
        .execute(&[InputItem::new()], &params, false)
        .await
        .unwrap();

    assert_eq!(
        Value::Object(records[0].json.clone()),
        json!({"message": "not found", "statusCode": 404})
    );
    assert_eq!(records[0].status_code(), Some(404));
}

#[tokio::test]
async fn test_file_output_text_error() {
    let adapter = adapter(RecordingTransport::replying(vec![response(
        500,
        "text/plain",
        b"internal error",
    )]));
    let params = params(json!({
        "operation": "compressPdf",
        "input": {"url": "https://a/x.pdf"},
        "output": "file"
    }));

    let records = adapter
        .execute(&[InputItem::new()], &params, false)
        .await
        .unwrap();

    assert_eq!(
        Value::Object(records[0].json.clone()),
        json!({"error": "internal error", "statusCode": 500})
    );
    assert!(records[0].binary.is_none());
}

#[tokio::test]
async fn test_fail_on_http_error_uses_failure_policy() {
    let config = AdapterConfig {
        fail_on_http_error: true,
        ..AdapterConfig::with_api_key("secret")
    };
    let transport = RecordingTransport::replying(vec![
        response(403, "application/json", br#"{"message":"forbidden"}"#),
        response(200, "application/json", br#"{"text":"ok"}"#),
    ]);
    let adapter = Adapter::with_transport(transport, config);
    let params = params(json!({"operation": "parsePdf", "input": {"url": "https://a/x.pdf"}}));
    let items = vec![InputItem::new(), InputItem::new()];

    let records = adapter.execute(&items, &params, true).await.unwrap();

    assert_eq!(
        records[0].json["error"],
        json!("Remote API returned status 403: {\"message\":\"forbidden\"}")
    );
    assert_eq!(records[1].json["text"], json!("ok"));
}

#[tokio::test]
async fn test_continue_on_fail_versus_abort() {
    let params = params(json!({
        "operation": "splitPdf",
        "input": {"binary_property": "data"},
        "mode": {"type": "each"}
    }));
    let pdf = || InputItem::new().with_binary("data", BinaryData::new(b"%PDF-1.4".to_vec()));
    let items = vec![pdf(), InputItem::new(), pdf()];

    let collecting = adapter(RecordingTransport::default());
    let records = collecting.execute(&items, &params, true).await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(!records[0].is_error());
    assert_eq!(
        Value::Object(records[1].json.clone()),
        json!({"error": "Binary property \"data\" not found"})
    );
    assert_eq!(records[1].paired_item, 1);
    assert!(!records[2].is_error());
    assert_eq!(collecting.transport().requests().len(), 2);

    let aborting = adapter(RecordingTransport::default());
    let err = aborting.execute(&items, &params, false).await.unwrap_err();
    assert_eq!(err.item_index(), Some(1));
    match err {
        Error::ItemFailed { source, .. } => {
            assert!(matches!(*source, Error::MissingBinaryProperty { .. }))
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(aborting.transport().requests().len(), 1);
}

#[tokio::test]
async fn test_binary_upload_is_multipart_with_api_fields() {
    let adapter = adapter(RecordingTransport::default());
    let params = params(json!({
        "operation": "lockPdf",
        "input": {"binary_property": "doc"},
        "password": "s3cret",
        "output": "file"
    }));
    let item = InputItem::new().with_binary(
        "doc",
        BinaryData::new(b"%PDF-1.5".to_vec()).with_file_name("contract.pdf"),
    );

    adapter.execute(&[item], &params, false).await.unwrap();

    let requests = adapter.transport().requests();
    assert_eq!(requests[0].url.path(), "/api/v1/lockPdf");
    let form = match &requests[0].body {
        RequestBody::Multipart(form) => form,
        other => panic!("expected multipart body, got {:?}", other),
    };
    assert_eq!(form.field("password"), Some("s3cret"));
    assert_eq!(form.field("output"), Some("file"));
    assert_eq!(form.files.len(), 1);
    assert_eq!(form.files[0].field, "file");
    assert_eq!(form.files[0].file_name, "contract.pdf");
    assert_eq!(form.files[0].data, b"%PDF-1.5");
}

#[tokio::test]
async fn test_custom_base_url() {
    let config = AdapterConfig::from_lookup(|key| match key {
        "PDF_API_KEY" => Some("k".to_string()),
        "PDF_API_BASE_URL" => Some("http://localhost:8080".to_string()),
        _ => None,
    })
    .unwrap();
    let adapter = Adapter::with_transport(RecordingTransport::default(), config);
    let params = params(json!({"operation": "parsePdfOcr", "input": {"url": "https://a/scan.pdf"}}));

    adapter
        .execute(&[InputItem::new()], &params, false)
        .await
        .unwrap();

    let requests = adapter.transport().requests();
    assert_eq!(
        requests[0].url.as_str(),
        "http://localhost:8080/api/v1/pdf/ocr/parse"
    );
    assert_eq!(
        requests[0].json_body().unwrap(),
        &json!({
            "url": "https://a/scan.pdf",
            "pages": "all",
            "lang": "eng",
            "dpi": 200,
            "psm": 3,
            "oem": 3
        })
    );
}

#[rstest]
#[case(b"")]
#[case(b"a")]
#[case(b"ab")]
#[case(b"abc")]
#[case(b"abcd")]
#[case(b"%PDF-1.7\n\xff\x00")]
fn test_base64_round_trip(#[case] bytes: &[u8]) {
    assert_eq!(decode_base64(&encode_base64(bytes)).unwrap(), bytes);
}
