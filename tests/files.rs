mod common;

use common::{MockNetwork, http_response, json_response, reason_phrase, test_config};
use heapless::String;
use smartcosmos::endpoints::files::{
    FileActionResult, FileDefinitionRequest, FileEndpoint, MULTIPART_BOUNDARY,
};
use smartcosmos::types::{EntityReferenceType, Urn, ViewType};

const FILE_URN: &str = "urn:uuid:1f6c2f8e-9f1f-4f2f-8b1a-aa51332cba59";

fn endpoint(network: &MockNetwork) -> FileEndpoint<MockNetwork> {
    FileEndpoint::new(network.clone(), test_config())
}

#[test]
fn define_extracts_file_urn() {
    let network = MockNetwork::new();
    network.push_response(&json_response(
        201,
        &format!(r#"{{"code":3,"message":"{FILE_URN}"}}"#),
    ));
    let mut files = endpoint(&network);

    let mut request = FileDefinitionRequest::default();
    request.reference_urn = Urn::new("urn:uuid:0a9ff8b6-2943-4d08-bd33-92ab45a9d269");
    request.mime_type = String::try_from("text/csv").unwrap();

    let (result, response) = files.define(&request);
    assert_eq!(result, FileActionResult::Successful);
    let response = response.unwrap();
    assert_eq!(response.file_urn.as_ref().map(Urn::as_str), Some(FILE_URN));

    let sent = network.written(0);
    assert!(sent.starts_with("PUT /service/rest/files HTTP/1.1\r\n"));
    assert!(sent.contains("\"entityReferenceType\":\"Object\""));
    assert!(sent.contains("\"mimeType\":\"text/csv\""));
}

#[test]
fn define_rejects_incomplete_request_without_connecting() {
    let network = MockNetwork::new();
    let mut files = endpoint(&network);

    let (result, response) = files.define(&FileDefinitionRequest::default());
    assert_eq!(result, FileActionResult::Failed);
    assert!(response.is_none());
    assert_eq!(network.connect_count(), 0);
}

#[test]
fn octet_upload_maps_each_status() {
    let cases = [
        (200, FileActionResult::Successful),
        (400, FileActionResult::Failed),
        (409, FileActionResult::Conflict),
        (503, FileActionResult::Failed),
    ];
    for (status, expected) in cases {
        let network = MockNetwork::new();
        network.push_response(&json_response(
            status,
            &format!(r#"{{"code":0,"message":"{}"}}"#, reason_phrase(status)),
        ));
        let mut files = endpoint(&network);

        let urn = Urn::new(FILE_URN);
        let (result, response) = files.upload_octet_stream(&urn, b"1,2,3\n4,5,6\n");
        assert_eq!(result, expected, "status {status}");
        assert_eq!(response.unwrap().http_status_code, status);
    }
}

#[test]
fn octet_upload_sends_raw_bytes() {
    let network = MockNetwork::new();
    network.push_response(&json_response(200, r#"{"code":0,"message":"stored"}"#));
    let mut files = endpoint(&network);

    let urn = Urn::new(FILE_URN);
    let (result, _) = files.upload_octet_stream(&urn, b"1,2,3\n4,5,6\n");
    assert_eq!(result, FileActionResult::Successful);

    let sent = network.written(0);
    assert!(sent.starts_with(&format!("POST /service/rest/files/{FILE_URN}/octet HTTP/1.1\r\n")));
    assert!(sent.contains("Content-Type: application/octet-stream\r\n"));
    assert!(sent.contains("Content-Length: 12\r\n"));
    assert!(sent.ends_with("\r\n\r\n1,2,3\n4,5,6\n"));
}

#[test]
fn upload_without_decodable_body_fails() {
    // A payloadless conflict is not trusted as a conflict.
    let network = MockNetwork::new();
    network.push_response(&http_response(409, "Conflict", &[], b""));
    let mut files = endpoint(&network);

    let urn = Urn::new(FILE_URN);
    let (result, response) = files.upload_octet_stream(&urn, b"data");
    assert_eq!(result, FileActionResult::Failed);
    assert!(response.is_none());
}

#[test]
fn multipart_upload_frames_the_single_part() {
    let network = MockNetwork::new();
    network.push_response(&json_response(200, r#"{"code":0,"message":"stored"}"#));
    let mut files = endpoint(&network);

    let urn = Urn::new(FILE_URN);
    let (result, _) = files.upload_multipart(&urn, b"csv,data", "readings.csv");
    assert_eq!(result, FileActionResult::Successful);

    let sent = network.written(0);
    assert!(sent.starts_with(&format!(
        "POST /service/rest/files/{FILE_URN}/multipart HTTP/1.1\r\n"
    )));
    assert!(sent.contains(&format!(
        "Content-Type: multipart/form-data; boundary={MULTIPART_BOUNDARY}\r\n"
    )));
    assert!(sent.contains(&format!(
        "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"readings\"; filename=\"readings.csv\"\r\nContent-Type: application/octet-stream\r\n\r\ncsv,data\r\n--{MULTIPART_BOUNDARY}--\r\n"
    )));
}

#[test]
fn multipart_upload_requires_a_filename() {
    let network = MockNetwork::new();
    let mut files = endpoint(&network);

    let urn = Urn::new(FILE_URN);
    let (result, response) = files.upload_multipart(&urn, b"data", "");
    assert_eq!(result, FileActionResult::Failed);
    assert!(response.is_none());
    assert_eq!(network.connect_count(), 0);
}

#[test]
fn definition_copies_event_header() {
    let network = MockNetwork::new();
    network.push_response(&http_response(
        200,
        "OK",
        &[
            ("Content-Type", "application/json"),
            ("SmartCosmos-Event", "FileRetrieved"),
        ],
        format!(
            r#"{{"urn":"{FILE_URN}","entityReferenceType":"Object","referenceUrn":"urn:uuid:0a9ff8b6-2943-4d08-bd33-92ab45a9d269","mimeType":"text/csv","fileName":"readings.csv"}}"#
        )
        .as_bytes(),
    ));
    let mut files = endpoint(&network);

    let urn = Urn::new(FILE_URN);
    let (result, response) = files.definition(&urn, ViewType::Full);
    assert_eq!(result, FileActionResult::Successful);
    let record = response.unwrap();
    assert_eq!(record.urn.as_str(), FILE_URN);
    assert_eq!(record.mime_type.as_str(), "text/csv");
    assert_eq!(
        record.smartcosmos_event.as_ref().map(|e| e.as_str()),
        Some("FileRetrieved")
    );

    let sent = network.written(0);
    assert!(sent.starts_with(&format!(
        "GET /service/rest/files/{FILE_URN}?view=Full HTTP/1.1\r\n"
    )));
}

#[test]
fn content_returns_bytes_and_filename() {
    let network = MockNetwork::new();
    network.push_response(&http_response(
        200,
        "OK",
        &[
            ("Content-Type", "application/octet-stream"),
            ("Content-Disposition", "attachment; filename=\"readings.csv\""),
        ],
        b"1,2,3\n4,5,6\n",
    ));
    let mut files = endpoint(&network);

    let urn = Urn::new(FILE_URN);
    let (result, response) = files.content(&urn);
    assert_eq!(result, FileActionResult::Successful);
    let content = response.unwrap();
    assert_eq!(&content.content[..], b"1,2,3\n4,5,6\n");
    assert_eq!(
        content.filename.as_ref().map(|f| f.as_str()),
        Some("readings.csv")
    );

    let sent = network.written(0);
    assert!(sent.starts_with(&format!(
        "GET /service/rest/files/{FILE_URN}/contents HTTP/1.1\r\n"
    )));
}

#[test]
fn content_failure_parses_error_envelope() {
    let network = MockNetwork::new();
    network.push_response(&json_response(
        404,
        r#"{"code":1,"message":"no content uploaded"}"#,
    ));
    let mut files = endpoint(&network);

    let urn = Urn::new(FILE_URN);
    let (result, response) = files.content(&urn);
    assert_eq!(result, FileActionResult::Failed);
    let envelope = response.unwrap();
    assert_eq!(envelope.http_status_code, 404);
    assert_eq!(envelope.message.as_str(), "no content uploaded");
    assert!(envelope.content.is_empty());
}

#[test]
fn related_lists_definitions_for_an_entity() {
    let network = MockNetwork::new();
    network.push_response(&json_response(
        200,
        &format!(
            r#"[{{"urn":"{FILE_URN}","mimeType":"text/csv"}},{{"urn":"urn:uuid:9e107d9d-372e-4d1b-a2f5-6d9700d9ac51","mimeType":"image/png"}}]"#
        ),
    ));
    let mut files = endpoint(&network);

    let reference = Urn::new("urn:uuid:0a9ff8b6-2943-4d08-bd33-92ab45a9d269");
    let (result, response) = files.related(EntityReferenceType::Object, &reference, ViewType::Standard);
    assert_eq!(result, FileActionResult::Successful);
    let list = response.unwrap();
    assert_eq!(list.files.len(), 2);
    assert_eq!(list.files[1].mime_type.as_str(), "image/png");
    assert_eq!(list.files[1].http_status_code, 200);

    let sent = network.written(0);
    assert!(sent.starts_with(
        "GET /service/rest/files/Object/urn:uuid:0a9ff8b6-2943-4d08-bd33-92ab45a9d269?view=Standard HTTP/1.1\r\n"
    ));
}

#[test]
fn delete_requires_no_content_and_the_event_header() {
    let cases: [(u16, &[(&str, &str)], FileActionResult); 3] = [
        (
            204,
            &[("SmartCosmos-Event", "FileDeleted")],
            FileActionResult::Successful,
        ),
        (204, &[], FileActionResult::Failed),
        (
            200,
            &[("SmartCosmos-Event", "FileDeleted")],
            FileActionResult::Failed,
        ),
    ];
    for (status, headers, expected) in cases {
        let network = MockNetwork::new();
        network.push_response(&http_response(status, reason_phrase(status), headers, b""));
        let mut files = endpoint(&network);

        let urn = Urn::new(FILE_URN);
        assert_eq!(files.delete(&urn), expected, "status {status}");

        let sent = network.written(0);
        assert!(sent.starts_with(&format!("DELETE /service/rest/files/{FILE_URN} HTTP/1.1\r\n")));
    }
}

#[test]
fn delete_rejects_malformed_urn_without_connecting() {
    let network = MockNetwork::new();
    let mut files = endpoint(&network);

    assert_eq!(files.delete(&Urn::new("nope")), FileActionResult::Failed);
    assert_eq!(network.connect_count(), 0);
}
