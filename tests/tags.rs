mod common;

use common::{MockNetwork, json_response, test_config};
use heapless::String;
use smartcosmos::endpoints::tags::{
    TagActionResult, TagEndpoint, TagMetadataRequest, TagVerificationRequest,
};

fn endpoint(network: &MockNetwork) -> TagEndpoint<MockNetwork> {
    TagEndpoint::new(network.clone(), test_config())
}

#[test]
fn tag_metadata_posts_the_batch() {
    let network = MockNetwork::new();
    network.push_response(&json_response(
        200,
        r#"[{"tagId":"0A1B2C3D","propertyType":"tagCode","value":"AAA111"},{"tagId":"4E5F6A7B","propertyType":"tagCode","value":"BBB222"}]"#,
    ));
    let mut tags = endpoint(&network);

    let mut request = TagMetadataRequest::default();
    request.tag_ids.push(String::try_from("0A1B2C3D").unwrap()).unwrap();
    request.tag_ids.push(String::try_from("4E5F6A7B").unwrap()).unwrap();
    request
        .property_types
        .push(String::try_from("tagCode").unwrap())
        .unwrap();

    let (result, response) = tags.tag_metadata(&request);
    assert_eq!(result, TagActionResult::Successful);
    let list = response.unwrap();
    assert_eq!(list.http_status_code, 200);
    assert_eq!(list.records.len(), 2);
    assert_eq!(list.records[0].tag_id.as_str(), "0A1B2C3D");
    assert_eq!(list.records[1].value.as_str(), "BBB222");

    let sent = network.written(0);
    assert!(sent.starts_with("POST /service/rest/tag/properties HTTP/1.1\r\n"));
    assert!(sent.ends_with(
        r#"{"tagIds":["0A1B2C3D","4E5F6A7B"],"propertyTypes":["tagCode"]}"#
    ));
}

#[test]
fn tag_metadata_requires_at_least_one_tag() {
    let network = MockNetwork::new();
    let mut tags = endpoint(&network);

    let (result, response) = tags.tag_metadata(&TagMetadataRequest::default());
    assert_eq!(result, TagActionResult::Failed);
    assert!(response.is_none());
    assert_eq!(network.connect_count(), 0);
}

#[test]
fn tag_metadata_fails_when_the_body_is_not_an_array() {
    // The service answers errors with the JSON object envelope, which a
    // bare-array response type cannot absorb.
    let network = MockNetwork::new();
    network.push_response(&json_response(
        400,
        r#"{"code":2,"message":"unknown property type"}"#,
    ));
    let mut tags = endpoint(&network);

    let mut request = TagMetadataRequest::default();
    request.tag_ids.push(String::try_from("0A1B2C3D").unwrap()).unwrap();

    let (result, response) = tags.tag_metadata(&request);
    assert_eq!(result, TagActionResult::Failed);
    assert!(response.is_none());
}

#[test]
fn verify_tags_posts_the_program() {
    let network = MockNetwork::new();
    network.push_response(&json_response(
        200,
        r#"[{"tagId":"0A1B2C3D","state":0},{"tagId":"4E5F6A7B","state":3}]"#,
    ));
    let mut tags = endpoint(&network);

    let mut request = TagVerificationRequest::default();
    request.tag_ids.push(String::try_from("0A1B2C3D").unwrap()).unwrap();
    request.tag_ids.push(String::try_from("4E5F6A7B").unwrap()).unwrap();
    request.verification_type = String::try_from("RR").unwrap();

    let (result, response) = tags.verify_tags(&request);
    assert_eq!(result, TagActionResult::Successful);
    let list = response.unwrap();
    assert_eq!(list.records[0].state, 0);
    assert_eq!(list.records[1].state, 3);

    let sent = network.written(0);
    assert!(sent.starts_with("POST /service/rest/tag/verify HTTP/1.1\r\n"));
    assert!(sent.ends_with(r#"{"tagIds":["0A1B2C3D","4E5F6A7B"],"verificationType":"RR"}"#));
}

#[test]
fn verify_tags_requires_tags_and_a_program() {
    let network = MockNetwork::new();
    let mut tags = endpoint(&network);

    let mut request = TagVerificationRequest::default();
    request.tag_ids.push(String::try_from("0A1B2C3D").unwrap()).unwrap();

    let (result, _) = tags.verify_tags(&request);
    assert_eq!(result, TagActionResult::Failed);
    assert_eq!(network.connect_count(), 0);
}
