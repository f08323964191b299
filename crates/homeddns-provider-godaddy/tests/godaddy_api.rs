//! GoDaddy adapter against a mocked Domains API

use homeddns_core::{Credentials, DnsProvider, DnsRecord, Error, RecordType};
use homeddns_provider_godaddy::GodaddyProvider;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH: &str = "sso-key test-id:test-key";

fn provider(server: &MockServer) -> GodaddyProvider {
    GodaddyProvider::with_base_url(Credentials::new("test-id", "test-key"), server.uri())
        .unwrap()
}

#[tokio::test]
async fn get_record_returns_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domains/example.com/records/A/test"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"data": "1.2.3.3", "name": "test", "type": "A", "ttl": 600},
            {"data": "5.6.7.8", "name": "test", "type": "A", "ttl": 600}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let record = provider(&server)
        .get_record("example.com", &DnsRecord::new("test", RecordType::A))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.name, "test");
    assert_eq!(record.value, "1.2.3.3");
    assert_eq!(record.record_type, RecordType::A);
    assert_eq!(record.ttl, 600);
}

#[tokio::test]
async fn get_record_with_empty_list_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domains/example.com/records/CNAME/ctest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let record = provider(&server)
        .get_record("example.com", &DnsRecord::new("ctest", RecordType::Cname))
        .await
        .unwrap();

    assert!(record.is_none());
}

#[tokio::test]
async fn get_record_surfaces_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domains/example.com/records/A/test"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "UNABLE_TO_AUTHENTICATE",
            "message": "Unable to authenticate"
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .get_record("example.com", &DnsRecord::new("test", RecordType::A))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Api { ref provider, ref code, .. }
            if provider == "godaddy" && code == "UNABLE_TO_AUTHENTICATE"
    ));
}

#[tokio::test]
async fn get_record_with_malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domains/example.com/records/A/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .get_record("example.com", &DnsRecord::new("test", RecordType::A))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn set_record_patches_with_clamped_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/domains/example.com/records"))
        .and(header("Authorization", AUTH))
        .and(body_json(json!([
            {"data": "1.2.3.4", "name": "test", "type": "A", "ttl": 600, "port": 1}
        ])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let record = DnsRecord::new("test", RecordType::A)
        .with_value("1.2.3.4")
        .with_ttl(70);

    provider(&server)
        .set_record("example.com", &record)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_record_puts_to_typed_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/domains/example.com/records/MX/mail"))
        .and(header("Authorization", AUTH))
        .and(body_json(json!([
            {
                "data": "mx.example.com",
                "name": "mail",
                "type": "MX",
                "ttl": 3600,
                "port": 1,
                "priority": 10
            }
        ])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let record = DnsRecord::new("mail", RecordType::Mx)
        .with_value("mx.example.com")
        .with_ttl(3600)
        .with_priority(10);

    provider(&server)
        .update_record("example.com", &record)
        .await
        .unwrap();
}

#[tokio::test]
async fn write_rejection_with_integer_code_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/domains/example.com/records"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 422,
            "message": "Request body doesn't fulfill schema",
            "fields": []
        })))
        .mount(&server)
        .await;

    let record = DnsRecord::new("test", RecordType::A).with_value("1.2.3.4");
    let err = provider(&server)
        .set_record("example.com", &record)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Api { ref code, ref message, .. }
            if code == "422" && message == "Request body doesn't fulfill schema"
    ));
}

#[tokio::test]
async fn unreachable_api_is_an_http_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let provider =
        GodaddyProvider::with_base_url(Credentials::new("test-id", "test-key"), uri).unwrap();
    let err = provider
        .get_record("example.com", &DnsRecord::new("test", RecordType::A))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
}
