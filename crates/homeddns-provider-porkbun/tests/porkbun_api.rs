//! Porkbun adapter against a mocked JSON API

use homeddns_core::{Credentials, DnsProvider, DnsRecord, Error, RecordType};
use homeddns_provider_porkbun::PorkbunProvider;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> PorkbunProvider {
    PorkbunProvider::with_base_url(Credentials::new("pk1_test", "sk1_test"), server.uri()).unwrap()
}

fn auth() -> serde_json::Value {
    json!({"apikey": "pk1_test", "secretapikey": "sk1_test"})
}

#[tokio::test]
async fn get_record_maps_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json/v3/dns/retrieveByNameType/example.com/A/www"))
        .and(body_json(auth()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "records": [
                {
                    "id": "106926652",
                    "name": "www.example.com",
                    "type": "A",
                    "content": "1.2.3.3",
                    "ttl": "600",
                    "prio": "0",
                    "notes": ""
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = provider(&server)
        .get_record("example.com", &DnsRecord::new("www", RecordType::A))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.name, "www");
    assert_eq!(record.value, "1.2.3.3");
    assert_eq!(record.ttl, 600);
}

#[tokio::test]
async fn get_apex_record_omits_subdomain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json/v3/dns/retrieveByNameType/example.com/AAAA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "records": [
                {"name": "example.com", "type": "AAAA", "content": "::1", "ttl": "3600"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = provider(&server)
        .get_record("example.com", &DnsRecord::new("@", RecordType::Aaaa))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.name, "@");
    assert_eq!(record.value, "::1");
}

#[tokio::test]
async fn get_record_with_no_records_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json/v3/dns/retrieveByNameType/example.com/A/www"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS", "records": []})),
        )
        .mount(&server)
        .await;

    let record = provider(&server)
        .get_record("example.com", &DnsRecord::new("www", RecordType::A))
        .await
        .unwrap();

    assert!(record.is_none());
}

#[tokio::test]
async fn error_status_surfaces_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json/v3/dns/retrieveByNameType/example.com/A/www"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "ERROR",
            "message": "Invalid API key. (002)"
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .get_record("example.com", &DnsRecord::new("www", RecordType::A))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Api { ref provider, ref code, ref message }
            if provider == "porkbun" && code == "ERROR" && message == "Invalid API key. (002)"
    ));
}

#[tokio::test]
async fn ok_status_with_error_body_is_still_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json/v3/dns/create/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ERROR",
            "message": "Domain is not opted in to API access."
        })))
        .mount(&server)
        .await;

    let record = DnsRecord::new("www", RecordType::A).with_value("1.2.3.4");
    let err = provider(&server)
        .set_record("example.com", &record)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { ref code, .. } if code == "ERROR"));
}

#[tokio::test]
async fn set_record_creates_with_clamped_string_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json/v3/dns/create/example.com"))
        .and(body_json(json!({
            "apikey": "pk1_test",
            "secretapikey": "sk1_test",
            "name": "www",
            "type": "A",
            "content": "1.2.3.4",
            "ttl": "3600"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS", "id": 106926659})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let record = DnsRecord::new("www", RecordType::A)
        .with_value("1.2.3.4")
        .with_ttl(600)
        .with_port(8080);

    provider(&server)
        .set_record("example.com", &record)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_record_edits_by_name_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/json/v3/dns/editByNameType/example.com/MX/mail"))
        .and(body_json(json!({
            "apikey": "pk1_test",
            "secretapikey": "sk1_test",
            "content": "mx.example.com",
            "ttl": "7200",
            "prio": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
        .expect(1)
        .mount(&server)
        .await;

    let record = DnsRecord::new("mail", RecordType::Mx)
        .with_value("mx.example.com")
        .with_ttl(7200)
        .with_priority(10);

    provider(&server)
        .update_record("example.com", &record)
        .await
        .unwrap();
}
