// # HTTP Backend Contract Tests
//
// Each test starts a one-shot local server that answers a single request
// with a canned response, then checks how the backend maps it.

use intake_core::Error;
use intake_core::model::{CustomerDraft, CustomerRecord, FieldPath, RecordId};
use intake_core::traits::{CrmIntegration, RecordStore};
use intake_http::{HttpCrmIntegration, HttpRecordStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Request line and body as received by the server
struct Captured {
    request_line: String,
    body: String,
}

/// Serve exactly one request, answering with `status` and `response_body`
async fn serve_once(
    status: &'static str,
    response_body: impl Into<String>,
) -> (String, JoinHandle<Captured>) {
    let response_body = response_body.into();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        // Headers first, then as much body as Content-Length announces
        let (head_end, content_length) = loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(pos) = text.find("\r\n\r\n") {
                let length = text[..pos]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                break (pos + 4, length);
            }
            if n == 0 {
                break (raw.len(), 0);
            }
        };
        while raw.len() < head_end + content_length {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
        }

        let text = String::from_utf8_lossy(&raw).to_string();
        let request_line = text.lines().next().unwrap_or_default().to_string();
        let body = text.get(head_end..).unwrap_or_default().to_string();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            response_body.len(),
            response_body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        Captured { request_line, body }
    });

    (base_url, handle)
}

fn draft() -> CustomerDraft {
    let mut draft = CustomerDraft::default();
    draft.set(FieldPath::PhoneNumber, "9999999999");
    draft.set(FieldPath::FirstName, "A");
    draft.set(FieldPath::LastName, "B");
    draft.set(FieldPath::Email, "a@b.com");
    draft.set(FieldPath::Street, "S");
    draft.set(FieldPath::City, "C");
    draft.set(FieldPath::State, "ST");
    draft.set(FieldPath::ZipCode, "560001");
    draft.set(FieldPath::Country, "IN");
    draft
}

const RECORD_JSON: &str = r#"{"_id":"65f0","phoneNumber":"9999999999","firstName":"A","lastName":"B","email":"a@b.com","address":{"street":"S","city":"C","state":"ST","zipCode":"560001","country":"IN"}}"#;

#[tokio::test]
async fn test_create_posts_draft_and_decodes_record() {
    let (base_url, server) = serve_once("201 Created", RECORD_JSON).await;
    let store = HttpRecordStore::new(base_url).unwrap();

    let record = store.create_record(&draft()).await.unwrap();
    assert_eq!(record.id, RecordId::new("65f0"));
    assert_eq!(record.details, draft());

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /api/v1/customers/new"));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["firstName"], "A");
    assert_eq!(sent["address"]["zipCode"], "560001");
    assert_eq!(sent["address"]["country"], "IN");
}

#[tokio::test]
async fn test_create_failure_status_is_transport_error() {
    let (base_url, _server) = serve_once("500 Internal Server Error", r#"{"error":"db down"}"#).await;
    let store = HttpRecordStore::new(base_url).unwrap();

    let err = store.create_record(&draft()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_list_accepts_wrapped_payload() {
    let body = format!(r#"{{"data":[{}]}}"#, RECORD_JSON);
    let (base_url, server) = serve_once("200 OK", body).await;
    let store = HttpRecordStore::new(base_url).unwrap();

    let records = store.list_records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_str(), "65f0");

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("GET /api/v1/customers/all"));
}

#[tokio::test]
async fn test_list_accepts_bare_payload() {
    let body = format!("[{}]", RECORD_JSON);
    let (base_url, _server) = serve_once("200 OK", body).await;
    let store = HttpRecordStore::new(base_url).unwrap();

    assert_eq!(store.list_records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_malformed_payload_is_transport_error() {
    let (base_url, _server) = serve_once("200 OK", r#"{"unexpected":true}"#).await;
    let store = HttpRecordStore::new(base_url).unwrap();

    let err = store.list_records().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_push_posts_record_and_returns_receipt() {
    let (base_url, server) = serve_once("200 OK", r#"{"status":"queued"}"#).await;
    let crm = HttpCrmIntegration::new(base_url).unwrap();
    let record = CustomerRecord::new(RecordId::new("65f0"), draft());

    let receipt = crm.push_record(&record).await.unwrap();
    assert_eq!(receipt.record_id, record.id);
    assert_eq!(receipt.response["status"], "queued");

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /api/customers/push-to-crm"));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["_id"], "65f0");
}

#[tokio::test]
async fn test_push_failure_status_is_integration_error() {
    let (base_url, _server) = serve_once("502 Bad Gateway", "").await;
    let crm = HttpCrmIntegration::new(base_url).unwrap();
    let record = CustomerRecord::new(RecordId::new("65f0"), draft());

    let err = crm.push_record(&record).await.unwrap_err();
    assert!(matches!(err, Error::Integration(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let store = HttpRecordStore::new(base_url).unwrap();
    let err = store.list_records().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
