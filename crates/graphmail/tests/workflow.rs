//! End-to-end workflow tests against a scripted local HTTP stub.
//!
//! The stub answers one connection per scripted response, in order, and
//! records every raw request, so the tests can assert both what was written
//! to disk and which endpoints were (or were not) hit.

use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use graphmail::{
    download_attachments, report_outcome, Credentials, GraphError, GraphSession, Notifier,
};

const TOKEN_OK: &str = r#"{"access_token":"tok-e2e","token_type":"Bearer"}"#;

struct StubResponse {
    status: &'static str,
    body: Vec<u8>,
}

impl StubResponse {
    fn json(status: &'static str, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    fn bytes(body: &[u8]) -> Self {
        Self {
            status: "200 OK",
            body: body.to_vec(),
        }
    }
}

struct Stub {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    /// Serve the scripted responses, one connection each.
    fn serve(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        std::thread::spawn(move || {
            for response in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let request = read_request(&mut stream);
                seen.lock().unwrap().push(request);

                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    response.status,
                    response.body.len()
                );
                stream.write_all(head.as_bytes()).unwrap();
                stream.write_all(&response.body).unwrap();
            }
        });

        Self { base, requests }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].clone()
    }
}

/// Read one HTTP request: headers through the blank line, plus a
/// Content-Length body if one is declared.
fn read_request(stream: &mut std::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut buf).unwrap();
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        if n == 0 {
            break raw.len();
        }
    };

    let headers = String::from_utf8_lossy(&raw[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    while raw.len() < header_end + content_length {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&raw).to_string()
}

#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<(String, String)>>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), GraphError> {
        self.sent
            .borrow_mut()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

fn credentials() -> Credentials {
    Credentials {
        client_id: "client-e2e".to_string(),
        username: "inbox@example.com".to_string(),
        password: "secret".to_string(),
    }
}

fn connect(stub: &Stub) -> GraphSession {
    GraphSession::connect(&credentials(), &stub.base, &stub.base, &[]).unwrap()
}

#[test]
fn test_full_run_writes_all_attachments_and_sends_nothing() {
    let search_body = r#"{
        "value": [
            { "id": "m1", "subject": "Daily export", "from": { "emailAddress": { "address": "robot@example.com" } } }
        ]
    }"#;
    let attachments_body = r#"{
        "value": [
            { "id": "a1", "name": "a.pdf" },
            { "id": "a2", "name": "b.png" }
        ]
    }"#;

    let stub = Stub::serve(vec![
        StubResponse::json("200 OK", TOKEN_OK),
        StubResponse::json("200 OK", search_body),
        StubResponse::json("200 OK", attachments_body),
        StubResponse::bytes(b"%PDF-1.4 fake"),
        StubResponse::bytes(b"\x89PNG fake"),
    ]);
    let save_dir = tempfile::tempdir().unwrap();
    let notifier = RecordingNotifier::default();

    let session = report_outcome("token acquisition", &notifier, || {
        GraphSession::connect(&credentials(), &stub.base, &stub.base, &[])
    })
    .unwrap();

    let messages =
        report_outcome("mailbox search", &notifier, || session.search_messages(None)).unwrap();
    assert_eq!(messages.len(), 1);

    let mut total = 0;
    for message in &messages {
        total += report_outcome("attachment download", &notifier, || {
            download_attachments(&session, &message.id, save_dir.path())
        })
        .unwrap();
    }

    assert_eq!(total, 2);
    assert_eq!(
        std::fs::read(save_dir.path().join("a.pdf")).unwrap(),
        b"%PDF-1.4 fake"
    );
    assert_eq!(
        std::fs::read(save_dir.path().join("b.png")).unwrap(),
        b"\x89PNG fake"
    );
    assert!(notifier.sent.borrow().is_empty());

    // every request after the token grant carried the bearer header
    for i in 1..stub.request_count() {
        assert!(stub.request(i).to_lowercase().contains("authorization: bearer tok-e2e"));
    }
}

#[test]
fn test_auth_failure_writes_nothing_and_sends_one_notification() {
    let stub = Stub::serve(vec![StubResponse::json(
        "400 Bad Request",
        r#"{"error":"invalid_grant","error_description":"AADSTS50126: wrong password"}"#,
    )]);
    let save_dir = tempfile::tempdir().unwrap();
    let notifier = RecordingNotifier::default();

    let result = report_outcome("token acquisition", &notifier, || {
        GraphSession::connect(&credentials(), &stub.base, &stub.base, &[])
    });

    // the session type carries the token and deliberately has no Debug impl
    let err = match result {
        Err(err) => err,
        Ok(_) => panic!("expected the connect to fail"),
    };
    assert!(matches!(err, GraphError::Authentication { .. }));

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].0.contains("token acquisition"));
    assert!(sent[0].1.contains("AADSTS50126"));
    assert_eq!(std::fs::read_dir(save_dir.path()).unwrap().count(), 0);
    assert_eq!(stub.request_count(), 1);
}

#[test]
fn test_failing_attachment_aborts_remainder() {
    let attachments_body = r#"{
        "value": [
            { "id": "a1", "name": "one.txt" },
            { "id": "a2", "name": "two.txt" },
            { "id": "a3", "name": "three.txt" }
        ]
    }"#;

    let stub = Stub::serve(vec![
        StubResponse::json("200 OK", TOKEN_OK),
        StubResponse::json("200 OK", attachments_body),
        StubResponse::bytes(b"first"),
        StubResponse::json("500 Internal Server Error", r#"{"error":"boom"}"#),
    ]);
    let save_dir = tempfile::tempdir().unwrap();
    let session = connect(&stub);

    let err = download_attachments(&session, &"m1".into(), save_dir.path()).unwrap_err();

    match err {
        GraphError::Attachment { id, name, source } => {
            assert_eq!(id, "a2");
            assert_eq!(name, "two.txt");
            assert!(matches!(*source, GraphError::ApiRequest { status: 500, .. }));
        }
        other => panic!("expected Attachment error, got {:?}", other),
    }

    // one.txt was written before the failure; three.txt was never requested
    assert_eq!(
        std::fs::read(save_dir.path().join("one.txt")).unwrap(),
        b"first"
    );
    assert!(!save_dir.path().join("two.txt").exists());
    assert!(!save_dir.path().join("three.txt").exists());
    assert_eq!(stub.request_count(), 4);
}

#[test]
fn test_message_without_attachments_returns_zero() {
    let stub = Stub::serve(vec![
        StubResponse::json("200 OK", TOKEN_OK),
        StubResponse::json("200 OK", r#"{"value":[]}"#),
    ]);
    let save_dir = tempfile::tempdir().unwrap();
    let session = connect(&stub);

    let count = download_attachments(&session, &"m1".into(), save_dir.path()).unwrap();

    assert_eq!(count, 0);
    assert_eq!(std::fs::read_dir(save_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_repeated_download_overwrites_same_file() {
    let attachments_body = r#"{ "value": [ { "id": "a1", "name": "report.csv" } ] }"#;

    let stub = Stub::serve(vec![
        StubResponse::json("200 OK", TOKEN_OK),
        StubResponse::json("200 OK", attachments_body),
        StubResponse::bytes(b"rows,1"),
        StubResponse::json("200 OK", attachments_body),
        StubResponse::bytes(b"rows,1"),
    ]);
    let save_dir = tempfile::tempdir().unwrap();
    let session = connect(&stub);

    assert_eq!(
        download_attachments(&session, &"m1".into(), save_dir.path()).unwrap(),
        1
    );
    assert_eq!(
        download_attachments(&session, &"m1".into(), save_dir.path()).unwrap(),
        1
    );

    assert_eq!(
        std::fs::read(save_dir.path().join("report.csv")).unwrap(),
        b"rows,1"
    );
    assert_eq!(std::fs::read_dir(save_dir.path()).unwrap().count(), 1);
}

#[test]
fn test_attachment_list_failure_writes_nothing() {
    let stub = Stub::serve(vec![
        StubResponse::json("200 OK", TOKEN_OK),
        StubResponse::json("404 Not Found", r#"{"error":{"code":"ErrorItemNotFound"}}"#),
    ]);
    let save_dir = tempfile::tempdir().unwrap();
    let session = connect(&stub);

    let err = download_attachments(&session, &"gone".into(), save_dir.path()).unwrap_err();

    match err {
        GraphError::ApiRequest { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("ErrorItemNotFound"));
        }
        other => panic!("expected ApiRequest, got {:?}", other),
    }
    assert_eq!(std::fs::read_dir(save_dir.path()).unwrap().count(), 0);
}
