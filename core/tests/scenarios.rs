//! Client behaviour against scripted transports.
//!
//! A `ScriptedTransport` hands out canned responses in order and records
//! every request, which pins down both the classification of each outcome
//! and the one-call-per-operation rule.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use mahasiswa_core::{
    ClientConfig, ClientError, HttpMethod, HttpRequest, HttpResponse, Mahasiswa, Notice, NoticeKind,
    Record, ResourceClient, Transport, TransportError, ViewState,
};

const BASE: &str = "http://127.0.0.1:3000/api/mahasiswa";

#[derive(Clone, Default)]
struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    fn reply(self, status: u16, body: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    fn fail(self, error: TransportError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left")
    }
}

fn client(transport: &ScriptedTransport) -> ResourceClient<Mahasiswa, ScriptedTransport> {
    ResourceClient::with_transport(&ClientConfig::new(BASE), transport.clone())
}

#[tokio::test]
async fn create_conflict_surfaces_server_message() {
    let transport =
        ScriptedTransport::default().reply(409, r#"{"message":"NPM sudah terdaftar"}"#);
    let client = client(&transport);

    let err = client
        .create(&serde_json::json!({"name": "Ana", "npm": "123"}))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::ServerRejected {
            status: 409,
            message: "NPM sudah terdaftar".to_string()
        }
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1, "exactly one network call");
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, BASE);
}

#[tokio::test]
async fn remove_then_get_reports_not_found() {
    let transport = ScriptedTransport::default()
        .reply(200, r#"{"message":"deleted"}"#)
        .reply(404, r#"{"message":"Mahasiswa tidak ditemukan"}"#);
    let client = client(&transport);

    let envelope = client.remove("123").await.unwrap();
    assert_eq!(envelope.message.as_deref(), Some("deleted"));
    assert!(envelope.data.is_none());

    let err = client.get_by_key("123").await.unwrap_err();
    assert!(err.is_not_found());

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, HttpMethod::Delete);
    assert_eq!(requests[0].url, format!("{BASE}/123"));
    assert_eq!(requests[1].method, HttpMethod::Get);
    assert_eq!(requests[1].url, format!("{BASE}/123"));
}

#[tokio::test]
async fn list_returns_payload_unmodified() {
    let body = r#"{"data":[{"npm":"2","nama":"B","prodi":"D3"},{"npm":1,"nama":"A","ipk":3.5}]}"#;
    let transport = ScriptedTransport::default().reply(200, body);
    let client: ResourceClient<Record, _> =
        ResourceClient::with_transport(&ClientConfig::new(BASE), transport);

    let records = client.list_all().await.unwrap();
    let expected: Vec<Record> =
        serde_json::from_value(serde_json::from_str::<serde_json::Value>(body).unwrap()["data"].clone())
            .unwrap();
    assert_eq!(records, expected);
}

#[tokio::test]
async fn absent_list_payload_renders_as_empty() {
    let transport = ScriptedTransport::default().reply(200, r#"{"status":200,"message":"ok"}"#);
    let client = client(&transport);

    let state = ViewState::from_list(client.list_all().await);
    assert_eq!(state, ViewState::Empty);
}

#[tokio::test]
async fn transport_failures_keep_their_class() {
    let transport = ScriptedTransport::default()
        .fail(TransportError::NoResponse("connection reset by peer".to_string()))
        .fail(TransportError::Setup("invalid header value".to_string()));
    let client = client(&transport);

    let err = client.list_all().await.unwrap_err();
    assert_eq!(
        err,
        ClientError::NoResponse {
            reason: "connection reset by peer".to_string()
        }
    );
    assert_eq!(Notice::from(&err).kind, NoticeKind::Offline);

    let err = client.remove("1").await.unwrap_err();
    assert!(matches!(err, ClientError::RequestSetupFailed { .. }));
    assert_eq!(Notice::from(&err).kind, NoticeKind::Internal);
}

#[tokio::test]
async fn setup_failure_never_reaches_the_transport() {
    let transport = ScriptedTransport::default();
    let client = client(&transport);

    let err = client.get_by_key("").await.unwrap_err();
    assert!(matches!(err, ClientError::RequestSetupFailed { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn update_sends_fields_to_record_url() {
    let transport = ScriptedTransport::default()
        .reply(200, r#"{"status":200,"message":"Berhasil Mengupdate Mahasiswa","npm":123}"#);
    let client = client(&transport);

    let fields = Mahasiswa::new("123", "Ana").with_prodi("D4 TI");
    let envelope = client.update("123", &fields).await.unwrap();
    assert_eq!(envelope.extra["npm"], 123);

    let requests = transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Put);
    assert_eq!(requests[0].url, format!("{BASE}/123"));
    let sent: Mahasiswa = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent, fields);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let transport = ScriptedTransport::default()
        .reply(200, r#"{"data":[]}"#)
        .reply(200, r#"{"data":[]}"#);
    let client = client(&transport);

    let (a, b) = tokio::join!(client.list_all(), client.list_all());
    assert!(a.unwrap().is_empty());
    assert!(b.unwrap().is_empty());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn get_failure_becomes_failed_view() {
    let transport = ScriptedTransport::default().reply(500, "");
    let client = client(&transport);

    let state = ViewState::from_result(client.get_by_key("9").await);
    assert_eq!(
        state,
        ViewState::Failed(Notice {
            kind: NoticeKind::Rejected,
            text: mahasiswa_core::GENERIC_FAILURE_MESSAGE.to_string()
        })
    );
}
