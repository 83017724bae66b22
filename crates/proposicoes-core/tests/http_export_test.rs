//! Integration tests for the HTTP client, export client and filter form
//!
//! A minimal HTTP/1.1 stub on a local port stands in for the real API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use proposicoes_core::error::{MSG_EXPORT_FAILED, MSG_NO_DATA, MSG_REFERENCES_FAILED};
use proposicoes_core::{
    ApiClient, ApiError, DownloadTrigger, ExportClient, ExportQuery, FilterForm, FormState,
    FormValues, ProposicaoApi, ReferenceKind, Toast,
};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned response for requests whose path ends with `path`
struct Route {
    path: &'static str,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

fn route(path: &'static str, status: u16, content_type: &'static str, body: &[u8]) -> Route {
    Route {
        path,
        status,
        content_type,
        body: body.to_vec(),
    }
}

struct Stub {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Start the stub; unmatched paths answer 404
async fn spawn_stub(routes: Vec<Route>) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(routes);

    let seen = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let seen = seen.clone();
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut raw = Vec::new();
                let mut buf = [0u8; 1024];
                while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => raw.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&raw).to_string();
                let target = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("")
                    .to_string();
                seen.lock().unwrap().push(request);

                let path = target.split('?').next().unwrap_or("");
                let (status, content_type, body) = routes
                    .iter()
                    .find(|r| path.ends_with(r.path))
                    .map(|r| (r.status, r.content_type, r.body.clone()))
                    .unwrap_or((404, "text/plain", Vec::new()));

                let head = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    reason(status),
                    content_type,
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Stub {
        base_url: format!("http://{}/api", addr),
        requests,
    }
}

fn api(stub: &Stub) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(&stub.base_url, Duration::from_secs(5)).unwrap())
}

fn january_query() -> ExportQuery {
    ExportQuery::new(
        9,
        "2",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    )
    .unwrap()
}

const XLSX: &[u8] = b"PK\x03\x04fake-spreadsheet";
const MUNICIPIOS: &[u8] = br#"[{"id": 9, "nome": "Rio Branco"}, {"id": 12, "nome": "Xapuri"}]"#;
const ESPECIES: &[u8] = br#"[{"id": 2, "nome": "Projeto de Lei"}]"#;

#[tokio::test]
async fn test_export_request_carries_mapped_params() {
    let stub = spawn_stub(vec![route(
        "/proposicao/gerar-excel",
        200,
        "application/octet-stream",
        XLSX,
    )])
    .await;

    let bytes = api(&stub).fetch_export(&january_query()).await.unwrap();
    assert_eq!(bytes, XLSX);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let first_line = requests[0].lines().next().unwrap();
    assert_eq!(
        first_line,
        "GET /api/proposicao/gerar-excel?id_municipio=9&tipo=2&data_inicio=2024-01-01&data_final=2024-01-31 HTTP/1.1"
    );
    assert!(requests[0]
        .to_lowercase()
        .contains("accept: application/octet-stream"));
}

#[tokio::test]
async fn test_export_client_saves_download() {
    let stub = spawn_stub(vec![route(
        "/proposicao/gerar-excel",
        200,
        "application/octet-stream",
        XLSX,
    )])
    .await;
    let temp_dir = TempDir::new().unwrap();
    let client = ExportClient::new(api(&stub), DownloadTrigger::new(temp_dir.path()));

    let bytes = client.export(&january_query()).await.unwrap();

    let saved = temp_dir.path().join("proposicoes.xlsx");
    assert_eq!(std::fs::read(&saved).unwrap(), bytes);
    let entries: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the final file should remain");
}

#[tokio::test]
async fn test_export_404_yields_no_data_message() {
    let stub = spawn_stub(vec![route(
        "/proposicao/gerar-excel",
        404,
        "application/json",
        br#"{"message": "not found"}"#,
    )])
    .await;
    let temp_dir = TempDir::new().unwrap();
    let client = ExportClient::new(api(&stub), DownloadTrigger::new(temp_dir.path()));

    let err = client.export(&january_query()).await.unwrap_err();

    assert_eq!(err.to_string(), MSG_NO_DATA);
    assert!(!temp_dir.path().join("proposicoes.xlsx").exists());
}

#[tokio::test]
async fn test_export_500_yields_export_failed_message() {
    let stub = spawn_stub(vec![route(
        "/proposicao/gerar-excel",
        500,
        "text/plain",
        b"stack trace",
    )])
    .await;
    let temp_dir = TempDir::new().unwrap();
    let client = ExportClient::new(api(&stub), DownloadTrigger::new(temp_dir.path()));

    let err = client.export(&january_query()).await.unwrap_err();
    assert_eq!(err.to_string(), MSG_EXPORT_FAILED);
}

#[tokio::test]
async fn test_export_connection_refused_yields_export_failed_message() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = Arc::new(ApiClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap());
    let temp_dir = TempDir::new().unwrap();
    let client = ExportClient::new(api, DownloadTrigger::new(temp_dir.path()));

    let err = client.export(&january_query()).await.unwrap_err();
    assert_eq!(err.to_string(), MSG_EXPORT_FAILED);
}

#[tokio::test]
async fn test_reference_lists_decode() {
    let stub = spawn_stub(vec![
        route("/municipios", 200, "application/json", MUNICIPIOS),
        route("/projeto/especies", 200, "application/json", ESPECIES),
    ])
    .await;
    let api = api(&stub);

    let municipalities = api
        .fetch_reference_list(ReferenceKind::Municipality)
        .await
        .unwrap();
    let species = api.fetch_reference_list(ReferenceKind::Species).await.unwrap();

    assert_eq!(municipalities.len(), 2);
    assert_eq!(municipalities[1].name, "Xapuri");
    assert_eq!(species[0].id, 2);
}

#[tokio::test]
async fn test_reference_list_bad_json_is_decode_error() {
    let stub = spawn_stub(vec![route("/municipios", 200, "application/json", b"<html>")]).await;

    let err = api(&stub)
        .fetch_reference_list(ReferenceKind::Municipality)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_form_flow_end_to_end() {
    let stub = spawn_stub(vec![
        route("/municipios", 200, "application/json", MUNICIPIOS),
        route("/projeto/especies", 200, "application/json", ESPECIES),
        route("/proposicao/gerar-excel", 200, "application/octet-stream", XLSX),
    ])
    .await;
    let api = api(&stub);
    let temp_dir = TempDir::new().unwrap();
    let exporter = ExportClient::new(api.clone(), DownloadTrigger::new(temp_dir.path()));

    let mut form = FilterForm::with_values(FormValues {
        municipality_id: Some(12),
        category: Some("2".to_string()),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
    });
    form.load_references(&*api).await;
    assert_eq!(form.selected_municipality_name(), Some("Xapuri"));

    form.submit(&exporter).await.unwrap();

    assert_eq!(form.state(), FormState::Ready);
    assert!(form.toasts().is_empty());
    let export_request = stub
        .requests()
        .into_iter()
        .find(|r| r.contains("gerar-excel"))
        .unwrap();
    assert!(export_request.contains("id_municipio=12&tipo=2&data_inicio=2024-03-01&data_final=2024-03-31"));
}

#[tokio::test]
async fn test_form_degrades_when_reference_list_fails() {
    let stub = spawn_stub(vec![
        route("/municipios", 200, "application/json", MUNICIPIOS),
        route("/projeto/especies", 500, "text/plain", b"down"),
    ])
    .await;
    let api = api(&stub);

    let mut form = FilterForm::new();
    form.load_references(&*api).await;

    assert_eq!(form.state(), FormState::Ready);
    assert!(form.municipalities().is_empty());
    assert!(form.species().is_empty());
    assert_eq!(form.drain_toasts(), vec![Toast::new(MSG_REFERENCES_FAILED)]);
}
