//! In-process stand-in for the ingestion server.

#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

/// One file the fake server has accepted.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
    pub status: &'static str,
}

/// How `GET /files` should answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Wrapped,
    BareArray,
    ServerError,
    BadGateway,
    Html,
}

#[derive(Debug)]
pub struct ServerState {
    pub files: Vec<StoredFile>,
    pub list_mode: ListMode,
    pub list_requests: usize,
    pub reject_uploads: Option<&'static str>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            list_mode: ListMode::Wrapped,
            list_requests: 0,
            reject_uploads: None,
        }
    }
}

pub type Shared = Arc<Mutex<ServerState>>;

pub struct TestServer {
    pub base_url: String,
    pub state: Shared,
}

impl TestServer {
    pub fn set_list_mode(&self, mode: ListMode) {
        self.state.lock().list_mode = mode;
    }

    /// Move every stored file to a new ingestion status.
    pub fn mark_all(&self, status: &'static str) {
        for file in &mut self.state.lock().files {
            file.status = status;
        }
    }

    pub fn file_names(&self) -> Vec<String> {
        self.state.lock().files.iter().map(|f| f.name.clone()).collect()
    }

    pub fn list_requests(&self) -> usize {
        self.state.lock().list_requests
    }
}

pub async fn spawn_server() -> TestServer {
    let state: Shared = Arc::new(Mutex::new(ServerState::default()));
    let router = Router::new()
        .route("/upload", post(upload))
        .route("/files", get(list_files))
        .route("/clear", post(clear))
        .route("/ask", post(ask))
        .with_state(state.clone());
    let base_url = serve(router).await;
    TestServer { base_url, state }
}

/// Bind an ephemeral port and serve `router` in the background.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    if let Some(message) = state.lock().reject_uploads {
        return error(StatusCode::BAD_REQUEST, message);
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let media_type = field.content_type().unwrap_or_default().to_string();
        let Ok(bytes) = field.bytes().await else {
            return error(StatusCode::BAD_REQUEST, "Could not read upload");
        };
        let size = bytes.len();
        state.lock().files.push(StoredFile {
            name: name.clone(),
            media_type,
            bytes: bytes.to_vec(),
            status: "pending",
        });
        return Json(json!({
            "message": "File received",
            "filename": format!("1700000000_{name}"),
            "original_filename": name,
            "size": size,
        }))
        .into_response();
    }
    error(StatusCode::BAD_REQUEST, "No file selected")
}

async fn list_files(State(state): State<Shared>) -> Response {
    let mut state = state.lock();
    state.list_requests += 1;
    let files: Vec<Value> = state
        .files
        .iter()
        .map(|f| {
            let mut record = json!({ "name": f.name, "status": f.status, "size": f.bytes.len() });
            if f.status == "error" {
                record["error"] = json!("could not extract text");
            }
            record
        })
        .collect();
    match state.list_mode {
        ListMode::Wrapped => Json(json!({ "files": files })).into_response(),
        ListMode::BareArray => Json(Value::Array(files)).into_response(),
        ListMode::ServerError => error(StatusCode::INTERNAL_SERVER_ERROR, "database is locked"),
        ListMode::BadGateway => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        ListMode::Html => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            "<html>login</html>",
        )
            .into_response(),
    }
}

async fn clear(State(state): State<Shared>) -> Response {
    state.lock().files.clear();
    Json(json!({ "message": "All files deleted" })).into_response()
}

async fn ask(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let Some(question) = body.get("question").and_then(Value::as_str) else {
        return error(StatusCode::BAD_REQUEST, "No question provided");
    };
    if state.lock().files.is_empty() {
        return error(StatusCode::BAD_REQUEST, "No files uploaded yet");
    }
    Json(json!({ "answer": format!("You asked: {question}") })).into_response()
}
