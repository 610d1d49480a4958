//! In-process fake of the image host and document store.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use tokio::sync::Barrier;

use cardstack_core::{
    DocumentStore, ImageHost, MemoryStore, StoreIdentifier, SyncClient,
};

pub const MASTER_KEY: &str = "test-master-key";
pub const IMAGE_KEY: &str = "test-image-key";
pub const BIN_ID: &str = "bin-fixed";

/// Scripted reply for the next upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadReply {
    Ok,
    Fail,
    /// Non-JSON error page, as a proxy in front of the host would send.
    BadGateway,
}

#[derive(Default)]
pub struct FakeState {
    /// Stored documents by id.
    pub documents: Mutex<HashMap<String, Value>>,
    /// `image` form field of every upload, in arrival order.
    pub uploads: Mutex<Vec<String>>,
    pub upload_keys: Mutex<Vec<String>>,
    /// Replies for upcoming uploads; empty means succeed.
    pub upload_plan: Mutex<VecDeque<UploadReply>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub creates: AtomicUsize,
    /// `X-Bin-Name` header of every create.
    pub bin_names: Mutex<Vec<String>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_creates: AtomicBool,
    /// When set, every read waits here before answering.
    pub read_barrier: Mutex<Option<Arc<Barrier>>>,
}

pub struct FakeServer {
    pub base_url: String,
    pub state: Arc<FakeState>,
}

impl FakeServer {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route("/upload", post(upload))
            .route("/b", post(create))
            .route("/b/{id}", put(write))
            .route("/b/{id}/latest", get(read))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    pub fn collection_url(&self) -> String {
        format!("{}/b", self.base_url)
    }

    pub fn client(&self, storage: Arc<MemoryStore>) -> SyncClient<Arc<MemoryStore>> {
        self.client_with(StoreIdentifier::Fixed(BIN_ID.to_string()), storage)
    }

    pub fn client_with(
        &self,
        store_id: StoreIdentifier,
        storage: Arc<MemoryStore>,
    ) -> SyncClient<Arc<MemoryStore>> {
        SyncClient::new(
            ImageHost::new(self.upload_url(), IMAGE_KEY),
            DocumentStore::new(self.collection_url(), MASTER_KEY),
            store_id,
            storage,
        )
    }

    pub fn seed(&self, id: &str, doc: Value) {
        self.state
            .documents
            .lock()
            .unwrap()
            .insert(id.to_string(), doc);
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.state.documents.lock().unwrap().get(id).cloned()
    }

    pub fn plan_uploads(&self, replies: &[UploadReply]) {
        self.state
            .upload_plan
            .lock()
            .unwrap()
            .extend(replies.iter().copied());
    }

    pub fn uploads(&self) -> Vec<String> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.state.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.state.writes.load(Ordering::SeqCst)
    }

    pub fn bin_names(&self) -> Vec<String> {
        self.state.bin_names.lock().unwrap().clone()
    }

    pub fn creates(&self) -> usize {
        self.state.creates.load(Ordering::SeqCst)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("X-Master-Key")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == MASTER_KEY)
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Invalid X-Master-Key"})),
    )
        .into_response()
}

async fn upload(
    State(state): State<Arc<FakeState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let image = form.get("image").cloned().unwrap_or_default();
    state
        .upload_keys
        .lock()
        .unwrap()
        .push(form.get("key").cloned().unwrap_or_default());

    let reply = state
        .upload_plan
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(UploadReply::Ok);

    let n = {
        let mut uploads = state.uploads.lock().unwrap();
        uploads.push(image);
        uploads.len()
    };

    match reply {
        UploadReply::Ok => Json(json!({
            "success": true,
            "status": 200,
            "data": {
                "url": format!("https://img.test/{}.jpg", n),
                "delete_url": format!("https://img.test/delete/{}", n),
            }
        }))
        .into_response(),
        UploadReply::Fail => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "status": 400,
                "error": {"message": "Invalid image source", "code": 310}
            })),
        )
            .into_response(),
        UploadReply::BadGateway => (StatusCode::BAD_GATEWAY, "<html>502</html>").into_response(),
    }
}

async fn create(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.fail_creates.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "create failed").into_response();
    }

    let n = state.creates.fetch_add(1, Ordering::SeqCst) + 1;
    let id = format!("bin-auto-{}", n);
    let name = headers
        .get("X-Bin-Name")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    state.bin_names.lock().unwrap().push(name.clone());

    state
        .documents
        .lock()
        .unwrap()
        .insert(id.clone(), body.clone());

    Json(json!({
        "record": body,
        "metadata": {"id": id, "name": name, "private": true}
    }))
    .into_response()
}

async fn read(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.reads.fetch_add(1, Ordering::SeqCst);

    let barrier = state.read_barrier.lock().unwrap().clone();
    if let Some(barrier) = barrier {
        barrier.wait().await;
    }

    if state.fail_reads.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "read failed").into_response();
    }

    let doc = state.documents.lock().unwrap().get(&id).cloned();
    match doc {
        Some(doc) => Json(json!({"record": doc, "metadata": {"id": id}})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Bin not found"})),
        )
            .into_response(),
    }
}

async fn write(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.fail_writes.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "write failed").into_response();
    }

    state.writes.fetch_add(1, Ordering::SeqCst);
    state.documents.lock().unwrap().insert(id, body.clone());

    Json(json!({"record": body, "metadata": {"private": true}})).into_response()
}
