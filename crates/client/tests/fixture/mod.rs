#![allow(dead_code)]

//! In-memory stand-in for the resource-hub REST backend, served by axum on an
//! ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use resourcehub_client::{ClientConfig, MemoryTokenStore, ResourceHub};

pub const KINDS: [&str; 4] = ["projects", "events", "templates", "guides"];

struct StoredUser {
    id: String,
    email: String,
    password: String,
    role: String,
}

impl StoredUser {
    fn profile(&self) -> Value {
        json!({ "_id": self.id, "email": self.email, "role": self.role })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedUpload {
    pub department: String,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

struct Inner {
    users: HashMap<String, StoredUser>,
    /// token → user id
    tokens: HashMap<String, String>,
    departments: Vec<Value>,
    records: HashMap<String, Vec<Value>>,
    saved: Vec<Value>,
    uploads: Vec<ReceivedUpload>,
    next_id: u64,
    logout_calls: usize,
    list_calls: usize,
    department_delays: HashMap<String, Duration>,
    duplicate_status: StatusCode,
    check_hides_saved: bool,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            tokens: HashMap::new(),
            departments: Vec::new(),
            records: HashMap::new(),
            saved: Vec::new(),
            uploads: Vec::new(),
            next_id: 0,
            logout_calls: 0,
            list_calls: 0,
            department_delays: HashMap::new(),
            duplicate_status: StatusCode::BAD_REQUEST,
            check_hides_saved: false,
        }
    }
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn issue_token(&mut self, user_id: &str) -> String {
        let token = self.next_id("tok");
        self.tokens.insert(token.clone(), user_id.to_string());
        token
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }

    fn item_count(&self, department: &str, kind: &str) -> usize {
        self.records
            .get(kind)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r["department"] == department && r["isActive"] == true)
                    .count()
            })
            .unwrap_or(0)
    }
}

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Inner>>);

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.0.lock().unwrap()
    }

    fn require_user(&self, headers: &HeaderMap) -> Result<String, Response> {
        self.lock()
            .user_for(headers)
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed"))
    }
}

fn ok(status: StatusCode, data: Value) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn known_kind(kind: &str) -> Result<(), Response> {
    if KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(fail(StatusCode::NOT_FOUND, "Route not found"))
    }
}

/// A record document as the backend stores it.
pub fn record(id: &str, department: &str, title: &str, created_at: &str) -> Value {
    json!({
        "_id": id,
        "department": department,
        "title": title,
        "isActive": true,
        "createdAt": created_at,
        "viewCount": 0
    })
}

pub struct Backend {
    base_url: String,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl Backend {
    pub async fn spawn() -> Self {
        let state = Shared::default();
        let app = Router::new()
            .nest("/api/v1", routes())
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.base_url)
    }

    /// A hub pointed at this backend with a fresh in-memory token store.
    pub fn hub(&self) -> (ResourceHub, Arc<MemoryTokenStore>) {
        hub_for(&self.api_url())
    }

    pub fn seed_user(&self, email: &str, password: &str, role: &str) -> String {
        let mut inner = self.state.lock();
        let id = inner.next_id("user");
        inner.users.insert(
            email.to_string(),
            StoredUser {
                id: id.clone(),
                email: email.to_string(),
                password: password.to_string(),
                role: role.to_string(),
            },
        );
        id
    }

    pub fn seed_department(&self, id: &str, slug: &str, name: &str) {
        self.state.lock().departments.push(json!({
            "_id": id,
            "slug": slug,
            "name": name,
            "description": format!("{name} department")
        }));
    }

    pub fn seed_record(&self, kind: &str, record: Value) {
        self.state
            .lock()
            .records
            .entry(kind.to_string())
            .or_default()
            .push(record);
    }

    pub fn record(&self, kind: &str, id: &str) -> Option<Value> {
        self.state
            .lock()
            .records
            .get(kind)?
            .iter()
            .find(|r| r["_id"] == id)
            .cloned()
    }

    pub fn revoke_all_tokens(&self) {
        self.state.lock().tokens.clear();
    }

    pub fn set_department_delay(&self, slug: &str, delay: Duration) {
        self.state
            .lock()
            .department_delays
            .insert(slug.to_string(), delay);
    }

    pub fn set_duplicate_status(&self, status: StatusCode) {
        self.state.lock().duplicate_status = status;
    }

    /// Make `/saved-folders/check` always answer "not saved".
    pub fn hide_saved_from_check(&self) {
        self.state.lock().check_hides_saved = true;
    }

    pub fn logout_calls(&self) -> usize {
        self.state.lock().logout_calls
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }

    pub fn saved_count(&self) -> usize {
        self.state.lock().saved.len()
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.lock().uploads.clone()
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn hub_for(api_url: &str) -> (ResourceHub, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    let config = ClientConfig::default().with_api_url(api_url);
    let hub = ResourceHub::with_token_store(config, store.clone()).unwrap();
    hub.session().hydrate();
    (hub, store)
}

/// Base URL of a port nothing listens on.
pub async fn dead_api_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1")
}

fn routes() -> Router<Shared> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/departments", get(list_departments))
        .route("/departments/:slug", get(department_by_slug))
        .route("/saved-folders", get(list_saved).post(save_folder))
        .route("/saved-folders/check", get(check_saved))
        .route("/saved-folders/:id", axum::routing::delete(remove_saved))
        .route("/saved-folders/:id/count", patch(refresh_count))
        .route("/:kind", get(list_records).post(create_record))
        .route("/:kind/upload", post(upload_record))
        .route(
            "/:kind/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/:kind/:id/views", patch(record_view))
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    let mut inner = state.lock();
    if inner.users.contains_key(&email) {
        return fail(StatusCode::BAD_REQUEST, "User already exists");
    }

    let id = inner.next_id("user");
    let user = StoredUser {
        id: id.clone(),
        email: email.clone(),
        password,
        role: "member".to_string(),
    };
    let profile = user.profile();
    inner.users.insert(email, user);
    let token = inner.issue_token(&id);

    ok(StatusCode::CREATED, json!({ "user": profile, "token": token }))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let mut inner = state.lock();
    let Some(user) = inner.users.get(email).filter(|u| u.password == password) else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };
    let (id, profile) = (user.id.clone(), user.profile());
    let token = inner.issue_token(&id);

    if email.starts_with("flat") {
        return Json(json!({ "success": true, "user": profile, "token": token })).into_response();
    }
    ok(StatusCode::OK, json!({ "user": profile, "token": token }))
}

async fn logout(State(state): State<Shared>) -> Response {
    state.lock().logout_calls += 1;
    Json(json!({ "success": true, "message": "Logged out" })).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Departments
// ─────────────────────────────────────────────────────────────────────────────

async fn list_departments(State(state): State<Shared>) -> Response {
    let departments = state.lock().departments.clone();
    ok(StatusCode::OK, Value::Array(departments))
}

async fn department_by_slug(State(state): State<Shared>, Path(slug): Path<String>) -> Response {
    let delay = state.lock().department_delays.get(&slug).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let found = state
        .lock()
        .departments
        .iter()
        .find(|d| d["slug"] == slug.as_str())
        .cloned();
    match found {
        Some(department) => ok(StatusCode::OK, department),
        None => fail(StatusCode::NOT_FOUND, "Department not found"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

fn sort_key(record: &Value, field: &str) -> String {
    match &record[field] {
        Value::String(s) => s.to_lowercase(),
        Value::Number(n) => format!("{:020}", n.as_u64().unwrap_or(0)),
        other => other.to_string(),
    }
}

async fn list_records(
    State(state): State<Shared>,
    Path(kind): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(resp) = known_kind(&kind) {
        return resp;
    }

    let mut inner = state.lock();
    inner.list_calls += 1;

    let search = query.get("search").map(|s| s.to_lowercase());
    let active = query.get("isActive").map(|v| v == "true");
    let mut items: Vec<Value> = inner
        .records
        .get(&kind)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|r| query.get("department").is_none_or(|d| r["department"] == d.as_str()))
        .filter(|r| active.is_none_or(|a| r["isActive"] == a))
        .filter(|r| {
            search.as_deref().is_none_or(|s| {
                r["title"]
                    .as_str()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(s)
            })
        })
        .collect();

    let sort_by = query.get("sortBy").map(String::as_str).unwrap_or("createdAt");
    items.sort_by_key(|r| sort_key(r, sort_by));
    if query.get("order").map(String::as_str).unwrap_or("desc") == "desc" {
        items.reverse();
    }

    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
    let limit: usize = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10).max(1);
    let total = items.len();
    let data: Vec<Value> = items.into_iter().skip((page - 1) * limit).take(limit).collect();

    Json(json!({
        "success": true,
        "count": data.len(),
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "pages": total.div_ceil(limit)
        },
        "data": data
    }))
    .into_response()
}

async fn get_record(
    State(state): State<Shared>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    if let Err(resp) = known_kind(&kind) {
        return resp;
    }
    let inner = state.lock();
    match inner
        .records
        .get(&kind)
        .and_then(|records| records.iter().find(|r| r["_id"] == id.as_str()))
    {
        Some(record) => ok(StatusCode::OK, record.clone()),
        None => fail(StatusCode::NOT_FOUND, "Resource not found"),
    }
}

async fn create_record(
    State(state): State<Shared>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = known_kind(&kind) {
        return resp;
    }
    if let Err(resp) = state.require_user(&headers) {
        return resp;
    }

    let mut inner = state.lock();
    let id = inner.next_id(&kind);
    let mut record = record(
        &id,
        body["department"].as_str().unwrap_or_default(),
        body["title"].as_str().unwrap_or_default(),
        &chrono::Utc::now().to_rfc3339(),
    );
    if let Some(url) = body.get("fileUrl") {
        record["fileUrl"] = url.clone();
    }
    inner.records.entry(kind).or_default().push(record.clone());
    ok(StatusCode::CREATED, record)
}

async fn update_record(
    State(state): State<Shared>,
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = state.require_user(&headers) {
        return resp;
    }
    let mut inner = state.lock();
    let Some(record) = inner
        .records
        .get_mut(&kind)
        .and_then(|records| records.iter_mut().find(|r| r["_id"] == id.as_str()))
    else {
        return fail(StatusCode::NOT_FOUND, "Resource not found");
    };
    for key in ["title", "fileUrl", "isActive"] {
        if let Some(value) = body.get(key) {
            record[key] = value.clone();
        }
    }
    ok(StatusCode::OK, record.clone())
}

async fn delete_record(
    State(state): State<Shared>,
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = state.require_user(&headers) {
        return resp;
    }
    let mut inner = state.lock();
    let Some(records) = inner.records.get_mut(&kind) else {
        return fail(StatusCode::NOT_FOUND, "Resource not found");
    };
    let before = records.len();
    records.retain(|r| r["_id"] != id.as_str());
    if records.len() == before {
        return fail(StatusCode::NOT_FOUND, "Resource not found");
    }
    Json(json!({ "success": true, "message": "Deleted" })).into_response()
}

async fn record_view(
    State(state): State<Shared>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let mut inner = state.lock();
    let Some(record) = inner
        .records
        .get_mut(&kind)
        .and_then(|records| records.iter_mut().find(|r| r["_id"] == id.as_str()))
    else {
        return fail(StatusCode::NOT_FOUND, "Resource not found");
    };
    let views = record["viewCount"].as_u64().unwrap_or(0) + 1;
    record["viewCount"] = json!(views);
    Json(json!({ "success": true })).into_response()
}

async fn upload_record(
    State(state): State<Shared>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(resp) = known_kind(&kind) {
        return resp;
    }
    if let Err(resp) = state.require_user(&headers) {
        return resp;
    }

    let mut upload = ReceivedUpload {
        department: String::new(),
        title: String::new(),
        file_name: String::new(),
        content_type: String::new(),
        size: 0,
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or_default() {
            "file" => {
                upload.file_name = field.file_name().unwrap_or_default().to_string();
                upload.content_type = field.content_type().unwrap_or_default().to_string();
                upload.size = field.bytes().await.unwrap().len();
            }
            "department" => upload.department = field.text().await.unwrap(),
            "title" => upload.title = field.text().await.unwrap(),
            _ => {}
        }
    }
    if upload.size == 0 {
        return fail(StatusCode::BAD_REQUEST, "Please upload a file");
    }

    let mut inner = state.lock();
    let id = inner.next_id(&kind);
    let mut record = record(
        &id,
        &upload.department,
        &upload.title,
        &chrono::Utc::now().to_rfc3339(),
    );
    record["fileUrl"] = json!(format!("https://files.example/{}", upload.file_name));
    inner.records.entry(kind).or_default().push(record.clone());
    inner.uploads.push(upload);
    ok(StatusCode::CREATED, record)
}

// ─────────────────────────────────────────────────────────────────────────────
// Saved folders
// ─────────────────────────────────────────────────────────────────────────────

async fn list_saved(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let owner = match state.require_user(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };
    let folders: Vec<Value> = state
        .lock()
        .saved
        .iter()
        .filter(|f| f["owner"] == owner.as_str())
        .cloned()
        .collect();
    Json(json!({ "success": true, "count": folders.len(), "data": folders })).into_response()
}

async fn check_saved(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let owner = match state.require_user(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };
    let inner = state.lock();
    let department = query.get("department").cloned().unwrap_or_default();
    let kind = query.get("folderType").cloned().unwrap_or_default();

    let found = inner
        .saved
        .iter()
        .find(|f| {
            f["owner"] == owner.as_str()
                && f["department"] == department.as_str()
                && f["folderType"] == kind.as_str()
        })
        .filter(|_| !inner.check_hides_saved)
        .cloned();

    Json(json!({
        "success": true,
        "isSaved": found.is_some(),
        "data": found.unwrap_or(Value::Null)
    }))
    .into_response()
}

async fn save_folder(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let owner = match state.require_user(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };
    let mut inner = state.lock();
    let department = body["department"].as_str().unwrap_or_default().to_string();
    let kind = body["folderType"].as_str().unwrap_or_default().to_string();

    let duplicate = inner.saved.iter().any(|f| {
        f["owner"] == owner.as_str()
            && f["department"] == department.as_str()
            && f["folderType"] == kind.as_str()
    });
    if duplicate {
        let status = inner.duplicate_status;
        return fail(status, "Folder already saved to library");
    }

    let id = inner.next_id("folder");
    let folder = json!({
        "_id": id,
        "owner": owner,
        "department": department,
        "departmentName": body["departmentName"],
        "departmentSlug": body["departmentSlug"],
        "folderType": kind,
        "itemCount": inner.item_count(&department, &kind),
        "createdAt": chrono::Utc::now().to_rfc3339()
    });
    inner.saved.push(folder.clone());
    ok(StatusCode::CREATED, folder)
}

async fn remove_saved(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let owner = match state.require_user(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };
    let mut inner = state.lock();
    let before = inner.saved.len();
    inner
        .saved
        .retain(|f| !(f["_id"] == id.as_str() && f["owner"] == owner.as_str()));
    if inner.saved.len() == before {
        return fail(StatusCode::NOT_FOUND, "Saved folder not found");
    }
    Json(json!({ "success": true, "message": "Folder removed from library" })).into_response()
}

async fn refresh_count(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let owner = match state.require_user(&headers) {
        Ok(owner) => owner,
        Err(resp) => return resp,
    };
    let mut inner = state.lock();
    let Some(index) = inner
        .saved
        .iter()
        .position(|f| f["_id"] == id.as_str() && f["owner"] == owner.as_str())
    else {
        return fail(StatusCode::NOT_FOUND, "Saved folder not found");
    };

    let department = inner.saved[index]["department"].as_str().unwrap_or_default().to_string();
    let kind = inner.saved[index]["folderType"].as_str().unwrap_or_default().to_string();
    let count = inner.item_count(&department, &kind);
    inner.saved[index]["itemCount"] = json!(count);
    ok(StatusCode::OK, inner.saved[index].clone())
}
