use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const TOKEN_ENV: &str = "MOCK_TOKEN";

/// Server settings. With a token set, every route requires
/// `Authorization: Bearer <token>`.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub token: Option<String>,
}

impl AppConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn from_env() -> Self {
        Self {
            token: std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()),
        }
    }
}

pub type Db = Arc<RwLock<HashMap<Uuid, Value>>>;

#[derive(Clone)]
struct AppState {
    items: Db,
    config: Arc<AppConfig>,
}

/// JSON error reply: `{"error": "..."}` with the given status.
#[derive(Debug)]
pub struct ApiError(StatusCode, &'static str);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

const NOT_FOUND: ApiError = ApiError(StatusCode::NOT_FOUND, "item not found");
const NOT_AN_OBJECT: ApiError = ApiError(StatusCode::UNPROCESSABLE_ENTITY, "item must be a JSON object");

pub fn app() -> Router {
    app_with_config(AppConfig::default())
}

pub fn app_with_config(config: AppConfig) -> Router {
    let state = AppState {
        items: Arc::new(RwLock::new(HashMap::new())),
        config: Arc::new(config),
    };
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(replace_item).patch(merge_item).delete(delete_item),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", any(fixed_status))
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_config(listener, AppConfig::default()).await
}

pub async fn run_with_config(listener: TcpListener, config: AppConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_config(config)).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(token) = &state.config.token {
        let expected = format!("Bearer {token}");
        let authorized = request
            .headers()
            .get_all(header::AUTHORIZATION)
            .iter()
            .any(|v| v.as_bytes() == expected.as_bytes());
        if !authorized {
            debug!(uri = %request.uri(), "rejecting unauthenticated request");
            return ApiError(StatusCode::UNAUTHORIZED, "missing or invalid bearer token").into_response();
        }
    }
    next.run(request).await
}

async fn list_items(State(state): State<AppState>) -> Json<Vec<Value>> {
    let items = state.items.read().await;
    Json(items.values().cloned().collect())
}

async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Value::Object(mut fields) = input else {
        return Err(NOT_AN_OBJECT);
    };
    let id = Uuid::new_v4();
    fields.insert("id".to_string(), Value::String(id.to_string()));
    let item = Value::Object(fields);
    state.items.write().await.insert(id, item.clone());
    info!(%id, "created item");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Value>, ApiError> {
    let items = state.items.read().await;
    items.get(&id).cloned().map(Json).ok_or(NOT_FOUND)
}

async fn replace_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Object(mut fields) = input else {
        return Err(NOT_AN_OBJECT);
    };
    let mut items = state.items.write().await;
    let item = items.get_mut(&id).ok_or(NOT_FOUND)?;
    fields.insert("id".to_string(), Value::String(id.to_string()));
    *item = Value::Object(fields);
    info!(%id, "replaced item");
    Ok(Json(item.clone()))
}

/// Shallow merge: present fields overwrite, `null` removes, `id` is fixed.
async fn merge_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Object(patch) = input else {
        return Err(NOT_AN_OBJECT);
    };
    let mut items = state.items.write().await;
    let item = items.get_mut(&id).ok_or(NOT_FOUND)?;
    if let Value::Object(fields) = item {
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            if value.is_null() {
                fields.remove(&key);
            } else {
                fields.insert(key, value);
            }
        }
    }
    info!(%id, "patched item");
    Ok(Json(item.clone()))
}

async fn delete_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if state.items.write().await.remove(&id).is_none() {
        return Err(NOT_FOUND);
    }
    info!(%id, "deleted item");
    Ok(StatusCode::NO_CONTENT)
}

/// Reflect the request back: method, path, headers (name → all values) and
/// the body parsed as JSON, or `null` when empty or not JSON.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let mut header_map = Map::new();
    for name in headers.keys() {
        let values: Vec<Value> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|v| Value::String(v.to_string()))
            .collect();
        header_map.insert(name.as_str().to_string(), Value::Array(values));
    }
    let parsed = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "headers": header_map,
        "body": parsed,
        "body_len": body.len(),
    }))
}

async fn fixed_status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, Json(json!({ "status": code }))).into_response(),
        Err(_) => ApiError(StatusCode::BAD_REQUEST, "invalid status code").into_response(),
    }
}
