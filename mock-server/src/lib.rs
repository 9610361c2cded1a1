use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub const MSG_LIST_OK: &str = "Berhasil Mengambil Data Mahasiswa";
pub const MSG_CREATE_OK: &str = "Berhasil Menambahkan Mahasiswa";
pub const MSG_UPDATE_OK: &str = "Berhasil Mengupdate Mahasiswa";
pub const MSG_DELETE_OK: &str = "Berhasil Menghapus Mahasiswa";
pub const MSG_NOT_FOUND: &str = "Mahasiswa tidak ditemukan";
pub const MSG_DUPLICATE: &str = "NPM sudah terdaftar";
pub const MSG_BAD_NPM: &str = "NPM harus berupa angka";
pub const MSG_BAD_BODY: &str = "Gagal Parse Body";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mahasiswa {
    pub npm: i64,
    pub nama: String,
    #[serde(default)]
    pub prodi: Option<String>,
    #[serde(default)]
    pub alamat: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// NPM as sent by a form: a JSON number or a string of digits.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum NpmInput {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
pub struct CreateMahasiswa {
    pub npm: NpmInput,
    pub nama: String,
    #[serde(default)]
    pub prodi: Option<String>,
    #[serde(default)]
    pub alamat: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update. `npm` in the body is ignored; the path decides.
#[derive(Deserialize)]
pub struct UpdateMahasiswa {
    pub nama: Option<String>,
    pub prodi: Option<String>,
    pub alamat: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Records in insertion order.
pub type Db = Arc<RwLock<Vec<Mahasiswa>>>;

#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    BadNpm,
    BadBody,
    NotFound,
    Duplicate,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadNpm => (StatusCode::BAD_REQUEST, MSG_BAD_NPM),
            ApiError::BadBody => (StatusCode::BAD_REQUEST, MSG_BAD_BODY),
            ApiError::NotFound => (StatusCode::NOT_FOUND, MSG_NOT_FOUND),
            ApiError::Duplicate => (StatusCode::CONFLICT, MSG_DUPLICATE),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/api/", get(homepage))
        .route("/api/mahasiswa", get(list_mahasiswa).post(create_mahasiswa))
        .route(
            "/api/mahasiswa/{npm}",
            get(get_mahasiswa).put(update_mahasiswa).delete(delete_mahasiswa),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

fn parse_npm(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::BadNpm)
}

fn ok(message: &str, rest: Value) -> Json<Value> {
    let mut body = json!({ "status": StatusCode::OK.as_u16(), "message": message });
    if let (Some(body), Value::Object(rest)) = (body.as_object_mut(), rest) {
        body.extend(rest);
    }
    Json(body)
}

async fn homepage() -> &'static str {
    "Welcome to the homepage!"
}

async fn list_mahasiswa(State(db): State<Db>) -> Json<Value> {
    let records = db.read().await;
    ok(MSG_LIST_OK, json!({ "data": records.as_slice() }))
}

async fn get_mahasiswa(
    State(db): State<Db>,
    Path(npm): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let npm = parse_npm(&npm)?;
    let records = db.read().await;
    let mhs = records.iter().find(|m| m.npm == npm).ok_or(ApiError::NotFound)?;
    Ok(ok(MSG_LIST_OK, json!({ "data": mhs })))
}

async fn create_mahasiswa(
    State(db): State<Db>,
    input: Result<Json<CreateMahasiswa>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(input) = input.map_err(|_| ApiError::BadBody)?;
    let npm = match input.npm {
        NpmInput::Number(n) => n,
        NpmInput::Text(text) => parse_npm(&text)?,
    };

    let mut records = db.write().await;
    if records.iter().any(|m| m.npm == npm) {
        return Err(ApiError::Duplicate);
    }
    records.push(Mahasiswa {
        npm,
        nama: input.nama,
        prodi: input.prodi,
        alamat: input.alamat,
        extra: input.extra,
    });
    Ok(ok(MSG_CREATE_OK, json!({ "inserted_id": npm })))
}

async fn update_mahasiswa(
    State(db): State<Db>,
    Path(npm): Path<String>,
    input: Result<Json<UpdateMahasiswa>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let npm = parse_npm(&npm)?;
    let Json(mut input) = input.map_err(|_| ApiError::BadBody)?;
    input.extra.remove("npm");

    let mut records = db.write().await;
    let mhs = records.iter_mut().find(|m| m.npm == npm).ok_or(ApiError::NotFound)?;
    if let Some(nama) = input.nama {
        mhs.nama = nama;
    }
    if let Some(prodi) = input.prodi {
        mhs.prodi = Some(prodi);
    }
    if let Some(alamat) = input.alamat {
        mhs.alamat = Some(alamat);
    }
    mhs.extra.extend(input.extra);
    Ok(ok(MSG_UPDATE_OK, json!({ "npm": npm })))
}

async fn delete_mahasiswa(
    State(db): State<Db>,
    Path(npm): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let npm = parse_npm(&npm)?;
    let mut records = db.write().await;
    let index = records.iter().position(|m| m.npm == npm).ok_or(ApiError::NotFound)?;
    records.remove(index);
    Ok(ok(MSG_DELETE_OK, json!({ "npm": npm })))
}
