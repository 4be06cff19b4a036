use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::Student;
use crate::service::StudentService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: StudentService,
}

/// Success envelope used by the honors endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Handler-level failures. Store errors become a 500; a request the
/// handler itself rejects becomes a 400.
pub enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(err) => {
                error!("Request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
struct NameQuery {
    key: Option<String>,
}

#[derive(Deserialize)]
struct HonorsQuery {
    gpa: Option<f64>,
}

/// GET /students - all records
async fn get_all_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.service.get_all_students()?))
}

/// GET /students/:id - one record or null
async fn get_student_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Option<Student>>, ApiError> {
    Ok(Json(state.service.get_student_by_id(id)?))
}

/// GET /students/name?key=... - exact-match name search, all records when
/// the key is absent or empty
async fn get_students_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state.service.get_students_by_name(query.key.as_deref())?;
    Ok(Json(students))
}

/// GET /students/major/:major - exact-match major search
async fn get_students_by_major(
    State(state): State<AppState>,
    Path(major): Path<String>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.service.get_students_by_major(&major)?))
}

/// GET /students/honors?gpa=... - GPA threshold filter, default 3.0
async fn get_honors_students(
    State(state): State<AppState>,
    Query(query): Query<HonorsQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Student>>>), ApiError> {
    let students = state.service.get_honors_students(query.gpa)?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(students))))
}

/// POST /students - create a record, store assigns the id
async fn add_student(
    State(state): State<AppState>,
    Json(student): Json<Student>,
) -> Result<Json<Student>, ApiError> {
    Ok(Json(state.service.add_student(&student)?))
}

/// PUT /students/:id - overwrite the record at the path id.
///
/// A body that carries its own id must agree with the path; otherwise the
/// request is rejected rather than silently overwriting a different row.
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(student): Json<Student>,
) -> Result<Json<Option<Student>>, ApiError> {
    if let Some(body_id) = student.id {
        if body_id != id {
            return Err(ApiError::BadRequest(format!(
                "body id {body_id} does not match path id {id}"
            )));
        }
    }

    Ok(Json(state.service.update_student(id, &student)?))
}

/// DELETE /students/:id - delete, then return the remaining records
async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Student>>, ApiError> {
    state.service.delete_student(id)?;
    Ok(Json(state.service.get_all_students()?))
}

/// POST /students/writeFile - export one record to the slot file
async fn write_student_file(
    State(state): State<AppState>,
    Json(student): Json<Student>,
) -> Json<String> {
    Json(state.service.export_student(&student))
}

/// GET /students/readFile - import the record from the slot file
async fn read_student_file(State(state): State<AppState>) -> Json<Option<Student>> {
    Json(state.service.import_student())
}

/// Build the full route table over a service handle.
pub fn router(service: StudentService) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/students", get(get_all_students).post(add_student))
        .route("/students/name", get(get_students_by_name))
        .route("/students/honors", get(get_honors_students))
        .route("/students/writeFile", axum::routing::post(write_student_file))
        .route("/students/readFile", get(read_student_file))
        .route("/students/major/:major", get(get_students_by_major))
        .route(
            "/students/:id",
            get(get_student_by_id)
                .put(update_student)
                .delete(delete_student),
        )
        .with_state(state)
}
