use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::admin::AdminError;
use crate::application::error::ErrorReport;
use crate::application::records::RecordError;
use crate::application::repos::RepoError;
use crate::cache::ReadError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INVALID_BODY: &str = "invalid_body";
    pub const INTEGRITY: &str = "integrity_error";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const REPO: &str = "repo_error";
    pub const DEADLINE_EXCEEDED: &str = "deadline_exceeded";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn unauthorized(hint: Option<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "Owner identity required",
            hint,
        )
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, codes::FORBIDDEN, message, None)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let hint = self.hint.clone();
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {}", self.code, hint.as_deref().unwrap_or(self.message)),
        )
        .attach(&mut response);
        response
    }
}

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}

pub(crate) fn read_to_api(err: ReadError) -> ApiError {
    match err {
        ReadError::InvalidParameter(detail) => {
            ApiError::bad_request("Invalid record id", Some(detail))
        }
        ReadError::NotFound => ApiError::not_found("Record not found"),
        ReadError::Primary(repo) => repo_to_api(repo),
        ReadError::DeadlineExceeded(deadline) => ApiError::new(
            StatusCode::GATEWAY_TIMEOUT,
            codes::DEADLINE_EXCEEDED,
            "Request deadline exceeded",
            Some(format!("gave up after {} ms", deadline.as_millis())),
        ),
    }
}

pub(crate) fn record_to_api(err: RecordError) -> ApiError {
    match err {
        RecordError::InvalidParameter(detail) => {
            ApiError::bad_request("Invalid record id", Some(detail))
        }
        RecordError::NotFound => ApiError::not_found("Record not found"),
        RecordError::Read(read) => read_to_api(read),
        RecordError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn admin_to_api(err: AdminError) -> ApiError {
    match err {
        AdminError::InvalidParameter(detail) => ApiError::bad_request("Invalid id", Some(detail)),
        AdminError::NotFound(what) => ApiError::new(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            "Record not found",
            Some(format!("no {what} with that id")),
        ),
        AdminError::Repo(repo) => repo_to_api(repo),
    }
}
