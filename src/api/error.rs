use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::routes::page::escape_html;
use crate::domain::DomainError;

/// A failed request: the status to answer with and a message for the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn log(&self) {
        tracing::error!(status = %self.status.as_u16(), error = %self.message, "request failed");
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::Validation(_) | DomainError::UnsupportedFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            DomainError::Parse(_) | DomainError::Io(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Same failure, rendered as a page for the browser routes.
#[derive(Debug)]
pub struct HtmlError(pub ApiError);

impl From<DomainError> for HtmlError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl From<MultipartError> for HtmlError {
    fn from(err: MultipartError) -> Self {
        Self(err.into())
    }
}

impl From<ApiError> for HtmlError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let err = self.0;
        err.log();
        let body = format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>Error</title></head>\
             <body><h1>{}</h1><p>{}</p><p><a href=\"/\">Back</a></p></body></html>",
            err.status,
            escape_html(&err.message)
        );
        (err.status, Html(body)).into_response()
    }
}
