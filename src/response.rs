//! HTTP response builders.
//!
//! Provides convenient functions for building JSON responses.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Success messages shared by the resource handlers.
pub mod msg {
    pub const CREATED: &str = "Dados inseridos com sucesso";
    pub const UPDATED: &str = "Dados alterados com sucesso!";
    pub const DELETED: &str = "Dado excluído com sucesso";
    pub const SCHEMA_READY: &str = "Banco de dados inicializado";
}

/// Response body type used throughout cadastro.
pub type Body = Full<Bytes>;

/// Full response type used throughout cadastro.
pub type HttpResponse = Response<Body>;

/// Build a JSON response with the given status code and body.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> crate::Result<HttpResponse> {
    let json = serde_json::to_string(body)?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap())
}

/// Build a 200 OK JSON response.
pub fn ok<T: Serialize>(body: &T) -> crate::Result<HttpResponse> {
    json(StatusCode::OK, body)
}

/// Build a 201 Created JSON response.
pub fn created<T: Serialize>(body: &T) -> crate::Result<HttpResponse> {
    json(StatusCode::CREATED, body)
}

/// Build a 200 OK `{"message": ...}` response.
pub fn message(text: &str) -> crate::Result<HttpResponse> {
    ok(&serde_json::json!({ "message": text }))
}

/// Build a 200 OK HTML response.
pub fn html(page: &'static str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from_static(page.as_bytes())))
        .unwrap()
}

/// Build a JSON `{"error": ...}` response with the given status.
pub fn error(status: StatusCode, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message });
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
