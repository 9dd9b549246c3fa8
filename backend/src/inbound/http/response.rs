//! Success envelope shared by every JSON endpoint.

use actix_web::HttpResponse;
use serde::Serialize;

/// `{ "data": ..., "message"?: ... }`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Envelope<T> {
    /// Payload.
    pub data: T,
    /// Optional confirmation for the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `200 OK` with `data`.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        data,
        message: None,
    })
}

/// `200 OK` with `data` and a confirmation message.
pub fn ok_with_message<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        data,
        message: Some(message.to_owned()),
    })
}

/// `201 Created` with `data` and a confirmation message.
pub fn created<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Created().json(Envelope {
        data,
        message: Some(message.to_owned()),
    })
}

/// `200 OK` carrying only a confirmation message.
pub fn message(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": message }))
}
