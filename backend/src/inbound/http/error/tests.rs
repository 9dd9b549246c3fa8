//! Tests for HTTP error mapping.

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, ResponseError, test as actix_test, web};
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};

use super::*;
use crate::domain::Error;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> Value {
    let response = ResponseError::error_response(error);
    let bytes = to_bytes(response.into_body()).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("already voted"), StatusCode::CONFLICT)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_their_message() {
    let body = body_of(&Error::conflict("already voted")).await;

    assert_eq!(body, json!({ "error": "already voted" }));
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("connection refused by 10.0.0.3")
        .with_details(json!({ "secret": "x" }));

    let body = body_of(&error).await;

    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[rstest]
#[actix_web::test]
async fn trace_id_is_echoed_as_header() {
    let error = Error::forbidden("denied").with_trace_id(TRACE_ID);

    let response = ResponseError::error_response(&error);

    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    assert_eq!(header, Some(TRACE_ID));
}

#[derive(Deserialize)]
struct Payload {
    #[expect(dead_code, reason = "only deserialisation matters")]
    titulo: String,
}

#[rstest]
#[actix_web::test]
async fn malformed_json_becomes_bad_request() {
    let app = actix_test::init_service(App::new().configure(configure_extractors).route(
        "/",
        web::post().to(|_: web::Json<Payload>| async { HttpResponse::Ok().finish() }),
    ))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"titulo\":")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("invalid JSON body"))
    );
}
