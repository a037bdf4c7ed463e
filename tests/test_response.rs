use homecontrol::http::response::{Response, ResponseBuilder, StatusCode};
use homecontrol::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    assert_eq!(response.headers.get("Content-Length").unwrap(), &body.len().to_string());
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Length").unwrap(), "999");
}

#[test]
fn test_response_builder_replaces_header() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("Content-Type", "text/html")
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/html");
    assert_eq!(response.headers.len(), 2);
}

#[test]
fn test_error_helpers() {
    let response = Response::not_found();
    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.body, b"404 Not Found".to_vec());

    let response = Response::bad_request();
    assert_eq!(response.status, StatusCode::BadRequest);

    let response = Response::internal_error();
    assert_eq!(response.status, StatusCode::InternalServerError);
    assert_eq!(response.body, b"500 Internal Server Error".to_vec());
}

#[test]
fn test_serialized_layout() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html; charset=UTF-8")
        .body(b"<p>hi</p>".to_vec())
        .build();

    let wire = String::from_utf8(serialize_response(&response)).unwrap();

    assert_eq!(
        wire,
        "HTTP/1.1 200 OK\r\n\
         Content-Length: 9\r\n\
         Content-Type: text/html; charset=UTF-8\r\n\
         \r\n\
         <p>hi</p>"
    );
    assert_eq!(wire.len(), response.encoded_len());
}

