use homecontrol::http::request::{Method, Request};
use std::collections::HashMap;

fn request(path: &str, headers: &[(&str, &str)]) -> Request {
    Request {
        method: Method::GET,
        path: path.to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

#[test]
fn test_request_header_retrieval() {
    let req = request("/", &[("Host", "192.168.0.20"), ("Accept", "text/html")]);

    assert_eq!(req.header("Host"), Some("192.168.0.20"));
    assert_eq!(req.header("Accept"), Some("text/html"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_lookup_ignores_case() {
    let req = request("/", &[("Content-Type", "text/plain")]);

    assert_eq!(req.header("content-type"), Some("text/plain"));
    assert_eq!(req.header("CONTENT-TYPE"), Some("text/plain"));
}

#[test]
fn test_route_strips_query_string() {
    assert_eq!(request("/ligar_luzes?", &[]).route(), "/ligar_luzes");
    assert_eq!(request("/ligar_luzes?a=1", &[]).route(), "/ligar_luzes");
    assert_eq!(request("/", &[]).route(), "/");
}

#[test]
fn test_method_from_str_is_case_sensitive() {
    assert_eq!(Method::from_str("HEAD"), Some(Method::HEAD));
    assert_eq!(Method::from_str("head"), None);
    assert_eq!(Method::from_str(""), None);
}
