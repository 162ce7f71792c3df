use std::collections::HashMap;

use metronome::http::request::Method;
use metronome::http::response::Response;
use metronome::server::router::{Router, RouterError};

#[test]
fn test_register_and_dispatch() {
    let mut router = Router::new();
    router
        .register("/", Method::GET, Box::new(|_, _, _| Ok(Response::ok("root"))))
        .unwrap();

    let handler = router.dispatch("/", Method::GET).expect("route missing");
    let resp = handler("", &HashMap::new(), b"").unwrap();
    assert_eq!(resp.body, b"root");
}

#[test]
fn test_dispatch_miss_on_unknown_path() {
    let mut router = Router::new();
    router
        .register("/", Method::GET, Box::new(|_, _, _| Ok(Response::ok(""))))
        .unwrap();

    assert!(router.dispatch("/missing", Method::GET).is_none());
}

#[test]
fn test_dispatch_is_method_sensitive() {
    let mut router = Router::new();
    router
        .register("/api", Method::GET, Box::new(|_, _, _| Ok(Response::ok(""))))
        .unwrap();

    assert!(router.dispatch("/api", Method::GET).is_some());
    assert!(router.dispatch("/api", Method::POST).is_none());
}

#[test]
fn test_dispatch_is_path_case_sensitive() {
    let mut router = Router::new();
    router
        .register("/Api", Method::GET, Box::new(|_, _, _| Ok(Response::ok(""))))
        .unwrap();

    assert!(router.dispatch("/api", Method::GET).is_none());
}

#[test]
fn test_same_path_different_methods_allowed() {
    let mut router = Router::new();
    router
        .register("/thing", Method::GET, Box::new(|_, _, _| Ok(Response::ok("get"))))
        .unwrap();
    router
        .register("/thing", Method::POST, Box::new(|_, _, _| Ok(Response::ok("post"))))
        .unwrap();

    assert!(router.dispatch("/thing", Method::GET).is_some());
    assert!(router.dispatch("/thing", Method::POST).is_some());
}

#[test]
fn test_duplicate_route_fails_every_time() {
    let mut router = Router::new();
    router
        .register("/", Method::GET, Box::new(|_, _, _| Ok(Response::ok(""))))
        .unwrap();

    for _ in 0..3 {
        let err = router
            .register("/", Method::GET, Box::new(|_, _, _| Ok(Response::ok(""))))
            .unwrap_err();
        assert_eq!(
            err,
            RouterError::DuplicateRoute {
                path: "/".to_string(),
                method: Method::GET,
            }
        );
    }
}

#[test]
fn test_registration_consistent_across_instances() {
    // Separate routers built from the same registrations dispatch alike.
    for _ in 0..2 {
        let mut router = Router::new();
        router
            .register("/a", Method::GET, Box::new(|_, _, _| Ok(Response::ok("a"))))
            .unwrap();
        router
            .register("/b", Method::POST, Box::new(|_, _, _| Ok(Response::ok("b"))))
            .unwrap();

        assert!(router.dispatch("/a", Method::GET).is_some());
        assert!(router.dispatch("/b", Method::POST).is_some());
        assert!(router.dispatch("/b", Method::GET).is_none());
    }
}

#[test]
fn test_handler_receives_query_headers_body() {
    let mut router = Router::new();
    router
        .register(
            "/echo",
            Method::POST,
            Box::new(|query, headers, body| {
                assert_eq!(query, "k=v");
                assert_eq!(headers.get("host").map(String::as_str), Some("x"));
                Ok(Response::ok(body.to_vec()))
            }),
        )
        .unwrap();

    let mut headers = HashMap::new();
    headers.insert("host".to_string(), "x".to_string());

    let handler = router.dispatch("/echo", Method::POST).unwrap();
    let resp = handler("k=v", &headers, b"payload").unwrap();
    assert_eq!(resp.body, b"payload");
}
