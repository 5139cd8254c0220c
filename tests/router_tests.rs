mod common;

use common::http_util::{body_text, request};
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use mango::context::{send_error, Context, ResponseWriter};
use mango::encoding::DEFAULT_MEDIA_TYPE;
use mango::router::{RouteError, RouteTree, Router};

fn noop(_: &mut Context) {}

#[test]
fn test_verb_helpers_register_handlers() {
    let mut router = Router::new();
    router
        .get("/test", noop)
        .unwrap()
        .post("/test", noop)
        .unwrap()
        .put("/test", noop)
        .unwrap()
        .patch("/test", noop)
        .unwrap()
        .delete("/test", noop)
        .unwrap();

    let methods: Vec<&Method> = router.routes().iter().map(|(m, _)| m).collect();
    assert_eq!(
        methods,
        [
            &Method::GET,
            &Method::POST,
            &Method::PUT,
            &Method::PATCH,
            &Method::DELETE
        ]
    );
    for method in [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
        let response = router.serve(request(method.clone(), "/test"));
        assert_eq!(response.status(), StatusCode::OK, "{method}");
    }
}

#[test]
fn test_handle_accepts_any_method() {
    let mut router = Router::new();
    router
        .handle(Method::OPTIONS, "/test", |ctx: &mut Context| {
            ctx.respond().with_header("allow", "GET, OPTIONS");
        })
        .unwrap();
    let response = router.serve(request(Method::OPTIONS, "/test"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["allow"], "GET, OPTIONS");
}

#[test]
fn test_send_error_uses_supplied_status_message_and_content_type() {
    let mut writer = ResponseWriter::new();
    send_error(&mut writer, "an error string", StatusCode::NOT_FOUND);
    let response = writer.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(&response), "an error string");
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
}

#[test]
fn test_no_matching_route_returns_404() {
    let router = Router::new();
    let response = router.serve(request(Method::GET, "/test"));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
}

#[test]
fn test_no_matching_handler_returns_405() {
    let mut router = Router::new();
    router.delete("/test", noop).unwrap();
    let response = router.serve(request(Method::GET, "/test"));
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "DELETE");
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
}

#[test]
fn test_no_response_set_returns_empty_200() {
    let mut router = Router::new();
    router.get("/test", noop).unwrap();
    let response = router.serve(request(Method::GET, "/test"));
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().is_empty());
    assert!(response.headers().get(CONTENT_TYPE).is_none());
}

#[test]
fn test_simple_text_response() {
    let mut router = Router::new();
    router
        .get("/test", |ctx: &mut Context| {
            ctx.respond_with("We're just two lost souls swimming in a fish bowl");
        })
        .unwrap();
    let response = router.serve(request(Method::GET, "/test"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(&response),
        "We're just two lost souls swimming in a fish bowl"
    );
}

#[test]
fn test_with_status_sets_response_status() {
    let mut router = Router::new();
    router
        .get("/test", |ctx: &mut Context| {
            ctx.respond().with_status(StatusCode::NOT_FOUND);
        })
        .unwrap();
    let response = router.serve(request(Method::GET, "/test"));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.body().is_empty());
}

#[test]
fn test_new_router_uses_default_media_type() {
    let router = Router::new();
    assert_eq!(router.engine().default_media_type(), DEFAULT_MEDIA_TYPE);
    assert_eq!(router.config().default_media_type, DEFAULT_MEDIA_TYPE);
}

#[test]
fn test_static_segment_wins_over_parameter() {
    let mut router = Router::new();
    router
        .get("/zoo/animals/:id", |ctx: &mut Context| {
            let id = ctx.param("id").unwrap_or_default().to_string();
            ctx.respond_with(format!("animal {id}"));
        })
        .unwrap()
        .get("/zoo/animals/count", |ctx: &mut Context| {
            ctx.respond_with("count");
        })
        .unwrap();

    assert_eq!(
        body_text(&router.serve(request(Method::GET, "/zoo/animals/count"))),
        "count"
    );
    assert_eq!(
        body_text(&router.serve(request(Method::GET, "/zoo/animals/42"))),
        "animal 42"
    );
}

#[test]
fn test_trailing_and_repeated_slashes_are_ignored() {
    let mut router = Router::new();
    router
        .get("/zoo/animals", |ctx: &mut Context| {
            ctx.respond_with("animals");
        })
        .unwrap();
    for path in ["/zoo/animals", "/zoo/animals/", "//zoo//animals"] {
        let response = router.serve(request(Method::GET, path));
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
    let response = router.serve(request(Method::GET, "/zoo"));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_query_string_does_not_affect_routing() {
    let mut router = Router::new();
    router
        .get("/search", |ctx: &mut Context| {
            let q = ctx.query_param("q").unwrap_or_default();
            ctx.respond_with(q);
        })
        .unwrap();
    let response = router.serve(request(Method::GET, "/search?q=red+panda"));
    assert_eq!(body_text(&response), "red panda");
}

#[test]
fn test_duplicate_route_is_rejected() {
    let mut router = Router::new();
    router.get("/test", noop).unwrap();
    let err = router.get("/test", noop).unwrap_err();
    assert!(matches!(err, RouteError::Duplicate { .. }));
    assert_eq!(router.routes().len(), 1);
}

#[test]
fn test_route_tree_is_usable_on_its_own() {
    let mut tree = RouteTree::new();
    tree.insert(Method::GET, "/files/{name}", 1).unwrap();
    tree.insert(Method::PUT, "/files/{name}", 2).unwrap();
    let resolved = tree.resolve("/files/report.pdf").unwrap();
    assert_eq!(resolved.get(&Method::PUT), Some(&2));
    assert_eq!(resolved.param("name"), Some("report.pdf"));
    assert_eq!(resolved.allowed_methods(), vec![Method::GET, Method::PUT]);
    assert_eq!(tree.len(), 2);
}
