mod common;

use common::http_util::{body_text, request};
use common::temp_files::create_temp_yaml;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use mango::context::{Context, Reply};
use mango::router::Router;
use mango::runtime_config::RouterConfig;

#[test]
fn test_config_from_yaml_file() {
    let file = create_temp_yaml(
        r#"
default_media_type: application/yaml
request_id_header: x-correlation-id
catch_panics: false
"#,
    );
    let config = RouterConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.default_media_type, "application/yaml");
    assert_eq!(config.request_id_header, "x-correlation-id");
    assert!(config.echo_request_id);
    assert!(!config.catch_panics);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RouterConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read router config"));
}

#[test]
fn test_invalid_config_file_is_an_error() {
    let file = create_temp_yaml("echo_request_id: [not, a, bool]\n");
    assert!(RouterConfig::from_yaml_file(file.path()).is_err());
}

#[test]
fn test_router_honours_file_config() {
    let file = create_temp_yaml(
        "default_media_type: application/yaml\nrequest_id_header: x-correlation-id\n",
    );
    let config = RouterConfig::from_yaml_file(file.path()).unwrap();
    let mut router = Router::with_config(config);
    router
        .get("/pet", |ctx: &mut Context| {
            ctx.respond_with(Reply::model(serde_json::json!({ "name": "Rex" })));
        })
        .unwrap();

    let mut req = request(Method::GET, "/pet");
    req.headers_mut().insert(
        "x-correlation-id",
        "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap(),
    );
    let response = router.serve(req);
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/yaml");
    assert_eq!(body_text(&response), "name: Rex\n");
    assert_eq!(
        response.headers()["x-correlation-id"],
        "01ARZ3NDEKTSV4RRFFQ69G5FAV"
    );
    assert!(response.headers().get("x-request-id").is_none());
}

#[test]
fn test_routers_are_configured_independently() {
    let json = Router::new();
    let yaml = Router::with_config(RouterConfig {
        default_media_type: "text/yaml".into(),
        ..RouterConfig::default()
    });
    assert_eq!(json.engine().default_media_type(), "application/json");
    assert_eq!(yaml.engine().default_media_type(), "text/yaml");
}

#[test]
fn test_config_from_env() {
    // Only test in this binary that touches MANGO_* variables.
    std::env::set_var("MANGO_DEFAULT_MEDIA_TYPE", "application/toml");
    std::env::set_var("MANGO_ECHO_REQUEST_ID", "false");
    std::env::set_var("MANGO_CATCH_PANICS", "not-a-bool");
    let config = RouterConfig::from_env();
    std::env::remove_var("MANGO_DEFAULT_MEDIA_TYPE");
    std::env::remove_var("MANGO_ECHO_REQUEST_ID");
    std::env::remove_var("MANGO_CATCH_PANICS");

    assert_eq!(config.default_media_type, "application/toml");
    assert!(!config.echo_request_id);
    assert!(config.catch_panics);
    assert_eq!(config.request_id_header, "x-request-id");
}
