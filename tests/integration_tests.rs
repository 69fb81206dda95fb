use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bus_gateway::api::create_app;
use bus_gateway::config::{Credentials, GatewayConfig};
use bus_gateway::model::Vehicle;
use bus_gateway::services::GatewayService;
use serde_json::{Value, json};
use std::time::Duration;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn live_config(server: &MockServer) -> GatewayConfig {
    GatewayConfig {
        credentials: Some(Credentials::new("integration-client", "integration-secret")),
        simulation_mode: false,
        auth_url: format!("{}/auth/token", server.uri()),
        api_base_url: format!("{}/api/transportepublico", server.uri()),
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    }
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "integration-token", "expires_in": 300})),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_lines_deduplicated_end_to_end() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/transportepublico/buses/linevariants"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"code": "L105"}, {"code": "L105"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = create_app(GatewayService::from_config(&live_config(&server)).unwrap());
    let (status, body) = get(&app, "/api/lines").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["105"]));
}

#[tokio::test]
async fn test_token_reused_across_requests() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/transportepublico/buses"))
        .and(query_param("lines", "116"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"line": "116", "busId": 501, "location": {"coordinates": [-56.16, -34.90]}, "speed": 20},
            {"line": "116", "busId": 502}
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let app = create_app(GatewayService::from_config(&live_config(&server)).unwrap());

    for _ in 0..2 {
        let (status, body) = get(&app, "/api/buses?line=116").await;
        assert_eq!(status, StatusCode::OK);

        let buses: Vec<Vehicle> = serde_json::from_value(body).unwrap();
        assert_eq!(buses.len(), 1);
        assert_eq!(buses[0].id, "116-501");
        assert_eq!(buses[0].latitude, -34.90);
        assert_eq!(buses[0].longitude, -56.16);
    }

    let (_, status) = get(&app, "/api/status").await;
    assert_eq!(status["mode"], "live");
    assert_eq!(status["normalization"]["vehicles"]["received"], 4);
    assert_eq!(status["normalization"]["vehicles"]["dropped"], 2);
}

#[tokio::test]
async fn test_upstream_status_code_is_forwarded() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/transportepublico/buses/busstops"))
        .and(query_param("radius", "250"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let app = create_app(GatewayService::from_config(&live_config(&server)).unwrap());
    let (status, body) = get(&app, "/api/stops?lat=-34.9&lng=-56.16&radius=250").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "API Error: 404"}));
}

#[tokio::test]
async fn test_auth_failure_surfaces_as_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let app = create_app(GatewayService::from_config(&live_config(&server)).unwrap());
    let (status, body) = get(&app, "/api/buses").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to obtain authentication token"}));

    let (_, status) = get(&app, "/api/status").await;
    assert_eq!(status["upstream"], "unavailable");
}

#[tokio::test]
async fn test_simulation_mode_never_calls_upstream() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = GatewayConfig {
        simulation_mode: true,
        ..live_config(&server)
    };
    let app = create_app(GatewayService::from_config(&config).unwrap());

    let (status, body) = get(&app, "/api/buses").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());

    let (status, body) = get(&app, "/api/stops").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().len() >= 10);
}
