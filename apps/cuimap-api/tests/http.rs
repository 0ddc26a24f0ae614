use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::util::ServiceExt;

use cuimap_api::{routes, state::AppState};
use cuimap_testkit::{BODY_HEIGHT_CUI, FixedAnalyzer, UNKNOWN_CUI};

async fn app() -> Router {
	let mut cfg = cuimap_testkit::test_config().expect("Test config should parse.");

	cfg.resolver.translation_enabled = false;

	let providers = cuimap_testkit::providers(
		cuimap_testkit::failing_translator(),
		FixedAnalyzer::default(),
	);
	let service =
		cuimap_testkit::service(cfg, providers).await.expect("Failed to build service.");

	routes::router(AppState::from_service(service))
}

async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri(uri)
				.header(header::CONTENT_TYPE, "application/json")
				.body(Body::from(body.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call the router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

	(status, json)
}

fn cuis(json: &Value) -> Vec<String> {
	json["concepts"]
		.as_array()
		.map(|concepts| {
			concepts.iter().filter_map(|c| c["cui"].as_str().map(str::to_string)).collect()
		})
		.unwrap_or_default()
}

#[tokio::test]
async fn health_ok() {
	let response = app()
		.await
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("Bad request."))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn resolve_returns_ranked_concepts() {
	let (status, json) =
		post_json(app().await, "/v1/resolve", r#"{"phrases": ["身長", "ほげほげ"]}"#).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(cuis(&json), vec![UNKNOWN_CUI.to_string(), BODY_HEIGHT_CUI.to_string()]);
	assert!((json["concepts"][1]["score"].as_f64().unwrap_or_default() - 4.0).abs() < 1e-9);
	assert_eq!(json["concepts"][1]["representative"], "Body Height");
	assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn resolve_with_no_phrases_returns_the_unknown_concept() {
	let (status, json) = post_json(app().await, "/v1/resolve", r#"{"phrases": []}"#).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(cuis(&json), vec![UNKNOWN_CUI.to_string()]);
}

#[tokio::test]
async fn normalize_blank_query_is_empty() {
	let (status, json) = post_json(app().await, "/v1/normalize", r#"{"query": ""}"#).await;

	assert_eq!(status, StatusCode::OK);
	assert!(cuis(&json).is_empty());
}

#[tokio::test]
async fn normalize_resolves_a_single_query() {
	let (status, json) =
		post_json(app().await, "/v1/normalize", r#"{"query": "Body Height"}"#).await;

	assert_eq!(status, StatusCode::OK);
	assert!(cuis(&json).contains(&BODY_HEIGHT_CUI.to_string()));
}

#[tokio::test]
async fn malformed_body_is_rejected() {
	let (status, _) = post_json(app().await, "/v1/resolve", r#"{"phrase": "身長"}"#).await;

	assert!(status.is_client_error());
}
