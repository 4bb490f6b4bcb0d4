use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::Constants;
use crate::error::IntakeError;
use crate::handlers::AppState;
use crate::utils::success_response;

pub async fn register_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::POST {
        return IntakeError::MethodNotAllowed.into_response();
    }

    let client_id = client_identifier(&headers, &state.client_ip_header);
    match state.intake.submit_json(&body, client_id).await {
        Ok(receipt) => success_response(StatusCode::CREATED, receipt),
        Err(err) => err.into_response(),
    }
}

/// Forwarded address first, then the deployment's alternate header
fn client_identifier<'a>(headers: &'a HeaderMap, alternate: &str) -> Option<&'a str> {
    [Constants::FORWARDED_FOR_HEADER, alternate]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::handlers::router;
    use crate::intake::IntakeService;
    use crate::utils::rate_limit::RateLimiter;
    use axum::{body::Body, http::Request, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<IntakeService>) {
        let intake = Arc::new(IntakeService::new(
            Arc::new(MemoryStore::new()),
            RateLimiter::default(),
        ));
        let state = AppState {
            intake: Arc::clone(&intake),
            client_ip_header: "x-real-ip".to_string(),
        };
        (router(state, &["http://localhost:3000".to_string()]), intake)
    }

    fn payload(roll_number: &str, email: &str) -> Value {
        json!({
            "name": "Jane Doe",
            "rollNumber": roll_number,
            "department": "CS",
            "yearOfStudy": "2nd Year",
            "email": email,
            "phone": "9876543210",
            "selectedMaterial": "thread"
        })
    }

    fn post() -> axum::http::request::Builder {
        Request::builder()
            .method(Method::POST)
            .uri("/api/register")
            .header("content-type", "application/json")
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(value: &Value, forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = post();
        if let Some(ip) = forwarded_for {
            builder = builder.header("x-forwarded-for", ip);
        }
        builder.body(Body::from(value.to_string())).unwrap()
    }

    #[tokio::test]
    async fn created_with_success_envelope() {
        let (app, intake) = app();
        let request = json_request(&payload("cs045", "jane@x.edu"), Some("1.2.3.4"));
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        assert_eq!(
            body["data"]["message"],
            json!("Registration successful! Check your email for confirmation.")
        );
        let id = body["data"]["id"].as_str().unwrap();
        let stored = intake.store().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.roll_number, "CS045");
        assert_eq!(stored.client_identifier, "1.2.3.4");
    }

    #[tokio::test]
    async fn duplicate_is_conflict_with_field() {
        let (app, _) = app();
        let request = payload("cs045", "jane@x.edu");
        send(&app, json_request(&request, Some("a"))).await;
        let (status, body) = send(&app, json_request(&request, Some("b"))).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": {
                    "field": "rollNumber",
                    "message": "This roll number is already registered"
                }
            })
        );
    }

    #[tokio::test]
    async fn validation_failure_is_bad_request() {
        let (app, _) = app();
        let mut request = payload("cs045", "jane@x.edu");
        request["yearOfStudy"] = json!("Sophomore");
        let (status, body) = send(&app, json_request(&request, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], json!("yearOfStudy"));
    }

    #[tokio::test]
    async fn empty_body_is_bad_request_without_field() {
        let (app, _) = app();
        let request = post().body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "error": {"message": "Request body is required"}})
        );
    }

    #[tokio::test]
    async fn options_is_ok_with_empty_body() {
        let (app, _) = app();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/register")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn other_methods_are_rejected_before_processing() {
        let (app, _) = app();
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let request = Request::builder()
                .method(method)
                .uri("/api/register")
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(
                body,
                json!({"success": false, "error": {"message": "Method not allowed"}})
            );
        }

        // None of the rejected verbs used up the unknown client's quota.
        for n in 0..5 {
            let request = payload(&format!("roll{n}"), &format!("s{n}@x.edu"));
            let (status, _) = send(&app, json_request(&request, None)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }

    #[tokio::test]
    async fn sixth_request_from_same_address_is_too_many() {
        let (app, _) = app();
        for n in 0..5 {
            let request = payload(&format!("roll{n}"), &format!("s{n}@x.edu"));
            let (status, _) = send(&app, json_request(&request, Some("1.2.3.4"))).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let request = json_request(&payload("roll5", "s5@x.edu"), Some("1.2.3.4"));
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body["error"],
            json!({"message": "Too many registration attempts. Please try again later."})
        );
    }

    #[test]
    fn client_identifier_precedence() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_identifier(&headers, "x-real-ip"), None);

        headers.insert("x-real-ip", "10.0.0.2".parse().unwrap());
        assert_eq!(client_identifier(&headers, "x-real-ip"), Some("10.0.0.2"));
        assert_eq!(client_identifier(&headers, "client-ip"), None);

        headers.insert("x-forwarded-for", "10.0.0.1".parse().unwrap());
        assert_eq!(client_identifier(&headers, "x-real-ip"), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn materials_catalog_in_declaration_order() {
        let (app, _) = app();
        let request = Request::builder()
            .uri("/api/materials")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|material| material["id"].as_str())
            .collect();
        assert_eq!(
            ids,
            ["plastic_bottles", "thread", "shoes", "metal_cans", "cardboard", "other"]
        );
        assert_eq!(body["data"][1]["name"], json!("Thread/Yarn"));
    }
}
