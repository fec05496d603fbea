mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::scenario_table;
use sales_dashboard::app::{AppState, router};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    let state = AppState::new(Arc::new(scenario_table())).unwrap();
    router(Arc::new(state))
}

async fn get(uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

async fn summary(uri: &str) -> Value {
    let (status, _, body) = get(uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn first_visit_selects_everything() {
    let json = summary("/api/summary").await;

    assert_eq!(json["selected_rows"], 4);
    assert_eq!(json["kpis"]["total_sales"], 380);
    assert_eq!(json["display"]["total_sales"], "R$ 380");
}

#[tokio::test]
async fn repeated_keys_narrow_the_selection() {
    let json = summary("/api/summary?customer_type=Member").await;

    assert_eq!(json["selected_rows"], 3);
    assert_eq!(json["kpis"]["total_sales"], 330);
    assert_eq!(json["kpis"]["average_rating"], 7.3);
    assert_eq!(json["display"]["average_sale"], "R$ 110.00");

    let json = summary("/api/summary?city=A&city=B&customer_type=Member&gender=Female&gender=Male")
        .await;
    assert_eq!(json["selected_rows"], 3);
}

#[tokio::test]
async fn applied_form_with_a_missing_key_selects_nothing() {
    let json = summary("/api/summary?applied=1&customer_type=Member&gender=Female").await;

    assert_eq!(json["selected_rows"], 0);
    assert_eq!(json["kpis"]["total_sales"], 0);
    assert!(json["kpis"]["average_rating"].is_null());
    assert_eq!(json["display"]["average_rating"], "n/a");
}

#[tokio::test]
async fn dashboard_page_shows_kpis_and_charts() {
    let (status, content_type, body) = get("/?customer_type=Member").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains("R$ 330"));
    assert!(body.contains("7.3"));
    assert!(body.contains("R$ 110.00"));
    assert!(body.contains("<svg"));
    assert!(body.contains(r#"<option value="Normal">Normal</option>"#));
    assert!(body.contains(r#"<option value="Member" selected>Member</option>"#));
}

#[tokio::test]
async fn chart_endpoints_serve_svg() {
    let (status, content_type, body) = get("/charts/product_line.svg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
    assert!(body.contains("Electronics"));

    let (status, _, body) = get("/charts/hourly.svg?applied=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No data for the current selection"));
}
