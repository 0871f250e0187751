//! Lead CRUD, search and validation over HTTP.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use hvac_dash_integration_tests::TestApp;

async fn create(app: &TestApp, body: Value) -> (StatusCode, Value) {
    let resp = app
        .client
        .post(app.url("/api/leads"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn list(app: &TestApp, query: &str) -> Vec<Value> {
    app.client
        .get(app.url(&format!("/api/leads{query}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn names(leads: &[Value]) -> Vec<&str> {
    leads.iter().filter_map(|l| l["name"].as_str()).collect()
}

#[tokio::test]
async fn test_create_returns_201_with_defaults() {
    let app = TestApp::spawn().await;

    let (status, lead) = create(
        &app,
        json!({
            "name": "Scarborough Town Centre",
            "address": "300 Borough Dr, Scarborough",
            "territory": "Scarborough-South"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(lead["id"].as_i64().unwrap() > 0);
    assert_eq!(lead["riskScore"], 0);
    assert_eq!(lead["status"], "New");
    assert!(lead["unitModel"].is_null());
    assert!(lead["lastContact"].is_null());
}

#[tokio::test]
async fn test_missing_name_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, body) = create(
        &app,
        json!({"address": "1 Main St", "territory": "Vaughan-East"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");
    assert_eq!(body["message"], "Required");
    assert!(list(&app, "").await.is_empty());
}

#[tokio::test]
async fn test_empty_body_reports_first_declared_field() {
    let app = TestApp::spawn().await;

    let (status, body) = create(&app, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");
    assert_eq!(body["message"], "Required");
}

#[tokio::test]
async fn test_risk_score_out_of_range_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, body) = create(
        &app,
        json!({
            "name": "RBC Plaza",
            "address": "200 Bay St, Toronto",
            "territory": "Downtown Core",
            "riskScore": 150
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "riskScore");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/leads"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_returns_all_in_id_order() {
    let app = TestApp::spawn().await;

    for name in ["Alpha Plaza", "Bravo Tower", "Charlie Centre"] {
        let (status, _) = create(
            &app,
            json!({"name": name, "address": "1 Main St", "territory": "Downtown Core"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let leads = list(&app, "").await;
    assert_eq!(names(&leads), ["Alpha Plaza", "Bravo Tower", "Charlie Centre"]);
    let ids: Vec<i64> = leads.iter().filter_map(|l| l["id"].as_i64()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_search_filters_by_name_or_address() {
    let app = TestApp::spawn_seeded().await;

    assert_eq!(names(&list(&app, "?search=plaza").await), ["RBC Plaza"]);
    assert_eq!(
        names(&list(&app, "?search=SHEPPARD").await),
        ["Fairview Mall Complex"]
    );
    assert_eq!(list(&app, "?search=%20%20").await.len(), 4);
    assert!(list(&app, "?search=nowhere").await.is_empty());
}

#[tokio::test]
async fn test_patch_updates_and_clears_fields() {
    let app = TestApp::spawn().await;
    let (_, lead) = create(
        &app,
        json!({
            "name": "Vaughan Mills Retail",
            "address": "1 Bass Pro Mills Dr, Vaughan",
            "territory": "Vaughan-East",
            "unitModel": "Carrier Weathermaster",
            "riskScore": 45
        }),
    )
    .await;
    let id = lead["id"].as_i64().unwrap();

    let resp = app
        .client
        .patch(app.url(&format!("/api/leads/{id}")))
        .json(&json!({"status": "Contacted", "unitModel": null}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["status"], "Contacted");
    assert!(updated["unitModel"].is_null());
    assert_eq!(updated["riskScore"], 45);
    assert_eq!(updated["name"], "Vaughan Mills Retail");
}

#[tokio::test]
async fn test_patch_missing_lead_is_404() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .patch(app.url("/api/leads/999"))
        .json(&json!({"status": "Contacted"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Lead not found");
}

#[tokio::test]
async fn test_patch_validates_present_fields() {
    let app = TestApp::spawn_seeded().await;

    let resp = app
        .client
        .patch(app.url("/api/leads/1"))
        .json(&json!({"riskScore": -1}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "riskScore");
}

#[tokio::test]
async fn test_patch_rejects_null_for_required_fields() {
    let app = TestApp::spawn_seeded().await;
    let before = list(&app, "").await;
    let id = before[0]["id"].as_i64().unwrap();

    let resp = app
        .client
        .patch(app.url(&format!("/api/leads/{id}")))
        .json(&json!({"name": null}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "name");
    assert!(body["message"].as_str().unwrap().contains("cannot be null"));

    let after = list(&app, "").await;
    assert_eq!(after[0]["name"], before[0]["name"]);
}

#[tokio::test]
async fn test_delete_is_204_whether_or_not_present() {
    let app = TestApp::spawn_seeded().await;
    let before = list(&app, "").await;
    let id = before[0]["id"].as_i64().unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/api/leads/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.bytes().await.unwrap().is_empty());

    let after = list(&app, "").await;
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|l| l["id"].as_i64() != Some(id)));

    let resp = app
        .client
        .delete(app.url(&format!("/api/leads/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(list(&app, "").await.len(), after.len());
}
