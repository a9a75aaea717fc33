mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{titles, TestApp};

#[tokio::test]
async fn label_lifecycle() -> Result<()> {
    let app = TestApp::new();
    let u1 = app.register("u1").await?;

    let (status, json) = app
        .post("/api/label", &u1.token, json!({ "name": "urgent", "color": "#ff0000" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["user_id"], u1.id.as_str());
    let uri = format!("/api/label/{}", json["data"]["id"].as_str().unwrap());

    let (status, json) = app.patch(&uri, &u1.token, json!({ "color": "#00ff00" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "urgent");
    assert_eq!(json["data"]["color"], "#00ff00");

    let (status, _) = app.delete(&uri, &u1.token).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, &u1.token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn labels_are_private_to_their_owner() -> Result<()> {
    let app = TestApp::new();
    let u1 = app.register("u1").await?;
    let u2 = app.register("u2").await?;

    let (_, json) = app.post("/api/label", &u1.token, json!({ "name": "urgent" })).await?;
    let uri = format!("/api/label/{}", json["data"]["id"].as_str().unwrap());

    let (status, _) = app.patch(&uri, &u2.token, json!({ "name": "mine" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, &u2.token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, json) = app.get("/api/label", &u2.token).await?;
    assert_eq!(json["data"]["total_count"], 0);
    Ok(())
}

#[tokio::test]
async fn labels_search_by_name_literally() -> Result<()> {
    let app = TestApp::new();
    let u1 = app.register("u1").await?;
    for name in ["Home", "50% off", "500 off"] {
        app.post("/api/label", &u1.token, json!({ "name": name })).await?;
    }

    let (_, json) = app.get("/api/label?search=50%25&limit=10", &u1.token).await?;
    assert_eq!(titles(&json, "name"), vec!["50% off"]);

    let (_, json) = app.get("/api/label?search=HOME", &u1.token).await?;
    assert_eq!(titles(&json, "name"), vec!["Home"]);
    Ok(())
}

#[tokio::test]
async fn blank_label_name_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let u1 = app.register("u1").await?;

    let (status, json) = app.post("/api/label", &u1.token, json!({ "name": "  " })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    Ok(())
}
