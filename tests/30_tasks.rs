mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{titles, TestApp};

#[tokio::test]
async fn task_inherits_owner_from_its_list() -> Result<()> {
    let app = TestApp::new();
    let u1 = app.register("u1").await?;
    let list_id = app.create_task_list(&u1, "Groceries").await?;

    let body = json!({
        "task_list_id": list_id,
        "title": "Milk",
        "due_date": "2030-01-01T09:00:00Z"
    });
    let (status, json) = app.post("/api/task", &u1.token, body).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["user_id"], u1.id.as_str());
    assert_eq!(json["data"]["task_list_id"], list_id.as_str());
    assert_eq!(json["data"]["completed"], false);
    assert_eq!(json["data"]["due_date"], "2030-01-01T09:00:00Z");
    Ok(())
}

#[tokio::test]
async fn task_needs_an_existing_list_of_the_caller() -> Result<()> {
    let app = TestApp::new();
    let u1 = app.register("u1").await?;
    let u2 = app.register("u2").await?;
    let list_id = app.create_task_list(&u1, "Groceries").await?;

    let body = json!({ "task_list_id": uuid::Uuid::new_v4(), "title": "Milk" });
    let (status, _) = app.post("/api/task", &u1.token, body).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let body = json!({ "task_list_id": list_id, "title": "Milk" });
    let (status, _) = app.post("/api/task", &u2.token, body).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn owner_completes_task_and_others_cannot() -> Result<()> {
    let app = TestApp::new();
    let u1 = app.register("u1").await?;
    let u2 = app.register("u2").await?;
    let list_id = app.create_task_list(&u1, "Groceries").await?;
    let (_, json) = app
        .post("/api/task", &u1.token, json!({ "task_list_id": list_id, "title": "Milk" }))
        .await?;
    let uri = format!("/api/task/{}", json["data"]["id"].as_str().unwrap());

    let (status, _) = app.patch(&uri, &u2.token, json!({ "completed": true })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app.patch(&uri, &u1.token, json!({ "completed": true })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["completed"], true);
    assert_eq!(json["data"]["title"], "Milk");

    let (status, _) = app.delete(&uri, &u2.token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, &u1.token).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&uri, &u1.token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn tasks_list_by_owner_with_optional_list_filter() -> Result<()> {
    let app = TestApp::new();
    let u1 = app.register("u1").await?;
    let u2 = app.register("u2").await?;
    let groceries = app.create_task_list(&u1, "Groceries").await?;
    let work = app.create_task_list(&u1, "Work").await?;

    for (list, title) in [(&groceries, "Milk"), (&work, "Report"), (&groceries, "Eggs")] {
        app.post("/api/task", &u1.token, json!({ "task_list_id": list, "title": title }))
            .await?;
    }

    let (_, json) = app.get("/api/task?limit=10", &u1.token).await?;
    assert_eq!(titles(&json, "title"), vec!["Milk", "Report", "Eggs"]);

    let (_, json) = app
        .get(&format!("/api/task?limit=10&task_list_id={}", groceries), &u1.token)
        .await?;
    assert_eq!(titles(&json, "title"), vec!["Milk", "Eggs"]);

    let (_, json) = app
        .get(&format!("/api/task-list/{}/tasks?search=EGG", groceries), &u1.token)
        .await?;
    assert_eq!(titles(&json, "title"), vec!["Eggs"]);
    assert_eq!(json["data"]["total_count"], 1);

    let (_, json) = app.get("/api/task", &u2.token).await?;
    assert_eq!(json["data"]["total_count"], 0);

    let (status, _) = app
        .get(&format!("/api/task-list/{}/tasks", groceries), &u2.token)
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/task?task_list_id=bogus", &u1.token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
