mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn collection_round_trip() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else { return Ok(()) };
    let user = app.register("olga").await?;
    let collections = format!("/api/users/{}/collections", user.id);

    let (status, created) = app
        .post(&collections, &user, json!({ "name": "Favorites", "description": "All-time best" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let one = format!("{}/{}", collections, created["id"]);

    let (status, fetched) = app.get(&one, &user).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = app
        .patch(&one, &user, json!({ "name": "Summer", "description": "" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Summer");
    assert_eq!(updated["description"], "All-time best");

    let (status, listed) = app.get(&collections, &user).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([updated]));

    let (status, _) = app.delete(&one, &user).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = app.get(&one, &user).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"]["message"], format!("No collection: {}", created["id"]));
    Ok(())
}

#[tokio::test]
async fn collection_names_are_unique_per_user() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else { return Ok(()) };
    let user = app.register("pete").await?;
    let other = app.register("quin").await?;

    let (status, _) = app
        .post(&format!("/api/users/{}/collections", user.id), &user, json!({ "name": "To Read" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = app
        .post(&format!("/api/users/{}/collections", user.id), &user, json!({ "name": "To Read" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "Collection To Read already exists");

    let (status, _) = app
        .post(&format!("/api/users/{}/collections", other.id), &other, json!({ "name": "To Read" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn collection_reads_can_be_linked_once() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else { return Ok(()) };
    let user = app.register("rosa").await?;
    let read = app.create_read(&user, "Middlemarch", 880).await?;

    let (_, collection) = app
        .post(&format!("/api/users/{}/collections", user.id), &user, json!({ "name": "Classics" }))
        .await?;
    let reads = format!("/api/users/{}/collections/{}/reads", user.id, collection["id"]);

    let (status, linked) = app.post(&reads, &user, json!({ "read_id": read["id"] })).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(linked["id"], read["id"]);

    let (status, err) = app.post(&reads, &user, json!({ "read_id": read["id"] })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        err["error"]["message"],
        format!("Read {} already exists in collection {}", read["id"], collection["id"])
    );

    let (status, listed) = app.get(&reads, &user).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, _) = app.delete(&format!("{}/{}", reads, read["id"]), &user).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, listed) = app.get(&reads, &user).await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn other_users_collections_are_off_limits() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else { return Ok(()) };
    let owner = app.register("sam").await?;
    let intruder = app.register("tess").await?;

    let (_, collection) = app
        .post(&format!("/api/users/{}/collections", owner.id), &owner, json!({ "name": "Private" }))
        .await?;
    let one = format!("/api/users/{}/collections/{}", owner.id, collection["id"]);

    let (status, err) = app.get(&one, &intruder).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"]["message"], "Cannot View Other User's Collections");

    let (status, _) = app.delete(&one, &intruder).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Addressing the collection through the intruder's own id does not find it
    let (status, _) = app
        .get(&format!("/api/users/{}/collections/{}", intruder.id, collection["id"]), &intruder)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&one, &owner).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
