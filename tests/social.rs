mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn follow_and_unfollow() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else { return Ok(()) };
    let alice = app.register("uma").await?;
    let bob = app.register("vic").await?;
    let following = format!("/api/users/{}/following", alice.id);

    let (status, err) = app.post(&following, &alice, json!({ "followed_id": alice.id })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "Cannot follow yourself");

    let (status, _) = app.post(&following, &alice, json!({ "followed_id": 999_999_999 })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post(&following, &alice, json!({ "followed_id": bob.id })).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = app.post(&following, &alice, json!({ "followed_id": bob.id })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], format!("Already following user {}", bob.id));

    let (status, followers) = app.get(&format!("/api/users/{}/followers", bob.id), &bob).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(followers[0]["username"], alice.username);

    let (status, _) = app.delete(&format!("{}/{}", following, bob.id), &alice).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, followed) = app.get(&following, &alice).await?;
    assert_eq!(followed, json!([]));
    Ok(())
}

#[tokio::test]
async fn recommendations_are_shared_between_parties() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else { return Ok(()) };
    let sender = app.register("wes").await?;
    let receiver = app.register("xena").await?;
    let outsider = app.register("yuri").await?;
    let read = app.create_read(&sender, "Circe", 393).await?;

    let (status, err) = app
        .post(
            &format!("/api/users/{}/recommendations", sender.id),
            &sender,
            json!({ "receiver_id": sender.id, "read_id": read["id"], "content": "Me to me" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], "Cannot recommend a read to yourself");

    let (status, rec) = app
        .post(
            &format!("/api/users/{}/recommendations", sender.id),
            &sender,
            json!({ "receiver_id": receiver.id, "read_id": read["id"], "content": "You'll love it" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let as_receiver = format!("/api/users/{}/recommendations/{}", receiver.id, rec["id"]);
    let as_sender = format!("/api/users/{}/recommendations/{}", sender.id, rec["id"]);
    let as_outsider = format!("/api/users/{}/recommendations/{}", outsider.id, rec["id"]);

    let (status, seen) = app.get(&as_receiver, &receiver).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seen["content"], "You'll love it");
    assert_eq!(seen, rec);
    let (_, seen) = app.get(&as_sender, &sender).await?;
    assert_eq!(seen, rec);

    let (status, _) = app.get(&as_outsider, &outsider).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, err) = app.patch(&as_receiver, &receiver, json!({ "content": "Edited" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"]["message"], "Cannot Update Other User's Recommendations");

    let (status, edited) = app.patch(&as_sender, &sender, json!({ "content": "Chapter 3!" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["content"], "Chapter 3!");

    let (status, _) = app.delete(&as_receiver, &receiver).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&as_sender, &sender).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn journal_round_trip() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else { return Ok(()) };
    let user = app.register("zoe").await?;
    let journals = format!("/api/users/{}/journals", user.id);

    let (status, err) = app.post(&journals, &user, json!({ "title": "Day one" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], json!(["instance requires property \"text\""]));

    let (status, entry) = app
        .post(&journals, &user, json!({ "title": "Day one", "text": "Started Dune." }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let one = format!("{}/{}", journals, entry["id"]);

    let (status, fetched) = app.get(&one, &user).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, entry);
    assert_eq!(fetched["title"], "Day one");
    assert_eq!(fetched["text"], "Started Dune.");

    let (status, updated) = app.patch(&one, &user, json!({ "text": "Finished Dune." })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Day one");
    assert_eq!(updated["text"], "Finished Dune.");

    let (status, _) = app.delete(&one, &user).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&one, &user).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn badges_are_earned_once() -> Result<()> {
    let Some(app) = TestApp::spawn().await? else { return Ok(()) };
    let user = app.register("abel").await?;
    let earned = format!("/api/users/{}/badges", user.id);

    let (status, catalog) = app.get("/api/badges", &user).await?;
    assert_eq!(status, StatusCode::OK);
    let badge_id = catalog[0]["id"].clone();

    let (status, badge) = app.post(&earned, &user, json!({ "badge_id": badge_id })).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(badge["name"], catalog[0]["name"]);

    let (status, err) = app.post(&earned, &user, json!({ "badge_id": badge_id })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"]["message"], format!("Badge {} already earned", badge_id));

    let (status, list) = app.get(&earned, &user).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (status, _) = app.delete(&format!("{}/{}", earned, badge_id), &user).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = app.get(&earned, &user).await?;
    assert_eq!(list, json!([]));
    Ok(())
}
