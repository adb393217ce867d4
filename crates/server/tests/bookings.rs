mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{id_of, spawn_app};

#[tokio::test]
async fn customer_bookings_start_requested_and_stay_their_own() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (alice, alice_id) = t.customer("alice@example.com").await?;
    let (_, bob_id) = t.customer("bob@example.com").await?;

    let r = t.send("POST", "/bookings", Some(&alice), Some(json!({"description": "Frac crew", "status": "active"}))).await?;
    assert_eq!(r.status, StatusCode::CREATED);
    assert_eq!(r.body["status"], "requested");
    assert_eq!(r.body["user_id"], json!(alice_id));

    let r = t.send("POST", "/bookings", Some(&alice), Some(json!({"user_id": bob_id}))).await?;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_books_on_behalf_of_users() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (admin, _) = t.admin("root@example.com").await?;
    let (bob, bob_id) = t.customer("bob@example.com").await?;

    let r = t
        .send("POST", "/bookings", Some(&admin), Some(json!({"user_id": bob_id, "status": "active"})))
        .await?;
    assert_eq!(r.status, StatusCode::CREATED);
    assert_eq!(r.body["status"], "active");
    let booking = id_of(&r.body)?;

    let r = t.send("GET", "/bookings/me", Some(&bob), None).await?;
    assert_eq!(r.body.as_array().map(Vec::len), Some(1));
    assert_eq!(id_of(&r.body[0])?, booking);

    let r = t.send("POST", "/bookings", Some(&admin), Some(json!({"user_id": Uuid::new_v4()}))).await?;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn bookings_are_private_to_their_owner() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (admin, _) = t.admin("root@example.com").await?;
    let (alice, _) = t.customer("alice@example.com").await?;
    let (bob, _) = t.customer("bob@example.com").await?;
    let booking = t.booking(&alice).await?;

    assert_eq!(t.send("GET", &format!("/bookings/{booking}"), Some(&alice), None).await?.status, StatusCode::OK);
    assert_eq!(t.send("GET", &format!("/bookings/{booking}"), Some(&admin), None).await?.status, StatusCode::OK);
    assert_eq!(t.send("GET", &format!("/bookings/{booking}"), Some(&bob), None).await?.status, StatusCode::FORBIDDEN);
    assert_eq!(
        t.send("GET", &format!("/bookings/{booking}/services"), Some(&bob), None).await?.status,
        StatusCode::FORBIDDEN
    );

    let r = t.send("GET", "/bookings/me", Some(&bob), None).await?;
    assert_eq!(r.body.as_array().map(Vec::len), Some(0));

    let r = t.send("GET", &format!("/bookings/{}", Uuid::new_v4()), Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn owners_cancel_through_the_me_route_only() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (alice, _) = t.customer("alice@example.com").await?;
    let (bob, _) = t.customer("bob@example.com").await?;
    let booking = t.booking(&alice).await?;

    let r = t.send("DELETE", &format!("/bookings/{booking}"), Some(&alice), None).await?;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    let r = t.send("DELETE", &format!("/bookings/{booking}/me"), Some(&bob), None).await?;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    let r = t.send("DELETE", &format!("/bookings/{booking}/me"), Some(&alice), None).await?;
    assert_eq!(r.status, StatusCode::NO_CONTENT);
    let r = t.send("GET", &format!("/bookings/{booking}"), Some(&alice), None).await?;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn status_changes_are_admin_only() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (admin, _) = t.admin("root@example.com").await?;
    let (alice, _) = t.customer("alice@example.com").await?;
    let booking = t.booking(&alice).await?;
    let uri = format!("/bookings/{booking}/status");

    let r = t.send("PATCH", &uri, Some(&alice), Some(json!({"status": "completed"}))).await?;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    let r = t.send("PATCH", &uri, Some(&admin), Some(json!({"status": "active"}))).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["status"], "active");
    let r = t.send("PATCH", &uri, Some(&admin), Some(json!({"status": "exploded"}))).await?;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);

    let r = t.send("PUT", &format!("/bookings/{booking}"), Some(&alice), Some(json!({"description": "x"}))).await?;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    let r = t.send("PUT", &format!("/bookings/{booking}"), Some(&admin), Some(json!({"description": "Revised scope"}))).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["description"], "Revised scope");
    Ok(())
}

#[tokio::test]
async fn booking_lines_follow_booking_ownership() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (admin, _) = t.admin("root@example.com").await?;
    let (alice, _) = t.customer("alice@example.com").await?;
    let (bob, _) = t.customer("bob@example.com").await?;
    let company = t.company(&alice, "Alice Drilling").await?;
    let (_, offering) = t.offering(&alice, company, "Mud Logging").await?;
    let booking = t.booking(&bob).await?;

    let body = json!({"booking_id": booking, "company_service_id": offering, "notes": "night shift"});
    let r = t.send("POST", "/booking-services", Some(&alice), Some(body.clone())).await?;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    let r = t.send("POST", "/booking-services", Some(&bob), Some(body)).await?;
    assert_eq!(r.status, StatusCode::CREATED);
    assert_eq!(r.body["quantity"], 1);
    let line = id_of(&r.body)?;

    let r = t.send("GET", &format!("/bookings/{booking}/services"), Some(&bob), None).await?;
    assert_eq!(r.body.as_array().map(Vec::len), Some(1));

    let r = t.send("PUT", &format!("/booking-services/{line}"), Some(&bob), Some(json!({"quantity": 3}))).await?;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    let r = t.send("PUT", &format!("/booking-services/{line}"), Some(&admin), Some(json!({"quantity": 0}))).await?;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    let r = t.send("PUT", &format!("/booking-services/{line}"), Some(&admin), Some(json!({"quantity": 3}))).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["quantity"], 3);

    let r = t.send("DELETE", &format!("/bookings/{booking}/me"), Some(&bob), None).await?;
    assert_eq!(r.status, StatusCode::NO_CONTENT);
    let r = t.send("GET", &format!("/booking-services/{line}"), Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn business_reports_for_admins() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (admin, _) = t.admin("root@example.com").await?;
    let (alice, _) = t.customer("alice@example.com").await?;
    let (bob, bob_id) = t.customer("bob@example.com").await?;
    let company = t.company(&alice, "Alice Drilling").await?;
    let (_, offering) = t.offering(&alice, company, "Mud Logging").await?;
    let booking = t.booking(&bob).await?;
    t.send("POST", "/booking-services", Some(&bob), Some(json!({"booking_id": booking, "company_service_id": offering})))
        .await?;

    let r = t.send("GET", "/business/companies-by-service/Mud%20Logging", Some(&bob), None).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(id_of(&r.body[0])?, company);
    let r = t.send("GET", "/business/companies-by-service/Nothing", Some(&bob), None).await?;
    assert_eq!(r.status, StatusCode::NOT_FOUND);

    let r = t.send("GET", "/business/users-with-active-bookings", Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body[0]["user_id"], json!(bob_id));
    assert_eq!(r.body[0]["active_bookings"], 1);

    let r = t.send("GET", "/business/company-stats", Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["companies"][0]["booking_count"], 1);
    let r = t.send("GET", "/business/company-stats?from=2024-13-01", Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    let r = t.send("GET", "/business/company-stats?from=2024-02-01&to=2024-01-01", Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);

    let r = t.send("GET", "/business/popular-services?limit=1", Some(&admin), None).await?;
    assert_eq!(r.body.as_array().map(Vec::len), Some(1));
    assert_eq!(r.body[0]["title"], "Mud Logging");

    let r = t.send("GET", "/business/search?q=DRILL", Some(&admin), None).await?;
    assert_eq!(r.body[0]["type"], "company");
    let r = t.send("GET", "/business/search?q=", Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);

    let r = t.send("GET", "/business/system-overview", Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert!(r.body["period"]["from"].is_string());
    Ok(())
}
