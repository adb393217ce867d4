mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, Utc};
use models::user::Role;
use serde_json::json;
use server::openapi::ApiDoc;
use service::auth::token::TokenIssuer;
use utoipa::openapi::PathItemType;
use utoipa::OpenApi;
use uuid::Uuid;

use common::{spawn_app, test_config, PASSWORD, SECRET};

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    let t = spawn_app().await?;

    let r = t
        .send("POST", "/auth/register", None, Some(json!({"name": "Tester", "email": "Tester@Example.com", "password": PASSWORD})))
        .await?;
    assert_eq!(r.status, StatusCode::CREATED);
    assert_eq!(r.body["role"], "customer");
    assert_eq!(r.body["user"]["email"], "tester@example.com");
    assert_eq!(r.body["user"]["role"], "customer");
    assert!(r.body["token"].as_str().is_some_and(|s| !s.is_empty()));

    let r = t
        .send("POST", "/auth/login", None, Some(json!({"email": "tester@example.com", "password": PASSWORD})))
        .await?;
    assert_eq!(r.status, StatusCode::OK);
    let cookie = r.set_cookie.expect("login sets a cookie");
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    t.customer("dup@example.com").await?;
    let r = t
        .send("POST", "/auth/register", None, Some(json!({"name": "Again", "email": "DUP@example.com", "password": PASSWORD})))
        .await?;
    assert_eq!(r.status, StatusCode::CONFLICT);
    assert_eq!(r.body["error"], "conflict");
    Ok(())
}

#[tokio::test]
async fn register_rejects_bad_input() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let short = t
        .send("POST", "/auth/register", None, Some(json!({"name": "A", "email": "a@example.com", "password": "short"})))
        .await?;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let r = t.request(req).await?;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.body["error"], "bad_request");
    Ok(())
}

#[tokio::test]
async fn admin_self_registration_is_refused() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let r = t
        .send("POST", "/auth/register", None, Some(json!({"name": "Boss", "email": "boss@example.com", "password": PASSWORD, "role": "admin"})))
        .await?;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthenticated() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    t.customer("pw@example.com").await?;
    let r = t
        .send("POST", "/auth/login", None, Some(json!({"email": "pw@example.com", "password": "not-the-password"})))
        .await?;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);
    assert!(r.set_cookie.is_none());
    Ok(())
}

#[tokio::test]
async fn me_accepts_bearer_and_cookie() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (token, id) = t.customer("me@example.com").await?;

    let r = t.send("GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["id"], json!(id));
    assert!(r.body.get("password_hash").is_none());

    let req = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, format!("auth_token={token}"))
        .body(Body::empty())?;
    let r = t.request(req).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["email"], "me@example.com");
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_credential_is_unauthenticated() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let r = t.send("GET", "/companies", None, None).await?;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);
    assert_eq!(r.body["error"], "unauthenticated");

    let req = Request::builder()
        .uri("/companies")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())?;
    assert_eq!(t.request(req).await?.status, StatusCode::UNAUTHORIZED);

    let r = t.send("GET", "/companies", Some("not.a.jwt"), None).await?;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn tampered_signature_is_rejected() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (_, id) = t.customer("tamper@example.com").await?;
    let forged = TokenIssuer::new("some-other-secret", Duration::hours(1)).issue(id, Role::Admin)?;
    let r = t.send("GET", "/users", Some(&forged), None).await?;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

const PUBLIC_PATHS: [&str; 3] = ["/health", "/auth/register", "/auth/login"];

fn method_of(kind: &PathItemType) -> &'static str {
    match kind {
        PathItemType::Get => "GET",
        PathItemType::Post => "POST",
        PathItemType::Put => "PUT",
        PathItemType::Patch => "PATCH",
        PathItemType::Delete => "DELETE",
        other => panic!("no route uses {other:?}"),
    }
}

#[tokio::test]
async fn expired_token_is_rejected_everywhere() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (_, id) = t.admin("late@example.com").await?;
    let expired = TokenIssuer::new(SECRET, Duration::hours(1)).issue_at(id, Role::Admin, Utc::now() - Duration::hours(3))?;
    let some_id = Uuid::new_v4().to_string();

    let mut checked = 0;
    for (path, item) in ApiDoc::openapi().paths.paths {
        if PUBLIC_PATHS.contains(&path.as_str()) {
            continue;
        }
        let uri = path.replace("{id}", &some_id).replace("{service}", "Cementing");
        for kind in item.operations.keys() {
            let method = method_of(kind);
            let r = t.send(method, &uri, Some(&expired), None).await?;
            assert_eq!(r.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(r.body["error"], "unauthenticated", "{method} {uri}");
            checked += 1;
        }
    }
    assert_eq!(checked, 47, "every protected operation is documented");
    Ok(())
}

#[tokio::test]
async fn token_of_deleted_user_is_rejected() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (admin, _) = t.admin("root@example.com").await?;
    let (token, id) = t.customer("gone@example.com").await?;
    let r = t.send("DELETE", &format!("/users/{id}"), Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::NO_CONTENT);
    let r = t.send("GET", "/auth/me", Some(&token), None).await?;
    assert_eq!(r.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn role_change_applies_to_existing_tokens() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (admin, _) = t.admin("root@example.com").await?;
    let (token, id) = t.customer("promoted@example.com").await?;
    assert_eq!(t.send("GET", "/users", Some(&token), None).await?.status, StatusCode::FORBIDDEN);

    let r = t.send("PUT", &format!("/users/{id}"), Some(&admin), Some(json!({"role": "admin"}))).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(t.send("GET", "/users", Some(&token), None).await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (token, _) = t.customer("bye@example.com").await?;
    let r = t.send("POST", "/auth/logout", Some(&token), None).await?;
    assert_eq!(r.status, StatusCode::NO_CONTENT);
    let cookie = r.set_cookie.expect("removal cookie");
    assert!(cookie.starts_with("auth_token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));

    let req = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::COOKIE, format!("auth_token={token}"))
        .body(Body::empty())?;
    let r = t.request(req).await?;
    assert_eq!(r.status, StatusCode::NO_CONTENT);
    let cookie = r.set_cookie.expect("removal cookie");
    assert!(cookie.starts_with("auth_token=;"));
    assert!(cookie.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn user_listing_never_exposes_hashes() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (admin, _) = t.admin("root@example.com").await?;
    t.customer("c1@example.com").await?;
    let r = t.send("GET", "/users", Some(&admin), None).await?;
    assert_eq!(r.status, StatusCode::OK);
    let rows = r.body.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|u| u.get("password_hash").is_none()));
    Ok(())
}

#[tokio::test]
async fn public_routes_need_no_credential() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let r = t.send("GET", "/health", None, None).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.body["status"], "ok");
    let r = t.send("GET", "/api-docs/openapi.json", None, None).await?;
    assert_eq!(r.status, StatusCode::OK);
    assert!(r.body["paths"]["/companies/my"].is_object());
    Ok(())
}

#[tokio::test]
async fn oversized_token_lifetime_is_refused_at_startup() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let mut cfg = test_config();
    cfg.auth.token_ttl_hours = 1_000_000_000_000;
    assert!(cfg.normalize_and_validate().is_err());
    assert!(server::startup::build_app(t.db.clone(), &cfg).is_err());
    Ok(())
}
