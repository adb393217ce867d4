#![allow(dead_code)]
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configs::{AppConfig, DatabaseConfig};
use migration::MigratorTrait;
use models::user::Role;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use service::repo::users::{self, NewUser};
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "test-secret";
pub const PASSWORD: &str = "S3curePass!";

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database = DatabaseConfig { url: "sqlite::memory:".into(), ..DatabaseConfig::default() };
    cfg.auth.jwt_secret = SECRET.into();
    cfg
}

/// Router over a fresh, migrated in-memory database.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let cfg = test_config();
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    let app = server::startup::build_app(db.clone(), &cfg)?;
    Ok(TestApp { app, db })
}

pub struct Reply {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<Reply> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
            None => req.body(Body::empty())?,
        };
        self.request(req).await
    }

    pub async fn request(&self, req: Request<Body>) -> anyhow::Result<Reply> {
        let resp = self.app.clone().oneshot(req).await?;
        let status = resp.status();
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok(Reply { status, set_cookie, body })
    }

    /// Register a customer; returns (token, user id).
    pub async fn customer(&self, email: &str) -> anyhow::Result<(String, Uuid)> {
        let r = self
            .send("POST", "/auth/register", None, Some(json!({"name": "Customer", "email": email, "password": PASSWORD})))
            .await?;
        anyhow::ensure!(r.status == StatusCode::CREATED, "register failed: {} {}", r.status, r.body);
        session_of(&r.body)
    }

    /// Insert an admin straight into the database and log in.
    pub async fn admin(&self, email: &str) -> anyhow::Result<(String, Uuid)> {
        users::create(
            &self.db,
            NewUser { name: "Admin".into(), email: email.into(), password: PASSWORD.into(), role: Some(Role::Admin) },
        )
        .await?;
        let r = self.send("POST", "/auth/login", None, Some(json!({"email": email, "password": PASSWORD}))).await?;
        anyhow::ensure!(r.status == StatusCode::OK, "login failed: {} {}", r.status, r.body);
        session_of(&r.body)
    }

    pub async fn company(&self, token: &str, name: &str) -> anyhow::Result<Uuid> {
        let r = self.send("POST", "/companies", Some(token), Some(json!({"name": name}))).await?;
        anyhow::ensure!(r.status == StatusCode::CREATED, "company create failed: {} {}", r.status, r.body);
        id_of(&r.body)
    }

    /// Create a service offered by `company_id`; returns (service id, offering id).
    pub async fn offering(&self, token: &str, company_id: Uuid, title: &str) -> anyhow::Result<(Uuid, Uuid)> {
        let r = self
            .send("POST", "/services", Some(token), Some(json!({"title": title, "price": 250.0, "company_id": company_id})))
            .await?;
        anyhow::ensure!(r.status == StatusCode::CREATED, "service create failed: {} {}", r.status, r.body);
        let service_id = id_of(&r.body)?;
        let r = self.send("GET", "/company-services/my", Some(token), None).await?;
        let offering = r
            .body
            .as_array()
            .and_then(|rows| rows.iter().find(|row| row["service_id"] == json!(service_id)))
            .ok_or_else(|| anyhow::anyhow!("offering not listed"))?;
        Ok((service_id, id_of(offering)?))
    }

    pub async fn booking(&self, token: &str) -> anyhow::Result<Uuid> {
        let r = self.send("POST", "/bookings", Some(token), Some(json!({"description": "rig inspection"}))).await?;
        anyhow::ensure!(r.status == StatusCode::CREATED, "booking create failed: {} {}", r.status, r.body);
        id_of(&r.body)
    }
}

pub fn id_of(v: &Value) -> anyhow::Result<Uuid> {
    let s = v["id"].as_str().ok_or_else(|| anyhow::anyhow!("no id in {v}"))?;
    Ok(s.parse()?)
}

fn session_of(v: &Value) -> anyhow::Result<(String, Uuid)> {
    let token = v["token"].as_str().ok_or_else(|| anyhow::anyhow!("no token in {v}"))?.to_string();
    Ok((token, id_of(&v["user"])?))
}
