use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use models::user::Role;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use service::auth::domain::{AuthSession, LoginInput, RegisterInput};
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::{AuthConfig, AuthService};
use service::authz::{Guard, SeaOrmOwnerLookup};
use service::repo::users;
use tracing::warn;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, CurrentUser};

pub const AUTH_COOKIE: &str = "auth_token";

/// Shared handler state: one pooled connection plus the auth and ownership services built on it.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub guard: Arc<Guard<SeaOrmOwnerLookup>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: AuthConfig) -> Self {
        let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
        Self {
            auth: Arc::new(AuthService::new(repo, auth)),
            guard: Arc::new(Guard::new(SeaOrmOwnerLookup::new(db.clone()))),
            db,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct SessionOutput {
    pub token: String,
    pub role: Role,
    pub user: SessionUser,
}

impl From<AuthSession> for SessionOutput {
    fn from(s: AuthSession) -> Self {
        Self {
            role: s.user.role,
            user: SessionUser { id: s.user.id, email: s.user.email, role: s.user.role },
            token: s.token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeOutput {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[utoipa::path(
    post, path = "/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = crate::openapi::SessionDoc),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Admin registration disabled"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<SessionOutput>), JsonApiError> {
    let session = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged In", body = crate::openapi::SessionDoc),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<(CookieJar, Json<SessionOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session.into())))
}

#[utoipa::path(
    post, path = "/auth/logout", tag = "auth",
    responses(
        (status = 204, description = "Cookie cleared"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    // expire the cookie even when the caller authenticated with a Bearer header
    let mut cookie = Cookie::build((AUTH_COOKIE, "")).path("/").http_only(true).same_site(SameSite::Lax).build();
    cookie.make_removal();
    (jar.add(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/auth/me", tag = "auth",
    responses(
        (status = 200, description = "Current user", body = crate::openapi::UserDoc),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(State(state): State<ServerState>, CurrentUser(who): CurrentUser) -> Result<Json<MeOutput>, JsonApiError> {
    let user = users::get(&state.db, who.user_id).await?;
    Ok(Json(MeOutput { id: user.id, name: user.name, email: user.email, role: user.role }))
}

fn bearer_or_cookie(req: &Request, jar: &CookieJar) -> Result<String, JsonApiError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| JsonApiError::unauthenticated("invalid Authorization header"))?;
        return match value.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => {
                warn!(path = %req.uri().path(), "invalid Authorization format (expect Bearer)");
                Err(JsonApiError::unauthenticated("expected a Bearer credential"))
            }
        };
    }
    match jar.get(AUTH_COOKIE) {
        Some(c) if !c.value().is_empty() => Ok(c.value().to_string()),
        _ => Err(JsonApiError::unauthenticated("missing credential")),
    }
}

/// Verifies the bearer token (or the login cookie) and attaches the caller's
/// [`Identity`](service::auth::Identity) to the request.
pub async fn require_identity(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let token = bearer_or_cookie(&req, &jar)?;
    let identity = match state.auth.identify(&token).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!(path = %req.uri().path(), error = %e, "credential rejected");
            return Err(e.into());
        }
    };
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
