use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::AuthOutcome;
use crate::error::{ApiFailure, PortalError};
use crate::router::PortalState;
use crate::session;

/// Login body. Missing fields fall back to empty strings, which can never
/// match a stored row, so a half-filled body reads as bad credentials
/// rather than a malformed request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct LoginSuccess {
    success: bool,
    message: &'static str,
    username: String,
}

#[derive(Serialize)]
struct LogoutSuccess {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct CheckStatus {
    logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

#[derive(Serialize)]
struct DbDiagnostic {
    success: bool,
    message: &'static str,
    user_count: i64,
}

/// POST `/api/login`
///
/// 200 with the username on a match, 401 on a mismatch, 500 when the store
/// is unreachable or the body is not JSON. A store failure must never read
/// as "wrong password".
pub async fn api_login(
    State(state): State<PortalState>,
    jar: PrivateCookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, PortalError> {
    let Json(req) = payload?;
    info!(username = %req.username, "login attempt");

    match state
        .store
        .authenticate(&req.username, &req.password)
        .await?
    {
        AuthOutcome::Authenticated(user) => {
            let jar = session::save(jar, &user)?;
            info!(username = %user.username, user_id = user.user_id, "login succeeded");
            let body = LoginSuccess {
                success: true,
                message: "登录成功！",
                username: user.username,
            };
            Ok((jar, Json(body)).into_response())
        }
        AuthOutcome::Rejected => {
            warn!(username = %req.username, "login rejected: bad credentials");
            let body = ApiFailure::new("用户名或密码错误，请重试");
            Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response())
        }
    }
}

/// GET `/api/check`: reports the session state without touching it.
pub async fn api_check(jar: PrivateCookieJar) -> impl IntoResponse {
    match session::current(&jar) {
        Some(user) => Json(CheckStatus {
            logged_in: true,
            username: Some(user.username),
        }),
        None => Json(CheckStatus {
            logged_in: false,
            username: None,
        }),
    }
}

/// POST `/api/logout`: drops the session cookie. Idempotent: logging out
/// while anonymous still succeeds.
pub async fn api_logout(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = session::clear(jar);
    info!("user logged out");
    let body = LogoutSuccess {
        success: true,
        message: "已成功登出",
    };
    (jar, Json(body))
}

/// GET `/api/test-db`: connectivity diagnostic, not part of the login
/// flow. Reports its own failure message instead of the generic envelope.
pub async fn api_test_db(State(state): State<PortalState>) -> Response {
    match state.store.user_count().await {
        Ok(user_count) => Json(DbDiagnostic {
            success: true,
            message: "数据库连接正常",
            user_count,
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "database diagnostic failed");
            let body = ApiFailure::new(format!("数据库连接失败: {e}"));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// JSON 404 for anything no route matches.
pub async fn fallback_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ApiFailure::new("页面不存在")))
}
