use askama::Template;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::error::PortalError;
use crate::session::{self, RequireLogin};
use crate::templates::{HomeTemplate, LoginTemplate};

/// GET `/`: logged-in clients land on the home page, everyone else gets
/// the login form directly.
pub async fn index(jar: PrivateCookieJar) -> Result<Response, PortalError> {
    if session::current(&jar).is_some() {
        return Ok(Redirect::to("/home").into_response());
    }
    Ok(Html(LoginTemplate.render()?).into_response())
}

/// GET `/login`
pub async fn login_page() -> Result<Html<String>, PortalError> {
    Ok(Html(LoginTemplate.render()?))
}

/// GET `/home`: protected; anonymous requests are redirected to `/login`
/// by the extractor before this body runs.
pub async fn home(RequireLogin(user): RequireLogin) -> Result<Html<String>, PortalError> {
    let page = HomeTemplate {
        username: user.username,
    };
    Ok(Html(page.render()?))
}
