use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::error::PortalError;
use crate::router::PortalState;

/// Cookie holding the serialized session. The jar is private (encrypted and
/// authenticated), so clients can neither read nor forge it; anything that
/// fails to decrypt is treated as no session at all.
const SESSION_COOKIE: &str = "portal_session";

/// The only data a session may carry. Present in the cookie exactly when
/// the client is logged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
}

/// Read the current session, if any.
pub fn current(jar: &PrivateCookieJar) -> Option<SessionUser> {
    let cookie = jar.get(SESSION_COOKIE)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Write the session cookie; flips the client to the logged-in state.
pub fn save(jar: PrivateCookieJar, user: &SessionUser) -> Result<PrivateCookieJar, PortalError> {
    let value = serde_json::to_string(user)?;
    Ok(jar.add(build_cookie(value)))
}

/// Drop the session cookie. Safe to call when no session exists.
pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie())
}

/// No `max_age`: the cookie lives for the browser session only.
fn build_cookie(value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Route guard for protected pages: anonymous requests are redirected to
/// the login page before the handler body runs; logged-in handlers receive
/// the session identity by value.
#[derive(Debug, Clone)]
pub struct RequireLogin(pub SessionUser);

impl FromRequestParts<PortalState> for RequireLogin {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PortalState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(_) => return Err(Redirect::to("/login")),
        };
        current(&jar).map(Self).ok_or_else(|| Redirect::to("/login"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    fn empty_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::generate())
    }

    fn alice() -> SessionUser {
        SessionUser {
            user_id: 1,
            username: "alice".to_string(),
        }
    }

    #[test]
    fn session_round_trips_through_the_jar() {
        let jar = save(empty_jar(), &alice()).unwrap();
        assert_eq!(current(&jar), Some(alice()));
    }

    #[test]
    fn cleared_jar_reads_as_anonymous() {
        let jar = clear(save(empty_jar(), &alice()).unwrap());
        assert_eq!(current(&jar), None);
    }

    #[test]
    fn clearing_an_empty_jar_is_harmless() {
        assert_eq!(current(&clear(empty_jar())), None);
    }

    #[test]
    fn garbage_cookie_value_reads_as_anonymous() {
        let jar = empty_jar().add(build_cookie("not a session".to_string()));
        assert_eq!(current(&jar), None);
    }
}
