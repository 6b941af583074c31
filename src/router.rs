use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha256};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::CredentialStore;
use crate::handlers::{auth, pages};

/// Everything a request handler needs: the store handle and the session
/// key, built once at startup and cloned per request. There is no ambient
/// global; handlers only see what travels through this state.
#[derive(Clone)]
pub struct PortalState {
    pub store: CredentialStore,
    key: Key,
}

impl PortalState {
    pub fn new(cfg: &Config) -> Self {
        Self {
            store: CredentialStore::new(cfg.database_url.clone()),
            key: derive_session_key(&cfg.session_secret),
        }
    }
}

/// The private cookie jar pulls its key out of the shared state.
impl FromRef<PortalState> for Key {
    fn from_ref(state: &PortalState) -> Key {
        state.key.clone()
    }
}

/// Stretch the configured secret to key length; SHA-256 output is exactly
/// the 32 bytes `Key::derive_from` requires.
fn derive_session_key(secret: &str) -> Key {
    Key::derive_from(Sha256::digest(secret.as_bytes()).as_slice())
}

/// Build the full application router: two HTML pages behind the session
/// guard, the JSON auth API, static assets, and a JSON 404 for everything
/// else. CORS is wide open; any origin may call the JSON API.
pub fn portal_router(state: PortalState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/login", get(pages::login_page))
        .route("/home", get(pages::home))
        .route("/api/login", post(auth::api_login))
        .route("/api/check", get(auth::api_check))
        .route("/api/logout", post(auth::api_logout))
        .route("/api/test-db", get(auth::api_test_db))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(auth::fallback_404)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
