//! Server-rendered pages, compiled in from `templates/` by askama.

use askama::Template;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate;

/// Greets the logged-in user by name; askama escapes the value.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub username: String,
}
