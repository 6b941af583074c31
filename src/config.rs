use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;

/// Development fallback so a bare checkout still runs; startup warns
/// whenever it is in use.
const DEFAULT_SESSION_SECRET: &str = "dev-secret-key-change-in-production";

/// Process configuration, read from the environment after the caller has
/// loaded `.env` (see `main`). `DATABASE_URL` is the only required value;
/// its scheme (`postgres:` or `sqlite:`) selects the database backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_session_secret")]
    pub session_secret: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new().merge(Env::raw()).extract()
    }

    /// True while the baked-in development secret is still in place.
    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            bind_addr: default_bind_addr(),
            session_secret: default_session_secret(),
            static_dir: default_static_dir(),
            loglevel: default_loglevel(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_session_secret() -> String {
    DEFAULT_SESSION_SECRET.to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_everything_but_the_database_url() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite:portal.db");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.database_url, "sqlite:portal.db");
            assert_eq!(cfg.bind_addr, "0.0.0.0:5000");
            assert_eq!(cfg.static_dir, "static");
            assert_eq!(cfg.loglevel, "info");
            assert!(cfg.uses_default_secret());
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_the_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://portal@db/portal");
            jail.set_env("BIND_ADDR", "127.0.0.1:8080");
            jail.set_env("SESSION_SECRET", "something-long-and-random");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
            assert!(!cfg.uses_default_secret());
            Ok(())
        });
    }
}
