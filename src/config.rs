use actix_web::cookie::Key;

/// Runtime settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    /// Organisation name used on report pages and in report file names.
    pub report_context: String,
    pub admin_password: String,
    session_key: Option<String>,
}

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/rollbook";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Self {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL").unwrap_or_else(|| {
            log::warn!("No DATABASE_URL set, using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let db_max_connections = non_empty("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(8);
        let report_context =
            non_empty("REPORT_CONTEXT").unwrap_or_else(|| "Community".to_string());
        let admin_password = non_empty("ADMIN_PASSWORD").unwrap_or_else(|| {
            log::warn!("No ADMIN_PASSWORD set, the seeded admin account uses the default password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        Self {
            database_url,
            bind_addr,
            db_max_connections,
            report_context,
            admin_password,
            session_key: non_empty("SESSION_KEY"),
        }
    }

    /// Cookie signing key. SESSION_KEY must be at least 64 bytes to be used.
    pub fn session_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}
