// SoftArt AI HUB — Service configuration
//
// Read from TOML with serde defaults for every field, then overridden by
// AIHUB_* environment variables. A missing default config file is not an
// error; a missing file that was asked for explicitly is.

use aihub_core::store::{self, APP_DIR};
use aihub_core::{HubError, HubResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "AIHUB_CONFIG";
pub const BIND_ENV: &str = "AIHUB_BIND";
pub const PORT_ENV: &str = "AIHUB_PORT";
pub const DB_ENV: &str = "AIHUB_DB";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Address to bind — "127.0.0.1" (localhost) or "0.0.0.0" (all interfaces)
    #[serde(default = "default_bind")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// SQLite file. Defaults to `<data_dir>/softart-hub/aihub.db`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Header the upstream SSO proxy uses to pass the signed-in user's email.
    #[serde(default = "default_user_header")]
    pub user_header: String,
    /// Allowed browser origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// When set, this email is created (or promoted) as Owner at startup.
    #[serde(default)]
    pub bootstrap_owner_email: Option<String>,
    #[serde(default)]
    pub bootstrap_owner_name: Option<String>,
}

fn default_bind() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3950 }
fn default_user_header() -> String { "x-user-email".into() }

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            bind_address: default_bind(),
            port: default_port(),
            database_path: None,
            user_header: default_user_header(),
            cors_origins: Vec::new(),
            bootstrap_owner_email: None,
            bootstrap_owner_name: None,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

pub fn default_database_path() -> PathBuf {
    store::default_db_path()
}

impl HubConfig {
    /// Load from `explicit`, else `$AIHUB_CONFIG`, else the per-user default
    /// path, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> HubResult<Self> {
        let from_env = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let required = explicit.is_some() || from_env.is_some();
        let path = explicit
            .map(Path::to_path_buf)
            .or(from_env)
            .unwrap_or_else(default_config_path);

        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => {
                info!("[config] Loaded {:?}", path);
                Self::from_toml(&text)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                info!("[config] No config at {:?}, using defaults", path);
                HubConfig::default()
            }
            Err(e) => {
                return Err(HubError::Config(format!("cannot read {}: {e}", path.display())));
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> HubResult<Self> {
        let mut config: HubConfig =
            toml::from_str(text).map_err(|e| HubError::Config(e.to_string()))?;
        config.normalize()?;
        Ok(config)
    }

    /// Apply AIHUB_BIND / AIHUB_PORT / AIHUB_DB from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> HubResult<()> {
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind_address = bind;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port.trim().parse().map_err(|e| {
                warn!("[config] Invalid {PORT_ENV} value '{port}': {e}");
                HubError::Config(format!("{PORT_ENV} must be a port number, got '{port}'"))
            })?;
        }
        if let Some(db) = lookup(DB_ENV) {
            self.database_path = Some(PathBuf::from(db));
        }
        self.normalize()
    }

    fn normalize(&mut self) -> HubResult<()> {
        self.user_header = self.user_header.trim().to_ascii_lowercase();
        if self.user_header.is_empty() {
            return Err(HubError::Config("user_header must not be empty".into()));
        }
        if self.bind_address.trim().is_empty() {
            return Err(HubError::Config("bind_address must not be empty".into()));
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(default_database_path)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_toml_gives_defaults() {
        let c = HubConfig::from_toml("").unwrap();
        assert_eq!(c.bind_address, "127.0.0.1");
        assert_eq!(c.port, 3950);
        assert_eq!(c.user_header, "x-user-email");
        assert!(c.cors_origins.is_empty());
        assert!(c.database_path.is_none());
        assert_eq!(c.database_path(), store::default_db_path());
    }

    #[test]
    fn toml_fields_parse() {
        let c = HubConfig::from_toml(
            r#"
            port = 8080
            user_header = "X-Forwarded-Email"
            database_path = "/var/lib/aihub/hub.db"
            cors_origins = ["https://hub.softart.io"]
            bootstrap_owner_email = "admin@softart.io"
            "#,
        )
        .unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.user_header, "x-forwarded-email");
        assert_eq!(c.database_path(), PathBuf::from("/var/lib/aihub/hub.db"));
        assert_eq!(c.cors_origins, vec!["https://hub.softart.io"]);
        assert_eq!(c.bootstrap_owner_email.as_deref(), Some("admin@softart.io"));
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(HubConfig::from_toml("port = \"x\""), Err(HubError::Config(_))));
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> =
            [(PORT_ENV, "9000"), (BIND_ENV, "0.0.0.0"), (DB_ENV, "/tmp/x.db")].into();
        let mut c = HubConfig::default();
        c.apply_overrides(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(c.addr(), "0.0.0.0:9000");
        assert_eq!(c.database_path(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn invalid_port_override_rejected() {
        let mut c = HubConfig::default();
        let err = c
            .apply_overrides(|k| (k == PORT_ENV).then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, HubError::Config(_)));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let err = HubConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, HubError::Config(_)));
    }
}
