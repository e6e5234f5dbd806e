//! Application settings loaded via OrthoConfig.
//!
//! Values come from `KARTE_*` environment variables, CLI flags, or a config
//! file, with the defaults below filling the gaps.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::middleware::CorsOrigins;
use crate::outbound::auth::{JwtKey, JwtSettings};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_JWT_LEEWAY_SECS: u64 = 60;

/// Start-up configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KARTE")]
pub struct AppSettings {
    /// PostgreSQL connection string. Absent means no database.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply pending migrations before serving. Defaults to true.
    pub run_migrations: Option<bool>,
    /// Shared secret for HS256 bearer tokens.
    pub jwt_hs256_secret: Option<String>,
    /// PEM public key for RS256 bearer tokens. Takes precedence over the secret.
    pub jwt_rs256_public_key_pem: Option<String>,
    /// Required `iss` claim.
    pub jwt_issuer: Option<String>,
    /// Required `aud` claim.
    pub jwt_audience: Option<String>,
    /// Clock skew tolerated when checking `exp`.
    pub jwt_leeway_secs: Option<u64>,
    /// Serve from in-memory repositories when no database is configured.
    pub allow_fixture_mode: Option<bool>,
    /// Comma-separated browser origins. Unset or `*` admits any origin.
    pub cors_allowed_origins: Option<String>,
}

/// Rejected settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr {
        /// Rejected input.
        value: String,
        /// Parser message.
        message: String,
    },
    /// Neither a database nor fixture mode was configured.
    #[error("no database_url configured and fixture mode is disabled")]
    MissingDatabase,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool size.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Whether pending migrations run at start-up.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Whether the in-memory repositories may stand in for a database.
    pub fn allow_fixture_mode(&self) -> bool {
        self.allow_fixture_mode.unwrap_or(false)
    }

    /// Database URL, or `None` when fixture mode was explicitly allowed.
    pub fn database_url(&self) -> Result<Option<&str>, SettingsError> {
        match (self.database_url.as_deref(), self.allow_fixture_mode()) {
            (Some(url), _) if !url.trim().is_empty() => Ok(Some(url)),
            (_, true) => Ok(None),
            (_, false) => Err(SettingsError::MissingDatabase),
        }
    }

    /// Cross-origin policy for browser clients.
    pub fn cors_origins(&self) -> CorsOrigins {
        CorsOrigins::parse(self.cors_allowed_origins.as_deref())
    }

    /// Token verification settings, or `None` when no key is configured.
    pub fn jwt_settings(&self) -> Option<JwtSettings> {
        let key = match (&self.jwt_rs256_public_key_pem, &self.jwt_hs256_secret) {
            (Some(pem), _) => JwtKey::Rs256 {
                public_key_pem: pem.clone(),
            },
            (None, Some(secret)) => JwtKey::Hs256 {
                secret: secret.clone(),
            },
            (None, None) => return None,
        };
        Some(JwtSettings {
            key,
            issuer: self.jwt_issuer.clone(),
            audience: self.jwt_audience.clone(),
            leeway_secs: self.jwt_leeway_secs.unwrap_or(DEFAULT_JWT_LEEWAY_SECS),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing tests.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 11] = [
        "KARTE_DATABASE_URL",
        "KARTE_BIND_ADDR",
        "KARTE_DB_MAX_CONNECTIONS",
        "KARTE_RUN_MIGRATIONS",
        "KARTE_JWT_HS256_SECRET",
        "KARTE_JWT_RS256_PUBLIC_KEY_PEM",
        "KARTE_JWT_ISSUER",
        "KARTE_JWT_AUDIENCE",
        "KARTE_JWT_LEEWAY_SECS",
        "KARTE_ALLOW_FIXTURE_MODE",
        "KARTE_CORS_ALLOWED_ORIGINS",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("karte-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.db_max_connections(), 10);
        assert!(settings.run_migrations());
        assert!(!settings.allow_fixture_mode());
        assert_eq!(settings.cors_origins(), CorsOrigins::Any);
        assert!(settings.jwt_settings().is_none());
        assert_eq!(settings.database_url(), Err(SettingsError::MissingDatabase));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("KARTE_DATABASE_URL", "postgres://localhost/karte"),
            ("KARTE_BIND_ADDR", "127.0.0.1:9000"),
            ("KARTE_DB_MAX_CONNECTIONS", "4"),
            ("KARTE_JWT_HS256_SECRET", "s3cret"),
            ("KARTE_JWT_ISSUER", "https://issuer.example"),
            ("KARTE_JWT_LEEWAY_SECS", "5"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url().expect("configured"),
            Some("postgres://localhost/karte")
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(settings.bind_addr().expect("parses").port(), 9000);
        let jwt = settings.jwt_settings().expect("secret configured");
        assert!(matches!(jwt.key, JwtKey::Hs256 { .. }));
        assert_eq!(jwt.issuer.as_deref(), Some("https://issuer.example"));
        assert_eq!(jwt.leeway_secs, 5);
    }

    #[rstest]
    fn fixture_mode_allows_missing_database() {
        let _guard = lock_env(env_with(&[("KARTE_ALLOW_FIXTURE_MODE", "true")]));

        let settings = load_from_empty_args();
        assert!(settings.allow_fixture_mode());
        assert_eq!(settings.database_url(), Ok(None));
    }

    #[rstest]
    #[case("false", false)]
    #[case("true", true)]
    fn migrations_follow_the_environment(#[case] raw: &str, #[case] expected: bool) {
        let _guard = lock_env(env_with(&[
            ("KARTE_DATABASE_URL", "postgres://localhost/karte"),
            ("KARTE_RUN_MIGRATIONS", raw),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.run_migrations(), expected);
    }

    #[rstest]
    fn database_url_wins_over_fixture_mode() {
        let _guard = lock_env(env_with(&[
            ("KARTE_DATABASE_URL", "postgres://localhost/karte"),
            ("KARTE_ALLOW_FIXTURE_MODE", "true"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url(),
            Ok(Some("postgres://localhost/karte"))
        );
    }

    #[rstest]
    fn cors_origins_come_from_the_environment() {
        let _guard = lock_env(env_with(&[(
            "KARTE_CORS_ALLOWED_ORIGINS",
            "http://localhost:3000,https://karte.example",
        )]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.cors_origins(),
            CorsOrigins::List(vec![
                "http://localhost:3000".to_owned(),
                "https://karte.example".to_owned(),
            ])
        );
    }

    #[rstest]
    fn public_key_wins_over_secret() {
        let _guard = lock_env(env_with(&[
            ("KARTE_JWT_HS256_SECRET", "s3cret"),
            ("KARTE_JWT_RS256_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----"),
        ]));

        let settings = load_from_empty_args();
        let jwt = settings.jwt_settings().expect("key configured");
        assert!(matches!(jwt.key, JwtKey::Rs256 { .. }));
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env(env_with(&[("KARTE_BIND_ADDR", "not-an-addr")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }
}
