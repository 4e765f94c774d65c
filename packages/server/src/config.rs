//! Server configuration read from the environment.

use std::path::PathBuf;

use canvass_map_graph_models::OverlapPolicy;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8080;

/// Settings needed to start the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// `SQLite` store location (`DATABASE_PATH`).
    pub database_path: PathBuf,
    /// How overlapping areas share locations (`OVERLAP_POLICY`).
    pub overlap_policy: OverlapPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(canvass_map_database::db::DEFAULT_DB_PATH),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from environment variables, using defaults
    /// for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind_addr = lookup("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let database_path = lookup("DATABASE_PATH").map_or(defaults.database_path, PathBuf::from);
        let overlap_policy = lookup("OVERLAP_POLICY").map_or(defaults.overlap_policy, |value| {
            value.trim().parse().unwrap_or_else(|_| {
                log::warn!("Unknown OVERLAP_POLICY {value:?}, expected \"all\" or \"first\"");
                defaults.overlap_policy
            })
        });

        Self {
            bind_addr,
            port,
            database_path,
            overlap_policy,
        }
    }
}
