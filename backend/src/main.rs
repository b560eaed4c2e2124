//! Backend entry-point: reads configuration from the environment and runs
//! the HTTP server.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::outbound::persistence::PoolConfig;
use backend::server::{ServerConfig, StorageConfig, create_server};

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Pick the storage backend from the environment.
///
/// `DATABASE_URL` wins over `DATA_FILE` when both are set; with neither the
/// server runs on volatile in-memory fixtures.
fn load_storage() -> Option<StorageConfig> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Some(StorageConfig::Postgres(PoolConfig::new(url)));
    }
    if let Ok(path) = env::var("DATA_FILE") {
        return Some(StorageConfig::JsonFile(path.into()));
    }
    warn!("no DATABASE_URL or DATA_FILE configured; state will not survive restarts");
    None
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);
    if let Some(storage) = load_storage() {
        config = config.with_storage(storage);
    }

    info!(addr = %config.bind_addr(), "starting server");
    create_server(config).await?.await
}
