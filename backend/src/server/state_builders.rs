//! Builders wiring persistence adapters into the shared HTTP state.

use std::io;
use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    AccountRepository, ApplicationRepository, FixtureAccountRepository,
    FixtureApplicationRepository,
};
use crate::domain::{ApplicationsService, AuthService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselApplicationRepository, JsonStore,
};

use super::config::{ServerConfig, StorageConfig};

/// Select repository implementations for the configured storage backend.
///
/// Falls back to in-memory fixtures when no backend is configured, matching
/// the behaviour integration tests rely on.
async fn build_repositories(
    config: &ServerConfig,
) -> io::Result<(Arc<dyn AccountRepository>, Arc<dyn ApplicationRepository>)> {
    match &config.storage {
        Some(StorageConfig::Postgres(pool_config)) => {
            let pool = DbPool::new(pool_config.clone())
                .await
                .map_err(|err| io::Error::other(format!("database pool setup failed: {err}")))?;
            Ok((
                Arc::new(DieselAccountRepository::new(pool.clone())),
                Arc::new(DieselApplicationRepository::new(pool)),
            ))
        }
        Some(StorageConfig::JsonFile(path)) => {
            let store = Arc::new(
                JsonStore::open(path)
                    .map_err(|err| io::Error::other(format!("data file setup failed: {err}")))?,
            );
            Ok((
                store.clone() as Arc<dyn AccountRepository>,
                store as Arc<dyn ApplicationRepository>,
            ))
        }
        None => Ok((
            Arc::new(FixtureAccountRepository::default()),
            Arc::new(FixtureApplicationRepository::default()),
        )),
    }
}

/// Build the shared HTTP state from the configured storage backend.
pub(super) async fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let (accounts, applications) = build_repositories(config).await?;
    let auth = Arc::new(AuthService::new(accounts));
    let applications = Arc::new(ApplicationsService::new(
        applications,
        Arc::new(mockable::DefaultClock),
    ));
    Ok(web::Data::new(HttpState::new(auth, applications)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use tempfile::tempdir;

    fn config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("valid bind address"),
        )
    }

    #[tokio::test]
    async fn no_storage_selects_fixtures() {
        let (accounts, _) = build_repositories(&config()).await.expect("build");
        let email = crate::domain::account::Email::new("nobody@example.com").expect("valid email");
        assert_eq!(accounts.find_by_email(&email).await, Ok(None));
    }

    #[tokio::test]
    async fn json_file_storage_creates_the_store() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("tracker.json");
        let config = config().with_storage(StorageConfig::JsonFile(path.clone()));
        build_http_state(&config).await.expect("build state");
    }
}
