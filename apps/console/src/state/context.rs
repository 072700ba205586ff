//! # Application Context
//!
//! Built from the loaded configuration at startup. Tests build one against a
//! mock backend with [`AppContext::new`] and an in-memory session.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use sapore_client::{ApiClient, ClientConfig, ClientError, CurrentUser, Debouncer, PricingBoard, Session};

use crate::error::CommandResult;

#[derive(Debug)]
pub struct AppContext {
    pub config: ClientConfig,
    pub client: ApiClient,
    pub board: Arc<PricingBoard>,
    pub search: Debouncer,
}

impl AppContext {
    pub fn new(config: ClientConfig, session: Session) -> CommandResult<Self> {
        let client = ApiClient::new(&config, session)?;
        let search = Debouncer::new(config.search_debounce());

        debug!(
            base_url = %client.base_url(),
            debounce_ms = config.search.debounce_ms,
            "Application context ready"
        );

        Ok(AppContext {
            config,
            client,
            board: Arc::new(PricingBoard::new()),
            search,
        })
    }

    /// Opens the session file named by the config; falls back to an
    /// in-memory session when no data directory exists.
    pub fn from_config(config: ClientConfig) -> CommandResult<Self> {
        let session = match config.token_path() {
            Some(path) => {
                info!(?path, "Using session file");
                Session::file(path)?
            }
            None => {
                info!("No data directory available, session will not persist");
                Session::in_memory()
            }
        };
        Self::new(config, session)
    }

    /// The logged-in user. An expired token is dropped and reported as a
    /// missing login.
    pub fn require_user(&self) -> CommandResult<CurrentUser> {
        let user = self.client.require_user()?;
        if user.is_expired(Utc::now()) {
            info!(user = %user.display_name(), "Stored token has expired");
            self.client.logout()?;
            return Err(ClientError::NotLoggedIn.into());
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_require_user_without_login() {
        let ctx = AppContext::new(ClientConfig::default(), Session::in_memory()).unwrap();
        let err = ctx.require_user().unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionExpired);
    }

    #[test]
    fn test_file_session_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.session.token_path = Some(dir.path().join("session.json"));

        let ctx = AppContext::from_config(config).unwrap();
        assert!(ctx.client.session().token().unwrap().is_none());
    }

    #[test]
    fn test_debounce_follows_config() {
        let mut config = ClientConfig::default();
        config.search.debounce_ms = 50;
        let ctx = AppContext::new(config, Session::in_memory()).unwrap();
        assert_eq!(ctx.search.delay().as_millis(), 50);
    }
}
