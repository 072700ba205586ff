//! Login and logout.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use sapore_core::validation::validate_email;
use sapore_core::ValidationError;

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::session::CurrentUser;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "accessToken", alias = "jwt")]
    token: String,
}

impl ApiClient {
    /// Exchanges credentials for a token and stores it in the session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<CurrentUser> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            }
            .into());
        }

        let response: LoginResponse = self
            .send_json(
                Method::POST,
                "/users/login",
                &LoginRequest {
                    email: email.trim(),
                    password,
                },
            )
            .await?;

        let user = self.session().set_token(&response.token)?;
        info!(user = %user.display_name(), "Logged in");
        Ok(user)
    }

    /// Forgets the stored token. The backend keeps no session to end.
    pub fn logout(&self) -> ClientResult<()> {
        self.session().clear()
    }

    /// The logged-in user, or [`ClientError::NotLoggedIn`].
    pub fn require_user(&self) -> ClientResult<CurrentUser> {
        self.session().current_user()?.ok_or(ClientError::NotLoggedIn)
    }
}
