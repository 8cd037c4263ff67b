use std::{fmt, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode, header::AUTHORIZATION};

use crate::{config, types::Token};

#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    Exchange(StatusCode),
    Http(reqwest::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => {
                write!(f, "client id or client secret is missing")
            }
            AuthError::Exchange(status) => {
                write!(f, "token exchange returned status {}", status)
            }
            AuthError::Http(e) => write!(f, "token exchange failed: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Http(err)
    }
}

/// Performs the client-credentials token exchange with Spotify.
///
/// POSTs a form-encoded `grant_type=client_credentials` request carrying a
/// Basic authorization header built from the base64-encoded
/// `client_id:client_secret` pair. The request is bounded by a 5 second
/// timeout.
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Token)` - Fresh access token with its type and lifetime in seconds
/// - `Err(AuthError)` - Missing client identity, non-success exchange
///   status, or a network/timeout error
///
/// # Error Handling
///
/// Authentication failures are fatal for the whole run; there is no retry
/// at this layer. Callers hold the result behind
/// [`crate::management::TokenManager`], which decides when a new exchange
/// is due.
pub async fn request_token() -> Result<Token, AuthError> {
    let client_id = config::spotify_client_id();
    let client_secret = config::spotify_client_secret();
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let basic = STANDARD.encode(format!("{}:{}", client_id, client_secret));

    let client = Client::new();
    let response = client
        .post(&config::spotify_token_url())
        .header(AUTHORIZATION, format!("Basic {}", basic))
        .form(&[("grant_type", "client_credentials")])
        .timeout(Duration::from_secs(5))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AuthError::Exchange(response.status()));
    }

    let token = response.json::<Token>().await?;
    Ok(token)
}
