use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    spotify::auth::{self, AuthError},
    types::Credential,
};

pub struct TokenManager {
    slot: Mutex<Option<Credential>>,
}

impl TokenManager {
    pub fn new() -> Self {
        TokenManager {
            slot: Mutex::new(None),
        }
    }

    pub fn with_credential(credential: Credential) -> Self {
        TokenManager {
            slot: Mutex::new(Some(credential)),
        }
    }

    pub async fn acquire(&self) -> Result<Credential, AuthError> {
        // The exchange runs under the lock so two callers can never race two
        // refreshes; a caller that finds a valid credential reuses it.
        let mut slot = self.slot.lock().await;
        let now = Utc::now().timestamp_millis() as u64;

        if let Some(credential) = slot.as_ref() {
            if credential.is_valid(now) {
                return Ok(credential.clone());
            }
        }

        let token = auth::request_token().await?;
        let credential = Credential::from_token(token, now);
        *slot = Some(credential.clone());

        Ok(credential)
    }
}
