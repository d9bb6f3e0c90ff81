use crate::api::{ApiClient, AuthEvent};
use crate::models::{Credentials, LoginResponse, User};

/// Login state on top of an `ApiClient` and its token store.
///
/// The token itself lives in the client's store; the session only remembers
/// who logged in during this run.
pub struct Session {
    client: ApiClient,
    user: Option<User>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self { client, user: None }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Log in and persist the returned token.
    pub async fn login(&mut self, credentials: &Credentials) -> anyhow::Result<LoginResponse> {
        let response = self.client.auth().login(credentials).await?;
        self.client.token_store().set(&response.access_token)?;
        self.user = response.user.clone();
        self.client.publish(AuthEvent::SignedIn);
        Ok(response)
    }

    /// Forget the stored token.
    pub fn logout(&mut self) {
        self.client.token_store().remove();
        self.user = None;
        self.client.publish(AuthEvent::SignedOut);
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.token_store().get().is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
