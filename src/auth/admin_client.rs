use async_trait::async_trait;

use crate::auth::{IdentityError, IdentityProvider};

/// Client for the hosted auth provider's admin API. Only the identity
/// revocation endpoint is used here; signup and session issuance happen
/// directly between clients and the provider.
#[derive(Debug, Clone)]
pub struct AuthAdminClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl AuthAdminClient {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            service_key: service_key.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for AuthAdminClient {
    async fn revoke_identity(&self, auth_id: &str) -> Result<(), IdentityError> {
        let url = format!("{}/auth/v1/admin/users/{auth_id}", self.base_url);
        let response = self
            .http
            .delete(url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(IdentityError::Rejected(response.status().as_u16()))
        }
    }
}
