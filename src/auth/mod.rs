use async_trait::async_trait;
use thiserror::Error;

pub mod admin_client;

pub use admin_client::AuthAdminClient;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("auth provider request failed")]
    Transport(#[from] reqwest::Error),
    #[error("auth provider rejected the request with status {0}")]
    Rejected(u16),
}

/// Admin-side view of the external auth provider. Account deletion must
/// revoke the provider-side identity as well as the local row; callers
/// treat a failure on either side as the whole deletion failing.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn revoke_identity(&self, auth_id: &str) -> Result<(), IdentityError>;
}
