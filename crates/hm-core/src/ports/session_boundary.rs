use async_trait::async_trait;

use crate::registration::RegistrationProfile;

/// Receives the completed profile once the pledge is accepted.
#[async_trait]
pub trait SessionBoundaryPort: Send + Sync {
    async fn hand_off(&self, profile: RegistrationProfile) -> anyhow::Result<()>;
}
