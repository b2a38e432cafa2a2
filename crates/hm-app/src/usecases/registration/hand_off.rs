use std::sync::Arc;

use anyhow::bail;
use hm_core::ports::SessionBoundaryPort;
use hm_core::registration::RegistrationProfile;
use tracing::info;

/// Use case for handing a finished registration to the main application.
///
/// The profile is consumed: nothing of it stays in the registration flow.
pub struct HandOffProfile {
    session_boundary: Arc<dyn SessionBoundaryPort>,
}

impl HandOffProfile {
    pub fn new(session_boundary: Arc<dyn SessionBoundaryPort>) -> Self {
        Self { session_boundary }
    }

    pub async fn execute(&self, profile: RegistrationProfile) -> anyhow::Result<()> {
        let missing = profile.missing_fields();
        if !missing.is_empty() {
            bail!("refusing to hand off incomplete profile, missing {missing:?}");
        }

        info!(
            role = ?profile.role,
            verification_type = %profile.verification_type,
            documents = profile.verification_documents.len(),
            "handing registration profile to session"
        );
        self.session_boundary.hand_off(profile).await
    }
}
