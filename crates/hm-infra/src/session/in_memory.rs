use tokio::sync::{Mutex, Notify};
use tracing::info;

use hm_core::ports::SessionBoundaryPort;
use hm_core::registration::RegistrationProfile;

/// Session boundary that keeps the handed-off profile in memory.
#[derive(Debug, Default)]
pub struct InMemorySessionBoundary {
    profile: Mutex<Option<RegistrationProfile>>,
    delivered: Notify,
}

impl InMemorySessionBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the delivered profile.
    pub async fn take(&self) -> Option<RegistrationProfile> {
        self.profile.lock().await.take()
    }

    pub async fn has_profile(&self) -> bool {
        self.profile.lock().await.is_some()
    }

    /// Resolves once a profile has been handed off.
    pub async fn wait_for_profile(&self) {
        loop {
            let notified = self.delivered.notified();
            if self.has_profile().await {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait::async_trait]
impl SessionBoundaryPort for InMemorySessionBoundary {
    async fn hand_off(&self, profile: RegistrationProfile) -> anyhow::Result<()> {
        info!(role = ?profile.role, "profile received by session boundary");
        *self.profile.lock().await = Some(profile);
        self.delivered.notify_waiters();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn take_empties_the_slot() {
        let boundary = InMemorySessionBoundary::new();
        boundary
            .hand_off(RegistrationProfile::default())
            .await
            .unwrap();

        assert!(boundary.take().await.is_some());
        assert!(boundary.take().await.is_none());
    }

    #[tokio::test]
    async fn waiter_wakes_on_hand_off() {
        let boundary = Arc::new(InMemorySessionBoundary::new());
        let waiter = {
            let boundary = Arc::clone(&boundary);
            tokio::spawn(async move { boundary.wait_for_profile().await })
        };

        boundary
            .hand_off(RegistrationProfile::default())
            .await
            .unwrap();

        waiter.await.unwrap();
        assert!(boundary.has_profile().await);
    }
}
