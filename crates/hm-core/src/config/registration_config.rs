use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::registration::RegistrationPolicy;

/// `[registration]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Splash dwell before onboarding, in milliseconds.
    pub splash_dwell_ms: u64,
    /// Seconds before a new one-time code may be requested.
    pub otp_resend_cooldown_secs: u32,
    /// Prefix prepended to the local phone number when a code is sent.
    pub country_code: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        let policy = RegistrationPolicy::default();
        Self {
            splash_dwell_ms: u64::try_from(policy.splash_dwell.as_millis()).unwrap_or(u64::MAX),
            otp_resend_cooldown_secs: policy.otp_resend_cooldown_secs,
            country_code: "+91".to_string(),
        }
    }
}

impl RegistrationConfig {
    pub fn policy(&self) -> RegistrationPolicy {
        RegistrationPolicy {
            splash_dwell: Duration::from_millis(self.splash_dwell_ms),
            otp_resend_cooldown_secs: self.otp_resend_cooldown_secs,
        }
    }
}
