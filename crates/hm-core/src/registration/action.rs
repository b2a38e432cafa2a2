use serde::{Deserialize, Serialize};

use super::{NationalId, RegistrationProfile};
use crate::countdown::CountdownId;

/// Side-effects produced by state transitions, executed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationAction {
    /// Start a countdown of `ticks` periods; a tick is reported after each period.
    StartCountdown {
        id: CountdownId,
        ticks: u32,
        period_ms: u64,
    },

    /// Cancel a countdown owned by the step being left.
    CancelCountdown { id: CountdownId },

    /// Ask the OTP collaborator to deliver a code.
    SendOtp {
        phone: String,
        national_id: NationalId,
    },

    /// Hand the completed profile to the session boundary.
    HandOffProfile { profile: RegistrationProfile },
}
