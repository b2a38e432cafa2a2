//! Countdown identifiers.
//!
//! The registration flow owns two countdowns: the splash dwell and the OTP resend
//! cool-down. Each start gets a fresh epoch, so a tick can always be matched against
//! the countdown the active step currently owns.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountdownKind {
    /// Splash auto-advance.
    Splash,
    /// OTP resend cool-down.
    OtpResend,
}

/// Identity of one countdown run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountdownId {
    pub kind: CountdownKind,
    pub epoch: u64,
}

impl fmt::Display for CountdownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.epoch)
    }
}

/// One elapsed period of a running countdown.
///
/// `remaining` counts the periods still to come; zero means the countdown fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownTick {
    pub id: CountdownId,
    pub remaining: u32,
}

impl CountdownTick {
    pub fn is_final(&self) -> bool {
        self.remaining == 0
    }
}
