use std::fmt;

use serde::{Deserialize, Serialize};

use super::forms::{NationalIdForm, OtpForm, UserDetailsForm, ONBOARDING_SLIDES};
use super::{DocumentRef, Language, RegistrationError, RegistrationProfile, Role, VerificationType};
use crate::countdown::CountdownId;

/// Step identity without step-local data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Splash,
    Onboarding,
    Language,
    UserDetails,
    NationalId,
    Otp,
    Role,
    Verification,
    Pledge,
    Main,
}

impl StepKind {
    /// Steps in forward order.
    pub const ALL: [StepKind; 10] = [
        StepKind::Splash,
        StepKind::Onboarding,
        StepKind::Language,
        StepKind::UserDetails,
        StepKind::NationalId,
        StepKind::Otp,
        StepKind::Role,
        StepKind::Verification,
        StepKind::Pledge,
        StepKind::Main,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Splash => "splash",
            StepKind::Onboarding => "onboarding",
            StepKind::Language => "language",
            StepKind::UserDetails => "user_details",
            StepKind::NationalId => "national_id",
            StepKind::Otp => "otp",
            StepKind::Role => "role",
            StepKind::Verification => "verification",
            StepKind::Pledge => "pledge",
            StepKind::Main => "main",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OTP resend cool-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendCooldown {
    /// Countdown currently running, `None` once it has fired.
    pub countdown: Option<CountdownId>,
    pub remaining_secs: u32,
}

impl ResendCooldown {
    pub fn can_resend(&self) -> bool {
        self.remaining_secs == 0
    }
}

/// Registration step with its step-local data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStep {
    /// Non-interactive entry screen.
    Splash { countdown: Option<CountdownId> },
    /// Informational carousel.
    Onboarding { slide: usize },
    Language { selected: Option<Language> },
    UserDetails {
        form: UserDetailsForm,
        errors: Vec<RegistrationError>,
    },
    NationalId {
        form: NationalIdForm,
        error: Option<RegistrationError>,
    },
    Otp {
        form: OtpForm,
        resend: ResendCooldown,
        error: Option<RegistrationError>,
    },
    Role { selected: Option<Role> },
    /// Document upload; only reachable for roles that need verification.
    Verification {
        verification_type: VerificationType,
        documents: Vec<DocumentRef>,
    },
    Pledge {
        acknowledged: bool,
        error: Option<RegistrationError>,
    },
    /// Registration finished; the main application owns the user from here.
    Main,
}

impl RegistrationStep {
    pub fn kind(&self) -> StepKind {
        match self {
            RegistrationStep::Splash { .. } => StepKind::Splash,
            RegistrationStep::Onboarding { .. } => StepKind::Onboarding,
            RegistrationStep::Language { .. } => StepKind::Language,
            RegistrationStep::UserDetails { .. } => StepKind::UserDetails,
            RegistrationStep::NationalId { .. } => StepKind::NationalId,
            RegistrationStep::Otp { .. } => StepKind::Otp,
            RegistrationStep::Role { .. } => StepKind::Role,
            RegistrationStep::Verification { .. } => StepKind::Verification,
            RegistrationStep::Pledge { .. } => StepKind::Pledge,
            RegistrationStep::Main => StepKind::Main,
        }
    }

    /// Whether the step's primary advance action is enabled.
    ///
    /// Incomplete input disables the action rather than producing an error. The
    /// verification skip is not covered here: it is always available.
    pub fn can_advance(&self) -> bool {
        match self {
            RegistrationStep::Splash { .. } | RegistrationStep::Main => false,
            RegistrationStep::Onboarding { slide } => *slide < ONBOARDING_SLIDES.len(),
            RegistrationStep::Language { selected } => selected.is_some(),
            RegistrationStep::UserDetails { form, .. } => form.can_submit(),
            RegistrationStep::NationalId { form, .. } => form.can_submit(),
            RegistrationStep::Otp { form, .. } => form.check().is_valid(),
            RegistrationStep::Role { selected } => selected.is_some(),
            RegistrationStep::Verification { documents, .. } => !documents.is_empty(),
            RegistrationStep::Pledge { acknowledged, .. } => *acknowledged,
        }
    }

    /// Countdown owned by this step, if one is running.
    pub fn owned_countdown(&self) -> Option<CountdownId> {
        match self {
            RegistrationStep::Splash { countdown } => *countdown,
            RegistrationStep::Otp { resend, .. } => resend.countdown,
            _ => None,
        }
    }
}

/// Full registration state: the active step plus the accumulated profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationState {
    pub step: RegistrationStep,
    pub profile: RegistrationProfile,
    /// Epoch of the last countdown started; every start increments it.
    pub countdown_epoch: u64,
}

impl RegistrationState {
    /// Fresh state for a first launch with no session.
    pub fn new() -> Self {
        Self {
            step: RegistrationStep::Splash { countdown: None },
            profile: RegistrationProfile::default(),
            countdown_epoch: 0,
        }
    }

    pub fn kind(&self) -> StepKind {
        self.step.kind()
    }

    pub fn can_advance(&self) -> bool {
        self.step.can_advance()
    }

    pub fn is_finished(&self) -> bool {
        self.kind() == StepKind::Main
    }
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self::new()
    }
}
