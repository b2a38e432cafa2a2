use serde::{Deserialize, Serialize};

use super::{DocumentRef, Language, Role, VerificationType};
use crate::countdown::CountdownTick;

/// Events that drive the registration flow.
///
/// User actions come from the step screens; `CountdownTick` comes from the countdown
/// driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationEvent {
    // Entry
    Launch,
    CountdownTick(CountdownTick),

    // Onboarding
    NextSlide,
    SkipOnboarding,

    // Language
    SelectLanguage(Language),
    ConfirmLanguage,

    // Personal details
    EditName(String),
    EditPhone(String),
    EditEmail(String),
    SubmitUserDetails,

    // National ID
    EditNationalIdGroup { index: usize, value: String },
    SubmitNationalId,

    // One-time code
    EditOtpDigit { index: usize, value: String },
    PasteOtp(String),
    VerifyOtp,
    ResendOtp,

    // Role
    SelectRole(Role),
    ConfirmRole,

    // Verification
    /// Picked documents for the verification of `verification_type`. Ignored once
    /// that verification is no longer on screen.
    AttachDocuments {
        verification_type: VerificationType,
        documents: Vec<DocumentRef>,
    },
    RemoveDocument { index: usize },
    SubmitVerification,
    SkipVerification,

    // Pledge
    SetPledgeAcknowledged(bool),
    AcceptPledge,

    // Control
    Back,
    Abandon,
}

impl RegistrationEvent {
    /// Event name without its payload, safe to log.
    pub fn name(&self) -> &'static str {
        match self {
            RegistrationEvent::Launch => "Launch",
            RegistrationEvent::CountdownTick(_) => "CountdownTick",
            RegistrationEvent::NextSlide => "NextSlide",
            RegistrationEvent::SkipOnboarding => "SkipOnboarding",
            RegistrationEvent::SelectLanguage(_) => "SelectLanguage",
            RegistrationEvent::ConfirmLanguage => "ConfirmLanguage",
            RegistrationEvent::EditName(_) => "EditName",
            RegistrationEvent::EditPhone(_) => "EditPhone",
            RegistrationEvent::EditEmail(_) => "EditEmail",
            RegistrationEvent::SubmitUserDetails => "SubmitUserDetails",
            RegistrationEvent::EditNationalIdGroup { .. } => "EditNationalIdGroup",
            RegistrationEvent::SubmitNationalId => "SubmitNationalId",
            RegistrationEvent::EditOtpDigit { .. } => "EditOtpDigit",
            RegistrationEvent::PasteOtp(_) => "PasteOtp",
            RegistrationEvent::VerifyOtp => "VerifyOtp",
            RegistrationEvent::ResendOtp => "ResendOtp",
            RegistrationEvent::SelectRole(_) => "SelectRole",
            RegistrationEvent::ConfirmRole => "ConfirmRole",
            RegistrationEvent::AttachDocuments { .. } => "AttachDocuments",
            RegistrationEvent::RemoveDocument { .. } => "RemoveDocument",
            RegistrationEvent::SubmitVerification => "SubmitVerification",
            RegistrationEvent::SkipVerification => "SkipVerification",
            RegistrationEvent::SetPledgeAcknowledged(_) => "SetPledgeAcknowledged",
            RegistrationEvent::AcceptPledge => "AcceptPledge",
            RegistrationEvent::Back => "Back",
            RegistrationEvent::Abandon => "Abandon",
        }
    }
}
