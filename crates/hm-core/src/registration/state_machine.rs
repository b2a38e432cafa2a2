//! Registration state machine.
//!
//! Defines a pure state transition function for the registration flow. Every branch,
//! including the donor skip and the verification skip, is one match arm; anything an
//! arm does not accept leaves the state untouched.

use std::time::Duration;

use crate::countdown::{CountdownId, CountdownKind};
use crate::validation::FieldCheck;

use super::forms::{NationalIdForm, OtpForm, UserDetailsForm, ONBOARDING_SLIDES};
use super::navigation;
use super::state::ResendCooldown;
use super::{
    ProfileField, RegistrationAction, RegistrationError, RegistrationEvent, RegistrationProfile,
    RegistrationState, RegistrationStep, StepKind,
};

/// Timing policy of the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPolicy {
    /// Time the splash screen stays up before onboarding.
    pub splash_dwell: Duration,
    /// Seconds before a new code may be requested.
    pub otp_resend_cooldown_secs: u32,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            splash_dwell: Duration::from_millis(2000),
            otp_resend_cooldown_secs: 30,
        }
    }
}

const RESEND_TICK_MS: u64 = 1000;

type Transition = (RegistrationState, Vec<RegistrationAction>);

/// Pure registration state machine.
///
/// 纯状态机：不包含副作用。
#[derive(Debug, Clone, Default)]
pub struct RegistrationStateMachine {
    policy: RegistrationPolicy,
}

impl RegistrationStateMachine {
    pub fn new(policy: RegistrationPolicy) -> Self {
        Self { policy }
    }

    pub fn transition(&self, state: RegistrationState, event: RegistrationEvent) -> Transition {
        let RegistrationState {
            step,
            mut profile,
            mut countdown_epoch,
        } = state;

        match (step, event) {
            // Splash
            (RegistrationStep::Splash { countdown: None }, RegistrationEvent::Launch) => {
                let id = next_countdown(&mut countdown_epoch, CountdownKind::Splash);
                let period_ms = u64::try_from(self.policy.splash_dwell.as_millis()).unwrap_or(u64::MAX);
                (
                    RegistrationState {
                        step: RegistrationStep::Splash {
                            countdown: Some(id),
                        },
                        profile,
                        countdown_epoch,
                    },
                    vec![RegistrationAction::StartCountdown {
                        id,
                        ticks: 1,
                        period_ms,
                    }],
                )
            }
            (
                RegistrationStep::Splash {
                    countdown: Some(id),
                },
                RegistrationEvent::CountdownTick(tick),
            ) if tick.id == id && tick.is_final() => self.move_to(
                RegistrationStep::Splash { countdown: None },
                StepKind::Onboarding,
                profile,
                countdown_epoch,
            ),

            // Onboarding
            (RegistrationStep::Onboarding { slide }, RegistrationEvent::NextSlide) => {
                if slide + 1 < ONBOARDING_SLIDES.len() {
                    stay(
                        RegistrationStep::Onboarding { slide: slide + 1 },
                        profile,
                        countdown_epoch,
                    )
                } else {
                    self.move_to(
                        RegistrationStep::Onboarding { slide },
                        StepKind::Language,
                        profile,
                        countdown_epoch,
                    )
                }
            }
            (step @ RegistrationStep::Onboarding { .. }, RegistrationEvent::SkipOnboarding) => {
                self.move_to(step, StepKind::Language, profile, countdown_epoch)
            }

            // Language
            (RegistrationStep::Language { .. }, RegistrationEvent::SelectLanguage(language)) => {
                stay(
                    RegistrationStep::Language {
                        selected: Some(language),
                    },
                    profile,
                    countdown_epoch,
                )
            }
            (
                step @ RegistrationStep::Language {
                    selected: Some(language),
                },
                RegistrationEvent::ConfirmLanguage,
            ) => {
                profile.language = Some(language);
                self.move_to(step, StepKind::UserDetails, profile, countdown_epoch)
            }

            // Personal details
            (
                RegistrationStep::UserDetails {
                    mut form,
                    mut errors,
                },
                RegistrationEvent::EditName(value),
            ) => {
                form.set_name(&value);
                errors.retain(|err| err.field() != Some(ProfileField::Name));
                stay(
                    RegistrationStep::UserDetails { form, errors },
                    profile,
                    countdown_epoch,
                )
            }
            (
                RegistrationStep::UserDetails {
                    mut form,
                    mut errors,
                },
                RegistrationEvent::EditPhone(value),
            ) => {
                if form.set_phone(&value) {
                    errors.retain(|err| err.field() != Some(ProfileField::Phone));
                }
                stay(
                    RegistrationStep::UserDetails { form, errors },
                    profile,
                    countdown_epoch,
                )
            }
            (
                RegistrationStep::UserDetails {
                    mut form,
                    mut errors,
                },
                RegistrationEvent::EditEmail(value),
            ) => {
                form.set_email(&value);
                errors.retain(|err| err.field() != Some(ProfileField::Email));
                stay(
                    RegistrationStep::UserDetails { form, errors },
                    profile,
                    countdown_epoch,
                )
            }
            (RegistrationStep::UserDetails { form, .. }, RegistrationEvent::SubmitUserDetails) => {
                let check = form.check();
                if !check.is_valid() {
                    let errors = [
                        (ProfileField::Name, check.name),
                        (ProfileField::Phone, check.phone),
                        (ProfileField::Email, check.email),
                    ]
                    .into_iter()
                    .filter_map(|(field, check)| match check {
                        FieldCheck::Invalid(issue) => Some(RegistrationError::invalid(field, issue)),
                        FieldCheck::Valid | FieldCheck::Incomplete(_) => None,
                    })
                    .collect();
                    return stay(
                        RegistrationStep::UserDetails { form, errors },
                        profile,
                        countdown_epoch,
                    );
                }

                profile.name = Some(form.name.trim().to_string());
                profile.phone = Some(form.phone.clone());
                let email = form.email.trim();
                profile.email = (!email.is_empty()).then(|| email.to_string());
                self.move_to(
                    RegistrationStep::UserDetails {
                        form,
                        errors: Vec::new(),
                    },
                    StepKind::NationalId,
                    profile,
                    countdown_epoch,
                )
            }

            // National ID
            (
                RegistrationStep::NationalId { mut form, .. },
                RegistrationEvent::EditNationalIdGroup { index, value },
            ) => {
                form.enter_group(index, &value);
                stay(
                    RegistrationStep::NationalId { form, error: None },
                    profile,
                    countdown_epoch,
                )
            }
            (RegistrationStep::NationalId { form, error }, RegistrationEvent::SubmitNationalId) => {
                match (form.check(), form.to_national_id()) {
                    (FieldCheck::Valid, Some(national_id)) => {
                        profile.national_id = Some(national_id);
                        self.move_to(
                            RegistrationStep::NationalId { form, error: None },
                            StepKind::Otp,
                            profile,
                            countdown_epoch,
                        )
                    }
                    (FieldCheck::Invalid(issue), _) => stay(
                        RegistrationStep::NationalId {
                            form,
                            error: Some(RegistrationError::invalid(ProfileField::NationalId, issue)),
                        },
                        profile,
                        countdown_epoch,
                    ),
                    _ => stay(
                        RegistrationStep::NationalId { form, error },
                        profile,
                        countdown_epoch,
                    ),
                }
            }

            // One-time code
            (
                RegistrationStep::Otp {
                    mut form, resend, ..
                },
                RegistrationEvent::EditOtpDigit { index, value },
            ) => {
                form.enter_digit(index, &value);
                stay(
                    RegistrationStep::Otp {
                        form,
                        resend,
                        error: None,
                    },
                    profile,
                    countdown_epoch,
                )
            }
            (
                RegistrationStep::Otp {
                    mut form, resend, ..
                },
                RegistrationEvent::PasteOtp(code),
            ) => {
                form.paste(&code);
                stay(
                    RegistrationStep::Otp {
                        form,
                        resend,
                        error: None,
                    },
                    profile,
                    countdown_epoch,
                )
            }
            (
                RegistrationStep::Otp {
                    form,
                    resend,
                    error,
                },
                RegistrationEvent::VerifyOtp,
            ) => match form.check() {
                // Code correctness is the delivery service's concern.
                FieldCheck::Valid => {
                    profile.otp_verified = true;
                    self.move_to(
                        RegistrationStep::Otp {
                            form,
                            resend,
                            error: None,
                        },
                        StepKind::Role,
                        profile,
                        countdown_epoch,
                    )
                }
                FieldCheck::Invalid(issue) => stay(
                    RegistrationStep::Otp {
                        form,
                        resend,
                        error: Some(RegistrationError::invalid(ProfileField::OtpVerified, issue)),
                    },
                    profile,
                    countdown_epoch,
                ),
                FieldCheck::Incomplete(_) => stay(
                    RegistrationStep::Otp {
                        form,
                        resend,
                        error,
                    },
                    profile,
                    countdown_epoch,
                ),
            },
            (
                RegistrationStep::Otp {
                    mut form,
                    resend,
                    error,
                },
                RegistrationEvent::ResendOtp,
            ) => {
                if !resend.can_resend() {
                    return stay(
                        RegistrationStep::Otp {
                            form,
                            resend,
                            error,
                        },
                        profile,
                        countdown_epoch,
                    );
                }
                form.clear();
                let mut actions = Vec::new();
                let resend = self.restart_otp(&profile, &mut countdown_epoch, &mut actions);
                (
                    RegistrationState {
                        step: RegistrationStep::Otp {
                            form,
                            resend,
                            error: None,
                        },
                        profile,
                        countdown_epoch,
                    },
                    actions,
                )
            }
            (
                RegistrationStep::Otp {
                    form,
                    resend,
                    error,
                },
                RegistrationEvent::CountdownTick(tick),
            ) if resend.countdown == Some(tick.id) => {
                let resend = ResendCooldown {
                    countdown: (!tick.is_final()).then_some(tick.id),
                    remaining_secs: tick.remaining,
                };
                stay(
                    RegistrationStep::Otp {
                        form,
                        resend,
                        error,
                    },
                    profile,
                    countdown_epoch,
                )
            }

            // Role (branch point)
            (RegistrationStep::Role { .. }, RegistrationEvent::SelectRole(role)) => stay(
                RegistrationStep::Role {
                    selected: Some(role),
                },
                profile,
                countdown_epoch,
            ),
            (
                step @ RegistrationStep::Role {
                    selected: Some(role),
                },
                RegistrationEvent::ConfirmRole,
            ) => {
                profile.apply_role(role);
                let next = if role.requires_verification() {
                    StepKind::Verification
                } else {
                    StepKind::Pledge
                };
                self.move_to(step, next, profile, countdown_epoch)
            }

            // Verification (soft gate)
            (
                RegistrationStep::Verification {
                    verification_type,
                    mut documents,
                },
                RegistrationEvent::AttachDocuments {
                    verification_type: picked_for,
                    documents: files,
                },
            ) if picked_for == verification_type => {
                documents.extend(files.into_iter().filter(|doc| doc.is_accepted()));
                stay(
                    RegistrationStep::Verification {
                        verification_type,
                        documents,
                    },
                    profile,
                    countdown_epoch,
                )
            }
            (
                RegistrationStep::Verification {
                    verification_type,
                    mut documents,
                },
                RegistrationEvent::RemoveDocument { index },
            ) => {
                if index < documents.len() {
                    documents.remove(index);
                }
                stay(
                    RegistrationStep::Verification {
                        verification_type,
                        documents,
                    },
                    profile,
                    countdown_epoch,
                )
            }
            (
                RegistrationStep::Verification {
                    verification_type,
                    documents,
                },
                RegistrationEvent::SubmitVerification,
            ) if !documents.is_empty() => {
                profile.verification_type = verification_type;
                profile.verification_documents = documents;
                self.move_to(
                    RegistrationStep::Verification {
                        verification_type,
                        documents: Vec::new(),
                    },
                    StepKind::Pledge,
                    profile,
                    countdown_epoch,
                )
            }
            (step @ RegistrationStep::Verification { .. }, RegistrationEvent::SkipVerification) => {
                profile.skip_verification();
                self.move_to(step, StepKind::Pledge, profile, countdown_epoch)
            }

            // Pledge (terminal)
            (RegistrationStep::Pledge { .. }, RegistrationEvent::SetPledgeAcknowledged(acknowledged)) => {
                stay(
                    RegistrationStep::Pledge {
                        acknowledged,
                        error: None,
                    },
                    profile,
                    countdown_epoch,
                )
            }
            (
                RegistrationStep::Pledge {
                    acknowledged: true,
                    ..
                },
                RegistrationEvent::AcceptPledge,
            ) => {
                let missing = profile.missing_fields();
                if !missing.is_empty() {
                    return stay(
                        RegistrationStep::Pledge {
                            acknowledged: true,
                            error: Some(RegistrationError::ProfileIncomplete { missing }),
                        },
                        profile,
                        countdown_epoch,
                    );
                }
                let profile = std::mem::take(&mut profile);
                (
                    RegistrationState {
                        step: RegistrationStep::Main,
                        profile: RegistrationProfile::default(),
                        countdown_epoch,
                    },
                    vec![RegistrationAction::HandOffProfile { profile }],
                )
            }

            // Control
            (step, RegistrationEvent::Back) => match navigation::resolve_back(step.kind(), &profile)
            {
                Some(target) => self.move_to(step, target, profile, countdown_epoch),
                None => stay(step, profile, countdown_epoch),
            },
            (step, RegistrationEvent::Abandon) if step.kind() != StepKind::Main => {
                let actions = exit_actions(&step);
                (
                    RegistrationState {
                        step: RegistrationStep::Splash { countdown: None },
                        profile: RegistrationProfile::default(),
                        countdown_epoch,
                    },
                    actions,
                )
            }

            (step, _event) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(step = %step.kind(), event = _event.name(), "registration event ignored");
                stay(step, profile, countdown_epoch)
            }
        }
    }

    /// Leaves `from` and enters `to`, collecting exit and entry actions.
    fn move_to(
        &self,
        from: RegistrationStep,
        to: StepKind,
        profile: RegistrationProfile,
        mut countdown_epoch: u64,
    ) -> Transition {
        let mut actions = exit_actions(&from);
        let step = self.enter(to, &profile, &mut countdown_epoch, &mut actions);
        (
            RegistrationState {
                step,
                profile,
                countdown_epoch,
            },
            actions,
        )
    }

    /// Builds a step on entry, pre-filled from the profile.
    ///
    /// The one-time code is the exception: it always starts blank.
    fn enter(
        &self,
        kind: StepKind,
        profile: &RegistrationProfile,
        countdown_epoch: &mut u64,
        actions: &mut Vec<RegistrationAction>,
    ) -> RegistrationStep {
        match kind {
            StepKind::Splash => RegistrationStep::Splash { countdown: None },
            StepKind::Onboarding => RegistrationStep::Onboarding { slide: 0 },
            StepKind::Language => RegistrationStep::Language {
                selected: profile.language,
            },
            StepKind::UserDetails => RegistrationStep::UserDetails {
                form: UserDetailsForm::from_profile(profile),
                errors: Vec::new(),
            },
            StepKind::NationalId => RegistrationStep::NationalId {
                form: NationalIdForm::from_profile(profile),
                error: None,
            },
            StepKind::Otp => RegistrationStep::Otp {
                form: OtpForm::default(),
                resend: self.restart_otp(profile, countdown_epoch, actions),
                error: None,
            },
            StepKind::Role => RegistrationStep::Role {
                selected: profile.role,
            },
            StepKind::Verification => {
                let verification_type = profile
                    .role
                    .map(|role| role.verification_type())
                    .unwrap_or_default();
                let documents = if profile.verification_type == verification_type {
                    profile.verification_documents.clone()
                } else {
                    Vec::new()
                };
                RegistrationStep::Verification {
                    verification_type,
                    documents,
                }
            }
            StepKind::Pledge => RegistrationStep::Pledge {
                acknowledged: false,
                error: None,
            },
            StepKind::Main => RegistrationStep::Main,
        }
    }

    /// Requests a code and starts the resend cool-down from its initial value.
    fn restart_otp(
        &self,
        profile: &RegistrationProfile,
        countdown_epoch: &mut u64,
        actions: &mut Vec<RegistrationAction>,
    ) -> ResendCooldown {
        if let (Some(phone), Some(national_id)) = (&profile.phone, &profile.national_id) {
            actions.push(RegistrationAction::SendOtp {
                phone: phone.clone(),
                national_id: national_id.clone(),
            });
        }

        let cooldown = self.policy.otp_resend_cooldown_secs;
        if cooldown == 0 {
            return ResendCooldown {
                countdown: None,
                remaining_secs: 0,
            };
        }
        let id = next_countdown(countdown_epoch, CountdownKind::OtpResend);
        actions.push(RegistrationAction::StartCountdown {
            id,
            ticks: cooldown,
            period_ms: RESEND_TICK_MS,
        });
        ResendCooldown {
            countdown: Some(id),
            remaining_secs: cooldown,
        }
    }
}

fn stay(step: RegistrationStep, profile: RegistrationProfile, countdown_epoch: u64) -> Transition {
    (
        RegistrationState {
            step,
            profile,
            countdown_epoch,
        },
        Vec::new(),
    )
}

/// Actions owed when a step is torn down: its pending countdown is cancelled.
fn exit_actions(step: &RegistrationStep) -> Vec<RegistrationAction> {
    step.owned_countdown()
        .map(|id| RegistrationAction::CancelCountdown { id })
        .into_iter()
        .collect()
}

fn next_countdown(countdown_epoch: &mut u64, kind: CountdownKind) -> CountdownId {
    *countdown_epoch += 1;
    CountdownId {
        kind,
        epoch: *countdown_epoch,
    }
}
