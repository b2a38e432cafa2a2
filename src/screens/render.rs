//! Text rendering of each registration step.

use std::fmt::Write;

use hm_core::registration::forms::ONBOARDING_SLIDES;
use hm_core::registration::{
    Language, RegistrationError, RegistrationState, RegistrationStep, Role, StepKind,
};
use hm_core::validation::{NATIONAL_ID_DIGITS, NATIONAL_ID_GROUPS};

const RULE: &str = "────────────────────────────────────────";

pub fn step_title(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Splash => "HelpMate",
        StepKind::Onboarding => "Welcome",
        StepKind::Language => "Choose your language",
        StepKind::UserDetails => "Your details",
        StepKind::NationalId => "Aadhaar number",
        StepKind::Otp => "Verify your phone",
        StepKind::Role => "How would you like to help?",
        StepKind::Verification => "Verification",
        StepKind::Pledge => "Community pledge",
        StepKind::Main => "All set",
    }
}

fn role_blurb(role: Role) -> &'static str {
    match role {
        Role::Donor => "give money, food or goods",
        Role::Volunteer => "deliver donations as a driver",
        Role::Receiver => "receive help for an orphanage or home",
    }
}

fn marker(selected: bool) -> &'static str {
    if selected {
        "(x)"
    } else {
        "( )"
    }
}

fn cell(value: &str) -> &str {
    if value.is_empty() {
        "_"
    } else {
        value
    }
}

/// Brackets the input that has focus.
fn focused(text: String, has_focus: bool) -> String {
    if has_focus {
        format!(">{text}<")
    } else {
        text
    }
}

fn push_error(out: &mut String, error: Option<&RegistrationError>) {
    if let Some(error) = error {
        let _ = writeln!(out, "  ! {error}");
    }
}

/// Renders the active step as a block of text.
pub fn render(state: &RegistrationState, country_code: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}\n  {}\n{RULE}", step_title(state.kind()));

    match &state.step {
        RegistrationStep::Splash { countdown } => {
            let _ = writeln!(out, "  Connecting communities with care");
            if countdown.is_some() {
                let _ = writeln!(out, "  loading...");
            }
        }
        RegistrationStep::Onboarding { slide } => {
            if let Some(current) = ONBOARDING_SLIDES.get(*slide) {
                let _ = writeln!(out, "  {}\n  {}", current.title, current.description);
            }
            let dots: String = (0..ONBOARDING_SLIDES.len())
                .map(|index| if index == *slide { '●' } else { '○' })
                .collect();
            let _ = writeln!(out, "\n  {dots}\n  [next] [skip]");
        }
        RegistrationStep::Language { selected } => {
            for language in Language::ALL {
                let _ = writeln!(
                    out,
                    "  {} {:<3} {:<10} {}",
                    marker(*selected == Some(language)),
                    language.code(),
                    language.label(),
                    language.native_label()
                );
            }
            let _ = writeln!(out, "\n  [select <code>] [continue]");
        }
        RegistrationStep::UserDetails { form, errors } => {
            let _ = writeln!(out, "  Full name : {}", form.name);
            let _ = writeln!(out, "  Phone     : {country_code} {}", form.phone);
            let _ = writeln!(out, "  Email     : {} (optional)", form.email);
            for error in errors {
                push_error(&mut out, Some(error));
            }
            let _ = writeln!(
                out,
                "\n  [name <text>] [phone <digits>] [email <address>] [continue{}]",
                if form.can_submit() { "" } else { ", disabled" }
            );
        }
        RegistrationStep::NationalId { form, error } => {
            let groups: Vec<String> = form
                .groups
                .iter()
                .enumerate()
                .map(|(index, group)| focused(format!("{:_<4}", group), index == form.focus))
                .collect();
            let _ = writeln!(
                out,
                "  {}   {}/{} digits",
                groups.join(" - "),
                form.digit_count(),
                NATIONAL_ID_DIGITS
            );
            push_error(&mut out, error.as_ref());
            let _ = writeln!(
                out,
                "\n  [id <1-{NATIONAL_ID_GROUPS}> <digits>] [id <12 digits>] [continue{}]",
                if form.can_submit() { "" } else { ", disabled" }
            );
        }
        RegistrationStep::Otp {
            form,
            resend,
            error,
        } => {
            let phone = state.profile.phone.as_deref().unwrap_or_default();
            let _ = writeln!(out, "  Code sent to {country_code} {phone}");
            let cells: Vec<String> = form
                .cells
                .iter()
                .enumerate()
                .map(|(index, value)| focused(cell(value).to_string(), index == form.focus))
                .collect();
            let _ = writeln!(out, "  [ {} ]", cells.join(" "));
            push_error(&mut out, error.as_ref());
            if resend.can_resend() {
                let _ = writeln!(out, "  Didn't get it? [resend]");
            } else {
                let _ = writeln!(out, "  Resend available in {}s", resend.remaining_secs);
            }
            let _ = writeln!(out, "\n  [code <6 digits>] [digit <1-6> <d>] [continue]");
        }
        RegistrationStep::Role { selected } => {
            for role in Role::ALL {
                let _ = writeln!(
                    out,
                    "  {} {:<10} {}",
                    marker(*selected == Some(role)),
                    role.as_str(),
                    role_blurb(role)
                );
            }
            let _ = writeln!(out, "\n  [select <role>] [continue]");
        }
        RegistrationStep::Verification {
            verification_type,
            documents,
        } => {
            let _ = writeln!(
                out,
                "  Upload your {verification_type} documents (images or PDF)"
            );
            if documents.is_empty() {
                let _ = writeln!(out, "  no documents yet");
            }
            for (index, document) in documents.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {} ({})",
                    index + 1,
                    document.name,
                    document.media_type
                );
            }
            let _ = writeln!(
                out,
                "\n  [attach <path>...] [remove <n>] [continue] [skip]"
            );
        }
        RegistrationStep::Pledge {
            acknowledged,
            error,
        } => {
            let _ = writeln!(
                out,
                "  I will use HelpMate honestly, respect the people I meet\n  \
                 and keep every donation transparent."
            );
            let _ = writeln!(out, "  {} I agree", marker(*acknowledged));
            push_error(&mut out, error.as_ref());
            let _ = writeln!(out, "\n  [agree] [disagree] [continue]");
        }
        RegistrationStep::Main => {
            let _ = writeln!(out, "  Registration complete. Welcome to HelpMate!");
        }
    }

    out
}

/// Whether `next` differs from `prev` in a way worth redrawing.
///
/// Resend cool-down ticks only redraw when resending becomes available.
pub fn significant_change(prev: &RegistrationState, next: &RegistrationState) -> bool {
    match (&prev.step, &next.step) {
        (
            RegistrationStep::Otp {
                form: prev_form,
                resend: prev_resend,
                error: prev_error,
            },
            RegistrationStep::Otp {
                form,
                resend,
                error,
            },
        ) => {
            prev_form != form
                || prev_error != error
                || prev_resend.can_resend() != resend.can_resend()
        }
        (prev_step, step) => prev_step != step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_core::countdown::{CountdownId, CountdownKind};
    use hm_core::registration::forms::{NationalIdForm, OtpForm};
    use hm_core::registration::ResendCooldown;

    fn otp_state(remaining_secs: u32) -> RegistrationState {
        RegistrationState {
            step: RegistrationStep::Otp {
                form: OtpForm::default(),
                resend: ResendCooldown {
                    countdown: (remaining_secs > 0).then_some(CountdownId {
                        kind: CountdownKind::OtpResend,
                        epoch: 1,
                    }),
                    remaining_secs,
                },
                error: None,
            },
            ..RegistrationState::new()
        }
    }

    #[test]
    fn language_screen_lists_every_language() {
        let state = RegistrationState {
            step: RegistrationStep::Language {
                selected: Some(Language::Tamil),
            },
            ..RegistrationState::new()
        };

        let text = render(&state, "+91");

        for language in Language::ALL {
            assert!(text.contains(language.native_label()));
        }
        assert!(text.contains("(x) ta"));
    }

    #[test]
    fn otp_screen_shows_cooldown() {
        assert!(render(&otp_state(12), "+91").contains("Resend available in 12s"));
        assert!(render(&otp_state(0), "+91").contains("[resend]"));
    }

    #[test]
    fn national_id_shows_progress_and_focus() {
        let mut form = NationalIdForm::default();
        form.enter_group(0, "1234");
        form.enter_group(1, "56");
        let state = RegistrationState {
            step: RegistrationStep::NationalId { form, error: None },
            ..RegistrationState::new()
        };

        let text = render(&state, "+91");

        assert!(text.contains("1234 - >56__< - ____"), "{text}");
        assert!(text.contains("6/12 digits"));
    }

    #[test]
    fn otp_marks_the_next_cell() {
        let mut form = OtpForm::default();
        form.enter_digit(0, "4");
        let mut state = otp_state(30);
        if let RegistrationStep::Otp { form: current, .. } = &mut state.step {
            *current = form;
        }

        assert!(render(&state, "+91").contains("[ 4 >_< _ _ _ _ ]"));
    }

    #[test]
    fn cooldown_ticks_are_not_significant() {
        assert!(!significant_change(&otp_state(29), &otp_state(28)));
        assert!(significant_change(&otp_state(1), &otp_state(0)));
    }

    #[test]
    fn step_change_is_significant() {
        let splash = RegistrationState::new();
        let onboarding = RegistrationState {
            step: RegistrationStep::Onboarding { slide: 0 },
            ..RegistrationState::new()
        };
        assert!(significant_change(&splash, &onboarding));
        assert!(!significant_change(&onboarding, &onboarding.clone()));
    }
}
