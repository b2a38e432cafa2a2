//! Typed commands of the terminal screens.
//!
//! A command line is read against the active step: `continue` submits whatever the
//! step's primary action is, `select` picks a language or a role.

use std::path::PathBuf;

use hm_core::ports::CandidateFile;
use hm_core::registration::{Language, RegistrationEvent, Role, StepKind};
use hm_core::validation::{NATIONAL_ID_GROUPS, OTP_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Feed an event to the flow.
    Event(RegistrationEvent),
    /// Pick files for the verification step.
    Attach(Vec<CandidateFile>),
    /// Platform back button.
    HardwareBack,
    /// Drop the registration so far and begin again at the splash screen.
    Restart,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("`{command}` is not available on this screen")]
    Unavailable { command: String },
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{value}` is not {expected}")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },
}

pub const HELP: &str = "\
  continue        submit the current screen
  back            previous screen
  hwback          press the hardware back button
  restart         drop everything and start over
  quit            leave the app
  help            this text";

/// Parses one input line for the step currently on screen.
pub fn parse_command(step: StepKind, line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    if verb.is_empty() {
        return Err(CommandError::Empty);
    }

    let event = match (step, verb.to_ascii_lowercase().as_str()) {
        (_, "help" | "?") => return Ok(Command::Help),
        (_, "quit" | "exit") => return Ok(Command::Quit),
        (_, "hwback") => return Ok(Command::HardwareBack),
        (_, "restart" | "abandon") => return Ok(Command::Restart),
        (_, "back") => RegistrationEvent::Back,

        (StepKind::Onboarding, "next" | "continue") => RegistrationEvent::NextSlide,
        (StepKind::Onboarding, "skip") => RegistrationEvent::SkipOnboarding,

        (StepKind::Language, "select") => {
            let code = required(rest, "select", "a language code")?;
            let language = Language::from_code(code).ok_or_else(|| CommandError::InvalidArgument {
                value: code.to_string(),
                expected: "a supported language code",
            })?;
            RegistrationEvent::SelectLanguage(language)
        }
        (StepKind::Language, "continue") => RegistrationEvent::ConfirmLanguage,

        (StepKind::UserDetails, "name") => RegistrationEvent::EditName(rest.to_string()),
        (StepKind::UserDetails, "phone") => RegistrationEvent::EditPhone(rest.to_string()),
        (StepKind::UserDetails, "email") => RegistrationEvent::EditEmail(rest.to_string()),
        (StepKind::UserDetails, "continue") => RegistrationEvent::SubmitUserDetails,

        (StepKind::NationalId, "id") => parse_national_id(rest)?,
        (StepKind::NationalId, "continue") => RegistrationEvent::SubmitNationalId,

        (StepKind::Otp, "code") => {
            RegistrationEvent::PasteOtp(required(rest, "code", "the code")?.to_string())
        }
        (StepKind::Otp, "digit") => {
            let (position, value) = split_pair(rest, "digit", "a position and a digit")?;
            RegistrationEvent::EditOtpDigit {
                index: position_index(position, OTP_LENGTH)?,
                value: value.to_string(),
            }
        }
        (StepKind::Otp, "resend") => RegistrationEvent::ResendOtp,
        (StepKind::Otp, "continue") => RegistrationEvent::VerifyOtp,

        (StepKind::Role, "select") => {
            let raw = required(rest, "select", "a role")?;
            let role = Role::parse(raw).ok_or_else(|| CommandError::InvalidArgument {
                value: raw.to_string(),
                expected: "donor, volunteer or receiver",
            })?;
            RegistrationEvent::SelectRole(role)
        }
        (StepKind::Role, "continue") => RegistrationEvent::ConfirmRole,

        (StepKind::Verification, "attach") => {
            required(rest, "attach", "at least one path")?;
            let files = rest
                .split_whitespace()
                .map(|path| CandidateFile::new(PathBuf::from(path)))
                .collect();
            return Ok(Command::Attach(files));
        }
        (StepKind::Verification, "remove") => RegistrationEvent::RemoveDocument {
            index: position_index(required(rest, "remove", "a document number")?, usize::MAX)?,
        },
        (StepKind::Verification, "continue") => RegistrationEvent::SubmitVerification,
        (StepKind::Verification, "skip") => RegistrationEvent::SkipVerification,

        (StepKind::Pledge, "agree") => RegistrationEvent::SetPledgeAcknowledged(true),
        (StepKind::Pledge, "disagree") => RegistrationEvent::SetPledgeAcknowledged(false),
        (StepKind::Pledge, "continue") => RegistrationEvent::AcceptPledge,

        (_, other) => {
            return Err(CommandError::Unavailable {
                command: other.to_string(),
            })
        }
    };
    Ok(Command::Event(event))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn split_pair<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<(&'a str, &'a str), CommandError> {
    rest.split_once(char::is_whitespace)
        .map(|(first, second)| (first, second.trim()))
        .ok_or(CommandError::MissingArgument { command, expected })
}

/// 1-based position on screen to 0-based index.
fn position_index(raw: &str, count: usize) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(position) if (1..=count).contains(&position) => Ok(position - 1),
        _ => Err(CommandError::InvalidArgument {
            value: raw.to_string(),
            expected: "a valid position",
        }),
    }
}

/// `id <group> <digits>` edits one group; `id <digits>` is a paste into the first.
fn parse_national_id(rest: &str) -> Result<RegistrationEvent, CommandError> {
    let rest = required(rest, "id", "a group number and digits, or the full number")?;
    match rest.split_once(char::is_whitespace) {
        Some((group, value)) if group.len() == 1 => Ok(RegistrationEvent::EditNationalIdGroup {
            index: position_index(group, NATIONAL_ID_GROUPS)?,
            value: value.trim().to_string(),
        }),
        _ => Ok(RegistrationEvent::EditNationalIdGroup {
            index: 0,
            value: rest.to_string(),
        }),
    }
}
