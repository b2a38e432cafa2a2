//! Field validators.
//!
//! Pure, total checks over raw user input. A check never fails: it classifies the
//! input as valid, incomplete (not fully entered yet) or invalid (entered but wrong),
//! and carries a human-readable reason for the last two.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Digits in a local phone number (country prefix excluded).
pub const PHONE_DIGITS: usize = 10;
/// Number of groups the national ID is entered in.
pub const NATIONAL_ID_GROUPS: usize = 3;
/// Digits per national ID group.
pub const NATIONAL_ID_GROUP_LEN: usize = 4;
/// Digits in a full national ID.
pub const NATIONAL_ID_DIGITS: usize = NATIONAL_ID_GROUPS * NATIONAL_ID_GROUP_LEN;
/// Cells in a one-time code.
pub const OTP_LENGTH: usize = 6;
/// Minimum trimmed length of a name.
pub const MIN_NAME_LEN: usize = 2;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Reason attached to a non-valid check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ValidationIssue {
    #[error("{remaining} more digit(s) required")]
    DigitsRemaining { remaining: usize },
    #[error("must be exactly {expected} digits")]
    TooManyDigits { expected: usize },
    #[error("only digits are allowed")]
    NonDigit,
    #[error("name is required")]
    NameEmpty,
    #[error("name must be at least {min_len} characters")]
    NameTooShort { min_len: usize },
    #[error("please enter a valid email address")]
    EmailMalformed,
}

/// Outcome of a field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldCheck {
    Valid,
    Incomplete(ValidationIssue),
    Invalid(ValidationIssue),
}

impl FieldCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldCheck::Valid)
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, FieldCheck::Incomplete(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldCheck::Invalid(_))
    }

    pub fn issue(&self) -> Option<&ValidationIssue> {
        match self {
            FieldCheck::Valid => None,
            FieldCheck::Incomplete(issue) | FieldCheck::Invalid(issue) => Some(issue),
        }
    }

    /// Human-readable reason, if any.
    pub fn reason(&self) -> Option<String> {
        self.issue().map(ToString::to_string)
    }
}

/// Keeps only ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Phone check over the local number. Non-digits are stripped first.
pub fn check_phone(raw: &str) -> FieldCheck {
    let digits = digits_only(raw).len();
    if digits < PHONE_DIGITS {
        FieldCheck::Incomplete(ValidationIssue::DigitsRemaining {
            remaining: PHONE_DIGITS - digits,
        })
    } else if digits > PHONE_DIGITS {
        FieldCheck::Invalid(ValidationIssue::TooManyDigits {
            expected: PHONE_DIGITS,
        })
    } else {
        FieldCheck::Valid
    }
}

/// National ID check over its entry groups.
///
/// A short total is incomplete, not invalid: the step screen renders the two
/// differently.
pub fn check_national_id<S: AsRef<str>>(groups: &[S]) -> FieldCheck {
    let mut total = 0;
    for group in groups {
        let group = group.as_ref();
        if !group.chars().all(|c| c.is_ascii_digit()) {
            return FieldCheck::Invalid(ValidationIssue::NonDigit);
        }
        if group.len() > NATIONAL_ID_GROUP_LEN {
            return FieldCheck::Invalid(ValidationIssue::TooManyDigits {
                expected: NATIONAL_ID_DIGITS,
            });
        }
        total += group.len();
    }

    if groups.len() > NATIONAL_ID_GROUPS || total > NATIONAL_ID_DIGITS {
        FieldCheck::Invalid(ValidationIssue::TooManyDigits {
            expected: NATIONAL_ID_DIGITS,
        })
    } else if total < NATIONAL_ID_DIGITS {
        FieldCheck::Incomplete(ValidationIssue::DigitsRemaining {
            remaining: NATIONAL_ID_DIGITS - total,
        })
    } else {
        FieldCheck::Valid
    }
}

/// One-time code check over its cells. Correctness of the code is decided by the
/// delivery service, not here.
pub fn check_otp<S: AsRef<str>>(cells: &[S]) -> FieldCheck {
    if cells
        .iter()
        .any(|cell| !cell.as_ref().chars().all(|c| c.is_ascii_digit()))
    {
        return FieldCheck::Invalid(ValidationIssue::NonDigit);
    }
    if cells.len() > OTP_LENGTH || cells.iter().any(|cell| cell.as_ref().len() > 1) {
        return FieldCheck::Invalid(ValidationIssue::TooManyDigits {
            expected: OTP_LENGTH,
        });
    }

    let filled = cells.iter().filter(|cell| !cell.as_ref().is_empty()).count();
    if filled < OTP_LENGTH {
        FieldCheck::Incomplete(ValidationIssue::DigitsRemaining {
            remaining: OTP_LENGTH - filled,
        })
    } else {
        FieldCheck::Valid
    }
}

pub fn check_name(raw: &str) -> FieldCheck {
    let len = raw.trim().chars().count();
    if len == 0 {
        FieldCheck::Incomplete(ValidationIssue::NameEmpty)
    } else if len < MIN_NAME_LEN {
        FieldCheck::Invalid(ValidationIssue::NameTooShort {
            min_len: MIN_NAME_LEN,
        })
    } else {
        FieldCheck::Valid
    }
}

/// Email is optional: an empty value always passes.
pub fn check_email(raw: &str) -> FieldCheck {
    let trimmed = raw.trim();
    if trimmed.is_empty() || EMAIL_PATTERN.is_match(trimmed) {
        FieldCheck::Valid
    } else {
        FieldCheck::Invalid(ValidationIssue::EmailMalformed)
    }
}
