//! Step drafts.
//!
//! The editable input each step screen works on before it reports completion. Drafts
//! sanitize raw keystrokes; the validators decide whether a draft may advance.

use serde::{Deserialize, Serialize};

use super::{NationalId, RegistrationProfile};
use crate::validation::{
    self, digits_only, FieldCheck, NATIONAL_ID_DIGITS, NATIONAL_ID_GROUPS, NATIONAL_ID_GROUP_LEN,
    OTP_LENGTH, PHONE_DIGITS,
};

/// One informational slide of the onboarding carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingSlide {
    pub title: &'static str,
    pub description: &'static str,
}

pub const ONBOARDING_SLIDES: [OnboardingSlide; 3] = [
    OnboardingSlide {
        title: "Request help or donations easily",
        description: "Create requests for help and connect with donors in your community who want to make a difference.",
    },
    OnboardingSlide {
        title: "Earn bonus points for helping others",
        description: "Get rewarded with bonus points every time you donate or help someone in need.",
    },
    OnboardingSlide {
        title: "Support verified international students safely",
        description: "Help verified international students with safe, transparent donations and localized support.",
    },
];

/// Personal details draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetailsForm {
    pub name: String,
    /// Digits only, at most ten.
    pub phone: String,
    pub email: String,
}

/// Per-field checks of a [`UserDetailsForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetailsCheck {
    pub name: FieldCheck,
    pub phone: FieldCheck,
    pub email: FieldCheck,
}

impl UserDetailsCheck {
    pub fn is_valid(&self) -> bool {
        self.name.is_valid() && self.phone.is_valid() && self.email.is_valid()
    }
}

impl UserDetailsForm {
    pub fn from_profile(profile: &RegistrationProfile) -> Self {
        Self {
            name: profile.name.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
            email: profile.email.clone().unwrap_or_default(),
        }
    }

    pub fn set_name(&mut self, raw: &str) {
        self.name = raw.to_string();
    }

    /// Strips non-digits. An edit that would exceed ten digits is rejected and
    /// leaves the previous value; returns whether the edit was applied.
    pub fn set_phone(&mut self, raw: &str) -> bool {
        let digits = digits_only(raw);
        if digits.len() > PHONE_DIGITS {
            return false;
        }
        self.phone = digits;
        true
    }

    pub fn set_email(&mut self, raw: &str) {
        self.email = raw.to_string();
    }

    pub fn check(&self) -> UserDetailsCheck {
        UserDetailsCheck {
            name: validation::check_name(&self.name),
            phone: validation::check_phone(&self.phone),
            email: validation::check_email(&self.email),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.check().is_valid()
    }
}

/// National ID draft, entered as three 4-digit groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationalIdForm {
    pub groups: [String; NATIONAL_ID_GROUPS],
    /// Group that takes focus after the last edit.
    pub focus: usize,
}

impl NationalIdForm {
    pub fn from_profile(profile: &RegistrationProfile) -> Self {
        profile
            .national_id
            .as_ref()
            .map(|id| Self {
                groups: id.groups(),
                focus: 0,
            })
            .unwrap_or_default()
    }

    /// Applies an edit to one group and moves focus.
    ///
    /// Pasting more than four digits anywhere fills the groups in order with the
    /// first twelve digits. An out-of-range index is ignored.
    pub fn enter_group(&mut self, index: usize, raw: &str) {
        if index >= NATIONAL_ID_GROUPS {
            return;
        }
        let digits = digits_only(raw);

        if digits.len() > NATIONAL_ID_GROUP_LEN {
            let digits: String = digits.chars().take(NATIONAL_ID_DIGITS).collect();
            for (slot, group) in self.groups.iter_mut().enumerate() {
                let start = (slot * NATIONAL_ID_GROUP_LEN).min(digits.len());
                let end = (start + NATIONAL_ID_GROUP_LEN).min(digits.len());
                *group = digits[start..end].to_string();
            }
            self.focus = (digits.len().saturating_sub(1) / NATIONAL_ID_GROUP_LEN)
                .min(NATIONAL_ID_GROUPS - 1);
            return;
        }

        self.groups[index] = digits;
        self.focus =
            if self.groups[index].len() == NATIONAL_ID_GROUP_LEN && index + 1 < NATIONAL_ID_GROUPS {
                index + 1
            } else {
                index
            };
    }

    pub fn digit_count(&self) -> usize {
        self.groups.iter().map(String::len).sum()
    }

    pub fn check(&self) -> FieldCheck {
        validation::check_national_id(&self.groups)
    }

    pub fn can_submit(&self) -> bool {
        self.check().is_valid()
    }

    pub fn to_national_id(&self) -> Option<NationalId> {
        NationalId::from_groups(&self.groups).ok()
    }
}

/// One-time code draft: six single-digit cells.
///
/// Always starts blank; it is never pre-filled on re-entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpForm {
    pub cells: [String; OTP_LENGTH],
    /// Cell that takes focus after the last edit.
    pub focus: usize,
}

impl OtpForm {
    /// Sets one cell and moves focus to the next one.
    ///
    /// Only the first digit of the input is kept. Empty input clears the cell; input
    /// without any digit is ignored.
    pub fn enter_digit(&mut self, index: usize, raw: &str) {
        if index >= OTP_LENGTH {
            return;
        }
        if raw.is_empty() {
            self.cells[index].clear();
            self.focus = index;
            return;
        }
        let Some(digit) = raw.chars().find(char::is_ascii_digit) else {
            return;
        };
        self.cells[index] = digit.to_string();
        self.focus = (index + 1).min(OTP_LENGTH - 1);
    }

    /// Fills cells left to right from a pasted code.
    pub fn paste(&mut self, raw: &str) {
        let mut filled = 0;
        for (cell, digit) in self
            .cells
            .iter_mut()
            .zip(raw.chars().filter(char::is_ascii_digit))
        {
            *cell = digit.to_string();
            filled += 1;
        }
        self.focus = filled.min(OTP_LENGTH - 1);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(String::is_empty)
    }

    pub fn check(&self) -> FieldCheck {
        validation::check_otp(&self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_edit_beyond_ten_digits_is_rejected() {
        let mut form = UserDetailsForm::default();
        assert!(form.set_phone("98765 43210"));
        assert_eq!(form.phone, "9876543210");

        assert!(!form.set_phone("98765432101"));
        assert_eq!(form.phone, "9876543210");
    }

    #[test]
    fn user_details_require_name_and_phone_only() {
        let mut form = UserDetailsForm::default();
        form.set_name("Asha");
        form.set_phone("9876543210");
        assert!(form.can_submit());

        form.set_email("not-an-email");
        let check = form.check();
        assert!(check.email.is_invalid());
        assert!(!check.is_valid());
    }

    #[test]
    fn national_id_typing_moves_focus_when_group_fills() {
        let mut form = NationalIdForm::default();
        form.enter_group(0, "12");
        assert_eq!(form.focus, 0);
        form.enter_group(0, "1234");
        assert_eq!(form.focus, 1);
        form.enter_group(2, "12ab34");
        assert_eq!(form.focus, 2);
        assert_eq!(form.groups, ["1234".to_string(), String::new(), "1234".into()]);
        assert_eq!(form.digit_count(), 8);

        form.enter_group(3, "1");
        assert_eq!(form.focus, 2, "out-of-range edit ignored");
    }

    #[test]
    fn national_id_paste_distributes_across_groups() {
        let mut form = NationalIdForm::default();
        form.enter_group(1, "1234 5678 9012 3456");
        assert_eq!(form.focus, 2);
        assert_eq!(
            form.groups,
            ["1234".to_string(), "5678".into(), "9012".into()]
        );
        assert!(form.can_submit());
        assert_eq!(form.to_national_id().unwrap().as_str(), "123456789012");

        let mut partial = NationalIdForm::default();
        partial.enter_group(0, "123456");
        assert_eq!(partial.focus, 1);
        assert_eq!(partial.groups, ["1234".to_string(), "56".into(), String::new()]);
        assert!(partial.check().is_incomplete());
    }

    #[test]
    fn otp_cells_keep_first_digit_and_advance() {
        let mut form = OtpForm::default();
        form.enter_digit(0, "47");
        assert_eq!(form.cells[0], "4");
        assert_eq!(form.focus, 1);
        form.enter_digit(1, "x");
        assert!(form.cells[1].is_empty());
        assert_eq!(form.focus, 1);
        form.enter_digit(5, "9");
        assert_eq!(form.focus, 5);

        form.paste("123456");
        assert!(form.check().is_valid());
        assert_eq!(form.cells.concat(), "123456");

        form.clear();
        assert!(form.is_blank());
        assert_eq!(form.focus, 0);
    }
}
