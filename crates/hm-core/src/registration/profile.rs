//! Registration profile.
//!
//! The accumulator built up across the steps. It is owned by the registration state
//! and moved out exactly once, when the pledge is accepted.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DocumentRef, Language, Role, VerificationType};
use crate::validation::{self, FieldCheck, ValidationIssue, NATIONAL_ID_GROUP_LEN};

/// A complete 12-digit national identifier.
///
/// `Debug` and `Display` mask all but the last four digits.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Builds the identifier from its entry groups.
    ///
    /// Returns the validator's issue when the groups are incomplete or invalid.
    pub fn from_groups<S: AsRef<str>>(groups: &[S]) -> Result<Self, ValidationIssue> {
        match validation::check_national_id(groups) {
            FieldCheck::Valid => Ok(Self(groups.iter().map(AsRef::as_ref).collect())),
            FieldCheck::Incomplete(issue) | FieldCheck::Invalid(issue) => Err(issue),
        }
    }

    /// Parses a contiguous (possibly spaced) 12-digit string.
    pub fn parse(raw: &str) -> Result<Self, ValidationIssue> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if !compact.is_ascii() {
            return Err(ValidationIssue::NonDigit);
        }
        let groups: Vec<&str> = (0..compact.len())
            .step_by(NATIONAL_ID_GROUP_LEN)
            .map(|start| &compact[start..(start + NATIONAL_ID_GROUP_LEN).min(compact.len())])
            .collect();
        Self::from_groups(&groups)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three entry groups.
    pub fn groups(&self) -> [String; 3] {
        [
            self.0[0..4].to_string(),
            self.0[4..8].to_string(),
            self.0[8..12].to_string(),
        ]
    }

    pub fn masked(&self) -> String {
        format!("XXXX XXXX {}", &self.0[8..12])
    }
}

impl fmt::Debug for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NationalId").field(&self.masked()).finish()
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl TryFrom<String> for NationalId {
    type Error = ValidationIssue;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        NationalId::parse(&raw)
    }
}

impl From<NationalId> for String {
    fn from(id: NationalId) -> Self {
        id.0
    }
}

/// Profile fields a role branch may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileField {
    Language,
    Name,
    Phone,
    Email,
    NationalId,
    OtpVerified,
    Role,
    VerificationDocuments,
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileField::Language => "language",
            ProfileField::Name => "name",
            ProfileField::Phone => "phone",
            ProfileField::Email => "email",
            ProfileField::NationalId => "national ID",
            ProfileField::OtpVerified => "code verification",
            ProfileField::Role => "role",
            ProfileField::VerificationDocuments => "verification documents",
        };
        f.write_str(name)
    }
}

/// Partially filled user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProfile {
    pub language: Option<Language>,
    pub name: Option<String>,
    /// Local phone number, digits only. The country prefix is added by the caller.
    pub phone: Option<String>,
    pub email: Option<String>,
    pub national_id: Option<NationalId>,
    pub role: Option<Role>,
    pub verification_type: VerificationType,
    pub verification_documents: Vec<DocumentRef>,
    pub otp_verified: bool,
}

impl RegistrationProfile {
    /// Fields the selected role's branch still needs, in flow order.
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        let mut missing = Vec::new();
        if self.language.is_none() {
            missing.push(ProfileField::Language);
        }
        if self.name.is_none() {
            missing.push(ProfileField::Name);
        }
        if self.phone.is_none() {
            missing.push(ProfileField::Phone);
        }
        if self.national_id.is_none() {
            missing.push(ProfileField::NationalId);
        }
        if !self.otp_verified {
            missing.push(ProfileField::OtpVerified);
        }
        match self.role {
            None => missing.push(ProfileField::Role),
            // Donors never carry verification data.
            Some(Role::Donor) => {
                if self.verification_type != VerificationType::None
                    || !self.verification_documents.is_empty()
                {
                    missing.push(ProfileField::VerificationDocuments);
                }
            }
            Some(_) => {
                if self.verification_type != VerificationType::None
                    && self.verification_documents.is_empty()
                {
                    missing.push(ProfileField::VerificationDocuments);
                }
            }
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Applies the role step's outcome.
    ///
    /// Re-confirming the same role keeps the verification fields; a new role resets
    /// them to what that role implies.
    pub fn apply_role(&mut self, role: Role) {
        let unchanged = self.role == Some(role);
        self.role = Some(role);
        if role == Role::Donor || !unchanged {
            self.verification_type = role.verification_type();
            self.verification_documents.clear();
        }
    }

    /// Records the verification step being skipped ("verify later").
    pub fn skip_verification(&mut self) {
        self.verification_type = VerificationType::None;
        self.verification_documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_donor() -> RegistrationProfile {
        RegistrationProfile {
            language: Some(Language::English),
            name: Some("Ravi".into()),
            phone: Some("9876543210".into()),
            email: None,
            national_id: Some(NationalId::parse("123412341234").unwrap()),
            role: Some(Role::Donor),
            verification_type: VerificationType::None,
            verification_documents: Vec::new(),
            otp_verified: true,
        }
    }

    #[test]
    fn national_id_masks_all_but_last_group() {
        let id = NationalId::parse("1234 5678 9012").unwrap();
        assert_eq!(id.as_str(), "123456789012");
        assert_eq!(id.masked(), "XXXX XXXX 9012");
        assert!(!format!("{id:?}").contains("5678"));
        assert_eq!(id.groups(), ["1234".to_string(), "5678".into(), "9012".into()]);
    }

    #[test]
    fn national_id_rejects_short_input() {
        assert_eq!(
            NationalId::parse("12341234"),
            Err(ValidationIssue::DigitsRemaining { remaining: 4 })
        );
        assert!(NationalId::parse("1234१२३४1234").is_err());
    }

    #[test]
    fn donor_profile_is_complete_without_documents() {
        assert!(complete_donor().is_complete());
    }

    #[test]
    fn receiver_needs_documents_unless_verification_skipped() {
        let mut profile = complete_donor();
        profile.apply_role(Role::Receiver);
        assert_eq!(profile.verification_type, VerificationType::Orphanage);
        assert_eq!(
            profile.missing_fields(),
            vec![ProfileField::VerificationDocuments]
        );

        profile.skip_verification();
        assert!(profile.is_complete());
    }

    #[test]
    fn reconfirming_same_role_keeps_documents() {
        let mut profile = complete_donor();
        profile.apply_role(Role::Volunteer);
        profile
            .verification_documents
            .push(DocumentRef::new("licence.png", "/tmp/licence.png", "image/png"));

        profile.apply_role(Role::Volunteer);
        assert_eq!(profile.verification_documents.len(), 1);

        profile.apply_role(Role::Donor);
        assert!(profile.verification_documents.is_empty());
        assert_eq!(profile.verification_type, VerificationType::None);
    }

    #[test]
    fn empty_profile_reports_every_required_field() {
        assert_eq!(
            RegistrationProfile::default().missing_fields(),
            vec![
                ProfileField::Language,
                ProfileField::Name,
                ProfileField::Phone,
                ProfileField::NationalId,
                ProfileField::OtpVerified,
                ProfileField::Role,
            ]
        );
    }
}
