use std::fmt;

use serde::{Deserialize, Serialize};

/// Role chosen at the branch point of registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Volunteer,
    Receiver,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Donor, Role::Volunteer, Role::Receiver];

    /// Verification a role is subject to.
    pub fn verification_type(self) -> VerificationType {
        match self {
            Role::Donor => VerificationType::None,
            Role::Volunteer => VerificationType::Driver,
            Role::Receiver => VerificationType::Orphanage,
        }
    }

    /// Whether this role passes through the verification step.
    pub fn requires_verification(self) -> bool {
        self.verification_type() != VerificationType::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Volunteer => "volunteer",
            Role::Receiver => "receiver",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        let raw = raw.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationType {
    Driver,
    Orphanage,
    #[default]
    None,
}

impl VerificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationType::Driver => "driver",
            VerificationType::Orphanage => "orphanage",
            VerificationType::None => "none",
        }
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
