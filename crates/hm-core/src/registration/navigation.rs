//! Navigation graph.
//!
//! The back edge of every step lives in one table so the graph can be checked
//! without any renderer.

use super::{RegistrationProfile, StepKind};

/// Where `Back` leads from a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackTarget {
    /// No back edge inside the flow.
    Stay,
    Step(StepKind),
    /// Verification for roles that went through it, otherwise the role step.
    RoleBranch,
}

/// Predecessor table keyed by step.
pub const fn back_target(kind: StepKind) -> BackTarget {
    match kind {
        StepKind::Splash => BackTarget::Stay,
        StepKind::Onboarding => BackTarget::Stay,
        StepKind::Language => BackTarget::Step(StepKind::Onboarding),
        StepKind::UserDetails => BackTarget::Step(StepKind::Language),
        StepKind::NationalId => BackTarget::Step(StepKind::UserDetails),
        StepKind::Otp => BackTarget::Step(StepKind::NationalId),
        StepKind::Role => BackTarget::Step(StepKind::Otp),
        StepKind::Verification => BackTarget::Step(StepKind::Role),
        StepKind::Pledge => BackTarget::RoleBranch,
        StepKind::Main => BackTarget::Stay,
    }
}

/// Resolves the back edge against the recorded profile.
pub fn resolve_back(kind: StepKind, profile: &RegistrationProfile) -> Option<StepKind> {
    match back_target(kind) {
        BackTarget::Stay => None,
        BackTarget::Step(target) => Some(target),
        BackTarget::RoleBranch => match profile.role {
            Some(role) if role.requires_verification() => Some(StepKind::Verification),
            _ => Some(StepKind::Role),
        },
    }
}

/// Hardware back-press predicate: the platform exits the app when this holds.
///
/// Everywhere past onboarding, back is handled by the step itself.
pub const fn should_exit_on_back(kind: StepKind) -> bool {
    matches!(kind, StepKind::Splash | StepKind::Onboarding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::Role;

    #[test]
    fn every_interactive_step_after_language_goes_back_to_its_predecessor() {
        let forward = [
            StepKind::Onboarding,
            StepKind::Language,
            StepKind::UserDetails,
            StepKind::NationalId,
            StepKind::Otp,
            StepKind::Role,
        ];
        for pair in forward.windows(2) {
            assert_eq!(back_target(pair[1]), BackTarget::Step(pair[0]));
        }
        assert_eq!(
            back_target(StepKind::Verification),
            BackTarget::Step(StepKind::Role)
        );
    }

    #[test]
    fn pledge_back_follows_role_branch() {
        let mut profile = RegistrationProfile::default();
        profile.role = Some(Role::Donor);
        assert_eq!(resolve_back(StepKind::Pledge, &profile), Some(StepKind::Role));

        profile.role = Some(Role::Receiver);
        assert_eq!(
            resolve_back(StepKind::Pledge, &profile),
            Some(StepKind::Verification)
        );
    }

    #[test]
    fn app_exits_on_back_only_before_language() {
        for kind in StepKind::ALL {
            let expected = matches!(kind, StepKind::Splash | StepKind::Onboarding);
            assert_eq!(should_exit_on_back(kind), expected, "{kind}");
        }
        assert_eq!(
            resolve_back(StepKind::Main, &RegistrationProfile::default()),
            None
        );
    }
}
