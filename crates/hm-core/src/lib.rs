//! # hm-core
//!
//! Core domain models and business logic for HelpMate.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! The registration flow lives in [`registration`]: a tagged-union state, a pure
//! transition function and the field validators the step screens rely on.

pub mod config;
pub mod countdown;
pub mod ports;
pub mod registration;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::RegistrationConfig;
pub use countdown::{CountdownId, CountdownKind, CountdownTick};
pub use registration::{
    DocumentRef, Language, NationalId, RegistrationAction, RegistrationError, RegistrationEvent,
    RegistrationPolicy, RegistrationProfile, RegistrationState, RegistrationStateMachine,
    RegistrationStep, Role, StepKind, VerificationType,
};
pub use validation::{FieldCheck, ValidationIssue};
