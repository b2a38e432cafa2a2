//! Registration domain module.
//!
//! This module defines the registration flow that takes a new user from first launch
//! to the main application: the profile it accumulates, the step drafts, and the
//! pure state machine that sequences the steps.

mod action;
mod document;
mod error;
mod event;
pub mod forms;
mod language;
pub mod navigation;
mod profile;
mod role;
mod state;
pub mod state_machine;


pub use action::RegistrationAction;
pub use document::{is_accepted_media_type, DocumentRef};
pub use error::RegistrationError;
pub use event::RegistrationEvent;
pub use language::{Language, UnsupportedLanguage};
pub use navigation::{back_target, should_exit_on_back, BackTarget};
pub use profile::{NationalId, ProfileField, RegistrationProfile};
pub use role::{Role, VerificationType};
pub use state::{RegistrationState, RegistrationStep, ResendCooldown, StepKind};
pub use state_machine::{RegistrationPolicy, RegistrationStateMachine};
