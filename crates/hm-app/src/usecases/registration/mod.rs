//! Registration use cases.
//!
//! This module exposes the registration orchestrator and the profile hand-off.

pub mod hand_off;
pub mod orchestrator;

pub use hand_off::HandOffProfile;
pub use orchestrator::{BackPress, RegistrationOrchestrator, RegistrationOrchestratorError};
