//! HelpMate Application Orchestration Layer
//!
//! This crate contains the registration use cases: the orchestrator that runs the
//! pure state machine against its collaborators, and the profile hand-off.

pub mod deps;
pub mod usecases;

pub use deps::RegistrationDeps;
pub use usecases::registration::{
    BackPress, HandOffProfile, RegistrationOrchestrator, RegistrationOrchestratorError,
};
