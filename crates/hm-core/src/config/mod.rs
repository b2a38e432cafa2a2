//! Configuration data structures.

mod registration_config;

pub use registration_config::RegistrationConfig;
