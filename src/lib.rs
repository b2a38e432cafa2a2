//! HelpMate registration app: bootstrap and terminal step screens.

pub mod bootstrap;
pub mod screens;
