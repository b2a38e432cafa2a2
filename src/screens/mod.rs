//! Terminal step screens.
//!
//! Each registration step is drawn as text and driven by typed commands.

mod command;
mod render;
mod terminal;

pub use command::{parse_command, Command, CommandError, HELP};
pub use render::{render, significant_change, step_title};
pub use terminal::TerminalScreen;
