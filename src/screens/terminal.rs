use std::io::{self, Write};
use std::sync::Mutex;

use hm_core::ports::RegistrationEventPort;
use hm_core::registration::RegistrationState;
use tracing::warn;

use super::render::{render, significant_change};

/// Step screens drawn on a terminal.
///
/// Redraws whenever the flow reports a state worth showing.
pub struct TerminalScreen {
    country_code: String,
    last: Mutex<Option<RegistrationState>>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalScreen {
    pub fn new(country_code: impl Into<String>) -> Self {
        Self::with_writer(country_code, Box::new(io::stdout()))
    }

    pub fn with_writer(country_code: impl Into<String>, out: Box<dyn Write + Send>) -> Self {
        Self {
            country_code: country_code.into(),
            last: Mutex::new(None),
            out: Mutex::new(out),
        }
    }

    /// Writes a free-form line under the current screen.
    pub fn notice(&self, message: &str) {
        self.write(&format!("  > {message}\n"));
    }

    pub fn show(&self, text: &str) {
        self.write(&format!("{text}\n"));
    }

    fn write(&self, text: &str) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!(error = %err, "terminal write failed");
        }
    }
}

#[async_trait::async_trait]
impl RegistrationEventPort for TerminalScreen {
    async fn emit_registration_state_changed(&self, state: &RegistrationState) {
        let changed = {
            let Ok(mut last) = self.last.lock() else {
                return;
            };
            let changed = last
                .as_ref()
                .map_or(true, |prev| significant_change(prev, state));
            *last = Some(state.clone());
            changed
        };
        if changed {
            self.write(&render(state, &self.country_code));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use hm_core::registration::{RegistrationStep, StepKind};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn draws_each_new_step_once() {
        let buf = SharedBuf::default();
        let screen = TerminalScreen::with_writer("+91", Box::new(buf.clone()));
        let onboarding = RegistrationState {
            step: RegistrationStep::Onboarding { slide: 1 },
            ..RegistrationState::new()
        };

        screen.emit_registration_state_changed(&onboarding).await;
        screen.emit_registration_state_changed(&onboarding).await;

        let text = buf.text();
        assert_eq!(text.matches(crate::screens::step_title(StepKind::Onboarding)).count(), 1);
        assert!(text.contains("Earn bonus points"));
    }

    #[tokio::test]
    async fn notice_lands_under_the_screen() {
        let buf = SharedBuf::default();
        let screen = TerminalScreen::with_writer("+91", Box::new(buf.clone()));

        screen.notice("phone must have 10 digits");

        assert_eq!(buf.text(), "  > phone must have 10 digits\n");
    }
}
