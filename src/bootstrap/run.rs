use std::sync::Arc;

use anyhow::Context;
use hm_app::{BackPress, RegistrationOrchestrator, RegistrationOrchestratorError};
use hm_infra::InMemorySessionBoundary;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, info_span, Instrument};

use super::config::AppConfig;
use super::wiring::{wire_dependencies, WiredDependencies};
use crate::screens::{parse_command, Command, CommandError, TerminalScreen, HELP};

/// How the terminal session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Registered,
    Left,
}

/// Runs registration on the terminal until it completes or the user leaves.
pub async fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let WiredDependencies {
        deps,
        ticks,
        session,
        screen,
    } = wire_dependencies(&config);

    let orchestrator = Arc::new(RegistrationOrchestrator::new(&config.registration, deps));
    let pump = orchestrator.spawn_countdown_pump(ticks);

    let outcome = async {
        orchestrator.launch().await?;
        drive_terminal(&orchestrator, &screen, &session).await
    }
    .instrument(info_span!("bootstrap.run_app"))
    .await;

    pump.abort();
    match outcome? {
        Exit::Registered => info!("registration finished"),
        Exit::Left => info!("registration left before completion"),
    }
    Ok(())
}

async fn drive_terminal(
    orchestrator: &RegistrationOrchestrator,
    screen: &TerminalScreen,
    session: &InMemorySessionBoundary,
) -> anyhow::Result<Exit> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if let Some(exit) = handle_line(orchestrator, screen, session, &line).await? {
            return Ok(exit);
        }
    }

    // Input closed.
    orchestrator.abandon().await?;
    Ok(Exit::Left)
}

/// Applies one input line. `Some` ends the session.
async fn handle_line(
    orchestrator: &RegistrationOrchestrator,
    screen: &TerminalScreen,
    session: &InMemorySessionBoundary,
    line: &str,
) -> anyhow::Result<Option<Exit>> {
    let before = orchestrator.get_state().await;
    let command = match parse_command(before.kind(), line) {
        Ok(command) => command,
        Err(CommandError::Empty) => return Ok(None),
        Err(err) => {
            screen.notice(&format!("{err}, type `help` for commands"));
            return Ok(None);
        }
    };

    let result = match command {
        Command::Help => {
            screen.show(HELP);
            return Ok(None);
        }
        Command::Quit => {
            orchestrator.abandon().await?;
            return Ok(Some(Exit::Left));
        }
        Command::HardwareBack => match orchestrator.handle_hardware_back().await {
            BackPress::ExitApp => {
                orchestrator.abandon().await?;
                return Ok(Some(Exit::Left));
            }
            BackPress::Ignored => {
                screen.notice("use `back` to return to the previous screen");
                return Ok(None);
            }
        },
        Command::Restart => orchestrator.restart().await,
        Command::Attach(files) => orchestrator.upload_documents(files).await,
        Command::Event(event) => orchestrator.dispatch(event).await,
    };

    match result {
        Ok(after) if after.is_finished() => {
            greet(screen, session).await;
            Ok(Some(Exit::Registered))
        }
        Ok(after) => {
            if after == before {
                screen.notice("nothing changed");
            }
            Ok(None)
        }
        Err(err) => {
            report(screen, &err);
            Ok(None)
        }
    }
}

fn report(screen: &TerminalScreen, err: &RegistrationOrchestratorError) {
    error!(error = %err, "registration command failed");
    screen.notice(&err.to_string());
}

async fn greet(screen: &TerminalScreen, session: &InMemorySessionBoundary) {
    let Some(profile) = session.take().await else {
        return;
    };
    let name = profile.name.as_deref().unwrap_or_default();
    let role = profile
        .role
        .map(|role| role.as_str())
        .unwrap_or_default();
    screen.notice(&format!("Signed in as {name} ({role})"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use hm_app::RegistrationDeps;
    use hm_core::config::RegistrationConfig;
    use hm_core::registration::{RegistrationStep, StepKind};
    use hm_infra::{LocalDocumentPicker, LoggingOtpDelivery, TokioCountdown};

    struct Session {
        orchestrator: Arc<RegistrationOrchestrator>,
        screen: Arc<TerminalScreen>,
        session: Arc<InMemorySessionBoundary>,
    }

    impl Session {
        fn start() -> Self {
            let (countdown, ticks) = TokioCountdown::channel();
            let session = Arc::new(InMemorySessionBoundary::new());
            let screen = Arc::new(TerminalScreen::with_writer("+91", Box::new(std::io::sink())));
            let orchestrator = Arc::new(RegistrationOrchestrator::new(
                &RegistrationConfig::default(),
                RegistrationDeps {
                    countdown: Arc::new(countdown),
                    otp_delivery: Arc::new(LoggingOtpDelivery::new()),
                    document_upload: Arc::new(LocalDocumentPicker::new()),
                    session_boundary: session.clone(),
                    event_port: screen.clone(),
                },
            ));
            let _ = orchestrator.spawn_countdown_pump(ticks);
            Self {
                orchestrator,
                screen,
                session,
            }
        }

        async fn type_line(&self, line: &str) -> Option<Exit> {
            handle_line(&self.orchestrator, &self.screen, &self.session, line)
                .await
                .expect("line handled")
        }

        async fn kind(&self) -> StepKind {
            self.orchestrator.get_state().await.kind()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn abandon_starts_over_from_splash() {
        let session = Session::start();
        session.orchestrator.launch().await.expect("launch");
        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(session.type_line("skip").await, None);
        assert_eq!(session.type_line("select hi").await, None);
        assert_eq!(session.type_line("continue").await, None);
        assert_eq!(session.kind().await, StepKind::UserDetails);

        assert_eq!(session.type_line("abandon").await, None);
        let state = session.orchestrator.get_state().await;
        assert!(matches!(
            state.step,
            RegistrationStep::Splash {
                countdown: Some(_)
            }
        ));
        assert_eq!(state.profile.language, None);

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(session.kind().await, StepKind::Onboarding);
    }

    #[tokio::test(start_paused = true)]
    async fn hardware_back_on_onboarding_leaves() {
        let session = Session::start();
        session.orchestrator.launch().await.expect("launch");
        tokio::time::sleep(Duration::from_millis(2001)).await;

        assert_eq!(session.type_line("hwback").await, Some(Exit::Left));
        assert_eq!(session.kind().await, StepKind::Splash);
    }
}
