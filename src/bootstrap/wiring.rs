//! Dependency wiring.
//!
//! The only place that knows about hm-app, hm-infra and the screens at once. It
//! assembles adapters behind their ports and makes no flow decisions.

use std::sync::Arc;

use hm_app::RegistrationDeps;
use hm_core::countdown::CountdownTick;
use hm_infra::{InMemorySessionBoundary, LocalDocumentPicker, LoggingOtpDelivery, TokioCountdown};
use tokio::sync::mpsc;

use super::config::AppConfig;
use crate::screens::TerminalScreen;

/// Ports for the orchestrator plus the handles the runner keeps for itself.
pub struct WiredDependencies {
    pub deps: RegistrationDeps,
    pub ticks: mpsc::UnboundedReceiver<CountdownTick>,
    pub session: Arc<InMemorySessionBoundary>,
    pub screen: Arc<TerminalScreen>,
}

pub fn wire_dependencies(config: &AppConfig) -> WiredDependencies {
    let (countdown, ticks) = TokioCountdown::channel();
    let session = Arc::new(InMemorySessionBoundary::new());
    let screen = Arc::new(TerminalScreen::new(config.registration.country_code.clone()));

    let deps = RegistrationDeps {
        countdown: Arc::new(countdown),
        otp_delivery: Arc::new(LoggingOtpDelivery::new()),
        document_upload: Arc::new(LocalDocumentPicker::new()),
        session_boundary: session.clone(),
        event_port: screen.clone(),
    };

    WiredDependencies {
        deps,
        ticks,
        session,
        screen,
    }
}
