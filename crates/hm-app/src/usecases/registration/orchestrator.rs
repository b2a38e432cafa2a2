//! Registration orchestrator.
//!
//! This module coordinates the registration state machine and its side effects.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, trace, warn, Instrument};

use hm_core::{
    config::RegistrationConfig,
    countdown::CountdownTick,
    ports::{
        CandidateFile, CountdownPort, DocumentUploadPort, OtpDeliveryPort, OtpRequest,
        RegistrationEventPort,
    },
    registration::{
        navigation, RegistrationAction, RegistrationEvent, RegistrationState,
        RegistrationStateMachine, RegistrationStep,
    },
};

use crate::deps::RegistrationDeps;
use crate::usecases::registration::HandOffProfile;

/// Errors produced by the registration orchestrator.
///
/// These come from collaborators; the flow itself has no fatal path.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationOrchestratorError {
    #[error("countdown operation failed: {0}")]
    Countdown(#[source] anyhow::Error),
    #[error("document upload failed: {0}")]
    DocumentUpload(#[source] anyhow::Error),
    #[error("profile hand-off failed: {0}")]
    HandOff(#[from] anyhow::Error),
}

/// Outcome of a hardware back-press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackPress {
    /// The platform should exit the app.
    ExitApp,
    /// Back navigation belongs to the active step; nothing to do here.
    Ignored,
}

/// Orchestrator that drives registration state and side effects.
///
/// UI events and countdown ticks arrive concurrently. `dispatch_lock` is held across
/// transition, actions and commit; `state` alone is enough for reads.
pub struct RegistrationOrchestrator {
    state: Mutex<RegistrationState>,
    dispatch_lock: Mutex<()>,
    machine: RegistrationStateMachine,
    country_code: String,

    hand_off: Arc<HandOffProfile>,
    countdown: Arc<dyn CountdownPort>,
    otp_delivery: Arc<dyn OtpDeliveryPort>,
    document_upload: Arc<dyn DocumentUploadPort>,
    event_port: Arc<dyn RegistrationEventPort>,
}

impl RegistrationOrchestrator {
    pub fn new(config: &RegistrationConfig, deps: RegistrationDeps) -> Self {
        Self {
            state: Mutex::new(RegistrationState::new()),
            dispatch_lock: Mutex::new(()),
            machine: RegistrationStateMachine::new(config.policy()),
            country_code: config.country_code.clone(),
            hand_off: Arc::new(HandOffProfile::new(deps.session_boundary)),
            countdown: deps.countdown,
            otp_delivery: deps.otp_delivery,
            document_upload: deps.document_upload,
            event_port: deps.event_port,
        }
    }

    /// Starts the flow: the splash screen begins its dwell.
    pub async fn launch(&self) -> Result<RegistrationState, RegistrationOrchestratorError> {
        self.dispatch(RegistrationEvent::Launch).await
    }

    pub async fn handle_countdown_tick(
        &self,
        tick: CountdownTick,
    ) -> Result<RegistrationState, RegistrationOrchestratorError> {
        self.dispatch(RegistrationEvent::CountdownTick(tick)).await
    }

    /// Runs files through the upload collaborator and attaches what it returns.
    ///
    /// Outside the verification step nothing is uploaded. The documents are tagged
    /// with the verification they were picked for, so a result that lands after the
    /// user moved on is dropped by the flow.
    pub async fn upload_documents(
        &self,
        files: Vec<CandidateFile>,
    ) -> Result<RegistrationState, RegistrationOrchestratorError> {
        let current = self.get_state().await;
        let verification_type = match &current.step {
            RegistrationStep::Verification {
                verification_type, ..
            } => *verification_type,
            _ => {
                warn!(step = %current.kind(), "document upload outside verification step ignored");
                return Ok(current);
            }
        };

        let offered = files.len();
        let documents = self
            .document_upload
            .upload(files)
            .await
            .map_err(RegistrationOrchestratorError::DocumentUpload)?;
        debug!(offered, accepted = documents.len(), %verification_type, "documents uploaded");
        self.dispatch(RegistrationEvent::AttachDocuments {
            verification_type,
            documents,
        })
        .await
    }

    /// Snapshot read; does not wait for an in-flight dispatch.
    pub async fn get_state(&self) -> RegistrationState {
        self.state.lock().await.clone()
    }

    /// Predicate the platform consults on every hardware back-press.
    pub async fn should_exit_on_back(&self) -> bool {
        navigation::should_exit_on_back(self.get_state().await.kind())
    }

    pub async fn handle_hardware_back(&self) -> BackPress {
        if self.should_exit_on_back().await {
            info!("hardware back at entry step, exiting");
            BackPress::ExitApp
        } else {
            BackPress::Ignored
        }
    }

    /// Abandons registration: pending countdowns are cancelled and the accumulated
    /// profile is dropped without being persisted.
    pub async fn abandon(&self) -> Result<RegistrationState, RegistrationOrchestratorError> {
        let state = self.dispatch(RegistrationEvent::Abandon).await?;
        self.countdown
            .cancel_all()
            .await
            .map_err(RegistrationOrchestratorError::Countdown)?;
        info!("registration abandoned");
        Ok(state)
    }

    /// Abandons registration and launches a fresh flow from the splash screen.
    pub async fn restart(&self) -> Result<RegistrationState, RegistrationOrchestratorError> {
        self.abandon().await?;
        self.launch().await
    }

    /// Feeds countdown ticks into the flow until the sender side is dropped.
    pub fn spawn_countdown_pump(
        self: &Arc<Self>,
        mut ticks: mpsc::UnboundedReceiver<CountdownTick>,
    ) -> JoinHandle<()> {
        let orchestrator = Arc::clone(self);
        let span = info_span!("usecase.registration_orchestrator.countdown_pump");
        tokio::spawn(
            async move {
                while let Some(tick) = ticks.recv().await {
                    if let Err(err) = orchestrator.handle_countdown_tick(tick).await {
                        error!(error = %err, countdown = %tick.id, "countdown tick dispatch failed");
                    }
                }
                debug!("countdown pump stopped");
            }
            .instrument(span),
        )
    }

    pub async fn dispatch(
        &self,
        event: RegistrationEvent,
    ) -> Result<RegistrationState, RegistrationOrchestratorError> {
        let _dispatch_guard = self.dispatch_lock.lock().await;

        let event_name = event.name();
        let span = info_span!("usecase.registration_orchestrator.dispatch", event = event_name);
        async {
            let current = self.get_state().await;
            let from = current.kind();
            let (next, actions) = self.machine.transition(current, event);
            let to = next.kind();
            if from != to {
                info!(from = %from, to = %to, event = event_name, "registration step transition");
            } else {
                trace!(step = %to, event = event_name, "registration step updated");
            }

            self.execute_actions(actions).await?;
            self.set_state_and_emit(next.clone()).await;
            Ok::<_, RegistrationOrchestratorError>(next)
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(
        &self,
        actions: Vec<RegistrationAction>,
    ) -> Result<(), RegistrationOrchestratorError> {
        for action in actions {
            match action {
                RegistrationAction::StartCountdown {
                    id,
                    ticks,
                    period_ms,
                } => {
                    debug!(countdown = %id, ticks, period_ms, "registration executing StartCountdown");
                    self.countdown
                        .start(id, ticks, Duration::from_millis(period_ms))
                        .await
                        .map_err(RegistrationOrchestratorError::Countdown)?;
                }
                RegistrationAction::CancelCountdown { id } => {
                    debug!(countdown = %id, "registration executing CancelCountdown");
                    // A late cancel is harmless: stale ticks are dropped by the machine.
                    if let Err(err) = self.countdown.cancel(id).await {
                        warn!(error = %err, countdown = %id, "countdown cancel failed");
                    }
                }
                RegistrationAction::SendOtp { phone, national_id } => {
                    debug!(national_id = %national_id, "registration executing SendOtp");
                    let request = OtpRequest {
                        country_code: self.country_code.clone(),
                        phone,
                        national_id,
                    };
                    // The user can still resend once the cool-down ends.
                    if let Err(err) = self.otp_delivery.send_code(&request).await {
                        error!(
                            error = %err,
                            national_id = %request.national_id,
                            "otp delivery failed"
                        );
                    }
                }
                RegistrationAction::HandOffProfile { profile } => {
                    debug!("registration executing HandOffProfile");
                    self.hand_off.execute(profile).await?;
                }
            }
        }
        Ok(())
    }

    /// Caller holds `dispatch_lock`.
    async fn set_state_and_emit(&self, state: RegistrationState) {
        *self.state.lock().await = state.clone();
        self.event_port
            .emit_registration_state_changed(&state)
            .await;
    }
}
