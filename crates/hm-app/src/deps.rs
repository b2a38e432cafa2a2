//! # Registration Dependencies
//!
//! Parameter grouping for [`crate::RegistrationOrchestrator`] construction. Not a
//! builder: no defaults, no optional fields, no hidden logic.

use std::sync::Arc;

use hm_core::ports::*;

pub struct RegistrationDeps {
    // Timers
    pub countdown: Arc<dyn CountdownPort>,

    // External collaborators
    pub otp_delivery: Arc<dyn OtpDeliveryPort>,
    pub document_upload: Arc<dyn DocumentUploadPort>,
    pub session_boundary: Arc<dyn SessionBoundaryPort>,

    // UI
    pub event_port: Arc<dyn RegistrationEventPort>,
}
