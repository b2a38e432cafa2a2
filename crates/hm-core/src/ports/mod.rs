//! Port interfaces for the application layer
//!
//! Ports define the contract between the registration use cases and the
//! collaborators that sit outside the flow: countdown driving, OTP delivery,
//! document picking, the session boundary and the UI.

mod countdown;
mod document_upload;
mod otp_delivery;
mod registration_event_port;
mod session_boundary;

pub use countdown::CountdownPort;
pub use document_upload::{CandidateFile, DocumentUploadPort};
pub use otp_delivery::{OtpDeliveryPort, OtpRequest};
pub use registration_event_port::RegistrationEventPort;
pub use session_boundary::SessionBoundaryPort;
