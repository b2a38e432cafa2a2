//! Infrastructure adapters for the registration ports.

pub mod documents;
pub mod otp;
pub mod session;
pub mod time;

pub use documents::LocalDocumentPicker;
pub use otp::LoggingOtpDelivery;
pub use session::InMemorySessionBoundary;
pub use time::TokioCountdown;
